use healthcare_records::{HealthcareRecordsContract, HealthcareRecordsContractClient};
use soroban_sdk::{testutils::Address as _, Address, Env, String};

pub struct TestContext {
    pub env: Env,
    pub client: HealthcareRecordsContractClient<'static>,
    pub owner: Address,
}

/// Creates a mocked Soroban environment, deploys the contract, and initializes the owner.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthcareRecordsContract, ());
    let client = HealthcareRecordsContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner);

    TestContext { env, client, owner }
}

/// Generates a provider address and authorizes it as the owner.
#[allow(dead_code)]
pub fn create_provider(ctx: &TestContext) -> Address {
    let provider = Address::generate(&ctx.env);
    ctx.client.authorize_provider(&ctx.owner, &provider);
    provider
}

/// Adds a record and returns the generated record id.
pub fn add_test_record(
    ctx: &TestContext,
    caller: &Address,
    patient_id: u64,
    name: &str,
    diagnosis: &str,
) -> u64 {
    ctx.client.add_record(
        caller,
        &patient_id,
        &String::from_str(&ctx.env, name),
        &String::from_str(&ctx.env, diagnosis),
        &String::from_str(&ctx.env, "Observation"),
    )
}
