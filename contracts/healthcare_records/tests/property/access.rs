//! Property-based tests for write authorization.
//!
//! Invariants tested:
//! - A freshly generated account is never authorized
//! - Only accounts the owner authorized (plus the owner) can write

use healthcare_records::{ContractError, HealthcareRecordsContract, HealthcareRecordsContractClient};
use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env, String};

fn setup() -> (Env, HealthcareRecordsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthcareRecordsContract, ());
    let client = HealthcareRecordsContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner);

    (env, client, owner)
}

proptest! {
    #[test]
    fn prop_only_granted_accounts_can_write(grants in proptest::collection::vec(any::<bool>(), 1..6)) {
        let (env, client, owner) = setup();
        let name = String::from_str(&env, "P");

        for (i, granted) in grants.iter().enumerate() {
            let account = Address::generate(&env);
            prop_assert!(!client.is_authorized(&account));
            if *granted {
                client.authorize_provider(&owner, &account);
            }
            prop_assert_eq!(client.is_authorized(&account), *granted);

            let result = client.try_add_record(&account, &(i as u64), &name, &name, &name);
            if *granted {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
            }
        }
    }
}
