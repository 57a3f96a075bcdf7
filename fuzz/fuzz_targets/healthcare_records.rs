#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use healthcare_records::{HealthcareRecordsContract, HealthcareRecordsContractClient};
use soroban_sdk::{testutils::Address as _, Address, Env, String};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    AuthorizeProvider { caller: u8, provider: u8 },
    AddRecord { caller: u8, patient_id: u64, text_len: u8 },
    GetRecords { patient_id: u64 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);

    let contract_id = env.register(HealthcareRecordsContract, ());
    let client = HealthcareRecordsContractClient::new(&env, &contract_id);
    client.initialize(&owner);

    let mut users = vec![owner.clone()];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }

    for action in actions {
        match action {
            FuzzAction::AuthorizeProvider { caller, provider } => {
                let caller = &users[caller as usize % users.len()];
                let provider = &users[provider as usize % users.len()];
                let granted = client.try_authorize_provider(caller, provider).is_ok();
                assert_eq!(granted, *caller == owner);
            }
            FuzzAction::AddRecord {
                caller,
                patient_id,
                text_len,
            } => {
                let caller = &users[caller as usize % users.len()];
                let allowed = client.is_authorized(caller);
                let before = client.get_patient_records(&patient_id).len();

                let text = "x".repeat(text_len as usize);
                let text = String::from_str(&env, &text);
                let added = client
                    .try_add_record(caller, &patient_id, &text, &text, &text)
                    .is_ok();

                // Writes land exactly when the caller holds a grant.
                assert_eq!(added, allowed);
                let after = client.get_patient_records(&patient_id).len();
                assert_eq!(after, before + u32::from(added));
            }
            FuzzAction::GetRecords { patient_id } => {
                let _ = client.get_patient_records(&patient_id);
            }
        }
    }
});
