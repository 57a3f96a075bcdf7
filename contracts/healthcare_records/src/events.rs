use soroban_sdk::{symbol_short, Address, Env, String};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub timestamp: u64,
}

/// Event published when a provider receives write authorization.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProviderAuthorizedEvent {
    pub provider: Address,
    pub timestamp: u64,
}

/// Event published when a record is appended for a patient.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAddedEvent {
    pub record_id: u64,
    pub patient_id: u64,
    pub provider: Address,
    pub patient_name: String,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, owner: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when the owner authorizes a provider.
pub fn publish_provider_authorized(env: &Env, provider: Address) {
    let topics = (symbol_short!("PRV_AUTH"), provider.clone());
    let data = ProviderAuthorizedEvent {
        provider,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new record is added.
/// The patient id and the writing provider are both indexed as topics.
pub fn publish_record_added(
    env: &Env,
    record_id: u64,
    patient_id: u64,
    provider: Address,
    patient_name: String,
) {
    let topics = (symbol_short!("REC_ADD"), patient_id, provider.clone());
    let data = RecordAddedEvent {
        record_id,
        patient_id,
        provider,
        patient_name,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
