#![no_std]

pub mod errors;
pub mod events;


use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol, Vec};

pub use errors::{ContractError, ErrorCategory};

/// Storage keys for the contract
const OWNER: Symbol = symbol_short!("OWNER");
const INITIALIZED: Symbol = symbol_short!("INIT");
const RECORD_COUNTER: Symbol = symbol_short!("REC_CTR");
const PROVIDER: Symbol = symbol_short!("PROVIDER");
const RECORD: Symbol = symbol_short!("RECORD");
const PATIENT_RECORDS: Symbol = symbol_short!("PAT_REC");

/// TTL constants for persistent storage (in ledgers)
const TTL_THRESHOLD: u32 = 17_280; // ~1 day
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

/// A single medical record as stored on the ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub record_id: u64,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub timestamp: u64,
}

fn extend_ttl_provider_key(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_u64_key(env: &Env, key: &(Symbol, u64)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

#[contract]
pub struct HealthcareRecordsContract;

#[contractimpl]
impl HealthcareRecordsContract {
    fn require_initialized(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    fn has_write_access(env: &Env, owner: &Address, account: &Address) -> bool {
        if account == owner {
            return true;
        }
        env.storage()
            .persistent()
            .get::<_, bool>(&(PROVIDER, account.clone()))
            .unwrap_or(false)
    }

    /// Initialize the contract with the owning account
    pub fn initialize(env: Env, owner: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env, owner);

        Ok(())
    }

    /// Get the owner address
    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Self::require_initialized(&env)
    }

    /// Grant write authorization to a provider. Only the owner may call this;
    /// authorizing an already authorized provider is a no-op.
    pub fn authorize_provider(
        env: Env,
        caller: Address,
        provider: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let owner = Self::require_initialized(&env)?;

        if caller != owner {
            return Err(ContractError::Unauthorized);
        }

        let key = (PROVIDER, provider.clone());
        env.storage().persistent().set(&key, &true);
        extend_ttl_provider_key(&env, &key);

        events::publish_provider_authorized(&env, provider);

        Ok(())
    }

    /// Whether `account` may add records. The owner always may.
    pub fn is_authorized(env: Env, account: Address) -> Result<bool, ContractError> {
        let owner = Self::require_initialized(&env)?;
        Ok(Self::has_write_access(&env, &owner, &account))
    }

    /// Append a record for a patient and return its id
    pub fn add_record(
        env: Env,
        caller: Address,
        patient_id: u64,
        patient_name: String,
        diagnosis: String,
        treatment: String,
    ) -> Result<u64, ContractError> {
        caller.require_auth();
        let owner = Self::require_initialized(&env)?;

        if !Self::has_write_access(&env, &owner, &caller) {
            return Err(ContractError::Unauthorized);
        }

        let record_id: u64 = env
            .storage()
            .instance()
            .get(&RECORD_COUNTER)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().instance().set(&RECORD_COUNTER, &record_id);

        let record = Record {
            record_id,
            patient_name: patient_name.clone(),
            diagnosis,
            treatment,
            timestamp: env.ledger().timestamp(),
        };

        let key = (RECORD, record_id);
        env.storage().persistent().set(&key, &record);
        extend_ttl_u64_key(&env, &key);

        // Patients only index record ids; each record lives under its own key.
        let patient_key = (PATIENT_RECORDS, patient_id);
        let mut record_ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&patient_key)
            .unwrap_or(Vec::new(&env));
        record_ids.push_back(record_id);
        env.storage().persistent().set(&patient_key, &record_ids);
        extend_ttl_u64_key(&env, &patient_key);

        events::publish_record_added(&env, record_id, patient_id, caller, patient_name);

        Ok(record_id)
    }

    /// Get all records for a patient, oldest first
    pub fn get_patient_records(env: Env, patient_id: u64) -> Result<Vec<Record>, ContractError> {
        Self::require_initialized(&env)?;
        let record_ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&(PATIENT_RECORDS, patient_id))
            .unwrap_or(Vec::new(&env));

        let mut records = Vec::new(&env);
        for record_id in record_ids.iter() {
            let record: Record = env
                .storage()
                .persistent()
                .get(&(RECORD, record_id))
                .ok_or(ContractError::RecordNotFound)?;
            records.push_back(record);
        }
        Ok(records)
    }

    /// Get the total number of records
    pub fn get_record_count(env: Env) -> u64 {
        env.storage().instance().get(&RECORD_COUNTER).unwrap_or(0)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}
