//! In-process ledger backed by the `healthcare_records` contract.
//!
//! [`SandboxLedger`] deploys the contract into a local Soroban environment
//! with signatures mocked. Mutating calls are queued on submission and only
//! executed when [`LedgerGateway::wait_for_finalization`] closes a ledger, so
//! a read issued before finalization does not observe the write.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use healthcare_records::{
    ContractError, HealthcareRecordsContract, HealthcareRecordsContractClient,
    Record as LedgerRecord,
};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, Env, InvokeError, String as LedgerString};
use tracing::debug;

use crate::account::{Account, Signer};
use crate::config::SandboxConfig;
use crate::error::GatewayError;
use crate::gateway::{LedgerGateway, PendingTransaction, TransactionReceipt};
use crate::record::{PatientId, Record, RecordInput, RecordSet};

enum QueuedCall {
    AddRecord { caller: Address, input: RecordInput },
    AuthorizeProvider { caller: Address, provider: Address },
}

/// Local ledger for development and tests.
///
/// Accounts must be opened with [`SandboxLedger::open_account`] before they
/// can sign or be authorized.
pub struct SandboxLedger {
    env: Env,
    contract_id: Address,
    owner: Account,
    config: SandboxConfig,
    accounts: RefCell<HashMap<Account, Address>>,
    queue: RefCell<HashMap<String, QueuedCall>>,
    next_tx: Cell<u64>,
    offline: Cell<bool>,
    stalled: Cell<bool>,
}

impl SandboxLedger {
    /// Deploys and initializes a fresh contract owned by a new account.
    pub fn new(config: SandboxConfig) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(config.genesis_timestamp);

        let contract_id = env.register(HealthcareRecordsContract, ());
        let owner_address = Address::generate(&env);
        HealthcareRecordsContractClient::new(&env, &contract_id).initialize(&owner_address);

        let owner = account_of(&owner_address);
        let mut accounts = HashMap::new();
        accounts.insert(owner.clone(), owner_address);
        debug!(owner = %owner.abbreviated(), "sandbox ledger deployed");

        Self {
            env,
            contract_id,
            owner,
            config,
            accounts: RefCell::new(accounts),
            queue: RefCell::new(HashMap::new()),
            next_tx: Cell::new(0),
            offline: Cell::new(false),
            stalled: Cell::new(false),
        }
    }

    /// The account the contract was initialized with.
    pub fn owner(&self) -> Account {
        self.owner.clone()
    }

    /// Creates a new account on the ledger.
    pub fn open_account(&self) -> Account {
        let address = Address::generate(&self.env);
        let account = account_of(&address);
        self.accounts.borrow_mut().insert(account.clone(), address);
        account
    }

    /// While offline every call fails as unavailable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// While stalled, finalization never completes.
    pub fn stall_finalization(&self, stalled: bool) {
        self.stalled.set(stalled);
    }

    /// Submitted calls still waiting for finalization.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    fn contract(&self) -> HealthcareRecordsContractClient<'_> {
        HealthcareRecordsContractClient::new(&self.env, &self.contract_id)
    }

    fn ensure_online(&self) -> Result<(), GatewayError> {
        if self.offline.get() {
            return Err(GatewayError::Unavailable(
                "ledger node unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn address_of(&self, account: &Account) -> Option<Address> {
        self.accounts.borrow().get(account).cloned()
    }

    fn signer_address(&self, signer: &Signer) -> Result<Address, GatewayError> {
        self.address_of(signer.account()).ok_or_else(|| {
            GatewayError::Unavailable(format!(
                "no signing key for account {}",
                signer.account()
            ))
        })
    }

    fn enqueue(&self, call: QueuedCall) -> PendingTransaction {
        let seq = self.next_tx.get().saturating_add(1);
        self.next_tx.set(seq);
        let tx_id = format!("tx-{seq:08}");
        self.queue.borrow_mut().insert(tx_id.clone(), call);
        debug!(%tx_id, "transaction submitted");
        PendingTransaction { tx_id }
    }

    fn close_ledger(&self) {
        let close_secs = self.config.ledger_close_secs;
        self.env.ledger().with_mut(|info| {
            info.sequence_number = info.sequence_number.saturating_add(1);
            info.timestamp = info.timestamp.saturating_add(close_secs);
        });
    }

    fn execute(&self, call: QueuedCall) -> Result<(), GatewayError> {
        let contract = self.contract();
        match call {
            QueuedCall::AddRecord { caller, input } => settle(contract.try_add_record(
                &caller,
                &input.patient_id.get(),
                &LedgerString::from_str(&self.env, &input.name),
                &LedgerString::from_str(&self.env, &input.diagnosis),
                &LedgerString::from_str(&self.env, &input.treatment),
            ))
            .map(|_| ()),
            QueuedCall::AuthorizeProvider { caller, provider } => {
                settle(contract.try_authorize_provider(&caller, &provider))
            }
        }
    }
}

#[async_trait(?Send)]
impl LedgerGateway for SandboxLedger {
    async fn get_owner(&self) -> Result<Account, GatewayError> {
        self.ensure_online()?;
        let owner = settle(self.contract().try_get_owner())?;
        Ok(account_of(&owner))
    }

    async fn get_patient_records(
        &self,
        patient_id: PatientId,
    ) -> Result<RecordSet, GatewayError> {
        self.ensure_online()?;
        let records = settle(self.contract().try_get_patient_records(&patient_id.get()))?;
        Ok(RecordSet::new(
            patient_id,
            records.iter().map(|record| record_of(&record)).collect(),
        ))
    }

    async fn is_authorized(&self, account: &Account) -> Result<bool, GatewayError> {
        self.ensure_online()?;
        match self.address_of(account) {
            Some(address) => settle(self.contract().try_is_authorized(&address)),
            None => Ok(false),
        }
    }

    async fn add_record(
        &self,
        signer: &Signer,
        input: &RecordInput,
    ) -> Result<PendingTransaction, GatewayError> {
        self.ensure_online()?;
        let caller = self.signer_address(signer)?;
        Ok(self.enqueue(QueuedCall::AddRecord {
            caller,
            input: input.clone(),
        }))
    }

    async fn authorize_provider(
        &self,
        signer: &Signer,
        target: &Account,
    ) -> Result<PendingTransaction, GatewayError> {
        self.ensure_online()?;
        let caller = self.signer_address(signer)?;
        let provider = self
            .address_of(target)
            .ok_or_else(|| GatewayError::Rejected(format!("unknown account {target}")))?;
        Ok(self.enqueue(QueuedCall::AuthorizeProvider { caller, provider }))
    }

    async fn wait_for_finalization(
        &self,
        pending: PendingTransaction,
    ) -> Result<TransactionReceipt, GatewayError> {
        self.ensure_online()?;
        if self.stalled.get() {
            return std::future::pending().await;
        }

        let call = self
            .queue
            .borrow_mut()
            .remove(&pending.tx_id)
            .ok_or_else(|| {
                GatewayError::Rejected(format!("unknown transaction {}", pending.tx_id))
            })?;

        self.close_ledger();
        self.execute(call)?;

        Ok(TransactionReceipt {
            tx_id: pending.tx_id,
            ledger_sequence: self.env.ledger().sequence(),
        })
    }
}

/// Flattens a contract client `try_` result into a gateway result.
fn settle<T, C: Debug>(
    result: Result<Result<T, C>, Result<ContractError, InvokeError>>,
) -> Result<T, GatewayError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(GatewayError::Unavailable(format!(
            "malformed ledger response: {err:?}"
        ))),
        Err(Ok(err)) => Err(GatewayError::Rejected(err.message().to_string())),
        Err(Err(err)) => Err(GatewayError::Rejected(format!(
            "transaction aborted: {err:?}"
        ))),
    }
}

fn account_of(address: &Address) -> Account {
    Account::new(text_of(&address.to_string()))
}

fn record_of(record: &LedgerRecord) -> Record {
    Record {
        record_id: record.record_id,
        patient_name: text_of(&record.patient_name),
        diagnosis: text_of(&record.diagnosis),
        treatment: text_of(&record.treatment),
        timestamp: record.timestamp,
    }
}

fn text_of(value: &LedgerString) -> String {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
