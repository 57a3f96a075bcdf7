#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use records_client::{
    Account, GatewayError, LedgerGateway, Outcome, OutcomeSink, PatientId, PendingTransaction,
    Record, RecordForm, RecordInput, RecordSession, RecordSet, SessionConfig, Signer,
    StaticWallet, TransactionReceipt,
};

pub const OWNER: &str = "GOWNER7777777777777777777777777777777777777777777777777777";
pub const PROVIDER: &str = "GPROVIDER55555555555555555555555555555555555555555555555555";
pub const STRANGER: &str = "GSTRANGER99999999999999999999999999999999999999999999999999";

/// Every call a [`ScriptedGateway`] received, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    GetOwner,
    GetPatientRecords(u64),
    IsAuthorized(Account),
    AddRecord(RecordInput),
    AuthorizeProvider(Account),
    WaitForFinalization(String),
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(self, Call::AddRecord(_) | Call::AuthorizeProvider(_))
    }
}

/// Steps that can be scripted to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    GetOwner,
    Fetch,
    IsAuthorized,
    Submit,
    Finalize,
}

enum Queued {
    Add(RecordInput),
    Authorize(Account),
}

/// In-memory gateway that records its calls and applies writes on finalization.
pub struct ScriptedGateway {
    owner: Account,
    providers: RefCell<Vec<Account>>,
    records: RefCell<HashMap<u64, Vec<Record>>>,
    failures: RefCell<HashMap<Step, GatewayError>>,
    stall: Cell<bool>,
    queue: RefCell<HashMap<String, Queued>>,
    calls: RefCell<Vec<Call>>,
    clock: Cell<u64>,
}

impl ScriptedGateway {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: Account::new(owner),
            providers: RefCell::new(Vec::new()),
            records: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            stall: Cell::new(false),
            queue: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            clock: Cell::new(1_700_000_000),
        }
    }

    pub fn with_provider(self, provider: &str) -> Self {
        self.providers.borrow_mut().push(Account::new(provider));
        self
    }

    pub fn with_records(self, patient_id: u64, records: Vec<Record>) -> Self {
        self.records.borrow_mut().insert(patient_id, records);
        self
    }

    pub fn fail(&self, step: Step, err: GatewayError) {
        self.failures.borrow_mut().insert(step, err);
    }

    pub fn recover(&self, step: Step) {
        self.failures.borrow_mut().remove(&step);
    }

    pub fn stall_finalization(&self) {
        self.stall.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn mutating_calls(&self) -> usize {
        self.calls.borrow().iter().filter(|c| c.is_mutating()).count()
    }

    pub fn is_provider(&self, account: &Account) -> bool {
        self.providers.borrow().contains(account)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, step: Step) -> Result<(), GatewayError> {
        match self.failures.borrow().get(&step) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn enqueue(&self, queued: Queued) -> PendingTransaction {
        let mut queue = self.queue.borrow_mut();
        let tx_id = format!("0xtx{}", self.calls.borrow().len());
        queue.insert(tx_id.clone(), queued);
        PendingTransaction { tx_id }
    }
}

#[async_trait(?Send)]
impl LedgerGateway for ScriptedGateway {
    async fn get_owner(&self) -> Result<Account, GatewayError> {
        self.record(Call::GetOwner);
        self.check(Step::GetOwner)?;
        Ok(self.owner.clone())
    }

    async fn get_patient_records(
        &self,
        patient_id: PatientId,
    ) -> Result<RecordSet, GatewayError> {
        self.record(Call::GetPatientRecords(patient_id.get()));
        self.check(Step::Fetch)?;
        let records = self
            .records
            .borrow()
            .get(&patient_id.get())
            .cloned()
            .unwrap_or_default();
        Ok(RecordSet::new(patient_id, records))
    }

    async fn is_authorized(&self, account: &Account) -> Result<bool, GatewayError> {
        self.record(Call::IsAuthorized(account.clone()));
        self.check(Step::IsAuthorized)?;
        Ok(*account == self.owner || self.is_provider(account))
    }

    async fn add_record(
        &self,
        _signer: &Signer,
        input: &RecordInput,
    ) -> Result<PendingTransaction, GatewayError> {
        self.record(Call::AddRecord(input.clone()));
        self.check(Step::Submit)?;
        Ok(self.enqueue(Queued::Add(input.clone())))
    }

    async fn authorize_provider(
        &self,
        _signer: &Signer,
        target: &Account,
    ) -> Result<PendingTransaction, GatewayError> {
        self.record(Call::AuthorizeProvider(target.clone()));
        self.check(Step::Submit)?;
        Ok(self.enqueue(Queued::Authorize(target.clone())))
    }

    async fn wait_for_finalization(
        &self,
        pending: PendingTransaction,
    ) -> Result<TransactionReceipt, GatewayError> {
        self.record(Call::WaitForFinalization(pending.tx_id.clone()));
        if self.stall.get() {
            return std::future::pending().await;
        }
        self.check(Step::Finalize)?;

        let queued = self
            .queue
            .borrow_mut()
            .remove(&pending.tx_id)
            .ok_or_else(|| GatewayError::Rejected("unknown transaction".into()))?;
        self.clock.set(self.clock.get() + 5);
        match queued {
            Queued::Add(input) => {
                let mut records = self.records.borrow_mut();
                let next_id = records.values().map(Vec::len).sum::<usize>() as u64 + 1;
                records.entry(input.patient_id.get()).or_default().push(Record {
                    record_id: next_id,
                    patient_name: input.name,
                    diagnosis: input.diagnosis,
                    treatment: input.treatment,
                    timestamp: self.clock.get(),
                });
            }
            Queued::Authorize(account) => self.providers.borrow_mut().push(account),
        }

        Ok(TransactionReceipt {
            tx_id: pending.tx_id,
            ledger_sequence: 1,
        })
    }
}

/// Sink that keeps every outcome for inspection.
#[derive(Default)]
pub struct MemorySink {
    outcomes: RefCell<Vec<Outcome>>,
}

impl MemorySink {
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.borrow().clone()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.outcomes.borrow_mut().clear();
    }
}

impl OutcomeSink for MemorySink {
    fn notify(&self, outcome: Outcome) {
        self.outcomes.borrow_mut().push(outcome);
    }
}

pub type TestSession = RecordSession<ScriptedGateway, StaticWallet, MemorySink>;

pub fn session_for(gateway: ScriptedGateway, account: &str) -> TestSession {
    RecordSession::new(
        gateway,
        StaticWallet::new(Account::new(account)),
        MemorySink::default(),
        SessionConfig::default(),
    )
}

/// Connects a session and forgets the calls and outcomes of the connect.
pub async fn connected(gateway: ScriptedGateway, account: &str) -> TestSession {
    let session = session_for(gateway, account);
    session.connect().await.expect("connect");
    session.gateway().clear_calls();
    session.sink().clear();
    session
}

pub fn record(record_id: u64, name: &str, diagnosis: &str) -> Record {
    Record {
        record_id,
        patient_name: name.to_string(),
        diagnosis: diagnosis.to_string(),
        treatment: "Rest".to_string(),
        timestamp: 1_700_000_000 + record_id,
    }
}

pub fn form(patient_id: &str, name: &str, diagnosis: &str, treatment: &str) -> RecordForm {
    RecordForm {
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        diagnosis: diagnosis.to_string(),
        treatment: treatment.to_string(),
    }
}
