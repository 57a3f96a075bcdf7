//! Session state machine and the record commands.
//!
//! A [`RecordSession`] owns the session value, the currently displayed
//! [`RecordSet`] and the connection state:
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──ok──▶ Connected { is_owner }
//!                               │
//!                               └──err──▶ ConnectFailed ──connect──▶ Connecting
//! ```
//!
//! Commands are serialized: each holds the state lock from validation to its
//! final notification, so no half-applied state is ever observable. Every
//! failure is reported to the [`OutcomeSink`] exactly once and also returned.

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::account::{Account, Signer};
use crate::config::SessionConfig;
use crate::error::{Operation, SessionError};
use crate::gateway::{LedgerGateway, PendingTransaction, TransactionReceipt};
use crate::identity::{IdentityBinder, Wallet};
use crate::outcome::{Outcome, OutcomeSink};
use crate::record::{PatientId, RecordForm, RecordSet};

/// The identity bound to a session.
///
/// Empty until a connect succeeds. `is_owner` stays unknown (`None`) until the
/// owner lookup has completed.
#[derive(Clone, Debug, Default)]
pub struct Session {
    account: Option<Account>,
    signer: Option<Signer>,
    is_owner: Option<bool>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn bound(account: Account, signer: Signer, is_owner: bool) -> Self {
        Self {
            account: Some(account),
            signer: Some(signer),
            is_owner: Some(is_owner),
        }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn signer(&self) -> Option<&Signer> {
        self.signer.as_ref()
    }

    pub fn is_owner(&self) -> Option<bool> {
        self.is_owner
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { is_owner: bool },
    ConnectFailed,
}

struct SessionState {
    connection: ConnectionState,
    session: Session,
    records: RecordSet,
}

/// Identity of a connected session, copied out of the state for one command.
struct Identity {
    account: Account,
    signer: Signer,
    is_owner: bool,
}

/// Controller mediating fetch, add and authorize commands against a ledger.
pub struct RecordSession<G, W, S> {
    gateway: G,
    wallet: W,
    sink: S,
    config: SessionConfig,
    state: Mutex<SessionState>,
}

impl<G, W, S> RecordSession<G, W, S>
where
    G: LedgerGateway,
    W: Wallet,
    S: OutcomeSink,
{
    pub fn new(gateway: G, wallet: W, sink: S, config: SessionConfig) -> Self {
        Self {
            gateway,
            wallet,
            sink,
            config,
            state: Mutex::new(SessionState {
                connection: ConnectionState::Disconnected,
                session: Session::empty(),
                records: RecordSet::empty(),
            }),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.state.lock().await.connection
    }

    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    /// The currently displayed records.
    pub async fn records(&self) -> RecordSet {
        self.state.lock().await.records.clone()
    }

    /// Binds the wallet account and resolves ownership.
    ///
    /// Calling this again performs a full reconnect. On failure the session is
    /// left empty and the state becomes [`ConnectionState::ConnectFailed`].
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.connection = ConnectionState::Connecting;
        state.session = Session::empty();
        state.records = RecordSet::empty();

        let result = IdentityBinder::new(&self.wallet, &self.gateway).bind().await;
        match result {
            Ok(session) => {
                let is_owner = session.is_owner() == Some(true);
                state.session = session;
                state.connection = ConnectionState::Connected { is_owner };
                info!(is_owner, "session connected");
                Ok(())
            }
            Err(err) => {
                state.connection = ConnectionState::ConnectFailed;
                self.report(Err(err))
            }
        }
    }

    /// Queries the ledger for a patient's records and displays them.
    ///
    /// The displayed set is replaced on every attempt: an invalid id or a
    /// remote failure leaves it empty. Success is not notified.
    #[instrument(skip(self))]
    pub async fn fetch_records(&self, raw_patient_id: &str) -> Result<RecordSet, SessionError> {
        let mut state = self.state.lock().await;
        let result = self.fetch_in(&mut state, raw_patient_id).await;
        self.report(result)
    }

    /// Appends a record if the session account is an authorized provider,
    /// waits for finalization, then refreshes the patient's records.
    #[instrument(skip(self, form))]
    pub async fn add_record(&self, form: RecordForm) -> Result<TransactionReceipt, SessionError> {
        let mut state = self.state.lock().await;
        let result = self.add_in(&mut state, form).await;
        if result.is_ok() {
            self.sink.notify(Outcome::success("Record added successfully"));
        }
        self.report(result)
    }

    /// Grants write authorization to `raw_target`. Owner only.
    #[instrument(skip(self))]
    pub async fn authorize_provider(
        &self,
        raw_target: &str,
    ) -> Result<TransactionReceipt, SessionError> {
        let state = self.state.lock().await;
        let result = self.authorize_in(&state, raw_target).await;
        self.report(result)
    }

    async fn fetch_in(
        &self,
        state: &mut SessionState,
        raw_patient_id: &str,
    ) -> Result<RecordSet, SessionError> {
        Self::require_connected(state)?;
        let patient_id = match PatientId::parse(raw_patient_id) {
            Ok(id) => id,
            Err(err) => {
                state.records = RecordSet::empty();
                return Err(err);
            }
        };
        self.refresh(state, patient_id).await
    }

    async fn add_in(
        &self,
        state: &mut SessionState,
        form: RecordForm,
    ) -> Result<TransactionReceipt, SessionError> {
        let identity = Self::require_connected(state)?;
        let input = form.into_input()?;

        let authorized = self
            .gateway
            .is_authorized(&identity.account)
            .await
            .map_err(|err| SessionError::remote(Operation::CheckAuthorization, err))?;
        if !authorized {
            return Err(SessionError::NotAuthorized {
                reason: SessionError::NOT_PROVIDER,
            });
        }

        let pending = self
            .gateway
            .add_record(&identity.signer, &input)
            .await
            .map_err(|err| SessionError::remote(Operation::AddRecord, err))?;
        let receipt = self.finalize(Operation::AddRecord, pending).await?;

        // The write is final; a failed refresh is reported on its own.
        if let Err(err) = self.refresh(state, input.patient_id).await {
            self.notify_failure(&err);
        }
        Ok(receipt)
    }

    async fn authorize_in(
        &self,
        state: &SessionState,
        raw_target: &str,
    ) -> Result<TransactionReceipt, SessionError> {
        let identity = Self::require_connected(state)?;
        if !identity.is_owner {
            return Err(SessionError::NotAuthorized {
                reason: SessionError::NOT_OWNER,
            });
        }
        let target = Account::parse(raw_target)?;

        let pending = self
            .gateway
            .authorize_provider(&identity.signer, &target)
            .await
            .map_err(|err| SessionError::remote(Operation::AuthorizeProvider, err))?;
        let receipt = self.finalize(Operation::AuthorizeProvider, pending).await?;

        self.sink.notify(Outcome::success(format!(
            "Provider {target} authorized successfully"
        )));
        Ok(receipt)
    }

    async fn refresh(
        &self,
        state: &mut SessionState,
        patient_id: PatientId,
    ) -> Result<RecordSet, SessionError> {
        match self.gateway.get_patient_records(patient_id).await {
            Ok(records) => {
                debug!(%patient_id, count = records.len(), "records fetched");
                state.records = records.clone();
                Ok(records)
            }
            Err(err) => {
                state.records = RecordSet::empty();
                Err(SessionError::remote(Operation::FetchRecords, err))
            }
        }
    }

    async fn finalize(
        &self,
        operation: Operation,
        pending: PendingTransaction,
    ) -> Result<TransactionReceipt, SessionError> {
        let limit = self.config.finalization_timeout();
        let tx_id = pending.tx_id.clone();
        debug!(%tx_id, "awaiting finalization");

        match timeout(limit, self.gateway.wait_for_finalization(pending)).await {
            Ok(Ok(receipt)) => {
                info!(%tx_id, ledger = receipt.ledger_sequence, "transaction finalized");
                Ok(receipt)
            }
            Ok(Err(err)) => Err(SessionError::remote(operation, err)),
            Err(_) => Err(SessionError::RemoteUnavailable {
                operation,
                message: format!(
                    "transaction {tx_id} was not finalized within {}s",
                    limit.as_secs()
                ),
            }),
        }
    }

    fn require_connected(state: &SessionState) -> Result<Identity, SessionError> {
        let ConnectionState::Connected { is_owner } = state.connection else {
            return Err(SessionError::NotConnected);
        };
        match (state.session.account(), state.session.signer()) {
            (Some(account), Some(signer)) => Ok(Identity {
                account: account.clone(),
                signer: signer.clone(),
                is_owner,
            }),
            _ => Err(SessionError::NotConnected),
        }
    }

    fn report<T>(&self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(err) = &result {
            self.notify_failure(err);
        }
        result
    }

    fn notify_failure(&self, err: &SessionError) {
        warn!(kind = ?err.kind(), "{err}");
        self.sink.notify(Outcome::error(err.to_string()));
    }
}
