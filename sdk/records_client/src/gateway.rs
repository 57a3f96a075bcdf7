//! Typed boundary to the remote ledger.

use std::rc::Rc;

use async_trait::async_trait;

use crate::account::{Account, Signer};
use crate::error::GatewayError;
use crate::record::{PatientId, RecordInput, RecordSet};

/// A submitted state-changing call that has not been finalized yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransaction {
    pub tx_id: String,
}

/// Proof that a state-changing call was finalized by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_id: String,
    /// Ledger sequence the transaction was finalized in.
    pub ledger_sequence: u32,
}

/// Request/response boundary to the records ledger.
///
/// Implementations hold no session state, never retry and never interpret
/// remote failures beyond [`GatewayError::Unavailable`] versus
/// [`GatewayError::Rejected`].
///
/// Mutating calls return a [`PendingTransaction`]; the operation is only
/// complete once [`LedgerGateway::wait_for_finalization`] returns.
#[async_trait(?Send)]
pub trait LedgerGateway {
    /// The ledger's registered owner.
    async fn get_owner(&self) -> Result<Account, GatewayError>;

    /// Records for `patient_id` in ledger order. Unknown patients yield an
    /// empty set, not an error.
    async fn get_patient_records(&self, patient_id: PatientId)
        -> Result<RecordSet, GatewayError>;

    /// Whether `account` may add records. Read-only.
    async fn is_authorized(&self, account: &Account) -> Result<bool, GatewayError>;

    /// Submits a new record signed by `signer`.
    async fn add_record(
        &self,
        signer: &Signer,
        input: &RecordInput,
    ) -> Result<PendingTransaction, GatewayError>;

    /// Submits a write grant for `target`. The ledger expects the owner to
    /// sign; this call does not check it.
    async fn authorize_provider(
        &self,
        signer: &Signer,
        target: &Account,
    ) -> Result<PendingTransaction, GatewayError>;

    /// Suspends until `pending` is finalized or fails.
    async fn wait_for_finalization(
        &self,
        pending: PendingTransaction,
    ) -> Result<TransactionReceipt, GatewayError>;
}

/// Lets several sessions share one gateway.
#[async_trait(?Send)]
impl<T: LedgerGateway + ?Sized> LedgerGateway for Rc<T> {
    async fn get_owner(&self) -> Result<Account, GatewayError> {
        (**self).get_owner().await
    }

    async fn get_patient_records(
        &self,
        patient_id: PatientId,
    ) -> Result<RecordSet, GatewayError> {
        (**self).get_patient_records(patient_id).await
    }

    async fn is_authorized(&self, account: &Account) -> Result<bool, GatewayError> {
        (**self).is_authorized(account).await
    }

    async fn add_record(
        &self,
        signer: &Signer,
        input: &RecordInput,
    ) -> Result<PendingTransaction, GatewayError> {
        (**self).add_record(signer, input).await
    }

    async fn authorize_provider(
        &self,
        signer: &Signer,
        target: &Account,
    ) -> Result<PendingTransaction, GatewayError> {
        (**self).authorize_provider(signer, target).await
    }

    async fn wait_for_finalization(
        &self,
        pending: PendingTransaction,
    ) -> Result<TransactionReceipt, GatewayError> {
        (**self).wait_for_finalization(pending).await
    }
}
