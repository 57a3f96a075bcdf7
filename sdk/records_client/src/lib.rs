//! Client-side orchestration for the BlockMed healthcare records ledger.
//!
//! This crate provides:
//! - [`RecordSession`]: the session state machine and the fetch / add /
//!   authorize commands, with authorization checks before every mutation.
//! - [`LedgerGateway`] and [`Wallet`]: the typed boundaries to the remote
//!   ledger and to the user's wallet.
//! - [`OutcomeSink`]: where success and failure notifications are delivered.
//! - [`SandboxLedger`]: an in-process ledger running the `healthcare_records`
//!   contract (requires the `sandbox` feature).
//!
//! Gateways and wallets may be `!Send`; drive sessions from a current-thread
//! runtime or a `LocalSet`.

pub mod account;
pub mod config;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod outcome;
pub mod record;
#[cfg(feature = "sandbox")]
pub mod sandbox;
pub mod session;

pub use account::{Account, Signer};
pub use config::{ClientConfig, ConfigError, SandboxConfig, SessionConfig};
pub use error::{ErrorKind, GatewayError, Operation, SessionError, WalletError};
pub use gateway::{LedgerGateway, PendingTransaction, TransactionReceipt};
pub use identity::{IdentityBinder, StaticWallet, Wallet};
pub use outcome::{Outcome, OutcomeKind, OutcomeSink, TracingSink};
pub use record::{PatientId, Record, RecordForm, RecordInput, RecordSet};
#[cfg(feature = "sandbox")]
pub use sandbox::SandboxLedger;
pub use session::{ConnectionState, RecordSession, Session};
