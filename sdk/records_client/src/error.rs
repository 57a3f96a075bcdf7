//! Error types for the records client.
//!
//! # Error Hierarchy
//!
//! - [`GatewayError`]: failures reported by a [`LedgerGateway`](crate::LedgerGateway)
//! - [`WalletError`]: failures reported by a [`Wallet`](crate::Wallet)
//! - [`SessionError`]: everything a session command can fail with; its
//!   `Display` text is the message delivered to the outcome sink

use std::fmt;

use thiserror::Error;

/// Failure of a single remote ledger call.
///
/// Gateways only distinguish a call that never reached the remote from one the
/// remote explicitly refused; the remote's message is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport, node or signing fault. The call did not take effect.
    #[error("{0}")]
    Unavailable(String),

    /// The ledger refused the operation (e.g. unauthorized signer).
    #[error("{0}")]
    Rejected(String),
}

/// Failure to obtain an account from the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No wallet is installed or it cannot be reached.
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    /// The user declined the access request.
    #[error("user rejected the request")]
    UserRejected,
}

/// The remote operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    FetchRecords,
    CheckAuthorization,
    AddRecord,
    AuthorizeProvider,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::Connect => "Error connecting to wallet",
            Operation::FetchRecords => "Error fetching patient records",
            Operation::CheckAuthorization => "Error checking authorization",
            Operation::AddRecord => "Error adding records",
            Operation::AuthorizeProvider => "Error authorizing provider",
        };
        f.write_str(text)
    }
}

/// Coarse classification of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; never reaches the ledger.
    Validation,
    /// A local capability check failed.
    NotAuthorized,
    /// The command needs a connected session.
    Precondition,
    WalletUnavailable,
    UserRejected,
    /// Transport or node fault, including finalization timeouts.
    RemoteUnavailable,
    /// The ledger refused the operation.
    RemoteRejected,
}

/// Errors returned by session commands.
///
/// Every variant is reported to the outcome sink before it is returned, so
/// callers may ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Patient id is not a base-10 non-negative integer.
    #[error("Please enter a valid Patient ID (must be a number).")]
    InvalidPatientId {
        /// Input as typed.
        raw: String,
    },

    /// Account input is blank.
    #[error("Please enter a valid provider address.")]
    InvalidAccount {
        /// Input as typed.
        raw: String,
    },

    /// The session lacks the capability required by the command.
    #[error("{reason}")]
    NotAuthorized {
        /// User-facing explanation.
        reason: &'static str,
    },

    /// A record or authorize command ran before a successful connect.
    #[error("Please connect a wallet first.")]
    NotConnected,

    #[error("Error connecting to wallet: {0}")]
    WalletUnavailable(String),

    #[error("Error connecting to wallet: user rejected the request")]
    UserRejected,

    /// The call never took effect on the ledger.
    #[error("{operation}: {message}")]
    RemoteUnavailable {
        operation: Operation,
        message: String,
    },

    /// The ledger refused the call.
    #[error("{operation}: {message}")]
    RemoteRejected {
        operation: Operation,
        message: String,
    },
}

impl SessionError {
    pub(crate) const NOT_PROVIDER: &'static str =
        "You are not authorized to add records. Please contact the contract owner.";
    pub(crate) const NOT_OWNER: &'static str = "Only contract owner can call this function";

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidPatientId { .. } | SessionError::InvalidAccount { .. } => {
                ErrorKind::Validation
            }
            SessionError::NotAuthorized { .. } => ErrorKind::NotAuthorized,
            SessionError::NotConnected => ErrorKind::Precondition,
            SessionError::WalletUnavailable(_) => ErrorKind::WalletUnavailable,
            SessionError::UserRejected => ErrorKind::UserRejected,
            SessionError::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            SessionError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
        }
    }

    /// Attributes a gateway failure to `operation`.
    pub fn remote(operation: Operation, err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable(message) => SessionError::RemoteUnavailable {
                operation,
                message,
            },
            GatewayError::Rejected(message) => SessionError::RemoteRejected { operation, message },
        }
    }
}

impl From<WalletError> for SessionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Unavailable(message) => SessionError::WalletUnavailable(message),
            WalletError::UserRejected => SessionError::UserRejected,
        }
    }
}
