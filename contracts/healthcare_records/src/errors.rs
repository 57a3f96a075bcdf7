use soroban_sdk::contracterror;

/// Error categories for classifying contract failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Lifecycle errors: the contract was used before or after initialisation
    Lifecycle,
    /// Authorization errors: the caller lacks the owner or provider capability
    Authorization,
    /// Storage errors: indexed data is missing from the ledger
    Storage,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    RecordNotFound = 4,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::RecordNotFound => ErrorCategory::Storage,
        }
    }

    /// Human-readable reason, surfaced verbatim by off-chain clients.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "contract has not been initialized",
            ContractError::AlreadyInitialized => "contract is already initialized",
            ContractError::Unauthorized => "Not authorized",
            ContractError::RecordNotFound => "record not found",
        }
    }
}
