//! Ledger identities and the signing handle bound to them.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::SessionError;

/// Number of leading characters kept by [`Account::abbreviated`].
const ABBREV_HEAD: usize = 6;
/// Number of trailing characters kept by [`Account::abbreviated`].
const ABBREV_TAIL: usize = 4;

/// A chain address identifying a signer on the ledger.
///
/// Accounts compare and hash case-insensitively: two accounts are the same
/// identity iff their lowercase forms match. The original spelling is kept for
/// display.
#[derive(Clone, Debug)]
pub struct Account(String);

impl Account {
    /// Wraps an address exactly as the wallet or ledger reported it.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Parses an account typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidAccount`] if the input is blank.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidAccount {
                raw: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for headers and badges, e.g. `GABCDE...WXYZ`.
    pub fn abbreviated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= ABBREV_HEAD + ABBREV_TAIL {
            return self.0.clone();
        }
        let head: String = chars[..ABBREV_HEAD].iter().collect();
        let tail: String = chars[chars.len() - ABBREV_TAIL..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque signing capability handed out by a wallet.
///
/// Gateways use the bound account to attribute state-changing calls; the
/// controller never inspects it.
#[derive(Clone, Debug)]
pub struct Signer {
    account: Account,
}

impl Signer {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    /// The account this handle signs for.
    pub fn account(&self) -> &Account {
        &self.account
    }
}
