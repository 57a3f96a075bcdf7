//! Wallet access and owner resolution.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::account::{Account, Signer};
use crate::error::{Operation, SessionError, WalletError};
use crate::gateway::LedgerGateway;
use crate::session::Session;

/// External wallet that owns the user's keys.
#[async_trait(?Send)]
pub trait Wallet {
    /// Asks the user for access to their active account. May suspend until the
    /// user approves in the wallet UI.
    async fn request_access(&self) -> Result<(Account, Signer), WalletError>;
}

/// Wallet holding a single fixed account, for headless and sandboxed use.
#[derive(Clone, Debug)]
pub struct StaticWallet {
    access: Result<Account, WalletError>,
}

impl StaticWallet {
    /// Grants access to `account` on every request.
    pub fn new(account: Account) -> Self {
        Self {
            access: Ok(account),
        }
    }

    /// A wallet that cannot be reached.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            access: Err(WalletError::Unavailable(reason.into())),
        }
    }

    /// A wallet whose user declines every request.
    pub fn rejecting() -> Self {
        Self {
            access: Err(WalletError::UserRejected),
        }
    }
}

#[async_trait(?Send)]
impl Wallet for StaticWallet {
    async fn request_access(&self) -> Result<(Account, Signer), WalletError> {
        let account = self.access.clone()?;
        Ok((account.clone(), Signer::new(account)))
    }
}

/// Establishes a session's account, signer and owner flag.
pub struct IdentityBinder<'a, W: ?Sized, G: ?Sized> {
    wallet: &'a W,
    gateway: &'a G,
}

impl<'a, W, G> IdentityBinder<'a, W, G>
where
    W: Wallet + ?Sized,
    G: LedgerGateway + ?Sized,
{
    pub fn new(wallet: &'a W, gateway: &'a G) -> Self {
        Self { wallet, gateway }
    }

    /// Requests wallet access, then compares the account to the ledger owner.
    ///
    /// Nothing is returned unless every step succeeds, so a failed bind
    /// leaves no partial identity behind.
    ///
    /// # Errors
    ///
    /// Wallet failures map to [`SessionError::WalletUnavailable`] or
    /// [`SessionError::UserRejected`]; an owner lookup failure maps to a
    /// remote error attributed to [`Operation::Connect`].
    pub async fn bind(&self) -> Result<Session, SessionError> {
        let (account, signer) = self.wallet.request_access().await?;
        debug!(account = %account, "wallet granted access");

        let owner = self
            .gateway
            .get_owner()
            .await
            .map_err(|err| SessionError::remote(Operation::Connect, err))?;

        let is_owner = account == owner;
        info!(account = %account.abbreviated(), is_owner, "identity bound");

        Ok(Session::bound(account, signer, is_owner))
    }
}
