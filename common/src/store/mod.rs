//! Persistence boundary. Every service takes a `Store` explicitly; the binary
//! injects `PgStore`, tests inject `MemoryStore`.
//!
//! Lookups scoped by owner or invitee return `None` both when the row is
//! missing and when it belongs to someone else.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::{
    error::Result,
    models::{
        NewShare, NewUser, ShareDetails, ShareId, Transaction, TransactionId, User, UserId,
        Wallet, WalletId, WalletShare,
    },
    utils::{
        CreateTransactionRequest, CreateWalletRequest, ShareStatus, UpdateTransactionRequest,
        UpdateWalletRequest,
    },
};

#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync + 'static {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<bool>;
    /// Fails with `Conflict` when the email is taken.
    async fn update_email(&self, id: UserId, email: &str) -> Result<Option<User>>;
    /// Cascades to owned wallets, their transactions and shares, shares
    /// addressed to the user and transactions the user recorded.
    async fn delete_user(&self, id: UserId) -> Result<bool>;

    async fn list_wallets(&self, owner: UserId) -> Result<Vec<Wallet>>;
    async fn find_owned_wallet(&self, owner: UserId, wallet: WalletId) -> Result<Option<Wallet>>;
    async fn insert_wallet(&self, owner: UserId, fields: &CreateWalletRequest) -> Result<Wallet>;
    async fn update_wallet(
        &self,
        owner: UserId,
        wallet: WalletId,
        changes: &UpdateWalletRequest,
    ) -> Result<Option<Wallet>>;
    /// Cascades to the wallet's transactions and shares.
    async fn delete_wallet(&self, owner: UserId, wallet: WalletId) -> Result<bool>;

    /// Creation order.
    async fn list_transactions(&self, wallet: WalletId) -> Result<Vec<Transaction>>;
    async fn insert_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        fields: &CreateTransactionRequest,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
        changes: &UpdateTransactionRequest,
    ) -> Result<Option<Transaction>>;
    async fn delete_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
    ) -> Result<bool>;

    /// The share for a (wallet, invitee) pair, whatever its status.
    async fn find_share(&self, wallet: WalletId, shared_with: UserId)
        -> Result<Option<WalletShare>>;
    /// Fails with `Conflict` when the (wallet, invitee) pair already has a share.
    async fn insert_share(&self, share: NewShare) -> Result<WalletShare>;
    async fn shares_for(&self, shared_with: UserId, status: ShareStatus)
        -> Result<Vec<ShareDetails>>;
    async fn find_invitee_share(&self, id: ShareId, shared_with: UserId)
        -> Result<Option<WalletShare>>;
    /// Moves a non-rejected share addressed to `shared_with` to `status`.
    async fn update_share_status(
        &self,
        id: ShareId,
        shared_with: UserId,
        status: ShareStatus,
    ) -> Result<Option<WalletShare>>;
}
