use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;

use super::Store;
use crate::{
    error::{Error, Result},
    models::{
        NewShare, NewUser, ShareDetails, ShareId, Transaction, TransactionId, User, UserId,
        UserSummary, Wallet, WalletId, WalletShare,
    },
    utils::{
        CreateTransactionRequest, CreateWalletRequest, ShareStatus, UpdateTransactionRequest,
        UpdateWalletRequest,
    },
};

/// Process-local store with the same constraints as the postgres schema:
/// unique emails, one share per (wallet, invitee) and cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    sequence: i32,
    users: BTreeMap<UserId, User>,
    wallets: BTreeMap<WalletId, Wallet>,
    transactions: BTreeMap<TransactionId, Transaction>,
    shares: BTreeMap<ShareId, WalletShare>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.sequence += 1;
        self.sequence
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn remove_wallet(&mut self, wallet: WalletId) {
        self.wallets.remove(&wallet);
        self.transactions.retain(|_, t| t.wallet_id != wallet);
        self.shares.retain(|_, s| s.wallet_id != wallet);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables()?;
        if tables.email_taken(&user.email, None) {
            return Err(Error::Conflict("record already exists".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: tables.next_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<bool> {
        let mut tables = self.tables()?;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_email(&self, id: UserId, email: &str) -> Result<Option<User>> {
        let mut tables = self.tables()?;
        if tables.email_taken(email, Some(id)) {
            return Err(Error::Conflict("record already exists".to_string()));
        }
        Ok(tables.users.get_mut(&id).map(|user| {
            user.email = email.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let mut tables = self.tables()?;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<WalletId> = tables
            .wallets
            .values()
            .filter(|w| w.user_id == id)
            .map(|w| w.id)
            .collect();
        for wallet in owned {
            tables.remove_wallet(wallet);
        }
        tables
            .shares
            .retain(|_, s| s.shared_with_id != id && s.owner_id != id);
        tables.transactions.retain(|_, t| t.user_id != id);
        Ok(true)
    }

    async fn list_wallets(&self, owner: UserId) -> Result<Vec<Wallet>> {
        Ok(self
            .tables()?
            .wallets
            .values()
            .filter(|w| w.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_owned_wallet(&self, owner: UserId, wallet: WalletId) -> Result<Option<Wallet>> {
        Ok(self
            .tables()?
            .wallets
            .get(&wallet)
            .filter(|w| w.user_id == owner)
            .cloned())
    }

    async fn insert_wallet(&self, owner: UserId, fields: &CreateWalletRequest) -> Result<Wallet> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&owner) {
            return Err(Error::not_found("referenced record"));
        }
        let now = Utc::now();
        let wallet = Wallet {
            id: tables.next_id(),
            user_id: owner,
            name: fields.name.clone(),
            code: fields.code.clone(),
            target: fields.target.clone(),
            goal: fields.goal,
            created_at: now,
            updated_at: now,
        };
        tables.wallets.insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    async fn update_wallet(
        &self,
        owner: UserId,
        wallet: WalletId,
        changes: &UpdateWalletRequest,
    ) -> Result<Option<Wallet>> {
        let mut tables = self.tables()?;
        Ok(tables
            .wallets
            .get_mut(&wallet)
            .filter(|w| w.user_id == owner)
            .map(|w| {
                if let Some(name) = &changes.name {
                    w.name = name.clone();
                }
                if let Some(code) = &changes.code {
                    w.code = code.clone();
                }
                if changes.target.is_some() {
                    w.target = changes.target.clone();
                }
                if changes.goal.is_some() {
                    w.goal = changes.goal;
                }
                w.updated_at = Utc::now();
                w.clone()
            }))
    }

    async fn delete_wallet(&self, owner: UserId, wallet: WalletId) -> Result<bool> {
        let mut tables = self.tables()?;
        let owned = tables
            .wallets
            .get(&wallet)
            .is_some_and(|w| w.user_id == owner);
        if owned {
            tables.remove_wallet(wallet);
        }
        Ok(owned)
    }

    async fn list_transactions(&self, wallet: WalletId) -> Result<Vec<Transaction>> {
        Ok(self
            .tables()?
            .transactions
            .values()
            .filter(|t| t.wallet_id == wallet)
            .cloned()
            .collect())
    }

    async fn insert_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        fields: &CreateTransactionRequest,
    ) -> Result<Transaction> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&user) || !tables.wallets.contains_key(&wallet) {
            return Err(Error::not_found("referenced record"));
        }
        let now = Utc::now();
        let transaction = Transaction {
            id: tables.next_id(),
            wallet_id: wallet,
            user_id: user,
            title: fields.title.clone(),
            kind: fields.kind.clone(),
            amount: fields.amount,
            date: fields.date,
            category: fields.category.clone(),
            description: fields.description.clone(),
            status: true,
            created_at: now,
            updated_at: now,
        };
        tables.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
        changes: &UpdateTransactionRequest,
    ) -> Result<Option<Transaction>> {
        let mut tables = self.tables()?;
        Ok(tables
            .transactions
            .get_mut(&id)
            .filter(|t| t.user_id == user && t.wallet_id == wallet)
            .map(|t| {
                if let Some(title) = &changes.title {
                    t.title = title.clone();
                }
                if let Some(kind) = &changes.kind {
                    t.kind = kind.clone();
                }
                if let Some(amount) = changes.amount {
                    t.amount = amount;
                }
                if let Some(date) = changes.date {
                    t.date = date;
                }
                if let Some(category) = &changes.category {
                    t.category = category.clone();
                }
                if let Some(description) = &changes.description {
                    t.description = description.clone();
                }
                if let Some(status) = changes.status {
                    t.status = status;
                }
                t.updated_at = Utc::now();
                t.clone()
            }))
    }

    async fn delete_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
    ) -> Result<bool> {
        let mut tables = self.tables()?;
        let matches = tables
            .transactions
            .get(&id)
            .is_some_and(|t| t.user_id == user && t.wallet_id == wallet);
        if matches {
            tables.transactions.remove(&id);
        }
        Ok(matches)
    }

    async fn find_share(
        &self,
        wallet: WalletId,
        shared_with: UserId,
    ) -> Result<Option<WalletShare>> {
        Ok(self
            .tables()?
            .shares
            .values()
            .find(|s| s.wallet_id == wallet && s.shared_with_id == shared_with)
            .cloned())
    }

    async fn insert_share(&self, share: NewShare) -> Result<WalletShare> {
        let mut tables = self.tables()?;
        if !tables.wallets.contains_key(&share.wallet_id)
            || !tables.users.contains_key(&share.owner_id)
            || !tables.users.contains_key(&share.shared_with_id)
        {
            return Err(Error::not_found("referenced record"));
        }
        let duplicate = tables
            .shares
            .values()
            .any(|s| s.wallet_id == share.wallet_id && s.shared_with_id == share.shared_with_id);
        if duplicate {
            return Err(Error::Conflict("record already exists".to_string()));
        }
        let now = Utc::now();
        let created = WalletShare {
            id: tables.next_id(),
            wallet_id: share.wallet_id,
            owner_id: share.owner_id,
            shared_with_id: share.shared_with_id,
            permission: share.permission,
            status: ShareStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.shares.insert(created.id, created.clone());
        Ok(created)
    }

    async fn shares_for(
        &self,
        shared_with: UserId,
        status: ShareStatus,
    ) -> Result<Vec<ShareDetails>> {
        let tables = self.tables()?;
        Ok(tables
            .shares
            .values()
            .filter(|s| s.shared_with_id == shared_with && s.status == status)
            .filter_map(|s| {
                let wallet = tables.wallets.get(&s.wallet_id)?;
                let owner = tables.users.get(&s.owner_id)?;
                Some(ShareDetails {
                    share: s.clone(),
                    wallet: wallet.clone(),
                    owner: UserSummary::from(owner),
                })
            })
            .collect())
    }

    async fn find_invitee_share(
        &self,
        id: ShareId,
        shared_with: UserId,
    ) -> Result<Option<WalletShare>> {
        Ok(self
            .tables()?
            .shares
            .get(&id)
            .filter(|s| s.shared_with_id == shared_with)
            .cloned())
    }

    async fn update_share_status(
        &self,
        id: ShareId,
        shared_with: UserId,
        status: ShareStatus,
    ) -> Result<Option<WalletShare>> {
        let mut tables = self.tables()?;
        Ok(tables
            .shares
            .get_mut(&id)
            .filter(|s| s.shared_with_id == shared_with && s.status != ShareStatus::Rejected)
            .map(|s| {
                s.status = status;
                s.updated_at = Utc::now();
                s.clone()
            }))
    }
}
