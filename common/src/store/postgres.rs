use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::Store;
use crate::{
    error::Result,
    models::{
        NewShare, NewUser, ShareDetails, ShareId, Transaction, TransactionId, User, UserId,
        UserSummary, Wallet, WalletId, WalletShare,
    },
    utils::{
        CreateTransactionRequest, CreateWalletRequest, Permission, ShareStatus,
        UpdateTransactionRequest, UpdateWalletRequest,
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    id: ShareId,
    wallet_id: WalletId,
    owner_id: UserId,
    shared_with_id: UserId,
    permission: Permission,
    status: ShareStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    wallet_name: String,
    wallet_code: String,
    wallet_target: Option<String>,
    wallet_goal: Option<f64>,
    wallet_created_at: DateTime<Utc>,
    wallet_updated_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
}

impl From<ShareRow> for ShareDetails {
    fn from(row: ShareRow) -> Self {
        ShareDetails {
            wallet: Wallet {
                id: row.wallet_id,
                user_id: row.owner_id,
                name: row.wallet_name,
                code: row.wallet_code,
                target: row.wallet_target,
                goal: row.wallet_goal,
                created_at: row.wallet_created_at,
                updated_at: row.wallet_updated_at,
            },
            owner: UserSummary {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            share: WalletShare {
                id: row.id,
                wallet_id: row.wallet_id,
                owner_id: row.owner_id,
                shared_with_id: row.shared_with_id,
                permission: row.permission,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let created: User = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_email(&self, id: UserId, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as(
            "UPDATE users SET email = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_wallets(&self, owner: UserId) -> Result<Vec<Wallet>> {
        let wallets = sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1 ORDER BY id")
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(wallets)
    }

    async fn find_owned_wallet(&self, owner: UserId, wallet: WalletId) -> Result<Option<Wallet>> {
        let wallet = sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1 AND id = $2")
            .bind(owner)
            .bind(wallet)
            .fetch_optional(&self.pool)
            .await?;
        Ok(wallet)
    }

    async fn insert_wallet(&self, owner: UserId, fields: &CreateWalletRequest) -> Result<Wallet> {
        let wallet = sqlx::query_as(
            "INSERT INTO wallets (user_id, name, code, target, goal) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.code)
        .bind(&fields.target)
        .bind(fields.goal)
        .fetch_one(&self.pool)
        .await?;
        Ok(wallet)
    }

    async fn update_wallet(
        &self,
        owner: UserId,
        wallet: WalletId,
        changes: &UpdateWalletRequest,
    ) -> Result<Option<Wallet>> {
        let wallet = sqlx::query_as(
            "UPDATE wallets SET name = COALESCE($3, name), code = COALESCE($4, code), \
             target = COALESCE($5, target), goal = COALESCE($6, goal), updated_at = NOW() \
             WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner)
        .bind(wallet)
        .bind(&changes.name)
        .bind(&changes.code)
        .bind(&changes.target)
        .bind(changes.goal)
        .fetch_optional(&self.pool)
        .await?;
        Ok(wallet)
    }

    async fn delete_wallet(&self, owner: UserId, wallet: WalletId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wallets WHERE user_id = $1 AND id = $2")
            .bind(owner)
            .bind(wallet)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_transactions(&self, wallet: WalletId) -> Result<Vec<Transaction>> {
        let transactions =
            sqlx::query_as("SELECT * FROM transactions WHERE wallet_id = $1 ORDER BY id")
                .bind(wallet)
                .fetch_all(&self.pool)
                .await?;
        Ok(transactions)
    }

    async fn insert_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        fields: &CreateTransactionRequest,
    ) -> Result<Transaction> {
        let transaction = sqlx::query_as(
            "INSERT INTO transactions (wallet_id, user_id, title, tx_type, amount, tx_date, category, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE) RETURNING *",
        )
        .bind(wallet)
        .bind(user)
        .bind(&fields.title)
        .bind(&fields.kind)
        .bind(fields.amount)
        .bind(fields.date)
        .bind(&fields.category)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
        changes: &UpdateTransactionRequest,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as(
            "UPDATE transactions SET title = COALESCE($4, title), tx_type = COALESCE($5, tx_type), \
             amount = COALESCE($6, amount), tx_date = COALESCE($7, tx_date), \
             category = COALESCE($8, category), description = COALESCE($9, description), \
             status = COALESCE($10, status), updated_at = NOW() \
             WHERE user_id = $1 AND wallet_id = $2 AND id = $3 RETURNING *",
        )
        .bind(user)
        .bind(wallet)
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.kind)
        .bind(changes.amount)
        .bind(changes.date)
        .bind(&changes.category)
        .bind(&changes.description)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transaction)
    }

    async fn delete_transaction(
        &self,
        user: UserId,
        wallet: WalletId,
        id: TransactionId,
    ) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM transactions WHERE user_id = $1 AND wallet_id = $2 AND id = $3")
                .bind(user)
                .bind(wallet)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_share(
        &self,
        wallet: WalletId,
        shared_with: UserId,
    ) -> Result<Option<WalletShare>> {
        let share =
            sqlx::query_as("SELECT * FROM wallet_shares WHERE wallet_id = $1 AND shared_with_id = $2")
                .bind(wallet)
                .bind(shared_with)
                .fetch_optional(&self.pool)
                .await?;
        Ok(share)
    }

    async fn insert_share(&self, share: NewShare) -> Result<WalletShare> {
        let created = sqlx::query_as(
            "INSERT INTO wallet_shares (wallet_id, owner_id, shared_with_id, permission, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(share.wallet_id)
        .bind(share.owner_id)
        .bind(share.shared_with_id)
        .bind(share.permission)
        .bind(ShareStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn shares_for(
        &self,
        shared_with: UserId,
        status: ShareStatus,
    ) -> Result<Vec<ShareDetails>> {
        let rows: Vec<ShareRow> = sqlx::query_as(
            "SELECT s.id, s.wallet_id, s.owner_id, s.shared_with_id, s.permission, s.status, \
             s.created_at, s.updated_at, \
             w.name AS wallet_name, w.code AS wallet_code, w.target AS wallet_target, \
             w.goal AS wallet_goal, w.created_at AS wallet_created_at, w.updated_at AS wallet_updated_at, \
             u.name AS owner_name, u.email AS owner_email \
             FROM wallet_shares s \
             JOIN wallets w ON w.id = s.wallet_id \
             JOIN users u ON u.id = s.owner_id \
             WHERE s.shared_with_id = $1 AND s.status = $2 \
             ORDER BY s.id",
        )
        .bind(shared_with)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ShareDetails::from).collect())
    }

    async fn find_invitee_share(
        &self,
        id: ShareId,
        shared_with: UserId,
    ) -> Result<Option<WalletShare>> {
        let share =
            sqlx::query_as("SELECT * FROM wallet_shares WHERE id = $1 AND shared_with_id = $2")
                .bind(id)
                .bind(shared_with)
                .fetch_optional(&self.pool)
                .await?;
        Ok(share)
    }

    async fn update_share_status(
        &self,
        id: ShareId,
        shared_with: UserId,
        status: ShareStatus,
    ) -> Result<Option<WalletShare>> {
        let share = sqlx::query_as(
            "UPDATE wallet_shares SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND shared_with_id = $2 AND status <> $4 RETURNING *",
        )
        .bind(id)
        .bind(shared_with)
        .bind(status)
        .bind(ShareStatus::Rejected)
        .fetch_optional(&self.pool)
        .await?;
        Ok(share)
    }
}
