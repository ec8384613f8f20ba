use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{Permission, ShareStatus};

pub type UserId = i32;
pub type WalletId = i32;
pub type TransactionId = i32;
pub type ShareId = i32;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public part of a user, embedded in share listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub name: String,
    pub code: String,
    pub target: Option<String>,
    pub goal: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub user_id: UserId,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "tx_type")]
    pub kind: String,
    pub amount: f64,
    #[sqlx(rename = "tx_date")]
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletShare {
    pub id: ShareId,
    pub wallet_id: WalletId,
    pub owner_id: UserId,
    pub shared_with_id: UserId,
    pub permission: Permission,
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewShare {
    pub wallet_id: WalletId,
    pub owner_id: UserId,
    pub shared_with_id: UserId,
    pub permission: Permission,
}

/// A share as listed to its invitee: the record plus the wallet it opens
/// and the owner who offered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareDetails {
    #[serde(flatten)]
    pub share: WalletShare,
    pub wallet: Wallet,
    pub owner: UserSummary,
}
