//! Authorization gate for wallet-scoped operations.
//!
//! The owner of a wallet may do anything with it. Any other caller needs an
//! accepted share whose permission dominates the one required. Callers with
//! neither get `NotFound`, exactly as for a wallet id that does not exist.

use tracing::warn;

use crate::{
    error::{Error, Result},
    models::{UserId, WalletId, WalletShare},
    store::Store,
    utils::{Permission, ShareStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Owner,
    Sharee(Permission),
}

impl Access {
    pub fn permits(self, required: Permission) -> bool {
        match self {
            Access::Owner => true,
            Access::Sharee(permission) => permission.dominates(required),
        }
    }
}

/// Proof that `caller` passed the gate for `wallet_id`. Only `authorize`
/// builds one, so ledger operations cannot run ungated.
#[derive(Debug, Clone, Copy)]
pub struct Grant {
    caller: UserId,
    wallet_id: WalletId,
    access: Access,
}

impl Grant {
    pub fn caller(&self) -> UserId {
        self.caller
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn require(&self, required: Permission) -> Result<()> {
        if self.access.permits(required) {
            Ok(())
        } else {
            Err(Error::Forbidden("Insufficient permissions".to_string()))
        }
    }
}

pub fn decide(
    owns_wallet: bool,
    share: Option<&WalletShare>,
    required: Permission,
) -> Result<Access> {
    if owns_wallet {
        return Ok(Access::Owner);
    }

    match share.filter(|s| s.status == ShareStatus::Accepted) {
        Some(share) if share.permission.dominates(required) => {
            Ok(Access::Sharee(share.permission))
        }
        Some(_) => Err(Error::Forbidden("Insufficient permissions".to_string())),
        None => Err(Error::not_found("wallet")),
    }
}

pub async fn authorize<S: Store>(
    store: &S,
    caller: UserId,
    wallet_id: WalletId,
    required: Permission,
) -> Result<Grant> {
    let owns_wallet = store.find_owned_wallet(caller, wallet_id).await?.is_some();
    let share = if owns_wallet {
        None
    } else {
        store.find_share(wallet_id, caller).await?
    };

    let access = decide(owns_wallet, share.as_ref(), required).map_err(|e| {
        warn!(caller, wallet_id, %required, "wallet access denied: {e}");
        e
    })?;

    Ok(Grant {
        caller,
        wallet_id,
        access,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        models::{NewShare, NewUser},
        store::MemoryStore,
        utils::CreateWalletRequest,
    };

    fn share(permission: Permission, status: ShareStatus) -> WalletShare {
        WalletShare {
            id: 1,
            wallet_id: 1,
            owner_id: 1,
            shared_with_id: 2,
            permission,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn user(store: &MemoryStore, email: &str) -> UserId {
        store
            .insert_user(NewUser {
                name: email.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn wallet(store: &MemoryStore, owner: UserId) -> WalletId {
        store
            .insert_wallet(
                owner,
                &CreateWalletRequest {
                    name: "Trip".to_string(),
                    code: "USD".to_string(),
                    target: None,
                    goal: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[test]
    fn owner_satisfies_any_permission() {
        assert_eq!(decide(true, None, Permission::Write).unwrap(), Access::Owner);
        let foreign = share(Permission::Read, ShareStatus::Accepted);
        assert_eq!(
            decide(true, Some(&foreign), Permission::Write).unwrap(),
            Access::Owner
        );
    }

    #[test]
    fn read_share_is_forbidden_from_writing() {
        let read = share(Permission::Read, ShareStatus::Accepted);
        assert_eq!(
            decide(false, Some(&read), Permission::Read).unwrap(),
            Access::Sharee(Permission::Read)
        );
        assert!(matches!(
            decide(false, Some(&read), Permission::Write),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn unanswered_or_rejected_share_looks_like_missing_wallet() {
        for status in [ShareStatus::Pending, ShareStatus::Rejected] {
            let s = share(Permission::Write, status);
            assert!(matches!(
                decide(false, Some(&s), Permission::Read),
                Err(Error::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn stranger_sees_same_outcome_as_for_missing_wallet() {
        crate::init_test_tracing();
        let store = MemoryStore::new();
        let owner = user(&store, "a@x.com").await;
        let stranger = user(&store, "c@x.com").await;
        let wallet_id = wallet(&store, owner).await;

        let existing = authorize(&store, stranger, wallet_id, Permission::Read)
            .await
            .unwrap_err();
        let missing = authorize(&store, stranger, wallet_id + 1000, Permission::Read)
            .await
            .unwrap_err();
        assert_eq!(existing.to_string(), missing.to_string());
        assert!(matches!(existing, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn accepted_write_share_grants_write() {
        let store = MemoryStore::new();
        let owner = user(&store, "a@x.com").await;
        let friend = user(&store, "b@x.com").await;
        let wallet_id = wallet(&store, owner).await;

        let created = store
            .insert_share(NewShare {
                wallet_id,
                owner_id: owner,
                shared_with_id: friend,
                permission: Permission::Write,
            })
            .await
            .unwrap();
        store
            .update_share_status(created.id, friend, ShareStatus::Accepted)
            .await
            .unwrap();

        let grant = authorize(&store, friend, wallet_id, Permission::Write)
            .await
            .unwrap();
        assert_eq!(grant.access(), Access::Sharee(Permission::Write));
        assert_eq!(grant.caller(), friend);

        let owner_grant = authorize(&store, owner, wallet_id, Permission::Write)
            .await
            .unwrap();
        assert_eq!(owner_grant.access(), Access::Owner);
    }
}
