//! Share registry. A share is offered by a wallet's owner to another user and
//! starts out pending. The invitee answers it: pending and accepted shares can
//! be accepted or rejected, a rejected share is final.

use tracing::info;

use crate::{
    error::{Error, Result},
    models::{NewShare, ShareDetails, ShareId, UserId, WalletId, WalletShare},
    store::Store,
    utils::{normalize_email, Permission, ShareRequest, ShareStatus},
};

pub async fn create<S: Store>(
    store: &S,
    owner: UserId,
    wallet_id: WalletId,
    req: ShareRequest,
) -> Result<WalletShare> {
    let permission: Permission = req.permission.parse()?;

    let wallet = store
        .find_owned_wallet(owner, wallet_id)
        .await?
        .ok_or_else(|| Error::not_found("wallet"))?;

    let target = store
        .find_user_by_email(&normalize_email(&req.email))
        .await?
        .ok_or_else(|| Error::not_found("user"))?;
    if target.id == owner {
        return Err(Error::InvalidInput(
            "a wallet cannot be shared with its owner".to_string(),
        ));
    }

    // The unique (wallet, invitee) constraint still catches a concurrent insert.
    if store.find_share(wallet.id, target.id).await?.is_some() {
        return Err(Error::Conflict(
            "Wallet already shared with this user".to_string(),
        ));
    }

    let share = store
        .insert_share(NewShare {
            wallet_id: wallet.id,
            owner_id: owner,
            shared_with_id: target.id,
            permission,
        })
        .await
        .map_err(|e| match e {
            Error::Conflict(_) => {
                Error::Conflict("Wallet already shared with this user".to_string())
            }
            other => other,
        })?;

    info!(
        share_id = share.id,
        wallet_id,
        shared_with = target.id,
        %permission,
        "offered wallet share"
    );
    Ok(share)
}

pub async fn shared_with_me<S: Store>(store: &S, caller: UserId) -> Result<Vec<ShareDetails>> {
    store.shares_for(caller, ShareStatus::Accepted).await
}

pub async fn pending_for_me<S: Store>(store: &S, caller: UserId) -> Result<Vec<ShareDetails>> {
    store.shares_for(caller, ShareStatus::Pending).await
}

/// Answers a share addressed to `caller`. Shares addressed to anyone else are
/// reported as not found.
pub async fn respond<S: Store>(
    store: &S,
    caller: UserId,
    share_id: ShareId,
    status: &str,
) -> Result<WalletShare> {
    let status: ShareStatus = status.parse()?;
    if status == ShareStatus::Pending {
        return Err(Error::InvalidInput(
            "a share can only be accepted or rejected".to_string(),
        ));
    }

    let current = store
        .find_invitee_share(share_id, caller)
        .await?
        .ok_or_else(|| Error::not_found("share"))?;
    if current.status == ShareStatus::Rejected {
        return Err(Error::Conflict("Share was already rejected".to_string()));
    }

    let share = store
        .update_share_status(share_id, caller, status)
        .await?
        .ok_or_else(|| Error::Conflict("Share was already rejected".to_string()))?;

    info!(share_id, caller, %status, "answered wallet share");
    Ok(share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::NewUser, store::MemoryStore, utils::CreateWalletRequest};

    struct Fixture {
        store: MemoryStore,
        owner: UserId,
        invitee: UserId,
        wallet_id: WalletId,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for email in ["a@x.com", "b@x.com"] {
            let user = store
                .insert_user(NewUser {
                    name: "Test".to_string(),
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let wallet_id = store
            .insert_wallet(
                ids[0],
                &CreateWalletRequest {
                    name: "Trip".to_string(),
                    code: "USD".to_string(),
                    target: None,
                    goal: None,
                },
            )
            .await
            .unwrap()
            .id;
        Fixture {
            store,
            owner: ids[0],
            invitee: ids[1],
            wallet_id,
        }
    }

    fn invite(email: &str, permission: &str) -> ShareRequest {
        ShareRequest {
            email: email.to_string(),
            permission: permission.to_string(),
        }
    }

    #[tokio::test]
    async fn new_share_is_pending() {
        let f = fixture().await;
        let share = create(&f.store, f.owner, f.wallet_id, invite(" B@x.com ", "read"))
            .await
            .unwrap();
        assert_eq!(share.status, ShareStatus::Pending);
        assert_eq!(share.permission, Permission::Read);
        assert_eq!(share.shared_with_id, f.invitee);
        assert_eq!(share.owner_id, f.owner);
    }

    #[tokio::test]
    async fn second_invite_for_same_pair_conflicts() {
        let f = fixture().await;
        create(&f.store, f.owner, f.wallet_id, invite("b@x.com", "read"))
            .await
            .unwrap();
        let err = create(&f.store, f.owner, f.wallet_id, invite("b@x.com", "write"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(pending_for_me(&f.store, f.invitee).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invite_requires_ownership_known_user_and_valid_permission() {
        let f = fixture().await;
        assert!(matches!(
            create(&f.store, f.invitee, f.wallet_id, invite("a@x.com", "read")).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            create(&f.store, f.owner, f.wallet_id, invite("nobody@x.com", "read")).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            create(&f.store, f.owner, f.wallet_id, invite("b@x.com", "admin")).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            create(&f.store, f.owner, f.wallet_id, invite("a@x.com", "read")).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn accept_then_reject_round_trip() {
        let f = fixture().await;
        let share = create(&f.store, f.owner, f.wallet_id, invite("b@x.com", "write"))
            .await
            .unwrap();

        let pending = pending_for_me(&f.store, f.invitee).await.unwrap();
        assert_eq!(pending, pending_for_me(&f.store, f.invitee).await.unwrap());
        assert_eq!(pending[0].wallet.name, "Trip");
        assert_eq!(pending[0].owner.email, "a@x.com");

        respond(&f.store, f.invitee, share.id, "accepted").await.unwrap();
        let shared = shared_with_me(&f.store, f.invitee).await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].share.id, share.id);
        assert!(pending_for_me(&f.store, f.invitee).await.unwrap().is_empty());

        respond(&f.store, f.invitee, share.id, "rejected").await.unwrap();
        assert!(shared_with_me(&f.store, f.invitee).await.unwrap().is_empty());
        assert!(pending_for_me(&f.store, f.invitee).await.unwrap().is_empty());

        assert!(matches!(
            respond(&f.store, f.invitee, share.id, "accepted").await,
            Err(Error::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn only_the_invitee_may_respond() {
        let f = fixture().await;
        let share = create(&f.store, f.owner, f.wallet_id, invite("b@x.com", "read"))
            .await
            .unwrap();

        assert!(matches!(
            respond(&f.store, f.owner, share.id, "accepted").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            respond(&f.store, f.invitee, share.id, "pending").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            respond(&f.store, f.invitee, share.id, "maybe").await,
            Err(Error::InvalidInput(_))
        ));
        let still = f.store.find_share(f.wallet_id, f.invitee).await.unwrap().unwrap();
        assert_eq!(still.status, ShareStatus::Pending);
    }
}
