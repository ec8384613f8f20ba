//! Wallet ledger. Every operation takes a `Grant` from the access gate, so the
//! caller and wallet are always the ones that were authorized.

use tracing::info;

use crate::{
    access::Grant,
    error::{Error, Result},
    models::{Transaction, TransactionId},
    store::Store,
    utils::{validated, CreateTransactionRequest, Permission, UpdateTransactionRequest},
};

pub async fn list<S: Store>(store: &S, grant: &Grant) -> Result<Vec<Transaction>> {
    grant.require(Permission::Read)?;
    store.list_transactions(grant.wallet_id()).await
}

/// Records a transaction for the granted wallet. Its status always starts out
/// active.
pub async fn add<S: Store>(
    store: &S,
    grant: &Grant,
    req: CreateTransactionRequest,
) -> Result<Transaction> {
    grant.require(Permission::Write)?;
    let req = validated(req)?;
    let transaction = store
        .insert_transaction(grant.caller(), grant.wallet_id(), &req)
        .await?;
    info!(
        user_id = grant.caller(),
        wallet_id = grant.wallet_id(),
        transaction_id = transaction.id,
        "recorded transaction"
    );
    Ok(transaction)
}

/// Only transactions the caller recorded in this wallet can be changed.
pub async fn update<S: Store>(
    store: &S,
    grant: &Grant,
    id: TransactionId,
    req: UpdateTransactionRequest,
) -> Result<Transaction> {
    grant.require(Permission::Write)?;
    let req = validated(req)?;
    store
        .update_transaction(grant.caller(), grant.wallet_id(), id, &req)
        .await?
        .ok_or_else(|| Error::not_found("transaction"))
}

pub async fn delete<S: Store>(store: &S, grant: &Grant, id: TransactionId) -> Result<()> {
    grant.require(Permission::Write)?;
    if !store
        .delete_transaction(grant.caller(), grant.wallet_id(), id)
        .await?
    {
        return Err(Error::not_found("transaction"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        access::authorize,
        models::{NewShare, NewUser, UserId, WalletId},
        store::MemoryStore,
        utils::{CreateWalletRequest, ShareStatus},
    };

    struct Fixture {
        store: MemoryStore,
        owner: UserId,
        friend: UserId,
        wallet_id: WalletId,
    }

    async fn fixture(permission: Permission) -> Fixture {
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
        let (owner, friend) = (ids[0], ids[1]);
        let wallet_id = store
            .insert_wallet(
                owner,
                &CreateWalletRequest {
                    name: "Home".to_string(),
                    code: "EUR".to_string(),
                    target: None,
                    goal: None,
                },
            )
            .await
            .unwrap()
            .id;
        let share = store
            .insert_share(NewShare {
                wallet_id,
                owner_id: owner,
                shared_with_id: friend,
                permission,
            })
            .await
            .unwrap();
        store
            .update_share_status(share.id, friend, ShareStatus::Accepted)
            .await
            .unwrap();
        Fixture {
            store,
            owner,
            friend,
            wallet_id,
        }
    }

    fn groceries() -> CreateTransactionRequest {
        CreateTransactionRequest {
            title: "Groceries".to_string(),
            kind: "expense".to_string(),
            amount: 42.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            category: "food".to_string(),
            description: "weekly shop".to_string(),
        }
    }

    #[tokio::test]
    async fn add_stamps_caller_wallet_and_active_status() {
        let f = fixture(Permission::Write).await;
        let grant = authorize(&f.store, f.friend, f.wallet_id, Permission::Write)
            .await
            .unwrap();

        let tx = add(&f.store, &grant, groceries()).await.unwrap();
        assert_eq!(tx.user_id, f.friend);
        assert_eq!(tx.wallet_id, f.wallet_id);
        assert!(tx.status);
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let f = fixture(Permission::Read).await;
        let grant = authorize(&f.store, f.owner, f.wallet_id, Permission::Write)
            .await
            .unwrap();
        let mut titles = Vec::new();
        for title in ["first", "second", "third"] {
            let mut req = groceries();
            req.title = title.to_string();
            titles.push(add(&f.store, &grant, req).await.unwrap().title);
        }

        let reader = authorize(&f.store, f.friend, f.wallet_id, Permission::Read)
            .await
            .unwrap();
        let listed: Vec<String> = list(&f.store, &reader)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(listed, titles);
    }

    #[tokio::test]
    async fn read_grant_cannot_mutate() {
        let f = fixture(Permission::Read).await;
        let reader = authorize(&f.store, f.friend, f.wallet_id, Permission::Read)
            .await
            .unwrap();
        assert!(matches!(
            add(&f.store, &reader, groceries()).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_only_touch_the_callers_own_entries() {
        let f = fixture(Permission::Write).await;
        let owner = authorize(&f.store, f.owner, f.wallet_id, Permission::Write)
            .await
            .unwrap();
        let friend = authorize(&f.store, f.friend, f.wallet_id, Permission::Write)
            .await
            .unwrap();
        let tx = add(&f.store, &owner, groceries()).await.unwrap();

        let cleared = UpdateTransactionRequest {
            status: Some(false),
            ..Default::default()
        };
        assert!(matches!(
            update(&f.store, &friend, tx.id, cleared.clone()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete(&f.store, &friend, tx.id).await,
            Err(Error::NotFound(_))
        ));

        let updated = update(&f.store, &owner, tx.id, cleared).await.unwrap();
        assert!(!updated.status);
        assert_eq!(updated.amount, 42.0);

        delete(&f.store, &owner, tx.id).await.unwrap();
        assert!(list(&f.store, &owner).await.unwrap().is_empty());
    }
}
