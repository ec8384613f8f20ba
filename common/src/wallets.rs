use tracing::info;

use crate::{
    error::{Error, Result},
    models::{UserId, Wallet, WalletId},
    store::Store,
    utils::{validated, CreateWalletRequest, UpdateWalletRequest},
};

/// Wallets owned by `owner`. Wallets shared with the caller are listed
/// through the share registry instead.
pub async fn list<S: Store>(store: &S, owner: UserId) -> Result<Vec<Wallet>> {
    store.list_wallets(owner).await
}

pub async fn create<S: Store>(store: &S, owner: UserId, req: CreateWalletRequest) -> Result<Wallet> {
    let req = validated(req)?;
    let wallet = store.insert_wallet(owner, &req).await?;
    info!(owner, wallet_id = wallet.id, "created wallet");
    Ok(wallet)
}

pub async fn update<S: Store>(
    store: &S,
    owner: UserId,
    wallet_id: WalletId,
    req: UpdateWalletRequest,
) -> Result<Wallet> {
    let req = validated(req)?;
    store
        .update_wallet(owner, wallet_id, &req)
        .await?
        .ok_or_else(|| Error::not_found("wallet"))
}

pub async fn delete<S: Store>(store: &S, owner: UserId, wallet_id: WalletId) -> Result<()> {
    if !store.delete_wallet(owner, wallet_id).await? {
        return Err(Error::not_found("wallet"));
    }
    info!(owner, wallet_id, "deleted wallet");
    Ok(())
}
