use actix_web::{web, HttpResponse};
use common::{
    access::authorize,
    models::{TransactionId, WalletId},
    store::Store,
    transactions,
    utils::{CreateTransactionRequest, Permission, UpdateTransactionRequest},
};
use serde_json::json;

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState};

// Each handler passes the access gate before touching the ledger.

pub async fn list<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<WalletId>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let store = &app_state.store;
    let grant = authorize(store, user.user_id, path.into_inner(), Permission::Read).await?;
    let entries = transactions::list(store, &grant).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn create<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<WalletId>,
    req: web::Json<CreateTransactionRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let store = &app_state.store;
    let grant = authorize(store, user.user_id, path.into_inner(), Permission::Write).await?;
    let transaction = transactions::add(store, &grant, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(transaction))
}

pub async fn update<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<(WalletId, TransactionId)>,
    req: web::Json<UpdateTransactionRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let (wallet_id, id) = path.into_inner();
    let store = &app_state.store;
    let grant = authorize(store, user.user_id, wallet_id, Permission::Write).await?;
    let transaction = transactions::update(store, &grant, id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

pub async fn delete<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<(WalletId, TransactionId)>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let (wallet_id, id) = path.into_inner();
    let store = &app_state.store;
    let grant = authorize(store, user.user_id, wallet_id, Permission::Write).await?;
    transactions::delete(store, &grant, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Transaction deleted" })))
}
