use actix_web::{web, HttpResponse};
use common::{
    models::WalletId,
    store::Store,
    utils::{CreateWalletRequest, UpdateWalletRequest},
    wallets,
};
use serde_json::json;

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState};

pub async fn list<S: Store>(
    user: AuthenticatedUser,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let owned = wallets::list(&app_state.store, user.user_id).await?;
    Ok(HttpResponse::Ok().json(owned))
}

pub async fn create<S: Store>(
    user: AuthenticatedUser,
    req: web::Json<CreateWalletRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let wallet = wallets::create(&app_state.store, user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(wallet))
}

pub async fn update<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<WalletId>,
    req: web::Json<UpdateWalletRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let wallet = wallets::update(
        &app_state.store,
        user.user_id,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(wallet))
}

pub async fn delete<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<WalletId>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    wallets::delete(&app_state.store, user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Wallet deleted" })))
}
