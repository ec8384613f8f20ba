use actix_web::{web, HttpResponse};
use common::{
    models::{ShareId, WalletId},
    shares,
    store::Store,
    utils::{ShareRequest, ShareResponseRequest},
};
use serde_json::json;

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState};

pub async fn share_wallet<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<WalletId>,
    req: web::Json<ShareRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let share = shares::create(
        &app_state.store,
        user.user_id,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(share))
}

pub async fn shared_wallets<S: Store>(
    user: AuthenticatedUser,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let accepted = shares::shared_with_me(&app_state.store, user.user_id).await?;
    Ok(HttpResponse::Ok().json(accepted))
}

pub async fn pending_shares<S: Store>(
    user: AuthenticatedUser,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let pending = shares::pending_for_me(&app_state.store, user.user_id).await?;
    Ok(HttpResponse::Ok().json(pending))
}

pub async fn respond<S: Store>(
    user: AuthenticatedUser,
    path: web::Path<ShareId>,
    req: web::Json<ShareResponseRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let share = shares::respond(
        &app_state.store,
        user.user_id,
        path.into_inner(),
        &req.status,
    )
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Share updated", "share": share })))
}
