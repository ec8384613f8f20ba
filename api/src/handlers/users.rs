use actix_web::{web, HttpResponse};
use common::{
    models::NewUser,
    store::Store,
    utils::{
        normalize_email, validated, EmailUpdateRequest, LoginRequest, PasswordUpdateRequest,
        RegisterRequest,
    },
    Error,
};
use serde_json::json;
use tracing::info;

use crate::{
    auth::{create_token, hash_password, verify_password, AuthenticatedUser, TokenResponse},
    error::ApiError,
    state::AppState,
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated("Invalid email or password".to_string())
}

pub async fn register<S: Store>(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req.into_inner())?;
    let email = normalize_email(&req.email);

    if app_state.store.find_user_by_email(&email).await?.is_some() {
        return Err(Error::Conflict("Email already registered".to_string()).into());
    }

    let password_hash = hash_password(&req.password, app_state.bcrypt_cost)?;
    let user = app_state
        .store
        .insert_user(NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            Error::Conflict(_) => Error::Conflict("Email already registered".to_string()),
            other => other,
        })?;

    info!(user_id = user.id, "registered user");
    Ok(HttpResponse::Created().json(user))
}

pub async fn login<S: Store>(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let user = app_state
        .store
        .find_user_by_email(&normalize_email(&req.email))
        .await?;

    let Some(user) = user else {
        verify_password(&req.password, &app_state.decoy_hash)?;
        return Err(invalid_credentials().into());
    };
    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials().into());
    }

    let token = create_token(user.id, &app_state.jwt_secret, app_state.jwt_expiration)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        expires_in: app_state.jwt_expiration,
    }))
}

pub async fn me<S: Store>(
    user: AuthenticatedUser,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let profile = app_state
        .store
        .find_user(user.user_id)
        .await?
        .ok_or_else(|| Error::not_found("user"))?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_password<S: Store>(
    user: AuthenticatedUser,
    req: web::Json<PasswordUpdateRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req.into_inner())?;
    let AppState {
        store, bcrypt_cost, ..
    } = &**app_state;

    let current = store
        .find_user(user.user_id)
        .await?
        .ok_or_else(|| Error::not_found("user"))?;
    if !verify_password(&req.old_password, &current.password_hash)? {
        return Err(Error::Unauthenticated("Incorrect old password".to_string()).into());
    }

    let password_hash = hash_password(&req.new_password, *bcrypt_cost)?;
    if !store.update_password(user.user_id, &password_hash).await? {
        return Err(Error::not_found("user").into());
    }

    info!(user_id = user.user_id, "changed password");
    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}

pub async fn update_email<S: Store>(
    user: AuthenticatedUser,
    req: web::Json<EmailUpdateRequest>,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req.into_inner())?;
    let email = normalize_email(&req.email);
    let store = &app_state.store;

    if let Some(existing) = store.find_user_by_email(&email).await? {
        if existing.id != user.user_id {
            return Err(Error::Conflict("Email already registered".to_string()).into());
        }
    }

    let updated = store
        .update_email(user.user_id, &email)
        .await
        .map_err(|e| match e {
            Error::Conflict(_) => Error::Conflict("Email already registered".to_string()),
            other => other,
        })?
        .ok_or_else(|| Error::not_found("user"))?;

    info!(user_id = user.user_id, "changed email");
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_account<S: Store>(
    user: AuthenticatedUser,
    app_state: web::Data<AppState<S>>,
) -> Result<HttpResponse, ApiError> {
    if !app_state.store.delete_user(user.user_id).await? {
        return Err(Error::not_found("user").into());
    }

    info!(user_id = user.user_id, "deleted account");
    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted" })))
}
