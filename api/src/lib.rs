use actix_web::web;
use common::{store::Store, Error};

use auth::AuthenticationMiddleware;
use error::ApiError;
use handlers::{shares, transactions, users, wallets};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod security;
pub mod state;

/// Registers the whole HTTP surface for a store type. Everything under `/api`
/// requires a bearer token.
pub fn configure<S: Store>(jwt_secret: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::from(Error::InvalidInput(err.to_string())).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            ApiError::from(Error::InvalidInput(err.to_string())).into()
        }))
        .route("/health", web::get().to(handlers::health_check))
        .route("/register", web::post().to(users::register::<S>))
        .route("/login", web::post().to(users::login::<S>))
        .service(
            web::scope("/api")
                .wrap(AuthenticationMiddleware::new(jwt_secret))
                .route("/me", web::get().to(users::me::<S>))
                .route("/me", web::delete().to(users::delete_account::<S>))
                .route("/me/password", web::put().to(users::update_password::<S>))
                .route("/me/email", web::put().to(users::update_email::<S>))
                .route("/wallets", web::get().to(wallets::list::<S>))
                .route("/wallets", web::post().to(wallets::create::<S>))
                .route("/wallets/{wallet_id}", web::put().to(wallets::update::<S>))
                .route("/wallets/{wallet_id}", web::delete().to(wallets::delete::<S>))
                .route(
                    "/wallets/{wallet_id}/transactions",
                    web::get().to(transactions::list::<S>),
                )
                .route(
                    "/wallets/{wallet_id}/transactions",
                    web::post().to(transactions::create::<S>),
                )
                .route(
                    "/wallets/{wallet_id}/transactions/{id}",
                    web::put().to(transactions::update::<S>),
                )
                .route(
                    "/wallets/{wallet_id}/transactions/{id}",
                    web::delete().to(transactions::delete::<S>),
                )
                .route(
                    "/wallets/{wallet_id}/share",
                    web::post().to(shares::share_wallet::<S>),
                )
                .route("/shared-wallets", web::get().to(shares::shared_wallets::<S>))
                .route("/pending-shares", web::get().to(shares::pending_shares::<S>))
                .route("/shares/{share_id}", web::put().to(shares::respond::<S>)),
        );
    }
}
