use actix_web::HttpResponse;
use tracing::info;

pub mod shares;
pub mod transactions;
pub mod users;
pub mod wallets;

pub async fn health_check() -> HttpResponse {
    info!("Health check request arrived");
    HttpResponse::Ok().content_type("text/plain").body("OK")
}
