use actix_web::{middleware::Logger, web, App, HttpServer};
use common::{db::establish_connection, store::PgStore};
use dotenv::dotenv;
use pocket_api::{
    config::Config,
    security::{configure_cors, AuthThrottle},
    state::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!("Starting the pocket API");
    let pool = establish_connection(&config.database).await?;
    let app_state = web::Data::new(AppState::new(
        PgStore::new(pool),
        config.jwt_secret.clone(),
        config.jwt_expiration,
        config.bcrypt_cost,
    )?);
    let throttle = AuthThrottle::new(config.auth_rate_limit);
    let allowed_origins = config.allowed_origins.clone();
    let jwt_secret = config.jwt_secret.clone();

    let address = config.server_address();
    info!("Starting HTTP server on {}", address);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(throttle.clone())
            .wrap(configure_cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(pocket_api::configure::<PgStore>(jwt_secret.clone()))
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
