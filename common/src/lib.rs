pub mod access;
pub mod db;
pub mod error;
pub mod macros;
pub mod models;
pub mod shares;
pub mod store;
pub mod transactions;
pub mod utils;
pub mod wallets;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
