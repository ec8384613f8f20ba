use common::{store::Store, Error};

use crate::auth::hash_password;

/// Shared per-process state handed to every handler.
pub struct AppState<S: Store> {
    pub store: S,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub bcrypt_cost: u32,
    // Checked against on logins for unknown emails so they cost the same as
    // a wrong password
    pub(crate) decoy_hash: String,
}

impl<S: Store> AppState<S> {
    pub fn new(
        store: S,
        jwt_secret: String,
        jwt_expiration: u64,
        bcrypt_cost: u32,
    ) -> Result<Self, Error> {
        let decoy_hash = hash_password("decoy-password", bcrypt_cost)?;
        Ok(AppState {
            store,
            jwt_secret,
            jwt_expiration,
            bcrypt_cost,
            decoy_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use common::store::MemoryStore;

    use super::*;

    #[test]
    fn decoy_hash_uses_the_configured_cost() {
        let state = AppState::new(MemoryStore::new(), "s".to_string(), 60, 5).unwrap();
        assert!(state.decoy_hash.starts_with("$2b$05$"));
    }
}
