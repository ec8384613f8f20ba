use common::Error;

pub fn hash_password(password: &str, cost: u32) -> Result<String, Error> {
    bcrypt::hash(password, cost).map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| Error::Internal(format!("password verification failed: {e}")))
}
