use bcrypt::{hash, verify};

/// bcrypt cost used for stored passwords.
pub const PASSWORD_COST: u32 = 10;

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

/// Constant-time comparison is bcrypt's own.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}
