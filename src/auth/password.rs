use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("password must be at least 8 characters")]
    TooShort,

    #[error("password must mix at least two of lowercase letters, uppercase letters and digits")]
    TooSimple,
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Length of at least 8 and characters from two or more of the
/// lowercase / uppercase / digit classes.
pub fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }

    let classes = [
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
    ];

    if classes.iter().filter(|present| **present).count() < 2 {
        return Err(PasswordPolicyError::TooSimple);
    }

    Ok(())
}

/// Salted bcrypt hash, computed on the blocking pool.
pub async fn hash_password(plaintext: String, cost: u32) -> Result<String, HashError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??)
}

/// Check `plaintext` against a stored hash. A hash bcrypt cannot parse never
/// matches.
pub async fn verify_password(plaintext: String, hash: String) -> bool {
    match tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            false
        }
    }
}
