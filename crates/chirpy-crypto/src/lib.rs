/// Chirpy Crypto Library
///
/// Password hashing (Argon2id, per-call random salt embedded in the PHC
/// string) and opaque refresh-token generation.
pub mod password;
pub mod tokens;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed: {0}")]
    InvalidHash(String),
}
