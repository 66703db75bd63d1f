use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;

/// Plaintext password. `Debug` is redacted so it cannot leak through logs.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// PHC-formatted Argon2 hash.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash with Argon2id default parameters and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Constant-time verification. `Ok(false)` is a mismatch; `Err` means the
/// stored hash itself is unusable.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<bool, anyhow::Error> {
    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    match Argon2::default().verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2_phc() {
        let hash = hash_password(&Password::new("owen-pass")).unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let password = Password::new("owen-pass");
        let hash = hash_password(&password).unwrap();

        assert!(verify_password(&password, &hash).unwrap());
        assert!(!verify_password(&Password::new("wrong"), &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let password = Password::new("owen-pass");
        let a = hash_password(&password).unwrap();
        let b = hash_password(&password).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let bogus = PasswordHashString::new("not-a-hash".to_string());
        assert!(verify_password(&Password::new("x"), &bogus).is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", Password::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
