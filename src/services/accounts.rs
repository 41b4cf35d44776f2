//! Sign-in and profile operations shared by every account kind

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        account::{AccountClaims, LoginResponse},
        Account, AccountKind, Applicant, Manager, Mechanic, Profile,
    },
    repository::Repository,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn login(&self, kind: AccountKind, email: &str, password: &str) -> AppResult<LoginResponse> {
        let account = match kind {
            AccountKind::Applicant => self.authenticate::<Applicant>(email, password).await?,
            AccountKind::Mechanic => self.authenticate::<Mechanic>(email, password).await?,
            AccountKind::Manager => self.authenticate::<Manager>(email, password).await?,
        };

        let token = AccountClaims::new(kind, account.id(), self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(kind = %kind, "Account signed in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            account,
        })
    }

    async fn authenticate<A: Account>(&self, email: &str, password: &str) -> AppResult<Profile> {
        let account = self
            .repository
            .accounts
            .get_by_email::<A>(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(account.password_hash(), password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }
        Ok(account.into_profile())
    }

    /// Validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<AccountClaims> {
        AccountClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    pub async fn profile(&self, kind: AccountKind, id: i32) -> AppResult<Profile> {
        match kind {
            AccountKind::Applicant => self.profile_of::<Applicant>(id).await,
            AccountKind::Mechanic => self.profile_of::<Mechanic>(id).await,
            AccountKind::Manager => self.profile_of::<Manager>(id).await,
        }
    }

    async fn profile_of<A: Account>(&self, id: i32) -> AppResult<Profile> {
        let account = self.repository.accounts.get_by_id::<A>(id).await?;
        Ok(account.into_profile())
    }

    /// Replace (or clear, with `None`) an account's photo
    pub async fn update_photo(&self, kind: AccountKind, id: i32, photo: Option<&str>) -> AppResult<Profile> {
        match kind {
            AccountKind::Applicant => self.photo_of::<Applicant>(id, photo).await,
            AccountKind::Mechanic => self.photo_of::<Mechanic>(id, photo).await,
            AccountKind::Manager => self.photo_of::<Manager>(id, photo).await,
        }
    }

    async fn photo_of<A: Account>(&self, id: i32, photo: Option<&str>) -> AppResult<Profile> {
        let account = self.repository.accounts.update_photo::<A>(id, photo).await?;
        Ok(account.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&first, "hunter22").unwrap());
        assert!(!verify_password(&first, "hunter23").unwrap());
    }

    #[test]
    fn plaintext_passwords_are_not_accepted_as_hashes() {
        assert!(verify_password("hunter22", "hunter22").is_err());
    }
}
