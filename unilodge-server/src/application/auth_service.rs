use std::sync::Arc;

use tracing::{instrument, warn};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{TokenService, hash_password, verify_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub fn tokens(&self) -> Arc<dyn TokenService> {
        Arc::clone(&self.tokens)
    }

    /// Emails are stored exactly as given; `a@x.com` and `A@x.com` are
    /// different accounts.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        require_credentials(email, password)?;

        if self.repo.find_by_email(email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        // the repository rejects a concurrent duplicate that slipped past the lookup
        self.repo.create(User::new(email.to_string(), hash)).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        require_credentials(email, password)?;

        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash).map_err(|err| {
            warn!(user_id = %user.id, error = %err, "stored password hash is unreadable");
            DomainError::InvalidCredentials
        })?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, &user.email)
            .await
            .map_err(|err| DomainError::Internal(err.to_string()))?;

        Ok(LoginOutcome {
            token,
            user_id: user.id,
        })
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    if email.is_empty() || password.is_empty() {
        return Err(DomainError::Validation(
            "email and password are required".into(),
        ));
    }
    Ok(())
}
