//! Authentication service — registration, login, and bearer-token resolution.

use std::sync::Arc;

use tracing::info;

use studyhub_auth::jwt::{IssuedToken, JwtDecoder, JwtEncoder};
use studyhub_auth::password::{PasswordHasher, PasswordValidator};
use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_database::repositories::UserRepository;
use studyhub_entity::user::{CreateUser, User};

/// Data for registering a new account.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterUser {
    /// Login email. Must be unique.
    pub email: String,
    /// Plaintext password; validated against the password policy.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Handles registration, credential login, and token resolution.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy validator.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Token verifier.
    decoder: Arc<JwtDecoder>,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Registers a new account.
    ///
    /// The email-uniqueness race is closed by the database constraint: a
    /// concurrent duplicate surfaces as the same Conflict error a
    /// sequential caller would see.
    pub async fn register(&self, data: RegisterUser) -> AppResult<User> {
        self.validator.validate(&data.password)?;

        let password_hash = self.hasher.hash_password(&data.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: data.email,
                password_hash,
                first_name: data.first_name,
                last_name: data.last_name,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user)
    }

    /// Verifies credentials and issues an access token.
    ///
    /// A missing account and a wrong password produce the same error, so
    /// the response never reveals whether an email is registered.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(IssuedToken, User)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("Incorrect email or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Incorrect email or password"));
        }

        if !user.can_login() {
            return Err(AppError::authentication("Account is not active"));
        }

        let token = self.encoder.issue(user.id)?;

        info!(user_id = %user.id, "User logged in");

        Ok((token, user))
    }

    /// Resolves a bearer token to its account.
    ///
    /// Any decode, subject-parse, or lookup failure collapses into one
    /// Authentication error; an inactive account is rejected distinctly,
    /// as an Authorization error.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<User> {
        let claims = self
            .decoder
            .decode(token)
            .map_err(|_| AppError::authentication("Could not validate credentials"))?;
        let user_id = claims.user_id()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Could not validate credentials"))?;

        if !user.can_login() {
            return Err(AppError::authorization("Inactive user account"));
        }

        Ok(user)
    }
}
