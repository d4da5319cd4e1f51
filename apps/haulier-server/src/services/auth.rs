//! Registration, credential checks and token issuing.

use std::sync::Arc;

use api_protocol::responses::TokenResponse;
use auth::{AuthError, JwtManager};
use entities::{User, UserPublic};
use resource_store::{StoreError, UserStore};
use uuid::Uuid;

use super::{normalize_email, validate_password};
use crate::error::{ServerError, ServerResult};

/// Issues and checks credentials for users.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtManager>) -> Self {
        Self { users, jwt }
    }

    /// Registers a new user with a salted password hash.
    pub async fn register(&self, email: &str, password: &str) -> ServerResult<UserPublic> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password.to_string()).await?;
        let user = self
            .users
            .create_user(User::new(email, password_hash))
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists { .. } => {
                    ServerError::Conflict("User is already registered".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user.to_public())
    }

    /// Checks an email/password pair.
    ///
    /// Unknown emails and wrong passwords both yield `None`.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> ServerResult<Option<UserPublic>> {
        let email = email.trim().to_lowercase();
        let user = self.users.get_user_by_email(&email).await?;

        let password = password.to_string();
        let hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => auth::verify_password(&password, &hash),
            None => Err(auth::verify_against_dummy(&password)),
        })
        .await
        .map_err(|e| ServerError::Internal(format!("password verification task failed: {e}")))?;

        match (user, verified) {
            (Some(user), Ok(())) => Ok(Some(user.to_public())),
            (_, Ok(())) | (_, Err(AuthError::InvalidCredentials)) => Ok(None),
            (_, Err(e)) => Err(e.into()),
        }
    }

    /// Signs a bearer token for the user.
    pub fn issue_token(&self, user: &UserPublic) -> ServerResult<TokenResponse> {
        let access_token = self.jwt.generate_token(user.id, user.email.clone())?;
        Ok(TokenResponse::bearer(
            access_token,
            self.jwt.expiration_seconds(),
        ))
    }

    /// Exchanges credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> ServerResult<TokenResponse> {
        let user = self
            .validate_credentials(email, password)
            .await?
            .ok_or(ServerError::InvalidCredentials)?;

        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_token(&user)
    }

    /// Returns the user behind a validated token.
    pub async fn current_user(&self, user_id: Uuid) -> ServerResult<UserPublic> {
        self.users
            .get_user(user_id)
            .await?
            .map(|user| user.to_public())
            .ok_or(ServerError::AuthenticationRequired)
    }
}

/// Hashes on the blocking pool; argon2 is CPU-bound.
pub(crate) async fn hash_password(password: String) -> ServerResult<String> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ServerError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(ServerError::from)
}

#[cfg(test)]
mod tests {
    use auth::JwtConfig;
    use resource_store::MemoryStore;

    use super::*;

    fn service() -> AuthService {
        let jwt = JwtManager::new(JwtConfig::new("test-secret")).unwrap();
        AuthService::new(Arc::new(MemoryStore::new()), Arc::new(jwt))
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_hides_hash() {
        let service = service();
        let user = service
            .register(" Driver@Example.com ", "correct-horse")
            .await
            .unwrap();

        assert_eq!(user.email, "driver@example.com");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service.register("a@b.io", "password-1").await.unwrap();

        let err = service.register("A@B.io", "password-2").await.unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let service = service();
        assert!(matches!(
            service.register("not-an-email", "password-1").await,
            Err(ServerError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.register("a@b.io", "").await,
            Err(ServerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let service = service();
        let registered = service.register("a@b.io", "password-1").await.unwrap();

        let found = service
            .validate_credentials("a@b.io", "password-1")
            .await
            .unwrap();
        assert_eq!(found, Some(registered));

        assert_eq!(
            service.validate_credentials("a@b.io", "wrong-pass").await.unwrap(),
            None
        );
        assert_eq!(
            service.validate_credentials("ghost@b.io", "password-1").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let service = service();
        let user = service.register("a@b.io", "password-1").await.unwrap();

        let token = service.login("a@b.io", "password-1").await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = service.jwt.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "a@b.io");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.register("a@b.io", "password-1").await.unwrap();

        let wrong_password = service.login("a@b.io", "password-2").await.unwrap_err();
        let unknown_user = service.login("nobody@b.io", "password-1").await.unwrap_err();

        assert!(matches!(wrong_password, ServerError::InvalidCredentials));
        assert!(matches!(unknown_user, ServerError::InvalidCredentials));
    }
}
