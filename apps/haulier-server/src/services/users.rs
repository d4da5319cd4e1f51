//! User management.

use std::sync::Arc;

use api_protocol::requests::UpdateUserRequest;
use chrono::Utc;
use entities::UserPublic;
use resource_store::{StoreError, UserStore};
use uuid::Uuid;

use super::auth::hash_password;
use super::{normalize_email, parse_id, validate_password};
use crate::error::{ServerError, ServerResult};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn list(&self) -> ServerResult<Vec<UserPublic>> {
        let users = self.users.list_users().await?;
        Ok(users.iter().map(|user| user.to_public()).collect())
    }

    pub async fn get(&self, id: &str) -> ServerResult<UserPublic> {
        let id = parse_id("user", id)?;
        self.users
            .get_user(id)
            .await?
            .map(|user| user.to_public())
            .ok_or_else(|| ServerError::NotFound("User not found".to_string()))
    }

    /// Changes the email and/or password of the caller's own account.
    pub async fn update(
        &self,
        actor: Uuid,
        id: &str,
        request: UpdateUserRequest,
    ) -> ServerResult<UserPublic> {
        let id = parse_id("user", id)?;
        ensure_self(actor, id)?;
        let mut user = self
            .users
            .get_user(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

        if let Some(email) = request.email {
            user.email = normalize_email(&email)?;
        }
        if let Some(password) = request.password {
            validate_password(&password)?;
            user.password_hash = hash_password(password).await?;
        }
        user.updated_at = Utc::now();

        let user = self.users.update_user(user).await.map_err(|e| match e {
            StoreError::AlreadyExists { .. } => {
                ServerError::Conflict("Email is already in use".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user.to_public())
    }

    /// Deletes the caller's own account.
    pub async fn delete(&self, actor: Uuid, id: &str) -> ServerResult<()> {
        let id = parse_id("user", id)?;
        ensure_self(actor, id)?;
        self.users.delete_user(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

fn ensure_self(actor: Uuid, id: Uuid) -> ServerResult<()> {
    if actor != id {
        tracing::warn!(actor = %actor, user_id = %id, "Rejected change to another user");
        return Err(ServerError::Forbidden(
            "Users may only modify their own account".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use entities::User;
    use resource_store::MemoryStore;

    use super::*;

    async fn seeded() -> (UserService, Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(User::new("a@b.io", auth::hash_password("password-1").unwrap()))
            .await
            .unwrap();
        (UserService::new(store.clone()), store, user)
    }

    #[tokio::test]
    async fn test_get_and_list_return_public_projection() {
        let (service, _, user) = seeded().await;

        let fetched = service.get(&user.id.to_string()).await.unwrap();
        assert_eq!(fetched, user.to_public());
        assert_eq!(service.list().await.unwrap(), vec![user.to_public()]);
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let (service, _, _) = seeded().await;
        assert!(matches!(
            service.get("not-a-uuid").await,
            Err(ServerError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.get(&Uuid::new_v4().to_string()).await,
            Err(ServerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rehashes_password() {
        let (service, store, user) = seeded().await;

        let request = UpdateUserRequest {
            email: Some("New@B.io".to_string()),
            password: Some("password-2".to_string()),
        };
        let updated = service
            .update(user.id, &user.id.to_string(), request)
            .await
            .unwrap();
        assert_eq!(updated.email, "new@b.io");

        let stored = store.get_user(user.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, user.password_hash);
        assert!(auth::verify_password("password-2", &stored.password_hash).is_ok());
    }

    #[tokio::test]
    async fn test_update_onto_taken_email_conflicts() {
        let (service, store, user) = seeded().await;
        store
            .create_user(User::new("taken@b.io", "hash"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            email: Some("taken@b.io".to_string()),
            password: None,
        };
        let err = service
            .update(user.id, &user.id.to_string(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_other_users_cannot_modify_account() {
        let (service, store, user) = seeded().await;
        let intruder = Uuid::new_v4();
        let id = user.id.to_string();

        let request = UpdateUserRequest {
            email: None,
            password: Some("taken-over".to_string()),
        };
        let err = service.update(intruder, &id, request).await.unwrap_err();
        assert!(matches!(err, ServerError::Forbidden(_)));

        let err = service.delete(intruder, &id).await.unwrap_err();
        assert!(matches!(err, ServerError::Forbidden(_)));

        let stored = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.email, user.email);
        assert_eq!(stored.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, _, user) = seeded().await;
        let id = user.id.to_string();

        service.delete(user.id, &id).await.unwrap();
        assert!(matches!(
            service.delete(user.id, &id).await,
            Err(ServerError::Store(StoreError::NotFound { .. }))
        ));
    }
}
