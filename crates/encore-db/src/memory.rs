use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use encore_models::{NewUser, User, UserId, UserType};

use crate::repository::{UserCredentials, UserRepository};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Process-local user store. Keeps insertion order and enforces unique
/// emails like the `users` table does.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|s| s.user.email == new_user.email) {
            bail!("User already exists");
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            address: new_user.address,
            cover_image: None,
            user_type: new_user.user_type,
            created_at: now,
            updated_at: now,
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|s| s.user.id == id).map(|s| s.user.clone()))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().map(|s| s.user.clone()).collect())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|s| s.user.email == email)
            .map(|s| UserCredentials {
                user: s.user.clone(),
                password_hash: s.password_hash.clone(),
            }))
    }

    async fn save(&self, user: &User, password_hash: Option<&str>) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|s| s.user.id != user.id && s.user.email == user.email)
        {
            bail!("User already exists");
        }

        let Some(stored) = users.iter_mut().find(|s| s.user.id == user.id) else {
            return Ok(None);
        };

        // role and creation time are not writable
        stored.user = User {
            user_type: UserType {
                role: stored.user.user_type.role,
                teacher_data: user.user_type.teacher_data.clone(),
            },
            created_at: stored.user.created_at,
            updated_at: Utc::now(),
            ..user.clone()
        };
        if let Some(hash) = password_hash {
            stored.password_hash = hash.to_string();
        }

        Ok(Some(stored.user.clone()))
    }

    async fn delete(&self, id: UserId) -> anyhow::Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|s| s.user.id != id);
        Ok(users.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_models::{TeacherData, UserRole};

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash-1".to_string(),
            phone: None,
            address: None,
            user_type: UserType::new(role, None),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(new_user("a@example.com", UserRole::Student))
            .await
            .unwrap();

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(repo.find_by_id(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("a@example.com", UserRole::Student))
            .await
            .unwrap();

        let err = repo
            .insert(new_user("a@example.com", UserRole::Teacher))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for email in ["1@x.io", "2@x.io", "3@x.io"] {
            repo.insert(new_user(email, UserRole::Student)).await.unwrap();
        }

        let emails: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["1@x.io", "2@x.io", "3@x.io"]);
    }

    #[tokio::test]
    async fn test_save_updates_fields_and_hash() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo
            .insert(new_user("t@example.com", UserRole::Teacher))
            .await
            .unwrap();

        user.name = "Renamed".to_string();
        user.user_type.teacher_data = Some(TeacherData {
            instruments: vec!["oboe".to_string()],
        });
        let saved = repo.save(&user, Some("hash-2")).await.unwrap().unwrap();

        assert_eq!(saved.name, "Renamed");
        assert!(saved.updated_at >= saved.created_at);

        let creds = repo
            .find_credentials_by_email("t@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password_hash, "hash-2");
        assert_eq!(
            creds.user.user_type.teacher_data.unwrap().instruments,
            vec!["oboe"]
        );
    }

    #[tokio::test]
    async fn test_save_never_changes_role() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo
            .insert(new_user("s@example.com", UserRole::Student))
            .await
            .unwrap();

        user.user_type.role = UserRole::Admin;
        let saved = repo.save(&user, None).await.unwrap().unwrap();
        assert_eq!(saved.user_type.role, UserRole::Student);

        let creds = repo
            .find_credentials_by_email("s@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_save_missing_user_returns_none() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = repo
            .insert(new_user("g@example.com", UserRole::Student))
            .await
            .unwrap();
        repo.delete(ghost.id).await.unwrap();

        ghost.name = "Boo".to_string();
        assert!(repo.save(&ghost, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(new_user("d@example.com", UserRole::Student))
            .await
            .unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
