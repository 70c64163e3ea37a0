use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use encore_models::{NewUser, TeacherData, User, UserId, UserRole, UserType};

use crate::repository::{UserCredentials, UserRepository};

const USER_COLUMNS: &str =
    "id, name, email, phone, address, cover_image, role, instruments, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    cover_image: Option<String>,
    role: String,
    instruments: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: UserRole = row.role.parse().map_err(|e: String| anyhow!(e))?;
        let teacher_data = row
            .instruments
            .map(|instruments| TeacherData { instruments });

        Ok(User {
            id: UserId::from(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            cover_image: row.cover_image,
            user_type: UserType::new(role, teacher_data),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn instruments_column(user_type: &UserType) -> Option<Vec<String>> {
    user_type
        .teacher_data
        .as_ref()
        .map(|data| data.instruments.clone())
}

fn map_write_error(err: sqlx::Error, context: &'static str) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return anyhow!("User already exists");
    }
    anyhow::Error::new(err).context(context)
}

/// PostgreSQL-backed user store.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"INSERT INTO users (name, email, password_hash, phone, address, role, instruments)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.phone)
        .bind(&new_user.address)
        .bind(new_user.user_type.role.as_str())
        .bind(instruments_column(&new_user.user_type))
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.db)
        .await
        .context("Failed to fetch user")?;

        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.db)
        .await
        .context("Failed to fetch users")?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("Failed to fetch user credentials")?;

        row.map(|row| {
            Ok(UserCredentials {
                user: row.user.try_into()?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn save(&self, user: &User, password_hash: Option<&str>) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"UPDATE users
               SET name = $2, email = $3, phone = $4, address = $5, cover_image = $6,
                   instruments = $7, password_hash = COALESCE($8, password_hash),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.cover_image)
        .bind(instruments_column(&user.user_type))
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?;

        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.db)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, role: UserRole, instruments: Option<Vec<String>>) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash-1".to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
            user_type: UserType::new(role, instruments.map(|instruments| TeacherData { instruments })),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_insert_and_find_credentials(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let user = repo
            .insert(new_user(
                "teacher@encore.test",
                UserRole::Teacher,
                Some(vec!["piano".to_string()]),
            ))
            .await
            .unwrap();

        let credentials = repo
            .find_credentials_by_email("teacher@encore.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.password_hash, "hash-1");
        assert_eq!(credentials.user, user);
        assert_eq!(credentials.user.role(), UserRole::Teacher);
        assert_eq!(
            credentials.user.user_type.teacher_data.unwrap().instruments,
            vec!["piano".to_string()]
        );

        assert!(
            repo.find_credentials_by_email("nobody@encore.test")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_insert_duplicate_email(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        repo.insert(new_user("dup@encore.test", UserRole::Student, None))
            .await
            .unwrap();

        let err = repo
            .insert(new_user("dup@encore.test", UserRole::Teacher, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_save_duplicate_email(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        repo.insert(new_user("taken@encore.test", UserRole::Student, None))
            .await
            .unwrap();
        let mut user = repo
            .insert(new_user("free@encore.test", UserRole::Student, None))
            .await
            .unwrap();

        user.email = "taken@encore.test".to_string();
        let err = repo.save(&user, None).await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_save_keeps_password_hash_unless_given(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let mut user = repo
            .insert(new_user("pw@encore.test", UserRole::Student, None))
            .await
            .unwrap();

        user.name = "Renamed".to_string();
        let saved = repo.save(&user, None).await.unwrap().unwrap();
        assert_eq!(saved.name, "Renamed");
        let credentials = repo
            .find_credentials_by_email("pw@encore.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.password_hash, "hash-1");

        repo.save(&user, Some("hash-2")).await.unwrap().unwrap();
        let credentials = repo
            .find_credentials_by_email("pw@encore.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.password_hash, "hash-2");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_save_never_writes_role(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let mut user = repo
            .insert(new_user("role@encore.test", UserRole::Student, None))
            .await
            .unwrap();

        user.user_type.role = UserRole::Admin;
        let saved = repo.save(&user, None).await.unwrap().unwrap();
        assert_eq!(saved.role(), UserRole::Student);

        let reloaded = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.role(), UserRole::Student);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_save_missing_user(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let mut user = repo
            .insert(new_user("gone@encore.test", UserRole::Student, None))
            .await
            .unwrap();
        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());

        user.name = "Ghost".to_string();
        assert!(repo.save(&user, None).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_find_all_in_creation_order(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let mut ids = Vec::new();
        for email in ["a@encore.test", "b@encore.test", "c@encore.test"] {
            let user = repo
                .insert(new_user(email, UserRole::Student, None))
                .await
                .unwrap();
            ids.push(user.id);
        }

        let listed: Vec<UserId> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|user| user.id)
            .collect();
        assert_eq!(listed, ids);
    }
}
