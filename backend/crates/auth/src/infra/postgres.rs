//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, refresh_token::RefreshToken, user_id::UserId, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult, IdentityField};

const USER_NAME_UNIQUE: &str = "users_user_name_unique";
const EMAIL_UNIQUE: &str = "users_email_unique";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate unique violations on `users` into `DuplicateIdentity`
fn map_user_insert_error(err: sqlx::Error) -> AuthError {
    let field = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
            Some(USER_NAME_UNIQUE) => Some(IdentityField::Username),
            Some(EMAIL_UNIQUE) => Some(IdentityField::Email),
            _ => None,
        },
        _ => None,
    };

    match field {
        Some(field) => AuthError::DuplicateIdentity(field),
        None => AuthError::Storage(err),
    }
}

fn map_session_insert_error(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::SessionConflict,
        _ => AuthError::Storage(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                user_name_canonical,
                email,
                password_hash,
                user_role,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.user_role.id())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, user_name, email, password_hash, user_role, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_identifier(&self, canonical: &str) -> AuthResult<Option<User>> {
        // Usernames cannot contain '@' and emails must, so at most one row matches
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, user_name, email, password_hash, user_role, created_at
            FROM users
            WHERE user_name_canonical = $1 OR email = $1
            LIMIT 1
            "#,
        )
        .bind(canonical)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn user_exists(&self, user_id: &UserId) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn insert_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                token,
                user_id,
                user_role,
                device_info,
                expires_at,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.token.as_str())
        .bind(session.user_id.as_uuid())
        .bind(session.user_role.id())
        .bind(&session.device_info)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_session_insert_error)?;

        Ok(())
    }

    async fn find_active_session(
        &self,
        token: &RefreshToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, user_id, user_role, device_info, expires_at, created_at
            FROM auth_sessions
            WHERE token = $1 AND expires_at > $2
            "#,
        )
        .bind(token.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE token = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    password_hash: String,
    user_role: i16,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            user_role: role_from_db(self.user_role)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: Uuid,
    user_role: i16,
    device_info: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<Session> {
        Ok(Session {
            token: RefreshToken::from_raw(self.token),
            user_id: UserId::from_uuid(self.user_id),
            user_role: role_from_db(self.user_role)?,
            device_info: self.device_info,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

fn role_from_db(id: i16) -> AuthResult<UserRole> {
    UserRole::from_id(id).map_err(|e| AuthError::Internal(e.to_string()))
}
