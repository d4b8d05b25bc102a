//! PostgreSQL Repository Implementations

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use kernel::id::{RoleId, UserId};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    role::Role,
    user::{IdentityUser, User},
};
use crate::domain::repository::{AuthSessionRepository, RoleRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, role_name::RoleName, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult, is_unique_violation};

const USER_COLUMNS: &str = r#"
    id,
    user_name,
    normalized_user_name,
    email,
    normalized_email,
    email_confirmed,
    password_hash,
    security_stamp,
    concurrency_stamp,
    lockout_enabled,
    lockout_end,
    access_failed_count,
    first_name,
    last_name,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_id: Uuid) -> AuthResult<BTreeSet<RoleName>> {
        let role_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT role_id FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(role_ids.into_iter().filter_map(known_role).collect())
    }

    async fn hydrate(&self, row: Option<UserRow>) -> AuthResult<Option<User>> {
        match row {
            Some(row) => {
                let roles = self.load_roles(row.id).await?;
                row.into_user(roles).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn write_roles(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        roles: &BTreeSet<RoleName>,
    ) -> AuthResult<()> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role.id().into_uuid())
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

fn known_role(role_id: Uuid) -> Option<RoleName> {
    let role = RoleName::from_id(&RoleId::from_uuid(role_id));
    if role.is_none() {
        tracing::warn!(role_id = %role_id, "Ignoring unknown role link");
    }
    role
}

fn map_unique(err: sqlx::Error) -> AuthError {
    if is_unique_violation(&err) {
        AuthError::DuplicateUser
    } else {
        AuthError::Database(err)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgIdentityRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        let identity = &user.identity;

        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
        ))
        .bind(identity.id.into_uuid())
        .bind(identity.user_name.as_str())
        .bind(identity.user_name.normalized())
        .bind(identity.email.as_str())
        .bind(identity.email.normalized())
        .bind(identity.email_confirmed)
        .bind(identity.password_hash.as_phc_string())
        .bind(&identity.security_stamp)
        .bind(&identity.concurrency_stamp)
        .bind(identity.lockout_enabled)
        .bind(identity.lockout_end)
        .bind(identity.access_failed_count)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique)?;

        Self::write_roles(&mut tx, identity.id.into_uuid(), &user.roles).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn find_by_user_name(&self, normalized_user_name: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE normalized_user_name = $1"
        ))
        .bind(normalized_user_name)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE normalized_user_name = $1 OR normalized_email = $2)",
        )
        .bind(user_name.normalized())
        .bind(email.normalized())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &mut User) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        let id = user.id().into_uuid();
        let expected_stamp = user.identity.concurrency_stamp.clone();
        let mut next = user.clone();
        next.identity.rotate_concurrency_stamp();
        let identity = &next.identity;

        let updated = sqlx::query(
            r#"
            UPDATE users SET
                user_name = $3,
                normalized_user_name = $4,
                email = $5,
                normalized_email = $6,
                email_confirmed = $7,
                password_hash = $8,
                security_stamp = $9,
                concurrency_stamp = $10,
                lockout_enabled = $11,
                lockout_end = $12,
                access_failed_count = $13,
                first_name = $14,
                last_name = $15,
                updated_at = $16
            WHERE id = $1 AND concurrency_stamp = $2
            "#,
        )
        .bind(id)
        .bind(&expected_stamp)
        .bind(identity.user_name.as_str())
        .bind(identity.user_name.normalized())
        .bind(identity.email.as_str())
        .bind(identity.email.normalized())
        .bind(identity.email_confirmed)
        .bind(identity.password_hash.as_phc_string())
        .bind(&identity.security_stamp)
        .bind(&identity.concurrency_stamp)
        .bind(identity.lockout_enabled)
        .bind(identity.lockout_end)
        .bind(identity.access_failed_count)
        .bind(&next.first_name)
        .bind(&next.last_name)
        .bind(next.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique)?
        .rows_affected();

        if updated == 0 {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if exists {
                AuthError::ConcurrencyFailure
            } else {
                AuthError::UserNotFound
            });
        }

        Self::write_roles(&mut tx, id, &next.roles).await?;
        tx.commit().await?;

        *user = next;
        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY normalized_user_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, (Uuid, Uuid)>("SELECT user_id, role_id FROM user_roles")
            .fetch_all(&self.pool)
            .await?;

        let mut roles: HashMap<Uuid, BTreeSet<RoleName>> = HashMap::new();
        for (user_id, role_id) in links {
            if let Some(role) = known_role(role_id) {
                roles.entry(user_id).or_default().insert(role);
            }
        }

        rows.into_iter()
            .map(|row| {
                let user_roles = roles.remove(&row.id).unwrap_or_default();
                row.into_user(user_roles)
            })
            .collect()
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgIdentityRepository {
    async fn find_by_name(&self, name: RoleName) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, normalized_name, concurrency_stamp FROM roles WHERE normalized_name = $1",
        )
        .bind(name.normalized())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(RoleRow::into_role))
    }

    async fn create_if_absent(&self, role: &Role) -> AuthResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO roles (id, name, normalized_name, concurrency_stamp)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role.id.into_uuid())
        .bind(role.name.as_str())
        .bind(role.normalized_name())
        .bind(&role.concurrency_stamp)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    async fn list(&self) -> AuthResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, normalized_name, concurrency_stamp FROM roles ORDER BY normalized_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(RoleRow::into_role).collect())
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgIdentityRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let roles: Vec<i16> = session.roles.iter().map(RoleName::code).collect();

        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                user_name,
                roles,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.into_uuid())
        .bind(&session.user_name)
        .bind(roles)
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                user_name,
                roles,
                expires_at_ms,
                created_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthSessionRow::into_session))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64> {
        let deleted = sqlx::query(
            "DELETE FROM auth_sessions WHERE user_id = $1 AND ($2::uuid IS NULL OR session_id <> $2)",
        )
        .bind(user_id.into_uuid())
        .bind(except)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    user_name: String,
    normalized_user_name: String,
    email: String,
    normalized_email: String,
    email_confirmed: bool,
    password_hash: String,
    security_stamp: String,
    concurrency_stamp: String,
    lockout_enabled: bool,
    lockout_end: Option<DateTime<Utc>>,
    access_failed_count: i32,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, roles: BTreeSet<RoleName>) -> AuthResult<User> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(User {
            identity: IdentityUser {
                id: UserId::from_uuid(self.id),
                user_name: UserName::from_db(self.user_name, self.normalized_user_name),
                email: Email::from_db(self.email, self.normalized_email),
                email_confirmed: self.email_confirmed,
                password_hash,
                security_stamp: self.security_stamp,
                concurrency_stamp: self.concurrency_stamp,
                lockout_enabled: self.lockout_enabled,
                lockout_end: self.lockout_end,
                access_failed_count: self.access_failed_count,
            },
            first_name: self.first_name,
            last_name: self.last_name,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    normalized_name: String,
    concurrency_stamp: String,
}

impl RoleRow {
    fn into_role(self) -> Option<Role> {
        let name = known_role(self.id)?;
        if name.normalized() != self.normalized_name {
            tracing::warn!(role_id = %self.id, "Role name does not match its fixed id");
        }
        Some(Role {
            id: RoleId::from_uuid(self.id),
            name,
            concurrency_stamp: self.concurrency_stamp,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    user_name: String,
    roles: Vec<i16>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            user_name: self.user_name,
            roles: self.roles.into_iter().filter_map(RoleName::from_code).collect(),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
