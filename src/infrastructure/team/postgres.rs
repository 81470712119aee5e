//! PostgreSQL team store implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::{
    DomainError, Fingerprint, Member, Team, TeamName, TeamStore, TeamStoreTransaction,
};

const UPSERT_PUBLIC_KEY: &str = r#"
    INSERT INTO public_keys (fingerprint, armored_public_key)
    VALUES ($1, $2)
    ON CONFLICT (fingerprint)
    DO UPDATE SET armored_public_key = EXCLUDED.armored_public_key
    RETURNING id
"#;

const INSERT_TEAM: &str = "INSERT INTO teams (name, uuid) VALUES ($1, $2) RETURNING id";

const INSERT_TEAM_USER: &str = r#"
    INSERT INTO team_users (team_id, fingerprint, is_admin)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

/// PostgreSQL implementation of TeamStore
#[derive(Debug, Clone)]
pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for PostgresTeamStore {
    async fn list_teams(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query("SELECT id, name, uuid FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list teams", e))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn get_team_by_uuid(&self, uuid: &Uuid) -> Result<Team, DomainError> {
        let row = sqlx::query("SELECT id, name, uuid FROM teams WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to get team", e))?;

        match row {
            Some(row) => row_to_team(&row),
            None => Err(DomainError::not_found(format!("Team '{}' not found", uuid))),
        }
    }

    async fn create_join_request(
        &self,
        fingerprint: &Fingerprint,
        team_uuid: &Uuid,
    ) -> Result<i64, DomainError> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO team_join_requests (team_id, fingerprint)
            SELECT id, $1 FROM teams WHERE uuid = $2
            RETURNING id
            "#,
        )
        .bind(fingerprint.as_str())
        .bind(team_uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to create join request", e))?;

        id.ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_uuid)))
    }

    async fn list_members(&self, team_id: i64) -> Result<Vec<Member>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT pk.armored_public_key, tu.is_admin
            FROM team_users tu
            JOIN public_keys pk ON pk.fingerprint = tu.fingerprint
            WHERE tu.team_id = $1
            ORDER BY tu.id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to list team members", e))?;

        rows.iter()
            .map(|row| {
                Ok(Member {
                    public_key: row
                        .try_get("armored_public_key")
                        .map_err(|e| storage_error("Invalid member row", e))?,
                    is_admin: row
                        .try_get("is_admin")
                        .map_err(|e| storage_error("Invalid member row", e))?,
                })
            })
            .collect()
    }

    async fn begin(&self) -> Result<Box<dyn TeamStoreTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// A unit of work backed by a database transaction.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TeamStoreTransaction for PostgresTransaction {
    async fn upsert_public_key(
        &mut self,
        fingerprint: &Fingerprint,
        armored: &str,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar(UPSERT_PUBLIC_KEY)
            .bind(fingerprint.as_str())
            .bind(armored)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| storage_error("Failed to register public key", e))
    }

    async fn create_team(&mut self, name: &TeamName) -> Result<(i64, Uuid), DomainError> {
        let uuid = Uuid::new_v4();

        let id: i64 = sqlx::query_scalar(INSERT_TEAM)
            .bind(name.as_str())
            .bind(uuid)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| storage_error("Failed to create team", e))?;

        Ok((id, uuid))
    }

    async fn create_membership(
        &mut self,
        team_id: i64,
        fingerprint: &Fingerprint,
        is_admin: bool,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar(INSERT_TEAM_USER)
            .bind(team_id)
            .bind(fingerprint.as_str())
            .bind(is_admin)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| storage_error("Failed to create team user", e))
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| storage_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| storage_error("Failed to roll back transaction", e))
    }
}

fn row_to_team(row: &PgRow) -> Result<Team, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| storage_error("Invalid team row", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| storage_error("Invalid team row", e))?;
    let uuid: Uuid = row
        .try_get("uuid")
        .map_err(|e| storage_error("Invalid team row", e))?;

    Ok(Team::new(id, name, uuid))
}

fn storage_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", context, err))
}
