//! Roles Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use percolate_core::role::Role;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::roles::models::UserRole;

const GET_ROLE_SQL: &str = include_str!("sql/get_role.sql");
const ASSIGN_ROLE_SQL: &str = include_str!("sql/assign_role.sql");
const LIST_USER_ROLES_SQL: &str = include_str!("sql/list_user_roles.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRolesRepository;

impl PgRolesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
    ) -> Result<Option<Role>, sqlx::Error> {
        let raw: Option<String> = query_scalar(GET_ROLE_SQL)
            .bind(user)
            .fetch_optional(&mut **tx)
            .await?;

        raw.map(|raw| parse_role(&raw)).transpose()
    }

    pub(crate) async fn assign_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Uuid,
        role: Role,
    ) -> Result<(), sqlx::Error> {
        query(ASSIGN_ROLE_SQL)
            .bind(user)
            .bind(role.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_user_roles(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<UserRole>, sqlx::Error> {
        query_as::<Postgres, UserRole>(LIST_USER_ROLES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UserRole {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let raw: String = row.try_get("role")?;

        Ok(Self {
            user_id: row.try_get("user_id")?,
            role: parse_role(&raw)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

fn parse_role(raw: &str) -> Result<Role, sqlx::Error> {
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: Box::new(e),
    })
}
