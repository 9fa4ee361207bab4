//! Settings Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::settings::models::Setting;

const LIST_SETTINGS_SQL: &str = include_str!("sql/list_settings.sql");
const UPDATE_SETTING_SQL: &str = include_str!("sql/update_setting.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSettingsRepository;

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Setting>, sqlx::Error> {
        query_as::<Postgres, Setting>(LIST_SETTINGS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_setting(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
        value: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_SETTING_SQL)
            .bind(key)
            .bind(value)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Setting {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            kind: row.try_get("kind")?,
        })
    }
}
