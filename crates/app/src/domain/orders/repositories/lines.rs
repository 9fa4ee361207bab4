//! Order Lines Repository

use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::orders::models::{NewOrderLine, OrderLine};

const GET_ORDER_LINES_SQL: &str = include_str!("../sql/get_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[NewOrderLine],
    ) -> Result<(), sqlx::Error> {
        if lines.is_empty() {
            return Ok(());
        }

        // Checked quantity conversions first, so the builder closure below
        // stays infallible.
        let rows = lines
            .iter()
            .map(|line| {
                let quantity = i32::try_from(line.quantity).map_err(|e| {
                    sqlx::Error::ColumnDecode {
                        index: "quantity".to_string(),
                        source: Box::new(e),
                    }
                })?;

                Ok((
                    line.id,
                    line.order_id,
                    line.product_id,
                    quantity,
                    line.unit_price,
                    line.line_total,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO order_lines (id, order_id, product_id, quantity, unit_price, line_total) ",
        );

        builder.push_values(
            rows,
            |mut b, (id, order_id, product_id, quantity, unit_price, line_total)| {
                b.push_bind(id)
                    .push_bind(order_id)
                    .push_bind(product_id)
                    .push_bind(quantity)
                    .push_bind(unit_price)
                    .push_bind(line_total);
            },
        );

        builder.build().execute(&mut **tx).await?;

        Ok(())
    }

    pub(crate) async fn get_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Uuid,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        query_as::<Postgres, OrderLine>(GET_ORDER_LINES_SQL)
            .bind(order)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i32: i32 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            quantity,
            unit_price: row.try_get::<Decimal, _>("unit_price")?,
            line_total: row.try_get::<Decimal, _>("line_total")?,
        })
    }
}
