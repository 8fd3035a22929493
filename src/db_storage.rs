use crate::errors::{AppError, ResultExt};
use crate::fiscal::RecurrenceType;
use crate::models::{Client, Installment, Obligation, RecurringKind, RecurringSource};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Outcome of copying a recurring item forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(Uuid),
    /// A child with the same parent and due date already exists.
    Duplicate,
}

/// Read side for the duplicate checks plus the writes of the recurrence job.
#[derive(Clone)]
pub struct FiscalStorage {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ObligationRow {
    id: String,
    client_id: String,
    title: String,
    due_date: NaiveDate,
    obligation_type: String,
    recurrence: Option<String>,
}

impl From<ObligationRow> for Obligation {
    fn from(row: ObligationRow) -> Self {
        Obligation {
            id: row.id,
            client_id: row.client_id,
            title: row.title,
            due_date: row.due_date,
            obligation_type: row.obligation_type,
            recurrence: row
                .recurrence
                .and_then(|r| r.parse::<RecurrenceType>().ok()),
        }
    }
}

#[derive(sqlx::FromRow)]
struct SourceRow {
    id: Uuid,
    due_date: NaiveDate,
    recurrence: String,
    weekend_handling: Option<String>,
}

impl FiscalStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every registered client, earliest first.
    pub async fn clients(&self) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id::text AS id, name, document
            FROM clients
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("loading clients")
    }

    pub async fn installments_for_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<Installment>, AppError> {
        sqlx::query_as::<_, Installment>(
            r#"
            SELECT id::text AS id, client_id::text AS client_id, installment_number,
                   due_date, protocol, name
            FROM installments
            WHERE client_id::text = $1
            ORDER BY created_at
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("loading installments of client {}", client_id))
    }

    pub async fn obligations_for_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<Obligation>, AppError> {
        let rows = sqlx::query_as::<_, ObligationRow>(
            r#"
            SELECT id::text AS id, client_id::text AS client_id, title, due_date,
                   type AS obligation_type, recurrence::text AS recurrence
            FROM obligations
            WHERE client_id::text = $1
            ORDER BY created_at
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("loading obligations of client {}", client_id))?;

        Ok(rows.into_iter().map(Obligation::from).collect())
    }

    /// Settled recurring items of `kind` whose owner has not turned auto-creation off.
    ///
    /// `weekend_handling` is the row's own value, or the owner's default when the row
    /// has none.
    pub async fn recurring_sources(
        &self,
        kind: RecurringKind,
    ) -> Result<Vec<RecurringSource>, AppError> {
        let sql = format!(
            r#"
            SELECT s.id, s.due_date, s.recurrence::text AS recurrence,
                   COALESCE(s.weekend_handling, st.default_weekend_handling) AS weekend_handling
            FROM {} s
            LEFT JOIN settings st ON st.user_id = s.user_id
            WHERE s.recurrence::text <> 'none'
              AND s.status::text = $1
              AND COALESCE(st.auto_create_recurrences, true)
            ORDER BY s.created_at
            "#,
            kind.table()
        );

        let rows = sqlx::query_as::<_, SourceRow>(&sql)
            .bind(kind.settled_status())
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("loading recurring {}", kind.table()))?;

        let sources = rows
            .into_iter()
            .filter_map(|row| {
                let recurrence = match row.recurrence.parse::<RecurrenceType>() {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Skipping {} {}: {}", kind.entity_type(), row.id, e);
                        return None;
                    }
                };
                Some(RecurringSource {
                    id: row.id,
                    kind,
                    due_date: row.due_date,
                    recurrence,
                    weekend_handling: row
                        .weekend_handling
                        .as_deref()
                        .and_then(|h| h.parse().ok()),
                })
            })
            .collect();

        Ok(sources)
    }

    /// Copies `source` forward as a pending item due on `due_date` and records it in
    /// `recurrence_history`, in a single transaction.
    pub async fn insert_recurrence(
        &self,
        source: &RecurringSource,
        due_date: NaiveDate,
        original_due_date: Option<NaiveDate>,
        run_date: NaiveDate,
    ) -> Result<InsertOutcome, AppError> {
        let table = source.kind.table();
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent runs (cron, HTTP, replicas) on the same source until commit
        let lock_sql = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", table);
        let locked = sqlx::query_scalar::<_, Uuid>(&lock_sql)
            .bind(source.id)
            .fetch_optional(&mut *tx)
            .await
            .context("locking recurrence source")?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "{} {} no longer exists",
                source.kind.entity_type(),
                source.id
            )));
        }

        let exists_sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE parent_id = $1 AND due_date = $2)",
            table
        );
        let exists = sqlx::query_scalar::<_, bool>(&exists_sql)
            .bind(source.id)
            .bind(due_date)
            .fetch_one(&mut *tx)
            .await
            .context("checking for an existing recurrence")?;

        if exists {
            return Ok(InsertOutcome::Duplicate);
        }

        let new_id = sqlx::query_scalar::<_, Uuid>(copy_forward_sql(source.kind))
            .bind(source.id)
            .bind(due_date)
            .bind(original_due_date)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("copying {} {}", source.kind.entity_type(), source.id))?;

        sqlx::query(
            r#"
            INSERT INTO recurrence_history (
                entity_type, entity_id, original_id, created_by_system, creation_date
            )
            VALUES ($1, $2, $3, true, $4)
            "#,
        )
        .bind(source.kind.entity_type())
        .bind(new_id)
        .bind(source.id)
        .bind(run_date)
        .execute(&mut *tx)
        .await
        .context("recording recurrence history")?;

        tx.commit().await?;

        Ok(InsertOutcome::Created(new_id))
    }
}

fn copy_forward_sql(kind: RecurringKind) -> &'static str {
    match kind {
        RecurringKind::Obligation => {
            r#"
            INSERT INTO obligations (
                title, description, client_id, tax_type_id, type, due_date,
                original_due_date, status, recurrence, amount, notes, responsible,
                weekend_handling, auto_created, parent_id, user_id, completed_at
            )
            SELECT title, description, client_id, tax_type_id, type, $2,
                   $3, 'pending', recurrence, amount, notes, responsible,
                   weekend_handling, true, id, user_id, NULL
            FROM obligations
            WHERE id = $1
            RETURNING id
            "#
        }
        RecurringKind::Tax => {
            r#"
            INSERT INTO taxes (
                client_id, tax_type_name, description, amount, due_date,
                original_due_date, status, recurrence, notes, responsible,
                weekend_handling, auto_created, parent_id, user_id, paid_at
            )
            SELECT client_id, tax_type_name, description, amount, $2,
                   $3, 'pending', recurrence, notes, responsible,
                   weekend_handling, true, id, user_id, NULL
            FROM taxes
            WHERE id = $1
            RETURNING id
            "#
        }
    }
}
