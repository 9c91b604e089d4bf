//! `PostgreSQL` repository implementation for visit record storage.

use super::{
    models::{NewVisitRow, VisitRow, VisitUpdate},
    schema::visit_records,
};
use crate::directory::domain::{AssigneeId, CustomerId, NoVisitReasonId, UserId, VisitTypeId};
use crate::visit::{
    domain::{
        DurationMinutes, EvidencePhotos, PersistedVisitData, VisitId, VisitOutcome, VisitRecord,
    },
    ports::{VisitRecordRepository, VisitRepositoryError, VisitRepositoryResult, WindowQuery},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by visit adapters.
pub type VisitPgPool = Pool<ConnectionManager<PgConnection>>;

/// Name of the unique index enforcing the one-visit-per-day slot.
const DAILY_SLOT_INDEX: &str = "uq_visit_records_daily_slot";

/// `PostgreSQL`-backed visit record repository.
#[derive(Debug, Clone)]
pub struct PostgresVisitRepository {
    pool: VisitPgPool,
}

impl PostgresVisitRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: VisitPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> VisitRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> VisitRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(VisitRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(VisitRepositoryError::persistence)?
    }
}

#[async_trait]
impl VisitRecordRepository for PostgresVisitRepository {
    async fn store(&self, record: &VisitRecord) -> VisitRepositoryResult<()> {
        let record_id = record.id();
        let assignee_id = record.assignee_id();
        let customer_id = record.customer_id();
        let date = record.visit_date();
        let new_row = to_new_row(record)?;

        self.run_blocking(move |connection| {
            // This pre-check improves semantic error reporting but is not relied
            // on for correctness: the unique index still enforces integrity in
            // the TOCTOU window between check and insert.
            let occupied = find_daily_row(connection, assignee_id, customer_id, date)?;
            if occupied.is_some() {
                return Err(VisitRepositoryError::DuplicateDailyVisit {
                    assignee_id,
                    customer_id,
                    date,
                });
            }

            diesel::insert_into(visit_records::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_daily_slot_violation(info.as_ref()) =>
                    {
                        VisitRepositoryError::DuplicateDailyVisit {
                            assignee_id,
                            customer_id,
                            date,
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        VisitRepositoryError::DuplicateVisit(record_id)
                    }
                    _ => VisitRepositoryError::persistence(err),
                })?;

            Ok(())
        })
        .await
    }

    async fn update(&self, record: &VisitRecord) -> VisitRepositoryResult<()> {
        let record_id = record.id();
        let changes = to_update(record)?;

        self.run_blocking(move |connection| {
            let updated_rows = diesel::update(
                visit_records::table.filter(visit_records::id.eq(record_id.into_inner())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(VisitRepositoryError::persistence)?;

            if updated_rows == 0 {
                return Err(VisitRepositoryError::NotFound(record_id));
            }

            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: VisitId) -> VisitRepositoryResult<Option<VisitRecord>> {
        self.run_blocking(move |connection| {
            let row = visit_records::table
                .filter(visit_records::id.eq(id.into_inner()))
                .select(VisitRow::as_select())
                .first::<VisitRow>(connection)
                .optional()
                .map_err(VisitRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_daily(
        &self,
        assignee_id: AssigneeId,
        customer_id: CustomerId,
        date: NaiveDate,
    ) -> VisitRepositoryResult<Option<VisitRecord>> {
        self.run_blocking(move |connection| {
            let row = find_daily_row(connection, assignee_id, customer_id, date)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_in_window(&self, query: WindowQuery) -> VisitRepositoryResult<Vec<VisitRecord>> {
        self.run_blocking(move |connection| {
            let mut select = visit_records::table
                .select(VisitRow::as_select())
                .filter(visit_records::visit_date.ge(query.from))
                .filter(visit_records::visit_date.le(query.to))
                .into_boxed();

            if let Some(assignee) = query.assignee_id {
                select = select.filter(visit_records::assignee_id.eq(assignee.into_inner()));
            }
            if let Some(customer) = query.customer_id {
                select = select.filter(visit_records::customer_id.eq(customer.into_inner()));
            }

            let rows = select
                .load::<VisitRow>(connection)
                .map_err(VisitRepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}

/// Integrity faults in persisted outcome columns.
#[derive(Debug, Clone, Error)]
enum VisitRowIntegrityError {
    /// A completed row carries no visit type.
    #[error("completed visit row {0} has no visit_type_id")]
    MissingVisitType(uuid::Uuid),

    /// A no-visit row carries no reason.
    #[error("no-visit row {0} has no no_visit_reason_id")]
    MissingNoVisitReason(uuid::Uuid),
}

fn to_new_row(record: &VisitRecord) -> VisitRepositoryResult<NewVisitRow> {
    let photos =
        serde_json::to_value(record.photos()).map_err(VisitRepositoryError::persistence)?;

    Ok(NewVisitRow {
        id: record.id().into_inner(),
        assignee_id: record.assignee_id().into_inner(),
        customer_id: record.customer_id().into_inner(),
        visit_datetime: record.visit_datetime(),
        visit_date: record.visit_date(),
        is_visit: record.outcome().is_visit(),
        visit_type_id: record.outcome().visit_type().map(VisitTypeId::into_inner),
        no_visit_reason_id: record
            .outcome()
            .no_visit_reason()
            .map(NoVisitReasonId::into_inner),
        no_visit_description: no_visit_description(record.outcome()),
        description: record.description().map(str::to_owned),
        photos,
        duration_minutes: record.duration_minutes().map(DurationMinutes::value),
        created_by: record.created_by().into_inner(),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    })
}

fn to_update(record: &VisitRecord) -> VisitRepositoryResult<VisitUpdate> {
    let photos =
        serde_json::to_value(record.photos()).map_err(VisitRepositoryError::persistence)?;

    Ok(VisitUpdate {
        visit_datetime: record.visit_datetime(),
        visit_date: record.visit_date(),
        is_visit: record.outcome().is_visit(),
        visit_type_id: record.outcome().visit_type().map(VisitTypeId::into_inner),
        no_visit_reason_id: record
            .outcome()
            .no_visit_reason()
            .map(NoVisitReasonId::into_inner),
        no_visit_description: no_visit_description(record.outcome()),
        description: record.description().map(str::to_owned),
        photos,
        duration_minutes: record.duration_minutes().map(DurationMinutes::value),
        updated_at: record.updated_at(),
    })
}

fn no_visit_description(outcome: &VisitOutcome) -> Option<String> {
    match outcome {
        VisitOutcome::Completed { .. } => None,
        VisitOutcome::NotVisited { description, .. } => description.clone(),
    }
}

fn row_to_record(row: VisitRow) -> VisitRepositoryResult<VisitRecord> {
    let outcome = if row.is_visit {
        let visit_type = row
            .visit_type_id
            .ok_or_else(|| {
                VisitRepositoryError::persistence(VisitRowIntegrityError::MissingVisitType(row.id))
            })
            .map(VisitTypeId::from_uuid)?;
        VisitOutcome::Completed { visit_type }
    } else {
        let reason = row
            .no_visit_reason_id
            .ok_or_else(|| {
                VisitRepositoryError::persistence(VisitRowIntegrityError::MissingNoVisitReason(
                    row.id,
                ))
            })
            .map(NoVisitReasonId::from_uuid)?;
        VisitOutcome::NotVisited {
            reason,
            description: row.no_visit_description,
        }
    };

    let photos = serde_json::from_value::<EvidencePhotos>(row.photos)
        .map_err(VisitRepositoryError::persistence)?;
    let duration_minutes = row
        .duration_minutes
        .map(DurationMinutes::new)
        .transpose()
        .map_err(VisitRepositoryError::persistence)?;

    let data = PersistedVisitData {
        id: VisitId::from_uuid(row.id),
        assignee_id: AssigneeId::from_uuid(row.assignee_id),
        customer_id: CustomerId::from_uuid(row.customer_id),
        visit_datetime: row.visit_datetime,
        outcome,
        description: row.description,
        photos,
        duration_minutes,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(VisitRecord::from_persisted(data))
}

fn is_daily_slot_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == DAILY_SLOT_INDEX)
}

fn find_daily_row(
    connection: &mut PgConnection,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    date: NaiveDate,
) -> VisitRepositoryResult<Option<VisitRow>> {
    visit_records::table
        .filter(visit_records::assignee_id.eq(assignee_id.into_inner()))
        .filter(visit_records::customer_id.eq(customer_id.into_inner()))
        .filter(visit_records::visit_date.eq(date))
        .select(VisitRow::as_select())
        .first::<VisitRow>(connection)
        .optional()
        .map_err(VisitRepositoryError::persistence)
}
