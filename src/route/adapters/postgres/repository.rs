//! `PostgreSQL` repository implementation for route assignment storage.

use super::{
    models::{AssignmentRow, NewAssignmentRow},
    schema::route_assignments,
};
use crate::directory::domain::{AssigneeId, CustomerId, UserId};
use crate::route::{
    domain::{AssignmentId, PersistedAssignmentData, RouteAssignment, ScheduledDay},
    ports::{
        AssignmentQuery, RouteAssignmentRepository, RouteRepositoryError, RouteRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by route adapters.
pub type RoutePgPool = Pool<ConnectionManager<PgConnection>>;

/// Name of the unique index enforcing the one-assignment-per-slot rule.
const SLOT_INDEX: &str = "uq_route_assignments_slot";

/// `PostgreSQL`-backed route assignment repository.
#[derive(Debug, Clone)]
pub struct PostgresRouteAssignmentRepository {
    pool: RoutePgPool,
}

impl PostgresRouteAssignmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: RoutePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RouteRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RouteRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RouteRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RouteRepositoryError::persistence)?
    }
}

#[async_trait]
impl RouteAssignmentRepository for PostgresRouteAssignmentRepository {
    async fn store(&self, assignment: &RouteAssignment) -> RouteRepositoryResult<()> {
        let assignee_id = assignment.assignee_id();
        let customer_id = assignment.customer_id();
        let day = assignment.day();
        let new_row = to_new_row(assignment);

        self.run_blocking(move |connection| {
            // The slot index still enforces integrity in the TOCTOU window
            // between this check and the insert; the pre-check only improves
            // error reporting.
            let occupied = find_slot_row(connection, assignee_id, customer_id, day)?;
            if occupied.is_some() {
                return Err(RouteRepositoryError::DuplicateAssignment {
                    assignee_id,
                    customer_id,
                    day,
                });
            }

            diesel::insert_into(route_assignments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_slot_violation(info.as_ref()) =>
                    {
                        RouteRepositoryError::DuplicateAssignment {
                            assignee_id,
                            customer_id,
                            day,
                        }
                    }
                    _ => RouteRepositoryError::persistence(err),
                })?;

            Ok(())
        })
        .await
    }

    async fn delete(&self, id: AssignmentId) -> RouteRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_rows = diesel::delete(
                route_assignments::table.filter(route_assignments::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(RouteRepositoryError::persistence)?;

            if deleted_rows == 0 {
                return Err(RouteRepositoryError::NotFound(id));
            }

            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AssignmentId) -> RouteRepositoryResult<Option<RouteAssignment>> {
        self.run_blocking(move |connection| {
            let row = route_assignments::table
                .filter(route_assignments::id.eq(id.into_inner()))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()
                .map_err(RouteRepositoryError::persistence)?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn list(&self, query: AssignmentQuery) -> RouteRepositoryResult<Vec<RouteAssignment>> {
        self.run_blocking(move |connection| {
            let mut select = route_assignments::table
                .select(AssignmentRow::as_select())
                .into_boxed();

            if let Some(assignee) = query.assignee_id {
                select = select.filter(route_assignments::assignee_id.eq(assignee.into_inner()));
            }
            if let Some(customer) = query.customer_id {
                select = select.filter(route_assignments::customer_id.eq(customer.into_inner()));
            }
            if let Some(day) = query.day {
                select =
                    select.filter(route_assignments::scheduled_day.eq(i16::from(day.value())));
            }

            let rows = select
                .load::<AssignmentRow>(connection)
                .map_err(RouteRepositoryError::persistence)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }
}

/// Integrity faults in persisted assignment columns.
#[derive(Debug, Clone, Error)]
enum AssignmentRowIntegrityError {
    /// A row stores a day outside the ISO range.
    #[error("assignment row {id} has out-of-range scheduled_day {day}")]
    InvalidScheduledDay { id: uuid::Uuid, day: i16 },
}

fn to_new_row(assignment: &RouteAssignment) -> NewAssignmentRow {
    NewAssignmentRow {
        id: assignment.id().into_inner(),
        assignee_id: assignment.assignee_id().into_inner(),
        customer_id: assignment.customer_id().into_inner(),
        scheduled_day: i16::from(assignment.day().value()),
        created_by: assignment.created_by().into_inner(),
        created_at: assignment.created_at(),
    }
}

fn row_to_assignment(row: AssignmentRow) -> RouteRepositoryResult<RouteAssignment> {
    let day = u8::try_from(row.scheduled_day)
        .ok()
        .and_then(|value| ScheduledDay::new(value).ok())
        .ok_or_else(|| {
            RouteRepositoryError::persistence(AssignmentRowIntegrityError::InvalidScheduledDay {
                id: row.id,
                day: row.scheduled_day,
            })
        })?;

    let data = PersistedAssignmentData {
        id: AssignmentId::from_uuid(row.id),
        assignee_id: AssigneeId::from_uuid(row.assignee_id),
        customer_id: CustomerId::from_uuid(row.customer_id),
        day,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
    };
    Ok(RouteAssignment::from_persisted(data))
}

fn is_slot_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name().is_some_and(|name| name == SLOT_INDEX)
}

fn find_slot_row(
    connection: &mut PgConnection,
    assignee_id: AssigneeId,
    customer_id: CustomerId,
    day: ScheduledDay,
) -> RouteRepositoryResult<Option<AssignmentRow>> {
    route_assignments::table
        .filter(route_assignments::assignee_id.eq(assignee_id.into_inner()))
        .filter(route_assignments::customer_id.eq(customer_id.into_inner()))
        .filter(route_assignments::scheduled_day.eq(i16::from(day.value())))
        .select(AssignmentRow::as_select())
        .first::<AssignmentRow>(connection)
        .optional()
        .map_err(RouteRepositoryError::persistence)
}
