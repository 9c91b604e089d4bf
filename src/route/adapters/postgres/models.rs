//! Diesel row models for route assignment persistence.

use super::schema::route_assignments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for route assignments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = route_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Assignment identifier.
    pub id: uuid::Uuid,
    /// Assignee who walks the route.
    pub assignee_id: uuid::Uuid,
    /// Customer visited on the scheduled day.
    pub customer_id: uuid::Uuid,
    /// ISO day-of-week, validated on load.
    pub scheduled_day: i16,
    /// User who created the assignment.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for route assignments.
///
/// There is no changeset: assignments are immutable and route changes
/// delete the old slot and insert a new one.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = route_assignments)]
pub struct NewAssignmentRow {
    /// Assignment identifier.
    pub id: uuid::Uuid,
    /// Assignee who walks the route.
    pub assignee_id: uuid::Uuid,
    /// Customer visited on the scheduled day.
    pub customer_id: uuid::Uuid,
    /// ISO day-of-week.
    pub scheduled_day: i16,
    /// User who created the assignment.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
