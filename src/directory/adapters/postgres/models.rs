//! Diesel row models for reference-data lookup.

use super::schema::{assignees, customers, districts, no_visit_reasons};
use diesel::prelude::*;

/// Query result row for assignee records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssigneeRow {
    /// Assignee identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub display_name: String,
    /// Role kind string.
    pub role: String,
}

/// Query result row for customer records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    /// Customer identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub display_name: String,
    /// District the customer belongs to.
    pub district_id: Option<uuid::Uuid>,
    /// Reporting group the customer belongs to.
    pub group_id: Option<uuid::Uuid>,
    /// Active flag.
    pub active: bool,
}

/// Query result row for district records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = districts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DistrictRow {
    /// District identifier.
    pub id: uuid::Uuid,
    /// District display name.
    pub display_name: String,
}

/// Query result row for no-visit reason records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = no_visit_reasons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NoVisitReasonRow {
    /// Reason identifier.
    pub id: uuid::Uuid,
    /// Human-readable reason label.
    pub label: String,
}
