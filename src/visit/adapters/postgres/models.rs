//! Diesel row models for visit record persistence.

use super::schema::visit_records;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for visit records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visit_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VisitRow {
    /// Visit record identifier.
    pub id: uuid::Uuid,
    /// Assignee the visit belongs to.
    pub assignee_id: uuid::Uuid,
    /// Customer the visit was made at.
    pub customer_id: uuid::Uuid,
    /// Instant the visit took place.
    pub visit_datetime: DateTime<Utc>,
    /// Denormalized UTC calendar date.
    pub visit_date: NaiveDate,
    /// Whether the outcome counts as a performed visit.
    pub is_visit: bool,
    /// Visit type for completed outcomes.
    pub visit_type_id: Option<uuid::Uuid>,
    /// Catalogue reason for no-visit outcomes.
    pub no_visit_reason_id: Option<uuid::Uuid>,
    /// Free-text elaboration of the no-visit reason.
    pub no_visit_description: Option<String>,
    /// Free-text visit notes.
    pub description: Option<String>,
    /// Evidence photo URL payload.
    pub photos: Value,
    /// Whole-minute duration written back when the visit ends.
    pub duration_minutes: Option<i64>,
    /// User who logged the visit.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for visit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visit_records)]
pub struct NewVisitRow {
    /// Visit record identifier.
    pub id: uuid::Uuid,
    /// Assignee the visit belongs to.
    pub assignee_id: uuid::Uuid,
    /// Customer the visit was made at.
    pub customer_id: uuid::Uuid,
    /// Instant the visit took place.
    pub visit_datetime: DateTime<Utc>,
    /// Denormalized UTC calendar date.
    pub visit_date: NaiveDate,
    /// Whether the outcome counts as a performed visit.
    pub is_visit: bool,
    /// Visit type for completed outcomes.
    pub visit_type_id: Option<uuid::Uuid>,
    /// Catalogue reason for no-visit outcomes.
    pub no_visit_reason_id: Option<uuid::Uuid>,
    /// Free-text elaboration of the no-visit reason.
    pub no_visit_description: Option<String>,
    /// Free-text visit notes.
    pub description: Option<String>,
    /// Evidence photo URL payload.
    pub photos: Value,
    /// Whole-minute duration written back when the visit ends.
    pub duration_minutes: Option<i64>,
    /// User who logged the visit.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for updating a visit record.
///
/// `None` values null their columns: an outcome edit must clear the other
/// variant's fields rather than leave them behind.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = visit_records)]
#[diesel(treat_none_as_null = true)]
pub struct VisitUpdate {
    /// Instant the visit took place.
    pub visit_datetime: DateTime<Utc>,
    /// Denormalized UTC calendar date.
    pub visit_date: NaiveDate,
    /// Whether the outcome counts as a performed visit.
    pub is_visit: bool,
    /// Visit type for completed outcomes.
    pub visit_type_id: Option<uuid::Uuid>,
    /// Catalogue reason for no-visit outcomes.
    pub no_visit_reason_id: Option<uuid::Uuid>,
    /// Free-text elaboration of the no-visit reason.
    pub no_visit_description: Option<String>,
    /// Free-text visit notes.
    pub description: Option<String>,
    /// Evidence photo URL payload.
    pub photos: Value,
    /// Whole-minute duration written back when the visit ends.
    pub duration_minutes: Option<i64>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
