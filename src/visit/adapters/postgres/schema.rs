//! Diesel schema for visit record persistence.

diesel::table! {
    /// Visit records captured by field assignees.
    visit_records (id) {
        /// Visit record identifier.
        id -> Uuid,
        /// Assignee the visit belongs to.
        assignee_id -> Uuid,
        /// Customer the visit was made at.
        customer_id -> Uuid,
        /// Instant the visit took place.
        visit_datetime -> Timestamptz,
        /// Denormalized UTC calendar date backing the daily slot index
        /// `uq_visit_records_daily_slot (assignee_id, customer_id, visit_date)`.
        visit_date -> Date,
        /// Whether the outcome counts as a performed visit.
        is_visit -> Bool,
        /// Visit type for completed outcomes.
        visit_type_id -> Nullable<Uuid>,
        /// Catalogue reason for no-visit outcomes.
        no_visit_reason_id -> Nullable<Uuid>,
        /// Free-text elaboration of the no-visit reason.
        no_visit_description -> Nullable<Text>,
        /// Free-text visit notes.
        description -> Nullable<Text>,
        /// Evidence photo URL payload.
        photos -> Jsonb,
        /// Whole-minute duration written back when the visit ends.
        duration_minutes -> Nullable<BigInt>,
        /// User who logged the visit.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
