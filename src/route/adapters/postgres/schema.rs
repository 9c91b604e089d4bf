//! Diesel schema for route assignment persistence.

diesel::table! {
    /// Weekly route assignments mapping assignees to customers.
    route_assignments (id) {
        /// Assignment identifier.
        id -> Uuid,
        /// Assignee who walks the route.
        assignee_id -> Uuid,
        /// Customer visited on the scheduled day.
        customer_id -> Uuid,
        /// ISO day-of-week (1 = Monday, 7 = Sunday) backing the slot index
        /// `uq_route_assignments_slot (assignee_id, customer_id, scheduled_day)`.
        scheduled_day -> SmallInt,
        /// User who created the assignment.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
