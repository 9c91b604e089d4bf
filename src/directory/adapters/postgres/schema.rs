//! Diesel schema for reference-data lookup.

diesel::table! {
    /// Field assignees (sellers and merchandisers).
    assignees (id) {
        /// Assignee identifier.
        id -> Uuid,
        /// Display name shown in plans and reports.
        #[max_length = 255]
        display_name -> Varchar,
        /// Role kind (`seller` or `merchandiser`).
        #[max_length = 50]
        role -> Varchar,
    }
}

diesel::table! {
    /// Customers (stores and outlets).
    customers (id) {
        /// Customer identifier.
        id -> Uuid,
        /// Display name shown in plans and reports.
        #[max_length = 255]
        display_name -> Varchar,
        /// District the customer belongs to.
        district_id -> Nullable<Uuid>,
        /// Reporting group the customer belongs to.
        group_id -> Nullable<Uuid>,
        /// Whether the customer is currently active.
        active -> Bool,
    }
}

diesel::table! {
    /// Sales districts.
    districts (id) {
        /// District identifier.
        id -> Uuid,
        /// District display name.
        #[max_length = 255]
        display_name -> Varchar,
    }
}

diesel::table! {
    /// No-visit reason catalogue.
    no_visit_reasons (id) {
        /// Reason identifier.
        id -> Uuid,
        /// Human-readable reason label.
        #[max_length = 255]
        label -> Varchar,
    }
}

diesel::joinable!(customers -> districts (district_id));
diesel::allow_tables_to_appear_in_same_query!(customers, districts);
