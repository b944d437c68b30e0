//! Diesel schema for user records.

diesel::table! {
    /// Users known to the directory.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Login email, unique.
        #[max_length = 320]
        email -> Varchar,
        /// Display name.
        #[max_length = 100]
        display_name -> Varchar,
        /// Access role.
        #[max_length = 20]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
