//! Diesel schema for project records.

diesel::table! {
    /// Projects and their owners.
    projects (id) {
        /// Internal project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 200]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Owning user.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
