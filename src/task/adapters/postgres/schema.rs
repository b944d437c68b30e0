//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with their project, assignee, and parent links.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Lifecycle status name.
        #[max_length = 20]
        status -> Varchar,
        /// Priority name.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Owning project.
        project_id -> Uuid,
        /// Assigned user, if any.
        assignee_id -> Nullable<Uuid>,
        /// Parent task, if any.
        parent_task_id -> Nullable<Uuid>,
        /// Optimistic-concurrency version.
        version -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
