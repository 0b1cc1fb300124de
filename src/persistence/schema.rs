//! Diesel schema for the task board tables.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Auto-increment user identifier.
        id -> Int8,
        /// Unique login name.
        #[max_length = 100]
        name -> Varchar,
        /// Role token (`admin` or `trabajador`).
        #[max_length = 20]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked tasks.
    tasks (id) {
        /// Auto-increment task identifier.
        id -> Int8,
        /// Task title.
        title -> Text,
        /// Free-form description.
        description -> Text,
        /// Status token.
        #[max_length = 20]
        status -> Varchar,
        /// Priority token.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional assignee.
        assigned_to -> Nullable<Int8>,
        /// Creating user, cleared when the user is deleted.
        created_by -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Progress-state token.
        #[max_length = 20]
        progress_state -> Varchar,
    }
}

diesel::table! {
    /// Append-only progress updates, cascade-deleted with their task.
    updates (id) {
        /// Auto-increment update identifier.
        id -> Int8,
        /// Parent task.
        task_id -> Int8,
        /// Authoring user, cleared when the user is deleted.
        user_id -> Nullable<Int8>,
        /// Comment text, empty when omitted.
        comment -> Text,
        /// Progress-state token recorded with the update.
        #[max_length = 20]
        progress_state -> Varchar,
        /// Creation timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::joinable!(updates -> tasks (task_id));
diesel::joinable!(updates -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, tasks, updates);
