//! Diesel schema for poll persistence.

diesel::table! {
    /// Poll questions.
    questions (id) {
        /// Question identifier.
        id -> Uuid,
        /// Prompt text.
        #[max_length = 200]
        prompt -> Varchar,
        /// Publication timestamp; future values schedule the question.
        published_at -> Timestamptz,
    }
}

diesel::table! {
    /// Answer options owned by a question.
    choices (id) {
        /// Choice identifier.
        id -> Uuid,
        /// Owning question.
        question_id -> Uuid,
        /// Answer text.
        #[max_length = 200]
        label -> Varchar,
        /// Number of votes cast.
        vote_count -> Int4,
        /// Insertion sequence used to keep creation order.
        position -> Int8,
    }
}

diesel::joinable!(choices -> questions (question_id));
diesel::allow_tables_to_appear_in_same_query!(questions, choices);
