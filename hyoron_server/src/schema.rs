//! Diesel table definitions for the review platform.
//!
//! Tables: users, user_settings, works, programs, reviews,
//! edit_requests, share_jobs.

diesel::table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        role -> Varchar,
        api_token_digest -> Nullable<Varchar>,
        active -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    user_settings (id) {
        id -> Int8,
        user_id -> Int8,
        share_review_to_twitter -> Bool,
        share_review_to_facebook -> Bool,
        hide_review_bodies -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    works (id) {
        id -> Int8,
        title -> Varchar,
        title_kana -> Nullable<Varchar>,
        media -> Varchar,
        image_url -> Nullable<Varchar>,
        official_site_url -> Nullable<Varchar>,
        wikipedia_url -> Nullable<Varchar>,
        reviews_count -> Int4,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    programs (id) {
        id -> Int8,
        work_id -> Int8,
        channel_id -> Int8,
        episode_number -> Nullable<Int4>,
        started_at -> Timestamptz,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    reviews (id) {
        id -> Int8,
        user_id -> Int8,
        work_id -> Int8,
        title -> Nullable<Varchar>,
        body -> Text,
        rating_animation_state -> Nullable<Varchar>,
        rating_music_state -> Nullable<Varchar>,
        rating_story_state -> Nullable<Varchar>,
        rating_character_state -> Nullable<Varchar>,
        rating_overall_state -> Varchar,
        locale -> Varchar,
        published -> Bool,
        impressions_count -> Int4,
        modified_at -> Nullable<Timestamptz>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    edit_requests (id) {
        id -> Int8,
        user_id -> Int8,
        work_id -> Int8,
        proposal -> Jsonb,
        comment -> Nullable<Text>,
        status -> Varchar,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    share_jobs (id) {
        id -> Int8,
        user_id -> Int8,
        review_id -> Int8,
        provider -> Varchar,
        status -> Varchar,
        attempts -> Int4,
        last_error -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
        finished_at -> Nullable<Timestamptz>,
    }
}

// Foreign key relationships
diesel::joinable!(user_settings -> users (user_id));
diesel::joinable!(programs -> works (work_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(reviews -> works (work_id));
diesel::joinable!(edit_requests -> users (user_id));
diesel::joinable!(edit_requests -> works (work_id));
diesel::joinable!(share_jobs -> users (user_id));
diesel::joinable!(share_jobs -> reviews (review_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_settings,
    works,
    programs,
    reviews,
    edit_requests,
    share_jobs,
);
