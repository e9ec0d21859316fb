//! Review platform data models.

pub mod edit_request;
pub mod program;
pub mod review;
pub mod setting;
pub mod share_job;
pub mod user;
pub mod work;
