//! Service layer — plain async functions over a database connection.

pub mod edit_request_service;
pub mod program_service;
pub mod review_service;
pub mod share_service;
pub mod share_worker;
pub mod user_service;
pub mod work_service;

use serde::Serialize;

/// Per-field validation failures accumulated by services.
///
/// Serialized straight into 422 response bodies.
#[derive(Debug, Default, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when no errors were recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
