mod categories;
mod questions;
mod quizzes;

use serde::{Serialize, Serializer};

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use super::error::ApiError;

pub type ApiResponse<T> = Result<T, ApiError>;

/// `{success: true, status: 200}`
#[derive(Serialize)]
pub struct Success {
    success: bool,
    status: u16,
}

impl Success {
    pub fn ok() -> Self {
        Self {
            success: true,
            status: 200,
        }
    }
}

/// The category a listing was taken from. A single category serializes as its
/// label, the unfiltered listing as `["All"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentCategory {
    Named(String),
    All,
}

impl Serialize for CurrentCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CurrentCategory::Named(name) => serializer.serialize_str(name),
            CurrentCategory::All => ["All"].serialize(serializer),
        }
    }
}
