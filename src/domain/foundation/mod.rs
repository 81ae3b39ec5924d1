//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::SessionId;
pub use timestamp::Timestamp;
