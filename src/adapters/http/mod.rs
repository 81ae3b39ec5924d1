//! HTTP surface for the turn protocol.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, StartInterviewRequest, StartInterviewResponse, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
pub use handlers::AppState;
pub use routes::router;
