//! Typed resource operations over the [`Gateway`](crate::Gateway).
//!
//! These are thin: fixed method, path and body per operation, no client-side
//! validation. Failures have already been classified and announced by the
//! gateway when they reach the caller.

mod auth;
mod questions;
mod responses;
mod surveys;
mod users;

pub use auth::AuthApi;
pub use questions::QuestionsApi;
pub use responses::ResponsesApi;
pub use surveys::SurveysApi;
pub use users::UsersApi;
