/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, calling into the shared application state,
/// and returning a properly formatted response.

mod subject_handlers;
mod timetable_handlers;
mod dashboard_handlers;

// Re-export all handlers
pub use subject_handlers::*;
pub use timetable_handlers::*;
pub use dashboard_handlers::*;
