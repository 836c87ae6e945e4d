//! Observability
//!
//! Structured JSON logging of function lifecycle events.
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//!
//! ```ignore
//! use fnctl::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RollbackResolved, &[("from", "2"), ("to", "1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
