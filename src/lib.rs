//! fnctl - version and alias lifecycle for a single serverless function
//!
//! Validates a function definition, deletes the function, and rolls its
//! alias back to an earlier version (or forward again) through an
//! injected [`service::FunctionService`].

pub mod cli;
pub mod functions;
pub mod observability;
pub mod service;
