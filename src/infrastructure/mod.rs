//! Infrastructure layer - External service implementations

pub mod cache;
pub mod inference;
pub mod logging;
pub mod observability;
pub mod services;
