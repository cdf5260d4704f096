pub mod form_service;

pub use form_service::{FormMatchingService, MatchResult, ServiceError};
