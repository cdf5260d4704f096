pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{FormMatchingService, MatchResult, ServiceError};
pub use domain::form::{classify, find_best_match, FieldType, Template, TypedForm, ValidationError};
pub use infra::config::Settings;
pub use storage::{
    InMemoryTemplateStore, PostgresTemplateStore, StoreError, TemplateBackend, TemplateStore,
};
