//! Form typing and template matching.

pub mod classifier;
pub mod field_type;
pub mod matcher;
pub mod template;

pub use classifier::{classify, ValidationError};
pub use field_type::{FieldType, TypedForm};
pub use matcher::{find_best_match, templates_from_records};
pub use template::{Template, TemplateRecordError};
