pub mod seed;
pub mod templates;

pub use seed::{load_seed_file, seed_templates, SeedError, SeedOutcome};
pub use templates::{
    InMemoryTemplateStore, PostgresTemplateStore, StoreError, TemplateBackend, TemplateStore,
};
