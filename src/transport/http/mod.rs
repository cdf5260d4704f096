pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod forms;
    pub mod health;
}

pub use router::{build_app, create_router, ApiDoc};
pub use types::AppState;
