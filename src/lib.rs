pub mod app;
pub mod authz;
pub mod docs;
pub mod errors;
pub mod jwt;
pub mod routes;

// Re-export commonly used items for tests
pub use app::{create_app, AppState};
pub use authz::{
    AccessResolver, Action, HttpPolicyStore, OfflinePolicyStore, PolicyStore, Resource, Role,
    SessionRegistry, StoreError,
};
