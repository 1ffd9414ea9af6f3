pub mod organization_service;
pub mod project_service;

pub use organization_service::{seed_pairs, OrganizationError, OrganizationService, DEMO_ORGANIZATIONS};
pub use project_service::ProjectService;
