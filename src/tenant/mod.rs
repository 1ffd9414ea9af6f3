//! Organization scoping: resolving the tenant of a request and the guard
//! every project, task and comment operation passes through.

pub mod context;
pub mod error;
pub mod ownership;
pub mod resolver;

pub use context::{require_tenant, TenantContext, TenantScope};
pub use error::{ScopeError, ScopeResult};
pub use ownership::ResourceKind;
pub use resolver::{TenantResolver, ORG_SLUG_HEADER};
