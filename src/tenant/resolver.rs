use std::sync::Arc;

use super::context::TenantContext;
use super::error::{ScopeError, ScopeResult};
use crate::database::store::TenantStore;

/// Request header naming the organization a request is scoped to
pub const ORG_SLUG_HEADER: &str = "x-org-slug";

/// Turns the raw `X-Org-Slug` value into a [`TenantContext`].
///
/// One lookup per call and no caching, so a renamed or removed organization
/// takes effect on the next request.
#[derive(Clone)]
pub struct TenantResolver {
    store: Arc<dyn TenantStore>,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    /// - no header, or an empty one: `Absent`
    /// - known slug: `Resolved`
    /// - unknown slug: `InvalidTenantHeader`
    pub async fn resolve(&self, header_value: Option<&str>) -> ScopeResult<TenantContext> {
        let slug = match header_value {
            Some(slug) if !slug.is_empty() => slug,
            _ => return Ok(TenantContext::Absent),
        };

        match self.store.find_by_slug(slug).await? {
            Some(org) => Ok(TenantContext::Resolved(org)),
            None => Err(ScopeError::InvalidTenantHeader {
                slug: slug.to_string(),
            }),
        }
    }
}
