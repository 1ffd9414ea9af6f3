use super::error::{ScopeError, ScopeResult};
use crate::database::models::Organization;

/// Which organization, if any, the current request is scoped to.
///
/// Produced once per request by the tenant middleware and stored in the
/// request's extensions; never shared between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantContext {
    Resolved(Organization),
    Absent,
}

impl TenantContext {
    pub fn organization(&self) -> Option<&Organization> {
        match self {
            TenantContext::Resolved(org) => Some(org),
            TenantContext::Absent => None,
        }
    }

    pub fn require(&self) -> ScopeResult<TenantScope> {
        require_tenant(self)
    }
}

/// Proof that the require-tenant guard passed for this request.
///
/// There is no public constructor: every scoped store and service method
/// takes `&TenantScope`, so data access is only reachable through
/// [`require_tenant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    organization: Organization,
}

impl TenantScope {
    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    pub fn organization_id(&self) -> i64 {
        self.organization.id
    }

    pub fn slug(&self) -> &str {
        &self.organization.slug
    }
}

/// Guard run before any project, task or comment access.
pub fn require_tenant(context: &TenantContext) -> ScopeResult<TenantScope> {
    match context {
        TenantContext::Resolved(org) => Ok(TenantScope {
            organization: org.clone(),
        }),
        TenantContext::Absent => Err(ScopeError::MissingTenantContext),
    }
}
