use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::tenant::{ScopeError, TenantContext, TenantScope, ORG_SLUG_HEADER};

/// Resolves `X-Org-Slug` and stores the resulting [`TenantContext`] in the
/// request's extensions before any handler runs.
///
/// An unknown slug ends the request here with 403.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let mut values = request.headers().get_all(ORG_SLUG_HEADER).iter();
    let header = match (values.next(), values.next()) {
        (None, _) => None,
        (Some(value), None) => match value.to_str() {
            Ok(slug) => Some(slug.to_string()),
            Err(_) => {
                tracing::warn!("Rejected request with non-ASCII {} header", ORG_SLUG_HEADER);
                let slug = String::from_utf8_lossy(value.as_bytes()).into_owned();
                return Err(ScopeError::InvalidTenantHeader { slug }.into());
            }
        },
        // More than one value is ambiguous: never pick one of them
        (Some(first), Some(_)) => {
            tracing::warn!("Rejected request with repeated {} header", ORG_SLUG_HEADER);
            let slug = String::from_utf8_lossy(first.as_bytes()).into_owned();
            return Err(ScopeError::InvalidTenantHeader { slug }.into());
        }
    };

    let context = state
        .resolver
        .resolve(header.as_deref())
        .await
        .map_err(|e| {
            if let ScopeError::InvalidTenantHeader { slug } = &e {
                tracing::warn!("Tenant resolution failed: organization '{}' not found", slug);
            }
            ApiError::from(e)
        })?;

    match context.organization() {
        Some(org) => tracing::debug!("Request scoped to organization '{}' ({})", org.slug, org.id),
        None => tracing::debug!("Request has no organization context"),
    }

    // Write-once: nothing upstream may have set a context already
    if request.extensions_mut().insert(context).is_some() {
        tracing::error!("Tenant context was already set for this request");
        return Err(ApiError::internal_server_error("Tenant context already initialized"));
    }

    Ok(next.run(request).await)
}

/// The request's [`TenantContext`], as stored by [`resolve_tenant_middleware`].
///
/// Fails closed when the middleware did not run.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub TenantContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(CurrentTenant)
            .ok_or_else(|| {
                tracing::error!("Tenant context missing; is the tenant middleware installed?");
                ApiError::internal_server_error("Tenant context not initialized")
            })
    }
}

/// Handlers take `TenantScope` to run the require-tenant guard before any
/// data access.
#[async_trait]
impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentTenant(context) = CurrentTenant::from_request_parts(parts, state).await?;
        Ok(context.require()?)
    }
}
