// handlers/scoped/organization.rs - GET /api/organization handler

use crate::database::models::Organization;
use crate::middleware::{ApiResponse, ApiResult, CurrentTenant};

/// The organization resolved for this request, or `null` without a header.
pub async fn organization_show(CurrentTenant(context): CurrentTenant) -> ApiResult<Option<Organization>> {
    Ok(ApiResponse::success(context.organization().cloned()))
}
