use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tenant. The slug is the identity clients present in `X-Org-Slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Provisioning input for a new organization
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrganization {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}
