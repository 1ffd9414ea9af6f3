use std::sync::Arc;
use tracing::info;

use crate::database::models::{NewOrganization, Organization};
use crate::database::store::TenantStore;
use crate::database::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Organization already exists: {0}")]
    AlreadyExists(String),
    #[error("Organization not found: {0}")]
    NotFound(String),
    #[error("Invalid organization slug: {0}")]
    InvalidSlug(String),
    #[error("Invalid organization name: {0}")]
    InvalidName(String),
}

/// Organizations provisioned by `org seed`
pub const DEMO_ORGANIZATIONS: [(&str, &str); 2] = [("acme", "Acme Corp"), ("globex", "Globex")];

/// Pairs each slug with its demo display name, falling back to the slug.
pub fn seed_pairs<S: AsRef<str>>(slugs: &[S]) -> Vec<(String, String)> {
    slugs
        .iter()
        .map(|slug| {
            let slug = slug.as_ref();
            let name = DEMO_ORGANIZATIONS
                .iter()
                .find(|(demo, _)| *demo == slug)
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| slug.to_string());
            (slug.to_string(), name)
        })
        .collect()
}

/// Administrative provisioning of organizations. Not reachable from the
/// HTTP API.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn TenantStore>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new: NewOrganization) -> Result<Organization, OrganizationError> {
        validate_slug(&new.slug)?;
        if new.name.trim().is_empty() {
            return Err(OrganizationError::InvalidName(
                "name must not be blank".to_string(),
            ));
        }

        let slug = new.slug.clone();
        let org = self.store.insert_organization(new).await.map_err(|e| match e {
            StoreError::Conflict(_) => OrganizationError::AlreadyExists(slug),
            other => other.into(),
        })?;

        info!("Provisioned organization '{}' ({})", org.slug, org.id);
        Ok(org)
    }

    pub async fn list(&self) -> Result<Vec<Organization>, OrganizationError> {
        Ok(self.store.list_organizations().await?)
    }

    pub async fn show(&self, slug: &str) -> Result<Organization, OrganizationError> {
        self.store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| OrganizationError::NotFound(slug.to_string()))
    }

    /// Provision each slug that does not exist yet; returns the ones created
    pub async fn ensure(&self, orgs: &[(String, String)]) -> Result<Vec<Organization>, OrganizationError> {
        let mut created = Vec::new();
        for (slug, name) in orgs {
            if self.store.find_by_slug(slug).await?.is_some() {
                continue;
            }
            let org = self
                .create(NewOrganization {
                    slug: slug.clone(),
                    name: name.clone(),
                    email: format!("admin@{}.example", slug),
                })
                .await?;
            created.push(org);
        }
        Ok(created)
    }
}

/// Slugs travel in a header, so keep them to lowercase ASCII letters,
/// digits and inner hyphens.
pub fn validate_slug(slug: &str) -> Result<(), OrganizationError> {
    if slug.len() < 2 {
        return Err(OrganizationError::InvalidSlug(
            "Slug must be at least 2 characters".to_string(),
        ));
    }

    if slug.len() > 50 {
        return Err(OrganizationError::InvalidSlug(
            "Slug must be at most 50 characters".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(OrganizationError::InvalidSlug(
            "Slug can only contain lowercase letters, digits, and hyphens".to_string(),
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(OrganizationError::InvalidSlug(
            "Slug cannot start or end with a hyphen".to_string(),
        ));
    }

    Ok(())
}
