use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use super::db::connect;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::NewOrganization;
use crate::services::{seed_pairs, OrganizationService, DEMO_ORGANIZATIONS};

#[derive(Subcommand)]
pub enum OrgCommands {
    #[command(about = "Provision a new organization")]
    Add {
        #[arg(help = "Organization slug (sent as X-Org-Slug)")]
        slug: String,

        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, help = "Contact email")]
        email: Option<String>,
    },

    #[command(about = "List organizations")]
    List,

    #[command(about = "Show one organization")]
    Show {
        #[arg(help = "Organization slug")]
        slug: String,
    },

    #[command(about = "Provision the demo organizations (acme, globex)")]
    Seed,
}

pub async fn handle(cmd: OrgCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = Arc::new(connect().await?);
    let service = OrganizationService::new(store.clone());

    let result = run(&service, cmd, output_format).await;
    store.close().await;
    result
}

async fn run(
    service: &OrganizationService,
    cmd: OrgCommands,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        OrgCommands::Add { slug, name, email } => {
            let org = service
                .create(NewOrganization {
                    slug,
                    name,
                    email: email.unwrap_or_default(),
                })
                .await?;

            output_success(
                output_format,
                &format!("Organization '{}' created with id {}", org.slug, org.id),
                Some(json!(org)),
            )
        }
        OrgCommands::List => {
            let orgs = service.list().await?;
            output_organizations(output_format, &orgs)
        }
        OrgCommands::Show { slug } => {
            let org = service.show(&slug).await?;
            output_organization(output_format, &org)
        }
        OrgCommands::Seed => {
            let slugs: Vec<&str> = DEMO_ORGANIZATIONS.iter().map(|(slug, _)| *slug).collect();
            let created = service.ensure(&seed_pairs(&slugs)).await?;

            let message = if created.is_empty() {
                "Demo organizations already provisioned".to_string()
            } else {
                format!("Provisioned {} demo organization(s)", created.len())
            };
            output_success(output_format, &message, Some(json!({ "created": created })))
        }
    }
}
