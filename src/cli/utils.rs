use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Organization;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a table of organizations, or a JSON array
pub fn output_organizations(output_format: OutputFormat, orgs: &[Organization]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "organizations": orgs }))?);
        }
        OutputFormat::Text => {
            if orgs.is_empty() {
                println!("No organizations provisioned");
                return Ok(());
            }

            println!("{:<6} {:<20} {:<25} {:<30} {}", "ID", "SLUG", "NAME", "EMAIL", "CREATED");
            println!("{}", "-".repeat(100));

            for org in orgs {
                println!(
                    "{:<6} {:<20} {:<25} {:<30} {}",
                    org.id,
                    org.slug,
                    org.name,
                    org.email,
                    org.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}

/// Output a single organization
pub fn output_organization(output_format: OutputFormat, org: &Organization) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(org)?);
        }
        OutputFormat::Text => {
            println!("ID:      {}", org.id);
            println!("Slug:    {}", org.slug);
            println!("Name:    {}", org.name);
            println!("Email:   {}", org.email);
            println!("Created: {}", org.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    Ok(())
}
