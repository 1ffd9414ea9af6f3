pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pm-admin")]
#[command(about = "Administrative tasks for the Mini PM API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Organization provisioning")]
    Org {
        #[command(subcommand)]
        cmd: commands::org::OrgCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::db::migrate(output_format).await,
        Commands::Org { cmd } => commands::org::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_org_add() {
        let cli = Cli::try_parse_from([
            "pm-admin", "org", "add", "initech", "--name", "Initech", "--json",
        ])
        .unwrap();

        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Org {
                cmd: commands::org::OrgCommands::Add { slug, name, email },
            } => {
                assert_eq!(slug, "initech");
                assert_eq!(name, "Initech");
                assert!(email.is_none());
            }
            _ => panic!("expected org add"),
        }
    }

    #[test]
    fn defaults_to_text_output() {
        let cli = Cli::try_parse_from(["pm-admin", "migrate"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn org_add_requires_name() {
        assert!(Cli::try_parse_from(["pm-admin", "org", "add", "initech"]).is_err());
    }
}
