//! Command line front end for the CMS policy importer.
//!
//! Two subcommands share the load-remap-emit pipeline: `generate-sql`
//! writes an idempotent SQL import script to stdout, `import` provisions
//! the same data through a running instance's admin API.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cms_policy_import_core::{
    render_sql, ConnectionConfig, PolicyIdMap, ProvisionService, RbacTemplate,
    DEFAULT_TEMPLATE_PATH,
};
use log::info;

#[derive(Parser)]
#[command(
    name = "cms-policy-import",
    version,
    about = "Provision RBAC policies and permissions into a headless CMS"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the template as an idempotent SQL import script on stdout
    GenerateSql {
        /// Path to the RBAC template file
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
    },
    /// Provision policies and permissions through the admin API
    Import {
        /// Path to the RBAC template file
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
        /// Base URL of the target instance
        #[arg(long, env = "PUBLIC_URL", default_value = "http://localhost:8055")]
        url: String,
        /// Admin account email
        #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@dev.local")]
        email: String,
        /// Admin account password
        #[arg(long, env = "ADMIN_PASSWORD", default_value = "DevPassword123!")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateSql { template } => generate_sql(&template),
        Command::Import {
            template,
            url,
            email,
            password,
        } => {
            import(
                &template,
                ConnectionConfig {
                    base_url: url,
                    email,
                    password,
                },
            )
            .await
        }
    }
}

fn generate_sql(template_path: &Path) -> anyhow::Result<()> {
    let template = RbacTemplate::load(template_path).context("Failed to load RBAC template")?;
    let ids = PolicyIdMap::mint(&template.policies);
    print!("{}", render_sql(&template, &ids));
    Ok(())
}

async fn import(template_path: &Path, config: ConnectionConfig) -> anyhow::Result<()> {
    let template = RbacTemplate::load(template_path).context("Failed to load RBAC template")?;

    let service = ProvisionService::connect(&config)
        .await
        .with_context(|| format!("Failed to authenticate against {}", config.base_url))?;

    let summary = service.import(&template).await?;
    info!("Import complete");

    println!("Import summary:");
    println!("  policies mapped:     {}", summary.policies_mapped);
    println!("  permissions created: {}", summary.permissions_created);
    println!("  permissions failed:  {}", summary.permissions_failed);
    println!();
    println!("Next: link each policy to its role under Settings -> Roles & Permissions.");
    Ok(())
}
