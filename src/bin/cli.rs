use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use tablero_authz::authz::{
    can_manage, fallback_decision, grant_map, Action, HttpPolicyStore, PolicyStore, Resource, Role,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "tablero-authz policy inspection tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the static fallback hierarchy for one role/resource/action
    Check {
        role: String,
        resource: String,
        action: String,
    },
    /// Print the full static grant matrix for a role
    Matrix { role: String },
    /// Check role-management precedence between two roles
    CanManage { manager: String, target: String },
    /// Probe the configured remote policy endpoint
    Probe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Try to load env from CWD; when running in Docker the binary CWD may differ,
    // so fall back to the crate-local `.env` using CARGO_MANIFEST_DIR.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            role,
            resource,
            action,
        } => {
            let role = Role::normalize(Some(&role));
            let resource = parse_resource(&resource)?;
            let action = parse_action(&action)?;

            let verdict = if fallback_decision(role, resource, action) {
                "allowed"
            } else {
                "denied"
            };
            println!("{} {} {} -> {}", role, action, resource, verdict);
        }
        Commands::Matrix { role } => {
            let role = Role::normalize(Some(&role));

            println!("{:<20} {}", "Resource", "Actions");
            for (resource, actions) in grant_map(role) {
                let actions = actions
                    .iter()
                    .map(|action| action.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{:<20} {}", resource.as_str(), actions);
            }
        }
        Commands::CanManage { manager, target } => {
            let manager = Role::normalize(Some(&manager));
            let target = Role::normalize(Some(&target));

            let verdict = if can_manage(manager, target) {
                "allowed"
            } else {
                "denied"
            };
            println!("{} manage {} -> {}", manager, target, verdict);
        }
        Commands::Probe => {
            let store = HttpPolicyStore::from_env()?.context("POLICY_RPC_URL not set")?;
            store
                .probe()
                .await
                .context("policy endpoint unavailable")?;
            println!("policy endpoint reachable");
        }
    }

    Ok(())
}

fn parse_resource(raw: &str) -> anyhow::Result<Resource> {
    raw.parse::<Resource>()
        .ok()
        .with_context(|| format!("unknown resource {:?}", raw))
}

fn parse_action(raw: &str) -> anyhow::Result<Action> {
    raw.parse::<Action>()
        .ok()
        .with_context(|| format!("unknown action {:?}", raw))
}
