use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::time::Duration;
use stroll::prelude::*;
use stroll::core::{BUILTIN_PROFILES, DEFAULT_USERS};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_LOG_FILTER: &str = "stroll=info";

#[derive(Parser, Debug)]
#[command(version, about = "Drive weighted-task behavior profiles against an HTTP target.")]
struct StrollCli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the builtin profiles.
    List,

    /// Print a profile as JSON.
    Show {
        /// Builtin profile name or path to a JSON profile.
        profile: String,
    },

    /// Run a profile and print the resulting counters.
    Run {
        /// Builtin profile name or path to a JSON profile.
        profile: String,

        #[arg(short, long, default_value_t = DEFAULT_USERS)]
        users: usize,

        #[arg(short, long, default_value = "60s", value_parser = humantime::parse_duration)]
        duration: Duration,

        /// Override the profile's host.
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let args = StrollCli::parse();
    match args.command {
        Command::List => {
            for name in BUILTIN_PROFILES {
                println!("{name}");
            }
        }
        Command::Show { profile } => {
            let profile = load_profile(&profile)?;
            println!("{}", profile.to_json()?);
        }
        Command::Run {
            profile,
            users,
            duration,
            host,
            seed,
        } => {
            let mut profile = load_profile(&profile)?;
            if let Some(host) = host {
                profile = profile.with_host(&host)?;
            }

            info!(
                "Starting {} with {users} users for {}",
                profile.name(),
                humantime::format_duration(duration)
            );

            let mut run = Run::new(profile).users(users).duration(duration);
            if let Some(seed) = seed {
                run = run.seed(seed);
            }

            let stats = run.await;
            println!("{stats}");
        }
    }

    Ok(())
}

fn load_profile(arg: &str) -> anyhow::Result<Profile> {
    if BUILTIN_PROFILES.contains(&arg) {
        return Ok(builtin(arg)?);
    }

    let path = Path::new(arg);
    if !path.exists() {
        anyhow::bail!(
            "`{arg}` is neither a builtin profile ({}) nor a file",
            BUILTIN_PROFILES.join(", ")
        );
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile from {}", path.display()))?;
    Profile::from_json(&source).with_context(|| format!("Invalid profile in {}", path.display()))
}
