//! Issuewatch CLI - stale-issue sweeper and summary dashboard

use clap::{Parser, Subcommand};
use issuewatch::config;
use issuewatch::issue::Severity;
use issuewatch::report::Reporter;
use issuewatch::store::{IssueStore, StoreHandle};
use issuewatch::sweep::Sweeper;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "issuewatch")]
#[command(version = "0.1.0")]
#[command(about = "Issue maintenance service - auto-resolves stale issues and reports summaries")]
#[command(long_about = r#"
Issuewatch keeps an issue table tidy and observable:
  • Periodically auto-resolves low-severity issues older than a threshold
  • Aggregates issue counts by status and severity
  • Serves the summary as JSON and as an HTML dashboard

Example usage:
  issuewatch serve --database issues.db --port 8080
  issuewatch sweep --database issues.db
  issuewatch summary --database issues.db --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to issuewatch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server and the background sweep
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Run one sweep pass and print the number of issues resolved
    Sweep {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Staleness threshold in seconds
        #[arg(long)]
        stale_after: Option<u64>,
    },

    /// Print the issue summary
    Summary {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Populate the database with sample issues for local runs
    Seed {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Number of issues to insert
        #[arg(long, default_value = "12")]
        count: u64,
    },

    /// Write a starter config file
    Init {
        /// Database path to record in the config
        #[arg(short, long, default_value = "issues.db")]
        database: String,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Serve { port, database } => {
            let database = config::resolve_database(database.as_deref(), Some(&file_config));
            if let Some(db) = &database {
                config::ensure_db_dir(db)?;
            }
            let port = port.unwrap_or_else(|| file_config.port());

            let handle = Arc::new(StoreHandle::new(database));

            let sweeper = Sweeper::new(
                handle.clone(),
                file_config.stale_after(),
                file_config.sweep_interval(),
            );
            tokio::spawn(sweeper.run());
            tracing::info!(
                "sweep scheduled every {}s (threshold {}s)",
                file_config.sweep_interval().as_secs(),
                file_config.stale_after().as_secs()
            );

            issuewatch::server::start_server(port, handle).await?;
        }

        Commands::Sweep { database, stale_after } => {
            let database = config::resolve_database(database.as_deref(), Some(&file_config));
            let handle = Arc::new(StoreHandle::new(database));
            let stale_after = stale_after
                .map(Duration::from_secs)
                .unwrap_or_else(|| file_config.stale_after());

            let sweeper = Sweeper::new(handle, stale_after, file_config.sweep_interval());
            let count = sweeper.run_once().await?;
            println!(
                "✅ Auto-resolved {} stale low-severity issues older than {}s",
                count,
                stale_after.as_secs()
            );
        }

        Commands::Summary { database, format } => {
            let database = config::resolve_database(database.as_deref(), Some(&file_config));
            let reporter = Reporter::new(Arc::new(StoreHandle::new(database)));
            let summary = reporter.run().await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("📊 Issue Summary");
                println!("------------------------------------");
                println!("  Total issues:      {}", summary.total_issues);
                println!("  Open issues:       {}", summary.open_issues);
                println!("  Resolved issues:   {}", summary.resolved_issues);
                println!("  High-severity open: {}", summary.high_severity_open);
            }
        }

        Commands::Seed { database, count } => {
            let database = config::resolve_database(database.as_deref(), Some(&file_config))
                .ok_or_else(|| anyhow::anyhow!("no database path configured"))?;
            config::ensure_db_dir(&database)?;

            let store = IssueStore::open(&database)?;
            let severities = [Severity::Low, Severity::Medium, Severity::High];
            for i in 0..count {
                let severity = severities[(i % 3) as usize];
                let resolved = i % 4 == 0;
                let age = Duration::from_secs(i * 90);
                store.insert_issue(severity, resolved, age)?;
            }

            println!(
                "🌱 Seeded {} issues into {:?} ({} total)",
                count,
                database,
                store.count_issues()?
            );
        }

        Commands::Init { database, force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let new_config = config::IssuewatchConfig {
                database: Some(database),
                ..Default::default()
            };
            config::write_config(&path, &new_config, force)?;
            println!("✅ Wrote config to {:?}", path);
        }
    }

    Ok(())
}
