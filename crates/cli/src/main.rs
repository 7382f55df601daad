use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "wemanage")]
#[command(about = "WeManageAll backend: HTTP server and database lifecycle tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(short, long, default_value = "3001")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Create the database if needed and apply the full schema
    Init,
    /// Apply one named incremental migration
    Migrate {
        /// Migration id, e.g. 0002_lists
        name: String,
    },
    /// Drop every application table (destructive, development only)
    Reset,
    /// Drop and recreate the session table (destructive recovery)
    FixSessionTable,
    /// Drop the one-intention-per-day uniqueness constraint
    RemoveIntentionConstraint,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await,
        Commands::Init => commands::init::run().await,
        Commands::Migrate { name } => commands::migrate::run(&name).await,
        Commands::Reset => commands::reset::run().await,
        Commands::FixSessionTable => commands::fix_session_table::run().await,
        Commands::RemoveIntentionConstraint => commands::remove_intention_constraint::run().await,
    };

    if let Err(err) = result {
        eprintln!("\nError: {err:#}");
        commands::print_troubleshooting();
        std::process::exit(1);
    }
    Ok(())
}
