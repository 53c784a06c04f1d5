use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pgup::commands;
use pgup::config;
use pgup::constants::CONFIG_FILENAME;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "pgup", author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct StatusArgs {
    #[command(flatten)]
    connection_args: config::ConnectionArgs,

    #[command(flatten)]
    migrations_args: config::MigrationsArgs,
}

#[derive(Parser)]
struct ApplyArgs {
    /// Create the changelog table first if it does not exist
    #[arg(long)]
    create_changelog: bool,

    #[command(flatten)]
    connection_args: config::ConnectionArgs,

    #[command(flatten)]
    migrations_args: config::MigrationsArgs,
}

#[derive(Parser)]
struct InitArgs {
    #[command(flatten)]
    connection_args: config::ConnectionArgs,

    #[command(flatten)]
    migrations_args: config::MigrationsArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Apply pending migrations in version order
    Apply(ApplyArgs),

    /// Create the changelog table
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    run_main(cli).await
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let file_config = config::load_config(&cli.config_file)?;

    match cli.command {
        Commands::Status(args) => {
            let config = resolve_config(file_config, args.connection_args, args.migrations_args)?;
            commands::cmd_status(&config).await
        }
        Commands::Apply(args) => {
            let config = resolve_config(file_config, args.connection_args, args.migrations_args)?;
            commands::cmd_apply(&config, args.create_changelog).await?;
            Ok(())
        }
        Commands::Init(args) => {
            let config = resolve_config(file_config, args.connection_args, args.migrations_args)?;
            commands::cmd_init(&config).await
        }
    }
}

fn resolve_config(
    file_config: config::ConfigInput,
    connection_args: config::ConnectionArgs,
    migrations_args: config::MigrationsArgs,
) -> Result<config::Config> {
    let cli_config = config::ConfigInput {
        connection: Some(connection_args.into()),
        migrations: Some(migrations_args.into()),
    };

    config::ConfigBuilder::new()
        .with_file(file_config)
        .with_cli_args(cli_config)
        .resolve()
}
