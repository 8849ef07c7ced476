//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use finledger_core::config;
use finledger_core::guard::Route;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod app;
mod commands;
mod render;

use app::App;

#[derive(Parser)]
#[command(name = "finledger")]
#[command(version)]
#[command(about = "Terminal client for a personal finance ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with a username or email
    Login {
        /// Username or email (prompted if omitted)
        #[arg(short, long, env = "FINLEDGER_USER")]
        user: Option<String>,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Create an account and log in with it
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in and which backend is used
    Status,

    /// Browse and edit transactions
    Transactions {
        #[command(subcommand)]
        command: commands::transactions::TransactionCommands,
    },

    /// Browse and manage accounts
    Accounts {
        #[command(subcommand)]
        command: commands::accounts::AccountCommands,
    },

    /// Browse and manage categories
    Categories {
        #[command(subcommand)]
        command: commands::categories::CategoryCommands,
    },

    /// Show a month of transactions as a calendar
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },

    /// Show income, expense and balance totals
    Stats {
        /// Number of recent transactions to list
        #[arg(long, value_name = "N")]
        recent: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Store the backend API base URL in the config file
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Logs go to stderr so command output on stdout stays clean.
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands work without a backend or session.
    let command = match cli.command {
        Commands::Config { command } => return run_config(command),
        other => other,
    };

    let config = config::Config::load().context("load config")?;
    let mut app = App::open(config)?;

    match command {
        Commands::Login {
            user,
            password_stdin,
        } => commands::auth::login(&mut app, user, password_stdin).await,
        Commands::Register {
            username,
            email,
            password_stdin,
        } => commands::auth::register(&mut app, &username, &email, password_stdin).await,
        Commands::Logout => commands::auth::logout(&app),
        Commands::Status => {
            commands::auth::status(&app);
            Ok(())
        }

        Commands::Transactions { command } => {
            app.enter(Route::Transactions).await?;
            commands::transactions::run(&mut app, command).await
        }
        Commands::Accounts { command } => {
            app.enter(Route::Accounts).await?;
            commands::accounts::run(&mut app, command).await
        }
        Commands::Categories { command } => {
            app.enter(Route::Categories).await?;
            commands::categories::run(&mut app, command).await
        }
        Commands::Calendar { month } => {
            app.enter(Route::Calendar).await?;
            commands::calendar::show(&mut app, month.as_deref()).await
        }
        Commands::Stats { recent } => {
            app.enter(Route::Stats).await?;
            commands::stats::show(&mut app, recent).await
        }

        Commands::Config { command } => run_config(command),
    }
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetApiUrl { url } => commands::config::set_api_url(&url),
    }
}
