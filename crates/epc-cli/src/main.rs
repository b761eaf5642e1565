use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "epc", version, about = "Energy / Purpose / Connection scoring CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show scores, burnout and live effects
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Set initial scores
    Onboard {
        #[command(subcommand)]
        action: commands::onboard::OnboardAction,
    },
    /// Run the hourly decay and tail fade check
    Tick {
        #[arg(long)]
        json: bool,
    },
    /// Wellness tools
    Tool {
        #[command(subcommand)]
        action: commands::tool::ToolAction,
    },
    /// Daily activity readings
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Hourly burnout history
    History {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Delete every stored score, effect and usage record
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Status { json } => commands::status::run(json),
        Commands::Onboard { action } => commands::onboard::run(action),
        Commands::Tick { json } => commands::status::tick(json),
        Commands::Tool { action } => commands::tool::run(action),
        Commands::Activity { action } => commands::activity::run(action),
        Commands::History { json } => commands::history::run(json),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
