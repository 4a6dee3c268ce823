//! RupeeConv Binary
//!
//! Terminal front end for the INR to USD converter widget.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rupeeconv_fx::RateStrategy;
use rupeeconv_widget::command::{parse_command, Command, HELP};
use rupeeconv_widget::view::render;
use rupeeconv_widget::{Action, Converter, WidgetConfig};

/// RupeeConv CLI
#[derive(Parser, Debug)]
#[command(name = "rupeeconv")]
#[command(about = "Convert rupees, lakhs and crores to US dollars")]
struct Args {
    /// Use the fixed 82 INR per USD rate instead of fetching
    #[arg(long, global = true)]
    fixed: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one amount and print the widget
    Convert {
        /// Amount to convert
        amount: String,

        /// Unit of the amount: rupees, lakhs or crores
        #[arg(short, long)]
        unit: Option<String>,

        /// Print the conversion as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read commands from stdin (default)
    Interactive,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load configuration
    let mut config = WidgetConfig::from_env()?;
    if args.fixed {
        config.strategy = RateStrategy::Fixed;
    }

    init_tracing(&config.log_level, args.json_logs);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(strategy = %config.strategy, "Starting RupeeConv");

    let converter = Arc::new(Converter::from_config(&config)?);

    match args.command.unwrap_or(Commands::Interactive) {
        Commands::Convert { amount, unit, json } => {
            converter.mount().await;

            converter.dispatch(Action::AmountChanged(amount));
            if let Some(unit) = unit {
                converter.dispatch(Action::UnitChanged(unit));
            }
            let state = converter.dispatch(Action::ConvertRequested);

            match (&state.result, &state.notice, json) {
                (_, Some(notice), _) => {
                    eprintln!("{}", notice);
                    return Ok(ExitCode::FAILURE);
                }
                (Some(conversion), None, true) => {
                    println!("{}", serde_json::to_string_pretty(conversion)?);
                }
                _ => println!("{}", render(&state)),
            }
        }
        Commands::Interactive => run_interactive(converter).await?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_interactive(converter: Arc<Converter>) -> anyhow::Result<()> {
    let mount = converter.spawn_mount();

    println!("{}", render(&converter.state()));
    println!("\nType 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => println!("{}", render(&converter.state())),
            Command::Apply(actions) => {
                let mut state = converter.state();
                for action in actions {
                    state = converter.dispatch(action);
                }
                println!("{}", render(&state));
            }
        }
    }

    // An unfinished fetch is simply dropped.
    mount.abort();
    info!("RupeeConv stopped");
    Ok(())
}
