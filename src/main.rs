/// Ledgerline main entry point
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ledgerline_common::Error;
use ledgerline_core::Product;

mod commands;

use commands::InvokeOptions;

#[derive(Debug, Parser)]
#[command(name = "ledgerline")]
#[command(author, version, about = "Call the token, credit-card and deposit contracts", long_about = None)]
struct Cli {
    /// Config file path (defaults to ./ledgerline.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `ledgerline_ethereum=debug`
    #[arg(long, global = true, env = "LEDGERLINE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the available commands
    List {
        /// Only list one product (token, card, deposit)
        product: Option<Product>,
    },

    /// Call the token contract
    Token(InvokeArgs),

    /// Call the credit-card contract
    Card(InvokeArgs),

    /// Call the deposit contract
    Deposit(InvokeArgs),

    /// Serve the form API over HTTP
    Serve {
        /// API host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// API port
        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Decimals to scale amounts by, for every product
        #[arg(long)]
        decimals: Option<u32>,
    },
}

#[derive(Debug, Args)]
struct InvokeArgs {
    /// Command name as shown by `ledgerline list`
    command: String,

    /// Arguments in order
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,

    /// Decimals to scale amounts by
    #[arg(long)]
    decimals: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Fail instead of prompting for missing arguments
    #[arg(long)]
    no_prompt: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    if let Err(err) = execute(cli).await {
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        eprintln!("error: {:#}", err);
        std::process::exit(code);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    let (product, args) = match cli.command {
        Commands::List { product } => {
            commands::list(product);
            return Ok(());
        }
        Commands::Serve { host, port, decimals } => {
            return commands::serve(config, &host, port, decimals).await;
        }
        Commands::Token(args) => (Product::Token, args),
        Commands::Card(args) => (Product::CreditCard, args),
        Commands::Deposit(args) => (Product::Deposit, args),
    };

    let options = InvokeOptions {
        decimals: args.decimals,
        json: args.json,
        no_prompt: args.no_prompt,
    };
    commands::invoke(config, product, &args.command, args.args, options).await
}

/// Logs go to stderr so stdout carries only results
fn init_tracing(level: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);

    let _ = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}
