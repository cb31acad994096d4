use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{optimize::OptimizeArgs, reoptimize::ReoptimizeArgs, schema::SchemaArgs};

mod config;
mod file_utils;
mod optimize;
mod parsers;
mod reoptimize;
mod schema;
mod summary;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plans routes for a request file
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Re-plans an optimized plan under traffic events
    Reoptimize {
        #[command(flatten)]
        args: ReoptimizeArgs,
    },
    /// Prints the JSON schema of the request
    Schema {
        #[command(flatten)]
        args: SchemaArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize { args } => optimize::run(args).await?,
        Commands::Reoptimize { args } => reoptimize::run(args).await?,
        Commands::Schema { args } => schema::run(args)?,
    }

    Ok(())
}
