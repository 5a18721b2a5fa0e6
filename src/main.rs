mod candidates;
mod cli;
mod config;
mod fallback;
mod prompt;
mod providers;
mod registry;
mod utils;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cli::{generate::generate_cmd, models::models_cmd, recommend::recommend_cmd, ColorMode};
use prompt::{ContactRole, DEFAULT_DURATION_MINUTES};
use registry::populated_registry;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(
    Parser, Default, Clone, Copy, ValueEnum, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "pitchgen")]
#[command(
    about = "A CLI for drafting sales-meeting talk scripts with Gemini model fallback",
    version = "0.1.0"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the config from the specified path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a talk script for a customer meeting
    Generate(GenerateArgs),
    /// Recommend services that fit a customer
    Recommend(RecommendArgs),
    /// List the models available to the configured API key
    Models(ModelsArgs),
}

/// Output formats
#[derive(
    Parser, ValueEnum, Default, Clone, Copy, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

#[derive(Parser)]
pub(crate) struct GenerateArgs {
    /// The customer company being pitched
    #[arg(long)]
    company: String,
    /// The customer's industry
    #[arg(long)]
    industry: String,
    /// The customer contact the script addresses
    #[arg(long, default_value_t = ContactRole::default())]
    role: ContactRole,
    /// The customer's current pain point
    #[arg(long)]
    pain_point: String,
    /// Meeting length in minutes
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    duration: u32,
    /// A service to pitch. Repeat the flag to pitch several
    #[arg(long, required = true)]
    service: Vec<String>,
}

#[derive(Parser)]
pub(crate) struct RecommendArgs {
    /// The customer company being pitched
    #[arg(long)]
    company: String,
    /// The customer's industry
    #[arg(long)]
    industry: String,
    /// The customer's current pain point
    #[arg(long)]
    pain_point: String,
    /// Output the listing with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
}

#[derive(Parser, Default)]
pub(crate) struct ModelsArgs {
    /// Output the listing with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let color = ColorMode::resolve_auto(cli.color);

    utils::errors::configure_color(color);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = config::read_config(cli.config);

    let registry = populated_registry(&config);

    debug!("fallback order: {}", registry.model_ids().join(", "));

    match &cli.command {
        Commands::Generate(args) => generate_cmd(&registry, args).await,
        Commands::Recommend(args) => recommend_cmd(&registry, args).await,
        Commands::Models(args) => models_cmd(&registry, args).await,
    }
}
