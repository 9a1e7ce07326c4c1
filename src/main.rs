use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dag_bisect::{
    config::{resolve_config_path, Config, DEFAULT_CONFIG_FILE},
    dag::{DeclarationParser, GraphBuilder},
    reports::{ReportGenerator, ReportRequest},
    types::OutputFormat,
    Dag,
};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dag-bisect")]
#[command(about = "Build a DAG from `NAME: PARENT, ...` declarations and query it")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Declarations file, one per line (defaults to stdin, `-` also means stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Configuration file path (defaults to `dag-bisect.yml` when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ancestors of a node, the node itself included
    Ancestors {
        /// Node name
        name: String,
    },

    /// Print nodes that are nobody's parent
    Leaves,

    /// Print nodes whose ancestor count most evenly splits the graph
    Bisectors,

    /// Print leaves, bisectors and optionally the ancestors of one node
    Report {
        #[arg(short, long)]
        ancestors_of: Option<String>,
    },

    /// Print node, edge, root and leaf counts
    Stats,

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config_file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Configuration decides the default log level, so load it first
    let config_path = resolve_config_path(cli.config.clone(), Path::new(DEFAULT_CONFIG_FILE));
    let config = load_config(config_path.as_ref()).await?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&log_level)?;

    let format = match &cli.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => config.output.format,
    };

    let request = match cli.command {
        Commands::Init { config_file, force } => {
            return init_config(config_file, force).await;
        }
        Commands::Ancestors { name } => ReportRequest {
            ancestors_of: Some(name),
            ..ReportRequest::default()
        },
        Commands::Leaves => ReportRequest {
            leaves: true,
            ..ReportRequest::default()
        },
        Commands::Bisectors => ReportRequest {
            bisectors: true,
            ..ReportRequest::default()
        },
        Commands::Report { ancestors_of } => ReportRequest::all(ancestors_of),
        Commands::Stats => ReportRequest {
            statistics: true,
            ..ReportRequest::default()
        },
    };

    let dag = build_dag(cli.input.as_ref(), &config).await?;
    let generator = ReportGenerator::new(config.output.separator.as_str());
    let report = generator
        .collect(&dag, &request)
        .context("Query failed")?;

    println!("{}", generator.generate(&report, format)?);
    Ok(())
}

/// Initialize tracing with the specified log level. Logs go to stderr so that
/// stdout only carries query results.
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file or use defaults, then apply environment overrides
async fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    let config = match config_path {
        Some(path) if path.exists() => {
            let mut config = Config::load_from_file(path)
                .await
                .with_context(|| format!("Failed to load configuration file: {:?}", path))?;
            config
                .apply_env_overrides()
                .context("Invalid environment override")?;
            config
        }
        Some(path) => {
            // Tracing is not initialized yet
            eprintln!("Configuration file not found: {:?}. Using defaults.", path);
            Config::load_from_env().context("Invalid environment override")?
        }
        None => Config::load_from_env().context("Invalid environment override")?,
    };

    config.validate()?;
    Ok(config)
}

async fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            info!("Reading declarations from: {:?}", path);
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read declarations from {:?}", path))
        }
        _ => {
            info!("Reading declarations from stdin");
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read declarations from stdin")?;
            Ok(content)
        }
    }
}

async fn build_dag(input: Option<&PathBuf>, config: &Config) -> Result<Dag> {
    let content = read_input(input).await?;

    let parser = DeclarationParser::new(
        Some(config.input.comment_prefix.clone()),
        config.input.skip_blank_lines,
    );
    let declarations = parser
        .parse_document(&content)
        .context("Failed to parse declarations")?;

    if declarations.is_empty() {
        warn!("No declarations found, graph is empty");
    }

    GraphBuilder::from_declarations(declarations).context("Failed to build graph")
}

/// Initialize configuration file
async fn init_config(config_file: PathBuf, force: bool) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() && !force {
        warn!("Configuration file already exists: {:?}", config_file);
        println!("Configuration file already exists: {:?} (use --force to overwrite)", config_file);
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .await
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created successfully: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);

    Ok(())
}
