//! CLI entry point for the semantic movie search service.
//!
//! Provides commands for initializing configuration, auditing the catalog,
//! running one-shot searches, and serving search over HTTP.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use plotfind::io::{ExitCode, JsonResponse, OutputFormat};
use plotfind::vector::FastEmbedGenerator;
use plotfind::{
    Catalog, EmbeddingGenerator, SearchError, SearchService, Settings, VectorDimension,
};
use std::path::PathBuf;
use std::sync::Arc;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic movie search over precomputed plot embeddings
#[derive(Parser)]
#[command(
    name = "plotfind",
    version = env!("CARGO_PKG_VERSION"),
    about = "Semantic movie search",
    long_about = "Search a movie catalog by plot description, using precomputed plot embeddings.",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .plotfind directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Audit the catalog's raw embedding column
    #[command(
        about = "Report vector dimensions found in the catalog",
        after_help = "Examples:\n  plotfind check\n  plotfind check data/movies.csv --json"
    )]
    Check {
        /// Catalog CSV to audit (defaults to catalog_path from settings)
        path: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the catalog by plot description
    #[command(
        about = "Find the movies whose plots best match a prompt",
        after_help = "Examples:\n  plotfind search \"a heist that goes wrong\"\n  plotfind search \"doomed romance at sea\" --limit 5 --json"
    )]
    Search {
        /// Plot description to search for
        prompt: String,

        /// Number of results to return (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .plotfind/settings.toml")]
    Config,

    /// Start HTTP search server
    #[cfg(feature = "http-server")]
    #[command(
        about = "Serve search over HTTP",
        after_help = "Examples:\n  plotfind serve\n  plotfind serve --bind 0.0.0.0:3000\n\nEndpoints:\n  POST /search {\"prompt\": \"...\", \"k\": 3}\n  GET  /health"
    )]
    Serve {
        /// Bind address for the HTTP server (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Entry point with tokio async runtime.
///
/// Handles config initialization and command dispatch. The search service
/// is built fresh per invocation; only `serve` keeps it alive.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let config = if let Some(config_path) = &cli.config {
        Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(i32::from(ExitCode::ConfigError));
        })
    } else {
        Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        })
    };

    plotfind::config::set_global_debug(config.debug);
    plotfind::debug_print!(
        "Configuration loaded: catalog at {}, dimension {}",
        config.catalog_path.display(),
        config.embedding.dimension
    );

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => {
            let config_path = PathBuf::from(".plotfind/settings.toml");

            if config_path.exists() && !force {
                eprintln!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                eprintln!("Use --force to overwrite");
                std::process::exit(i32::from(ExitCode::GeneralError));
            }

            match Settings::init_config_file(force) {
                Ok(path) => {
                    println!("Created configuration file at: {}", path.display());
                    println!("Edit this file to customize your settings.");
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(i32::from(ExitCode::GeneralError));
                }
            }
        }

        Commands::Config => {
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            match toml::to_string_pretty(&config) {
                Ok(toml_str) => println!("{toml_str}"),
                Err(e) => eprintln!("Error displaying config: {e}"),
            }
        }

        Commands::Check { path, json } => {
            let code = run_check(&config, path, OutputFormat::from_json_flag(json));
            std::process::exit(i32::from(code));
        }

        Commands::Search {
            prompt,
            limit,
            json,
        } => {
            let k = limit.unwrap_or(config.search.default_limit);
            let code = run_search(&config, &prompt, k, OutputFormat::from_json_flag(json));
            std::process::exit(i32::from(code));
        }

        #[cfg(feature = "http-server")]
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let service = match build_service(&config) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(i32::from(ExitCode::from_error(&e)));
                }
            };
            if let Err(e) =
                plotfind::server::serve_http(service, config.search.default_limit, bind).await
            {
                eprintln!("Server error: {e}");
                std::process::exit(i32::from(ExitCode::GeneralError));
            }
        }
    }
}

/// Load the catalog and audit its vector column.
fn run_check(config: &Settings, path: Option<PathBuf>, format: OutputFormat) -> ExitCode {
    let catalog_path = path.unwrap_or_else(|| config.catalog_path.clone());

    let dimension = match VectorDimension::new(config.embedding.dimension) {
        Ok(dim) => dim,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::ConfigError;
        }
    };

    let catalog = match Catalog::load(&catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            report_error(&e, format);
            return ExitCode::from_error(&e);
        }
    };

    let audit = catalog.audit(dimension);

    if format.is_json() {
        match serde_json::to_string_pretty(&JsonResponse::success(&audit)) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error serializing audit: {e}");
                return ExitCode::GeneralError;
            }
        }
        return ExitCode::Success;
    }

    println!(
        "Audited {} rows against target dimension {}",
        audit.rows, audit.target_dimension
    );
    println!("\nVector lengths found:");
    for (length, count) in &audit.length_counts {
        if *length == 0 {
            println!("  missing/unparsable: {count} rows");
        } else {
            println!("  {length} dimensions: {count} rows");
        }
    }

    if audit.is_clean() {
        println!("\nCatalog is clean: every row matches the target dimension.");
    } else {
        println!("\nRows needing recovery:");
        for anomaly in &audit.anomalies {
            println!(
                "  row {} ({}): {}",
                anomaly.position, anomaly.title, anomaly.reason
            );
        }
    }

    ExitCode::Success
}

/// Build the search service and run a one-shot query.
fn run_search(config: &Settings, prompt: &str, k: usize, format: OutputFormat) -> ExitCode {
    let service = match build_service(config) {
        Ok(service) => service,
        Err(e) => {
            report_error(&e, format);
            return ExitCode::from_error(&e);
        }
    };

    let results = match service.search(prompt, k) {
        Ok(results) => results,
        Err(e) => {
            report_error(&e, format);
            return ExitCode::from_error(&e);
        }
    };

    if format.is_json() {
        let response = if results.is_empty() {
            JsonResponse::not_found(prompt)
        } else {
            // Re-wrap through Value so both arms share a type
            match serde_json::to_value(&results) {
                Ok(value) => JsonResponse::success(value),
                Err(e) => {
                    eprintln!("Error serializing results: {e}");
                    return ExitCode::GeneralError;
                }
            }
        };
        match serde_json::to_string_pretty(&response) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error serializing response: {e}");
                return ExitCode::GeneralError;
            }
        }
        return ExitCode::from_search_results(&results);
    }

    if results.is_empty() {
        println!("No results for '{prompt}'");
        return ExitCode::NotFound;
    }

    println!("Top {} matches for '{prompt}':\n", results.len());
    for (rank, item) in results.iter().enumerate() {
        let year = item
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "unknown year".to_string());
        println!(
            "{}. {} ({year}, {}) [distance {:.4}]",
            rank + 1,
            item.title,
            item.language,
            item.distance
        );
        println!("   {}\n", item.synopsis);
    }

    ExitCode::from_search_results(&results)
}

/// Print an error in the requested format.
fn report_error(error: &SearchError, format: OutputFormat) {
    if format.is_json() {
        match serde_json::to_string_pretty(&JsonResponse::from_error(error)) {
            Ok(output) => println!("{output}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    } else {
        eprintln!("Error: {error}");
        for suggestion in error.recovery_suggestions() {
            eprintln!("Suggestion: {suggestion}");
        }
    }
}

/// Load catalog, initialize the embedder, and build the service.
fn build_service(config: &Settings) -> Result<SearchService, SearchError> {
    let dimension = VectorDimension::new(config.embedding.dimension)?;

    let catalog = Catalog::load(&config.catalog_path)?;
    eprintln!(
        "Loaded catalog with {} entries from {}",
        catalog.len(),
        config.catalog_path.display()
    );

    let embedder = FastEmbedGenerator::new(&config.embedding.model)?;
    if embedder.dimension() != dimension {
        return Err(SearchError::Config {
            reason: format!(
                "embedding.dimension is {} but model '{}' produces {} dimensions",
                dimension,
                config.embedding.model,
                embedder.dimension()
            ),
        });
    }

    SearchService::build(catalog, Arc::new(embedder), dimension)
}
