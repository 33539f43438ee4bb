//! ERP paging CLI
//!
//! Pages a dataset through the same facade the list views use, either
//! straight from the database or from a JSON file, and prints the result.
//!
//! ```sh
//! # First page of a table, default config (~/.config/erp-paging/config.toml)
//! erp-paging --dataset projetos
//!
//! # Filtered, searched and sorted
//! erp-paging --dataset projetos --filter status=ativo --search nome=galp \
//!            --order-by data_inicio --desc --page 2 --page-size 25
//!
//! # Page an exported JSON array in memory
//! erp-paging --local projetos.json --order-by valor
//!
//! # Validate config and exit
//! erp-paging --check
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};
use tracing::{error, info};

use erp_paging::config::AppConfig;
use erp_paging::logging::init_tracing;
use erp_paging::{
    init_database, LocalPaginator, PagerView, PaginationFacade, Paginator, QueryDescriptor,
    RemotePaginator, SearchSpec, SeaOrmRangeStore,
};

/// Page an ERP dataset from the database or a JSON file.
#[derive(Parser, Debug)]
#[command(
    name = "erp-paging",
    version,
    about = "Page, filter, search and sort ERP list data",
    long_about = "Runs one list query through the pagination facade and prints \
                  the page as JSON.\n\n\
                  Default config: ~/.config/erp-paging/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ERP_PAGING_CONFIG")]
    config: Option<PathBuf>,

    /// Table to page in remote mode.
    #[arg(short, long, default_value = "projetos")]
    dataset: String,

    /// Zero-based page index.
    #[arg(short, long, default_value_t = 0)]
    page: i64,

    /// Rows per page. Defaults to paging.default_page_size.
    #[arg(long)]
    page_size: Option<u64>,

    /// Sort field, snake_case.
    #[arg(long, default_value = "created_at")]
    order_by: String,

    /// Sort descending.
    #[arg(long)]
    desc: bool,

    /// Equality filter `field=value`. Repeatable. Values parse as JSON
    /// when they can, otherwise as text.
    #[arg(short, long = "filter", value_parser = parse_pair)]
    filters: Vec<(String, String)>,

    /// Substring search `field=term`.
    #[arg(short, long, value_parser = parse_pair)]
    search: Option<(String, String)>,

    /// Page a JSON array of objects in memory instead of the database.
    #[arg(long)]
    local: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field=value, got `{raw}`")),
    }
}

fn filter_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(erp_paging::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Database    : {}", config.database.url);
        println!(
            "   Page size   : {} (max {})",
            config.paging.default_page_size, config.paging.max_page_size
        );
        println!("   Wildcards   : {:?}", config.paging.wildcards);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Build the query ────────────────────────────────────────
    let page_size = config.paging.page_size(cli.page_size);
    let filters: BTreeMap<String, Value> = cli
        .filters
        .iter()
        .map(|(field, value)| (field.clone(), filter_value(value)))
        .collect();
    let search = cli
        .search
        .as_ref()
        .map(|(field, term)| SearchSpec::new(field.clone(), term.clone()));

    let query = QueryDescriptor::new(cli.dataset.clone(), page_size)?
        .with_order(cli.order_by.clone(), !cli.desc)
        .with_filters(filters)
        .with_search(search);

    // ── Pick the data source ───────────────────────────────────
    let paginator: Arc<dyn Paginator> = match cli.local {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)?;
            let records: Vec<Value> = serde_json::from_str(&text)?;
            info!("Loaded {} records from {}", records.len(), path.display());
            Arc::new(
                LocalPaginator::from_serializable(&records)?
                    .with_wildcards(config.paging.wildcard_set()),
            )
        }
        None => {
            let db = init_database(&config.database).await?;
            Arc::new(
                RemotePaginator::new(Arc::new(SeaOrmRangeStore::new(db)))
                    .with_wildcards(config.paging.wildcard_set())
                    .with_timeout(config.paging.remote_timeout()),
            )
        }
    };

    // ── Run it through the facade ──────────────────────────────
    let facade = PaginationFacade::new(paginator, query);
    facade.load().await;
    if cli.page > 0 && !facade.go_to_page(cli.page).await {
        error!(
            "Page {} is out of range ({} pages), showing page 0",
            cli.page,
            facade.total_pages()
        );
    }

    let snapshot = facade.snapshot();
    let pager = PagerView::from(&snapshot);
    let output = json!({
        "mode": facade.mode(),
        "snapshot": snapshot,
        "showing": pager.showing().map(|range| range.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(message) = snapshot.error {
        return Err(message.into());
    }
    Ok(())
}
