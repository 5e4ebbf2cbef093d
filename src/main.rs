use clap::{Parser, ValueEnum};
use magento_filter_bag::config::FilterBagConfig;
use magento_filter_bag::filter::date_format::parse_date;
use magento_filter_bag::{logging, query, AppResult};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Query,
}

#[derive(Parser, Debug)]
#[command(name = "magento-filter-bag")]
#[command(about = "Build Magento API filters from a configuration file")]
struct Args {
    /// Configuration file path (default: filters.yaml)
    #[arg(short, long, default_value = "filters.yaml")]
    config: String,

    /// Only fetch entities with an id greater than this one
    #[arg(long)]
    last_id: Option<i64>,

    /// Only fetch entities changed since this date
    #[arg(long)]
    since: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing default config file means an empty bag
    let config = if args.config == "filters.yaml" && !Path::new("filters.yaml").exists() {
        FilterBagConfig::default()
    } else {
        FilterBagConfig::load_from_file(&args.config)?
    };

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init(level)?;

    println!("{}", run(&args, &config)?);
    Ok(())
}

fn run(args: &Args, config: &FilterBagConfig) -> AppResult<String> {
    let mut bag = config.build_bag();

    if let Some(last_id) = args.last_id {
        bag.add_last_id_filter_for(last_id, &config.id_field_name);
    }
    if let Some(since) = &args.since {
        let date = parse_date(since)?;
        bag.add_date_filter_with_format(&config.date_field, "gteq", &date, &config.date_format);
    }

    let applied = bag.applied_filters();
    info!(
        simple = applied.filters.simple.len(),
        complex = applied.filters.complex.len(),
        "Built filters"
    );

    match args.output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&applied)?),
        OutputFormat::Query => Ok(query::to_query_string(&applied)),
    }
}
