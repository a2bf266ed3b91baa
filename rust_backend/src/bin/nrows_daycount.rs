//! NROWS order daycount command line tool
//!
//! Loads one or more tab-separated order exports or saved orders web pages,
//! clips every order to an analysis window and prints or saves the
//! aggregated day counts.
//!
//! # Usage
//!
//! ```bash
//! # Coarse totals (AT / ADT / IDTT) for calendar year 2024, printed to the console
//! nrows-daycount -i nrows_data.tsv -s 20240101 -e 20241231 -d
//!
//! # Per-person totals from two exports, written to a new file
//! nrows-daycount -i q1.tsv -i q2.tsv -t per-person-total -o totals.tsv
//!
//! # Read the saved orders page and keep its table as a TSV export
//! nrows-daycount --html orders.html --save-tsv nrows_data.tsv -w a -d
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nrows_daycount::algorithms::{AggregationMode, UnmappedPolicy};
use nrows_daycount::config::{CliOverrides, DaycountConfig};
use nrows_daycount::io::{write_report, OrderLoader, OrderSource, ReportTable, WriteMode};
use nrows_daycount::services::{run_daycount, DaycountRequest};

fn cli() -> Command {
    Command::new("nrows-daycount")
        .version(clap::crate_version!())
        .about("Counts days on personnel orders within a date window")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Orders export in TSV format; repeat to merge several exports")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .value_name("FILE")
                .help("Saved orders web page; repeat to merge several pages")
                .action(ArgAction::Append),
        )
        .group(
            ArgGroup::new("sources")
                .args(["input", "html"])
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the result to this TSV file"),
        )
        .arg(
            Arg::new("save_tsv")
                .long("save-tsv")
                .value_name("FILE")
                .help("Also save the cleaned, merged orders table as TSV"),
        )
        .arg(
            Arg::new("write_mode")
                .short('w')
                .long("write-mode")
                .value_name("MODE")
                .value_parser(["a", "w", "x"])
                .help("a = append or create, w = overwrite, x = fail if the file exists (default)"),
        )
        .arg(
            Arg::new("start_date")
                .short('s')
                .long("start-date")
                .value_name("YYYYMMDD")
                .help("Window start, defaults to 19700101"),
        )
        .arg(
            Arg::new("end_date")
                .short('e')
                .long("end-date")
                .value_name("YYYYMMDD")
                .help("Window end, defaults to today"),
        )
        .arg(
            Arg::new("type_aggregation")
                .short('t')
                .long("type-aggregation")
                .value_name("MODE")
                .help(
                    "coarse (default), fine, per-person-by-type, per-person-total, \
                     grand-total or passthrough",
                ),
        )
        .arg(
            Arg::new("unmapped")
                .long("unmapped")
                .value_name("POLICY")
                .value_parser(["error", "unknown"])
                .help(
                    "Order types outside AT/AD/ID in coarse mode: \
                     fail (error) or count as UNKNOWN",
                ),
        )
        .arg(
            Arg::new("include_cancelled")
                .long("include-cancelled")
                .action(ArgAction::SetTrue)
                .help("Keep orders with status CANCEL"),
        )
        .arg(
            Arg::new("dedupe")
                .long("dedupe")
                .action(ArgAction::SetTrue)
                .help("Drop rows repeated verbatim within or across exports"),
        )
        .arg(
            Arg::new("display")
                .short('d')
                .long("display")
                .action(ArgAction::SetTrue)
                .help("Print the result to the console"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the result as JSON (implies --display)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML file with run defaults (daycount.toml is used if present)"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<DaycountConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => DaycountConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path)),
        None => Ok(DaycountConfig::from_default_location()?.unwrap_or_default()),
    }
}

fn parse_token<T>(matches: &ArgMatches, id: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .get_one::<String>(id)
        .map(|token| token.parse::<T>())
        .transpose()
        .with_context(|| format!("Invalid value for --{}", id.replace('_', "-")))
}

fn cli_overrides(matches: &ArgMatches) -> Result<CliOverrides> {
    Ok(CliOverrides {
        start: matches.get_one::<String>("start_date").cloned(),
        end: matches.get_one::<String>("end_date").cloned(),
        mode: parse_token::<AggregationMode>(matches, "type_aggregation")?,
        unmapped: parse_token::<UnmappedPolicy>(matches, "unmapped")?,
        include_cancelled: matches.get_flag("include_cancelled"),
        remove_duplicates: matches.get_flag("dedupe"),
        output: matches.get_one::<String>("output").map(PathBuf::from),
        save_tsv: matches.get_one::<String>("save_tsv").map(PathBuf::from),
        write_mode: parse_token::<WriteMode>(matches, "write_mode")?,
        display: matches.get_flag("display"),
    })
}

fn sources(matches: &ArgMatches) -> Vec<OrderSource> {
    let paths = |id: &str| -> Vec<PathBuf> {
        matches
            .get_many::<String>(id)
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default()
    };
    let mut sources: Vec<OrderSource> =
        paths("input").into_iter().map(OrderSource::Tsv).collect();
    sources.extend(paths("html").into_iter().map(OrderSource::Html));
    sources
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?.merge_cli(cli_overrides(&matches)?);

    let today = Local::now().date_naive();
    let request = DaycountRequest::from_bounds(
        config.window.start.as_deref(),
        config.window.end.as_deref(),
        today,
        config.aggregation.mode,
        config.aggregation.unmapped,
    )
    .context("Invalid analysis window")?;

    let loaded = OrderLoader::load_sources(&sources(&matches), config.ingest_options())
        .context("Failed to load orders")?;
    let write_mode = config.output.write_mode;

    if let Some(path) = &config.output.save_tsv {
        let orders = ReportTable::from_orders(&loaded.orders, &loaded.columns);
        write_report(path, &orders, write_mode)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let outcome = run_daycount(&loaded.orders, &request)?;
    let table = ReportTable::from_aggregate(&outcome.aggregate, &loaded.columns);

    let output = config.output.path.as_ref();
    if let Some(path) = output {
        write_report(path, &table, write_mode)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let json = matches.get_flag("json");
    let display = json || config.output.display;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if display {
        print!("{}", table.to_aligned_string());
    }

    if output.is_none() && config.output.save_tsv.is_none() && !display {
        tracing::warn!("No output requested; pass -o FILE to save or -d to print the result");
    }

    Ok(())
}
