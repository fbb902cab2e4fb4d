//! `labdesk` command-line interface

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lab_desk::{projection, Desk, DeskConfig};
use lab_records::Record;
use lab_table::{Column, SortDirection, TableEngine, ViewState};
use lab_workflow::{NodeKind, WorkTree};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let Some((command, args)) = matches.subcommand() else {
        bail!("no command given");
    };

    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    init_tracing(&config)?;

    match command {
        "view" => run_view(args, &config),
        "tree" => run_tree(args, &config),
        other => bail!("unknown command {other}"),
    }
}

fn cli() -> Command {
    Command::new("labdesk")
        .version(lab_desk::VERSION)
        .about("Lab work desk: tabular views over records and work trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("view")
                .about("Print one page of a JSON record collection")
                .arg(
                    Arg::new("records")
                        .long("records")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file holding an array of objects"),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .value_delimiter(',')
                        .help("Comma-separated field paths to show (default: every top-level field)"),
                )
                .args(common_args()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print one page of a work tree projected to orders, samples or tests")
                .arg(
                    Arg::new("tree")
                        .long("tree")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file holding an array of orders"),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("orders")
                        .value_parser(["orders", "samples", "tests"])
                        .help("Which level of the tree to list"),
                )
                .args(common_args()),
        )
}

fn common_args() -> [Arg; 6] {
    [
        Arg::new("config")
            .long("config")
            .value_parser(value_parser!(PathBuf))
            .help("TOML desk configuration"),
        Arg::new("query")
            .long("query")
            .short('q')
            .default_value("")
            .help("Case-insensitive search text"),
        Arg::new("sort")
            .long("sort")
            .help("Column key to sort by"),
        Arg::new("desc")
            .long("desc")
            .action(ArgAction::SetTrue)
            .help("Sort descending"),
        Arg::new("page")
            .long("page")
            .default_value("1")
            .value_parser(value_parser!(usize))
            .help("Page number (clamped to the last page)"),
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output the page rows as JSON"),
    ]
}

fn init_tracing(config: &DeskConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("invalid log filter {:?}", config.log_filter))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn view_state(args: &ArgMatches, config: &DeskConfig) -> Result<ViewState> {
    let mut state = ViewState::new(config.page_size)?
        .with_query(args.get_one::<String>("query").cloned().unwrap_or_default())
        .with_page(args.get_one::<usize>("page").copied().unwrap_or(1));
    if let Some(key) = args.get_one::<String>("sort") {
        let direction = if args.get_flag("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        state = state.with_sort(key.clone(), direction);
    }
    Ok(state)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_page(engine: &TableEngine, records: &[Record], state: &ViewState, json: bool) -> Result<()> {
    let view = engine.view(records, state);
    if json {
        println!("{}", serde_json::to_string_pretty(&view.rows)?);
    } else {
        print!("{}", projection::render_text(engine, &view));
    }
    Ok(())
}

fn run_view(args: &ArgMatches, config: &DeskConfig) -> Result<()> {
    let Some(path) = args.get_one::<PathBuf>("records") else {
        bail!("--records is required");
    };
    let value: serde_json::Value = serde_json::from_str(&read(path)?)
        .with_context(|| format!("parsing {}", path.display()))?;
    let records = Record::many_from_json(value)?;

    let columns = match args.get_many::<String>("columns") {
        Some(keys) => keys
            .map(|key| -> Result<Column> { Ok(Column::bound(key.as_str(), key.as_str(), key)?.sortable()) })
            .collect::<Result<Vec<_>>>()?,
        None => projection::columns_for(&records),
    };
    let engine = TableEngine::new(columns)?;
    tracing::debug!(records = records.len(), columns = engine.columns().len(), "records loaded");

    print_page(&engine, &records, &view_state(args, config)?, args.get_flag("json"))
}

fn run_tree(args: &ArgMatches, config: &DeskConfig) -> Result<()> {
    let Some(path) = args.get_one::<PathBuf>("tree") else {
        bail!("--tree is required");
    };
    let tree: WorkTree = serde_json::from_str(&read(path)?)
        .with_context(|| format!("parsing work tree {}", path.display()))?;

    let kind = match args.get_one::<String>("kind").map(String::as_str) {
        Some("samples") => NodeKind::Sample,
        Some("tests") => NodeKind::Test,
        _ => NodeKind::Order,
    };

    let desk = Desk::with_tree(config.clone(), tree)?;
    let records = desk.rows(kind);
    let engine = projection::table(kind)?;

    print_page(&engine, &records, &view_state(args, config)?, args.get_flag("json"))
}
