//! Binary entry point for the gindata command-line tool.
#![forbid(unsafe_code)]

mod config;
mod ui;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gindata::dataset::{load_data, separate_data, DatasetOptions, UnknownIdPolicy};
use gindata::logging::init_logging;
use gindata::{Dataset, DatasetSummary, GraphRecord};
use serde::Serialize;
use tracing::debug;

use crate::config::{parse_delimiter, CliConfig};
use crate::ui::{Theme, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "gindata",
    version,
    about = "Prepare node-attributed graph datasets for GNN training",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "GINDATA_CONFIG",
        value_name = "FILE",
        help = "Path to the CLI config file"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Tracing filter directive (RUST_LOG takes precedence)"
    )]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    #[arg(long, global = true, help = "Suppress decorations and progress output")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Load a dataset and print its summary")]
    Load(LoadArgs),
    #[command(about = "Load a dataset and print one stratified fold")]
    Split(SplitCmd),
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[arg(value_name = "DATASET", help = "Dataset name")]
    name: String,

    #[arg(long, value_name = "DIR", help = "Directory holding dataset folders")]
    data_root: Option<PathBuf>,

    #[arg(long, help = "Use node degree as the node tag")]
    degree_as_tag: bool,

    #[arg(long, value_enum, help = "Handling of edge ids missing from the feature table")]
    unknown_ids: Option<UnknownIdsArg>,

    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter, help = "Field delimiter")]
    delimiter: Option<u8>,
}

#[derive(Args, Debug)]
struct SplitCmd {
    #[command(flatten)]
    load: LoadArgs,

    #[arg(long, default_value_t = 0, help = "Shuffle seed")]
    seed: u64,

    #[arg(long, default_value_t = 0, help = "Fold index in 0..10")]
    fold: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
    Plain,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Plain => Theme::Plain,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UnknownIdsArg {
    Alias,
    Drop,
    Reject,
}

impl From<UnknownIdsArg> for UnknownIdPolicy {
    fn from(arg: UnknownIdsArg) -> Self {
        match arg {
            UnknownIdsArg::Alias => UnknownIdPolicy::Alias,
            UnknownIdsArg::Drop => UnknownIdPolicy::Drop,
            UnknownIdsArg::Reject => UnknownIdPolicy::Reject,
        }
    }
}

#[derive(Serialize)]
struct SplitReport {
    seed: u64,
    fold: usize,
    train: usize,
    test: usize,
    train_labels: BTreeMap<usize, usize>,
    test_labels: BTreeMap<usize, usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    let config = CliConfig::load(cli.config.clone())?;
    debug!(path = ?config.path(), "cli config resolved");
    let ui = Ui::new(cli.theme.into(), cli.quiet);

    match &cli.command {
        Command::Load(args) => {
            let options = build_options(args, &config);
            let dataset = load(&ui, &cli.format, &options)?;
            let summary = dataset.summary();
            emit(&cli.format, &summary, || print_summary(&ui, &options, &summary))?;
        }
        Command::Split(cmd) => {
            let options = build_options(&cmd.load, &config);
            let dataset = load(&ui, &cli.format, &options)?;
            let split = separate_data(&dataset.graphs, cmd.seed, cmd.fold)?;
            let report = SplitReport {
                seed: cmd.seed,
                fold: cmd.fold,
                train: split.train.len(),
                test: split.test.len(),
                train_labels: label_histogram(&split.train),
                test_labels: label_histogram(&split.test),
            };
            emit(&cli.format, &report, || print_split(&ui, &report))?;
        }
    }
    Ok(())
}

fn build_options(args: &LoadArgs, config: &CliConfig) -> DatasetOptions {
    let mut options = DatasetOptions::named(args.name.clone());
    if let Some(root) = args.data_root.clone().or_else(|| config.data_root().cloned()) {
        options.data_root = root;
    }
    if let Some(suffix) = config.features_suffix() {
        options.features_suffix = suffix.to_string();
    }
    if let Some(suffix) = config.graph_suffix() {
        options.graph_suffix = suffix.to_string();
    }
    if let Some(delimiter) = args.delimiter.or_else(|| config.delimiter()) {
        options.delimiter = delimiter;
    }
    options.degree_as_tag = args.degree_as_tag || config.degree_as_tag().unwrap_or(false);
    if let Some(policy) = args.unknown_ids.map(Into::into).or_else(|| config.unknown_ids()) {
        options.unknown_ids = policy;
    }
    options
}

fn load(ui: &Ui, format: &OutputFormat, options: &DatasetOptions) -> Result<Dataset, Box<dyn Error>> {
    let dataset = match format {
        OutputFormat::Json => load_data(options)?,
        OutputFormat::Text => {
            let task = ui.task(format!("Loading {} dataset", options.name));
            let dataset = load_data(options)?;
            task.finish();
            dataset
        }
    };
    if matches!(format, OutputFormat::Text) && dataset.unresolved_endpoints > 0 {
        ui.warn(&format!(
            "{} edge endpoints were missing from the feature table ({})",
            dataset.unresolved_endpoints,
            options.unknown_ids.as_str()
        ));
    }
    Ok(dataset)
}

fn label_histogram(records: &[&GraphRecord]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.label()).or_insert(0) += 1;
    }
    counts
}

fn emit<T, F>(format: &OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Text => {
            printer();
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
            Ok(())
        }
    }
}

fn print_summary(ui: &Ui, options: &DatasetOptions, summary: &DatasetSummary) {
    ui.section(
        "Files",
        [
            ("features", options.features_path().display().to_string()),
            ("edges", options.graph_path().display().to_string()),
        ],
    );
    ui.section(
        "Dataset",
        [
            ("classes", summary.num_classes),
            ("tags", summary.num_tags),
            ("graphs", summary.num_graphs),
            ("nodes", summary.num_nodes),
            ("edges", summary.num_edges),
            ("max neighbor", summary.max_neighbor),
            ("attributes", summary.attribute_width),
            ("edge rows", summary.edge_rows),
            ("unresolved ids", summary.unresolved_endpoints),
        ],
    );
}

fn print_split(ui: &Ui, report: &SplitReport) {
    ui.section(
        "Fold",
        [
            ("seed", report.seed.to_string()),
            ("fold", report.fold.to_string()),
            ("train", report.train.to_string()),
            ("test", report.test.to_string()),
        ],
    );
    ui.section(
        "Train labels",
        report
            .train_labels
            .iter()
            .map(|(label, count)| ("class", format!("{label}: {count}"))),
    );
    ui.section(
        "Test labels",
        report
            .test_labels
            .iter()
            .map(|(label, count)| ("class", format!("{label}: {count}"))),
    );
}
