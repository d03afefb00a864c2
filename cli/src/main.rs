use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use qa_report_analysis::{analyze_workbook, render_text_report, write_report_set};
use qa_report_core::{RunConfig, classify::classify};
use qa_report_history::{
    DEFAULT_TREND_WINDOW, HistoryRecord, HistoryStore, TrendReport, render_trend_text,
};

/// Output format for the trend report.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TrendFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "qa-report")]
#[command(about = "QA workbook analysis, reporting, and pass-rate trend tracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a workbook, write the report set, and append to history.
    Analyze(AnalyzeArgs),
    /// Report pass-rate trends from the history store.
    Trend(TrendArgs),
    /// Classify a single result-cell value (reads stdin when omitted).
    Classify(ClassifyArgs),
    /// Validate a run configuration and list configured sheets.
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Workbook file to analyze (xlsx/xls/ods).
    workbook: PathBuf,
    /// Run configuration YAML (sheets and outcome columns).
    #[arg(long)]
    config: PathBuf,
    /// Directory for the report set.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// History store file (default: <output-dir>/qa_history.csv).
    #[arg(long)]
    history: Option<PathBuf>,
    /// Skip the history append for this run.
    #[arg(long)]
    no_history: bool,
}

#[derive(Debug, Args)]
struct TrendArgs {
    /// History store file.
    #[arg(long, default_value = "qa_history.csv")]
    history: PathBuf,
    /// Moving-average window in runs.
    #[arg(long, default_value_t = DEFAULT_TREND_WINDOW)]
    window: usize,
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: TrendFormat,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Cell value to classify; stdin is read when omitted.
    value: Option<String>,
}

#[derive(Debug, Args)]
struct CheckConfigArgs {
    /// Run configuration YAML to validate.
    config: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Trend(args) => run_trend(args),
        Command::Classify(args) => run_classify(args),
        Command::CheckConfig(args) => run_check_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let config = RunConfig::load(&args.config)
        .map_err(|err| format!("failed to load config '{}': {err}", args.config.display()))?;

    let run = analyze_workbook(&args.workbook, &config).map_err(|err| {
        format!(
            "failed to analyze workbook '{}': {err}",
            args.workbook.display()
        )
    })?;

    print!("{}", render_text_report(&run));

    std::fs::create_dir_all(&args.output_dir).map_err(|err| {
        format!(
            "failed to create output directory '{}': {err}",
            args.output_dir.display()
        )
    })?;
    let paths = write_report_set(&run, &args.output_dir)
        .map_err(|err| format!("failed to write report set: {err}"))?;
    println!("Summary report: {}", paths.summary_txt.display());
    println!("CSV export:     {}", paths.results_csv.display());
    println!("JSON detail:    {}", paths.analysis_json.display());

    if args.no_history {
        return Ok(());
    }

    // Reports above stay on disk even if this append fails; only the run's
    // tracked status is lost.
    let history_path = args
        .history
        .unwrap_or_else(|| args.output_dir.join("qa_history.csv"));
    let store = HistoryStore::new(&history_path);
    store
        .append(&HistoryRecord::from_run(&run))
        .map_err(|err| {
            format!(
                "run reports were written, but the history append to '{}' failed: {err}",
                history_path.display()
            )
        })?;
    println!("History:        {}", history_path.display());

    Ok(())
}

fn run_trend(args: TrendArgs) -> Result<(), String> {
    let store = HistoryStore::new(&args.history);
    let records = store
        .read_all()
        .map_err(|err| format!("failed to read history '{}': {err}", args.history.display()))?;

    let Some(report) = TrendReport::build(records, args.window) else {
        return Err(format!(
            "history '{}' has no recorded runs; run `qa-report analyze` first",
            args.history.display()
        ));
    };

    match args.format {
        TrendFormat::Text => print!("{}", render_trend_text(&report)),
        TrendFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<(), String> {
    let value = match args.value {
        Some(value) => value,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            buffer
        }
    };
    println!("{}", classify(&value));
    Ok(())
}

fn run_check_config(args: CheckConfigArgs) -> Result<(), String> {
    let config = RunConfig::load(&args.config)
        .map_err(|err| format!("invalid config '{}': {err}", args.config.display()))?;

    println!(
        "Config OK: {} sheets, failing-row cap {}",
        config.sheets.len(),
        config.failing_row_cap
    );
    for sheet in &config.sheets {
        if sheet.auto_detect() {
            println!("  {} (auto-detect)", sheet.name);
        } else {
            println!("  {} (columns {})", sheet.name, sheet.columns.join(", "));
        }
    }
    Ok(())
}
