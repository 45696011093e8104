//! Morn Define Lane CLI
//!
//! Entry point for the `morn-defines` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use morn_define_lane::editor::SymbolMatrixEditor;
use morn_define_lane::{sort_all, LaneConfig, ProjectStore, Reconciler, TargetId};

#[derive(Parser)]
#[command(name = "morn-defines")]
#[command(about = "Define symbol reconciler for multi-target build configurations", version)]
struct Cli {
    /// Path to the lane config file (default: .morn/defines.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive symbols from module folders and converge every target
    Reconcile {
        /// Output the report in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Re-sort every target's define symbol list alphabetically
    Sort {
        /// Output the report in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the target × symbol matrix
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Register a symbol and enable it for every target
    Add {
        /// Symbol name
        symbol: String,
    },

    /// Unregister a symbol and remove it from every target
    Remove {
        /// Symbol name
        symbol: String,
    },

    /// Flip one symbol's membership for one target
    Toggle {
        /// Target name
        target: String,

        /// Symbol name
        symbol: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "morn_define_lane=info".into()),
    );

    // Logs go to stderr so stdout stays clean for reports
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config);

    match cli.command {
        Commands::Reconcile { json } => run_reconcile(&config, json),
        Commands::Sort { json } => run_sort(&config, json),
        Commands::List { json } => run_list(&config, json),
        Commands::Add { symbol } => run_edit(&config, EditOp::Add(symbol)),
        Commands::Remove { symbol } => run_edit(&config, EditOp::Remove(symbol)),
        Commands::Toggle { target, symbol } => {
            run_edit(&config, EditOp::Toggle(TargetId::new(target), symbol))
        }
    }
}

fn load_config(path: Option<PathBuf>) -> LaneConfig {
    let path = path.unwrap_or_else(LaneConfig::default_path);
    match LaneConfig::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn open_store(config: &LaneConfig) -> ProjectStore {
    match ProjectStore::load_with_delimiter(&config.settings_path, config.delimiter) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading project settings: {}", e);
            process::exit(1);
        }
    }
}

fn run_reconcile(config: &LaneConfig, json: bool) {
    let store = open_store(config);
    let reconciler = Reconciler::new(&store);

    let report = match reconciler.reconcile_root(&config.modules_root) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error scanning module folders: {}", e);
            process::exit(1);
        }
    };

    // Reconcile leaves stored order as-is; finish with a canonical sort
    sort_all(&store);

    if json {
        print_json(&report);
        return;
    }

    println!(
        "Reconciled {} target(s): {} changed, {} skipped.",
        report.targets.len(),
        report.targets_changed,
        report.targets_skipped
    );
    for outcome in &report.targets {
        if let Some(reason) = &outcome.skipped {
            println!("  {} skipped ({})", outcome.target, reason);
            continue;
        }
        for symbol in &outcome.added {
            println!("  {} + {}", outcome.target, symbol);
        }
        for symbol in &outcome.removed {
            println!("  {} - {}", outcome.target, symbol);
        }
    }
}

fn run_sort(config: &LaneConfig, json: bool) {
    let store = open_store(config);
    let report = sort_all(&store);

    if json {
        print_json(&report);
        return;
    }

    if report.changed() {
        for target in &report.targets_sorted {
            println!("Sorted define symbols for {}.", target);
        }
    } else {
        println!("All define symbol lists already sorted.");
    }
}

fn run_list(config: &LaneConfig, json: bool) {
    let store = open_store(config);
    let editor = SymbolMatrixEditor::load(&store);

    if json {
        let matrix: Vec<serde_json::Value> = editor
            .symbols()
            .iter()
            .map(|symbol| {
                let targets: Vec<&TargetId> = editor
                    .targets()
                    .iter()
                    .filter(|t| editor.is_enabled(t, symbol))
                    .collect();
                serde_json::json!({ "symbol": symbol, "targets": targets })
            })
            .collect();
        print_json(&matrix);
        return;
    }

    if editor.symbols().is_empty() {
        println!("No define symbols registered.");
        return;
    }

    let width = editor
        .symbols()
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(0)
        .max("Symbol".len());

    print!("{:width$}", "Symbol", width = width);
    for target in editor.targets() {
        print!("  {}", target);
    }
    println!();

    for symbol in editor.symbols() {
        print!("{:width$}", symbol, width = width);
        for target in editor.targets() {
            let mark = if editor.is_enabled(target, symbol) { "x" } else { "-" };
            print!("  {:width$}", mark, width = target.as_str().len());
        }
        println!();
    }
}

enum EditOp {
    Add(String),
    Remove(String),
    Toggle(TargetId, String),
}

fn run_edit(config: &LaneConfig, op: EditOp) {
    let store = open_store(config);
    let mut editor = SymbolMatrixEditor::load(&store);

    let result = match &op {
        EditOp::Add(symbol) => editor.add_symbol(symbol),
        EditOp::Remove(symbol) => editor.remove_symbol(symbol),
        EditOp::Toggle(target, symbol) => editor.toggle(target, symbol).map(|enabled| {
            println!(
                "{} {} for {}.",
                symbol,
                if enabled { "enabled" } else { "disabled" },
                target
            );
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(2);
    }

    let report = editor.commit();
    if !report.is_clean() {
        for failure in &report.failures {
            eprintln!("Failed to apply {}: {}", failure.target, failure.reason);
        }
        process::exit(1);
    }

    println!("Applied to {} target(s).", report.targets_written);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
