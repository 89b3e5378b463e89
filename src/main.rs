use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use commune_vindex::input::load_table;
use commune_vindex::logging::init_logging;
use commune_vindex::model::weights::WeightMapping;
use commune_vindex::registry::{self, MADAGASCAR_V3};
use commune_vindex::report::json::{SummaryInput, build_summary, write_summary_json};
use commune_vindex::report::tsv::write_index_tsv;
use commune_vindex::compute_index;

#[derive(Debug, Parser)]
#[command(name = "vindex", version, about = "Weighted composite vulnerability index")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the index for an indicator table.
    Run(RunArgs),
    /// List built-in indicator registries.
    Registries,
}

#[derive(Debug, Clone, clap::Args)]
struct RunArgs {
    /// Tab- or comma-separated indicator table, optionally gzipped.
    #[arg(long)]
    table: PathBuf,
    /// Output directory for index.tsv and summary.json.
    #[arg(long)]
    out: PathBuf,
    /// Built-in registry name or path to a JSON registry definition.
    #[arg(long, default_value = MADAGASCAR_V3)]
    registry: String,
    /// JSON object mapping every indicator column to a weight in [0, 1].
    /// Without it every indicator uses the default weight.
    #[arg(long)]
    weights: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = dispatch(cli.command) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run(args) => run(&args),
        Command::Registries => {
            for name in registry::builtin_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run(args: &RunArgs) -> Result<(), String> {
    let registry = registry::resolve(&args.registry).map_err(|e| e.to_string())?;
    tracing::info!(
        registry = registry.version(),
        indicators = registry.indicators().len(),
        "registry resolved"
    );

    let weights = match &args.weights {
        Some(path) => Some(read_weights(path)?),
        None => None,
    };

    let loaded = load_table(&args.table, &registry).map_err(|e| e.to_string())?;
    let indexed =
        compute_index(&loaded.table, &registry, weights.as_ref()).map_err(|e| e.to_string())?;

    std::fs::create_dir_all(&args.out).map_err(|e| e.to_string())?;
    let tsv_path = args.out.join("index.tsv");
    write_index_tsv(&indexed, &tsv_path).map_err(|e| e.to_string())?;

    let summary = build_summary(&SummaryInput {
        table: &indexed,
        registry: &registry,
        weights: weights.as_ref(),
        rows_read: loaded.n_read,
        rows_dropped: loaded.n_dropped,
    });
    let summary_path = args.out.join("summary.json");
    write_summary_json(&summary, &summary_path).map_err(|e| e.to_string())?;

    tracing::info!(
        rows = indexed.n_rows(),
        out = %args.out.display(),
        "wrote index.tsv and summary.json"
    );
    Ok(())
}

fn read_weights(path: &Path) -> Result<WeightMapping, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read weights {}: {e}", path.display()))?;
    WeightMapping::from_json(&json)
        .map_err(|e| format!("invalid weights {}: {e}", path.display()))
}
