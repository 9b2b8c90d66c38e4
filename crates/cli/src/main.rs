use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use partition_grouping::{
    decompose, ClusterReport, Grouper, StopWords, Taggable, Vocabulary, DEFAULT_STOP_COUNT,
    OVERLAP_MIN,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{DecompositionOutput, EntityManifest, StepReport};

mod models;

#[derive(Parser)]
#[command(name = "partition")]
#[command(about = "Group projects and documents by the vocabulary they share", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition entities by greedy nearest overlap
    Group(GroupArgs),

    /// Explore shared and private vocabulary of a small reference set
    Decompose(DecomposeArgs),

    /// Build a stop-word list from the most frequent words
    Stops(StopsArgs),
}

#[derive(Args)]
struct GroupArgs {
    /// Entity manifest (JSON)
    #[arg(short = 'f', long)]
    input: PathBuf,

    /// Requested minimum overlap; clamped into the preset's band
    #[arg(short, long, default_value_t = OVERLAP_MIN as i64, allow_negative_numbers = true)]
    min: i64,

    /// Group documents (overlap band 1..=30) instead of projects
    #[arg(long)]
    documents: bool,

    /// Stop-word list to strip from every entity first
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Group every prefix of the input, one report per step
    #[arg(short, long)]
    incremental: bool,

    /// Output file (or directory with --incremental)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct DecomposeArgs {
    /// Entity manifest (JSON)
    #[arg(short = 'f', long)]
    input: PathBuf,

    /// Stop-word list to strip from every entity first
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct StopsArgs {
    /// Entity manifest (JSON)
    #[arg(short = 'f', long)]
    input: PathBuf,

    /// Minimum occurrence count for a stop word
    #[arg(long, default_value_t = DEFAULT_STOP_COUNT)]
    min_count: u64,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Group(args) => run_group(&args),
        Commands::Decompose(args) => run_decompose(&args),
        Commands::Stops(args) => run_stops(&args),
    }
}

fn load_stops(path: Option<&Path>) -> Result<Option<StopWords>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let stops = StopWords::load(path)
        .with_context(|| format!("Failed to load stop words from {}", path.display()))?;
    log::info!("Loaded {} stop words", stops.len());
    Ok(Some(stops))
}

fn run_group(args: &GroupArgs) -> Result<()> {
    let manifest = EntityManifest::load(&args.input)?;
    let stops = load_stops(args.stops.as_deref())?;

    if args.documents {
        let documents = manifest.documents(stops.as_ref());
        group_entities(&Grouper::for_documents(), &documents, args)
    } else {
        let projects = manifest.projects(stops.as_ref());
        group_entities(&Grouper::for_projects(), &projects, args)
    }
}

fn group_entities<T: Taggable>(grouper: &Grouper, entities: &[T], args: &GroupArgs) -> Result<()> {
    grouper
        .config()
        .validate()
        .context("Invalid grouping configuration")?;

    if !args.incremental {
        let groups = grouper.make_groups(args.min, entities);
        let report = ClusterReport::from_groups(&groups);
        return emit(&report, args.out.as_deref(), args.pretty);
    }

    let steps: Vec<StepReport> = grouper
        .make_groups_incrementally(args.min, entities)
        .iter()
        .enumerate()
        .map(|(idx, groups)| StepReport {
            label: format!("step{}", idx + 1),
            report: ClusterReport::from_groups(groups),
        })
        .collect();

    match args.out.as_deref() {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for step in &steps {
                let path = dir.join(format!("{}.json", step.label));
                emit(&step.report, Some(&path), args.pretty)?;
            }
            Ok(())
        }
        None => emit(&steps, None, args.pretty),
    }
}

fn run_decompose(args: &DecomposeArgs) -> Result<()> {
    let manifest = EntityManifest::load(&args.input)?;
    let stops = load_stops(args.stops.as_deref())?;
    let projects = manifest.projects(stops.as_ref());

    let tree = decompose(&projects);
    let output = DecompositionOutput {
        tree: tree.render(),
        candidates: tree.candidates().into_iter().map(Into::into).collect(),
        unique: DecompositionOutput::unique_words(&projects),
    };
    emit(&output, None, args.pretty)
}

fn run_stops(args: &StopsArgs) -> Result<()> {
    let manifest = EntityManifest::load(&args.input)?;
    let vocabulary = Vocabulary::from_taggables(&manifest.projects(None));
    let stops = StopWords::from_frequent(&vocabulary, args.min_count);

    match args.out.as_deref() {
        Some(path) => stops
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", stops.to_json_pretty()?);
            Ok(())
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, out: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
            }
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("{} was created.", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
