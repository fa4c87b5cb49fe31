use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gridweb::pipeline::{DEFAULT_OUTPUT_PATH, DEFAULT_SOURCE_PATH};
use gridweb::report::{self, CollectionStats};

#[derive(Parser, Debug)]
#[command(name = "gridweb", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Progress is logged at info by default.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors, hiding progress lines.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and normalize the source grid into the web GeoJSON.
    Generate(GenerateArgs),
    /// Print the final verification report for a web GeoJSON.
    Verify(VerifyArgs),
    /// Print a report for the source GeoJSON compared with the web file.
    VerifySource(VerifySourceArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Source grid-suitability GeoJSON.
    #[arg(long = "in", default_value = DEFAULT_SOURCE_PATH)]
    in_path: PathBuf,

    /// Output web GeoJSON path.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    out: PathBuf,

    /// Collection name written to the output.
    #[arg(long, default_value = gridweb::DEFAULT_COLLECTION_NAME)]
    name: String,

    /// Which features to check for required properties.
    #[arg(long, value_enum, default_value_t = ValidateChoice::First)]
    validate: ValidateChoice,

    /// Normalize features on the rayon thread pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Parser, Debug)]
struct VerifyArgs {
    /// Web GeoJSON to verify.
    #[arg(long = "in", default_value = DEFAULT_OUTPUT_PATH)]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct VerifySourceArgs {
    /// Source grid-suitability GeoJSON.
    #[arg(long = "in", default_value = DEFAULT_SOURCE_PATH)]
    in_path: PathBuf,

    /// Web GeoJSON to compare against.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    web: PathBuf,

    /// Skip the source-vs-web comparison.
    #[arg(long, default_value_t = false)]
    no_web: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValidateChoice {
    /// First feature only.
    First,
    /// Every feature.
    All,
}

impl From<ValidateChoice> for gridweb::ValidationMode {
    fn from(choice: ValidateChoice) -> Self {
        match choice {
            ValidateChoice::First => Self::FirstFeature,
            ValidateChoice::All => Self::AllFeatures,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Verify(args) => cmd_verify(args),
        Command::VerifySource(args) => cmd_verify_source(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_stats(path: &Path) -> anyhow::Result<CollectionStats> {
    let collection = gridweb::read_collection(path)
        .with_context(|| format!("load collection '{}'", path.display()))?;
    CollectionStats::compute(&collection)
        .with_context(|| format!("summarize collection '{}'", path.display()))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = gridweb::PipelineConfig {
        source: args.in_path,
        output: args.out,
        collection_name: args.name,
        validation: args.validate.into(),
        parallel: args.parallel,
    };

    let outcome = gridweb::generate(&config).with_context(|| {
        format!(
            "generate '{}' from '{}'",
            config.output.display(),
            config.source.display()
        )
    })?;

    eprintln!(
        "wrote {} ({} features, {} properties each, {} bytes)",
        outcome.output.display(),
        outcome.check.features,
        outcome.check.properties_per_feature,
        outcome.bytes
    );
    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let stats = load_stats(&args.in_path)?;
    let size = gridweb::io::file_size(&args.in_path)?;

    let mut out = std::io::stdout().lock();
    let passed = report::render_verification(&mut out, &stats, &file_label(&args.in_path), size)
        .context("write verification report")?;
    out.flush()?;

    if !passed {
        anyhow::bail!("verification failed for '{}'", args.in_path.display());
    }
    Ok(())
}

fn cmd_verify_source(args: VerifySourceArgs) -> anyhow::Result<()> {
    let source = load_stats(&args.in_path)?;
    let web = if args.no_web {
        None
    } else {
        Some(load_stats(&args.web)?)
    };

    let mut out = std::io::stdout().lock();
    report::render_source_report(&mut out, &source, &file_label(&args.in_path))
        .context("write source report")?;
    let valid = match &web {
        Some(web) => report::render_comparison(&mut out, &source, web)
            .context("write comparison report")?,
        None => source.all_critical_present(),
    };
    out.flush()?;

    if !valid {
        anyhow::bail!(
            "source '{}' lacks critical properties",
            args.in_path.display()
        );
    }
    Ok(())
}
