//! BBA pipeline entrypoint: one offline stage per invocation, all parameters from the config file.

use bba_pipeline::{
    config::PipelineConfig,
    dataset::{combine_shuffled, DatasetBuilder, DatasetPartitioner, DatasetTable},
    features::{FeatureExtractor, FEATURE_COLUMNS},
    logging::{StageSummary, StructuredLogger},
    model::{OnnxClassifier, StandardScaler},
    scoring::Scorer,
    synth::{NoiseInjector, SyntheticAugmenter},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "bba-pipeline", version, about = "Session feature extraction, augmentation and scoring")]
struct Cli {
    /// Config file (JSON). Falls back to BBA_CONFIG_PATH, then config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Session JSON directory → feature CSV
    Extract,
    /// Generate synthetic variants of every row
    Augment,
    /// Merge legit and fraud tables and shuffle
    Combine,
    /// Stratified train / four test shards
    Split,
    /// Add measurement noise to every test CSV
    Noise,
    /// Fit the feature scaler on the training table
    FitScaler,
    /// Score a test table with the stored scaler and model
    Evaluate,
}

fn emit(summary: &StageSummary<'_>) -> std::io::Result<()> {
    StructuredLogger::emit_json(summary, &mut std::io::stdout().lock())
}

fn run_extract(config: &PipelineConfig) -> CliResult {
    let c = &config.extract;
    let builder = DatasetBuilder::new(FeatureExtractor::new(c.label));
    let summary = builder.run(&c.input_dir, &c.output_csv)?;
    emit(&StageSummary {
        skipped: Some(summary.skipped),
        output: Some(c.output_csv.display().to_string()),
        ..StageSummary::new("extract", summary.written)
    })?;
    Ok(())
}

fn run_augment(config: &PipelineConfig) -> CliResult {
    let c = &config.augment;
    let source = DatasetTable::read_csv(&c.input_csv)?;
    let out = SyntheticAugmenter::new(c).augment(&source)?;
    out.write_csv(&c.output_csv)?;
    info!(rows = out.len(), class_label = c.class_label, output = %c.output_csv.display(), "synthetic samples generated");
    emit(&StageSummary {
        output: Some(c.output_csv.display().to_string()),
        ..StageSummary::new("augment", out.len())
    })?;
    Ok(())
}

fn run_combine(config: &PipelineConfig) -> CliResult {
    let c = &config.combine;
    let legit = DatasetTable::read_csv(&c.legit_csv)?;
    let fraud = DatasetTable::read_csv(&c.fraud_csv)?;
    let combined = combine_shuffled(&legit, &fraud, c.seed)?;
    combined.write_csv(&c.output_csv)?;
    info!(legit = legit.len(), fraud = fraud.len(), output = %c.output_csv.display(), "combined and shuffled");
    emit(&StageSummary {
        output: Some(c.output_csv.display().to_string()),
        ..StageSummary::new("combine", combined.len())
    })?;
    Ok(())
}

fn run_split(config: &PipelineConfig) -> CliResult {
    let c = &config.split;
    let table = DatasetTable::read_csv(&c.input_csv)?;
    let partition = DatasetPartitioner::new(c).partition(&table)?;
    partition.write(&c.output_dir)?;
    emit(&StageSummary {
        output: Some(c.output_dir.display().to_string()),
        ..StageSummary::new("split", table.len())
    })?;
    Ok(())
}

fn run_noise(config: &PipelineConfig) -> CliResult {
    let c = &config.noise;
    let output_dir = c.resolved_output_dir();
    let written = NoiseInjector::new(c).inject_dir(&c.input_dir, &output_dir)?;
    emit(&StageSummary {
        output: Some(output_dir.display().to_string()),
        ..StageSummary::new("noise", written.len())
    })?;
    Ok(())
}

fn run_fit_scaler(config: &PipelineConfig) -> CliResult {
    let c = &config.scaler;
    let train = DatasetTable::read_csv(&c.train_csv)?;
    let scaler = StandardScaler::fit(&train, &FEATURE_COLUMNS)?;
    scaler.save(&c.output_path)?;
    info!(rows = train.len(), output = %c.output_path.display(), "scaler saved");
    emit(&StageSummary {
        output: Some(c.output_path.display().to_string()),
        ..StageSummary::new("fit-scaler", train.len())
    })?;
    Ok(())
}

fn run_evaluate(config: &PipelineConfig) -> CliResult {
    let c = &config.score;
    let scorer = Scorer::new(c.threshold)?;
    let table = DatasetTable::read_csv(&c.test_csv)?;
    let scaler = StandardScaler::load(&c.scaler_path)?;
    let classifier = OnnxClassifier::load(&c.model_path, scaler.dim())?;
    let report = scorer.evaluate_table(&table, &scaler, &classifier)?;
    StructuredLogger::emit_json(&report, &mut std::io::stdout().lock())?;
    Ok(())
}

fn main() -> CliResult {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("BBA_CONFIG_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let (config, fallback) = match PipelineConfig::read(&config_path) {
        Ok(c) => (c.unwrap_or_default(), None),
        Err(e) => (PipelineConfig::default(), Some(e)),
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    if let Some(e) = fallback {
        warn!(error = %e, "using default config");
    }
    config.validate()?;
    info!(config = %config_path.display(), "bba pipeline starting");

    match cli.command {
        Command::Extract => run_extract(&config),
        Command::Augment => run_augment(&config),
        Command::Combine => run_combine(&config),
        Command::Split => run_split(&config),
        Command::Noise => run_noise(&config),
        Command::FitScaler => run_fit_scaler(&config),
        Command::Evaluate => run_evaluate(&config),
    }
}
