//! `predictor` - dataset generation, training and one-off predictions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use predictor_core::constants::{self, APP_NAME, APP_VERSION, DEFAULT_RECORD_COUNT, DEFAULT_TEST_RATIO};
use predictor_core::logic::dataset::{
    generate, load_csv_file, DatasetSummary, DatasetWriter, GeneratorConfig, GeneratorProfile,
};
use predictor_core::{train, Predictor, StudentFeatures, TrainingConfig};

#[derive(Debug, Parser)]
#[command(name = "predictor", version, about = "Student Performance Predictor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a synthetic student dataset (CSV)
    Generate(GenerateArgs),
    /// Train candidate models and write the best bundle
    Train(TrainArgs),
    /// Predict one student with a trained bundle (prints JSON)
    Predict(PredictArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Number of records
    #[arg(short = 'n', long, default_value_t = DEFAULT_RECORD_COUNT)]
    records: usize,

    #[arg(long, default_value_t = constants::get_seed())]
    seed: u64,

    #[arg(long, value_enum, default_value_t = GeneratorProfile::Default)]
    profile: GeneratorProfile,

    /// Output CSV (default: $DATASET_PATH or data/student_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TrainArgs {
    /// Input CSV (default: $DATASET_PATH or data/student_data.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Artifact directory (default: $ARTIFACT_DIR or models)
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    #[arg(long, default_value_t = constants::get_seed())]
    seed: u64,

    #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
    test_ratio: f64,
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Artifact directory (default: $ARTIFACT_DIR or models)
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    #[arg(long)]
    gender: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    attendance_percentage: f64,
    #[arg(long)]
    hours_studied: f64,
    #[arg(long)]
    previous_score: f64,
    #[arg(long)]
    parent_education: String,
    #[arg(long)]
    internet_access: String,
    #[arg(long)]
    assignments_submitted: u32,
    #[arg(long)]
    internal_marks: f64,
}

impl PredictArgs {
    fn features(&self) -> StudentFeatures {
        StudentFeatures {
            gender: self.gender.clone(),
            age: self.age,
            attendance_percentage: self.attendance_percentage,
            hours_studied: self.hours_studied,
            previous_score: self.previous_score,
            parent_education: self.parent_education.clone(),
            internet_access: self.internet_access.clone(),
            assignments_submitted: self.assignments_submitted,
            internal_marks: self.internal_marks,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Train(args) => run_train(args),
        Command::Predict(args) => run_predict(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = GeneratorConfig::for_profile(args.profile)
        .with_records(args.records)
        .with_seed(args.seed);
    let records = generate(&config).context("dataset generation failed")?;

    let writer = match args.output {
        Some(path) => DatasetWriter::from_path(path),
        None => DatasetWriter::new(),
    };
    let written = writer
        .write_all(&records)
        .with_context(|| format!("failed to write {}", writer.path().display()))?;

    let summary = DatasetSummary::from_records(&records);
    println!("Generated {} records -> {}", written, writer.path().display());
    println!(
        "  Pass: {} ({:.1}%)  Fail: {}",
        summary.pass,
        summary.pass_rate() * 100.0,
        summary.fail
    );
    println!(
        "  Mean attendance {:.2}, hours {:.2}, previous score {:.2}, internal marks {:.2}",
        summary.mean_attendance,
        summary.mean_hours_studied,
        summary.mean_previous_score,
        summary.mean_internal_marks
    );
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    let data_path = args.data.unwrap_or_else(constants::get_dataset_path);
    let artifact_dir = args.artifacts.unwrap_or_else(constants::get_artifact_dir);

    let rows = load_csv_file(&data_path)
        .with_context(|| format!("failed to load dataset {}", data_path.display()))?;
    log::info!("Loaded {} rows from {}", rows.len(), data_path.display());

    let config = TrainingConfig::default()
        .with_seed(args.seed)
        .with_test_ratio(args.test_ratio);
    let bundle = train(&rows, &config).context("training failed")?;

    let manifest = &bundle.manifest;
    println!("Data split: train={}, test={}", manifest.train_rows, manifest.test_rows);
    println!();
    println!("Candidates:");
    for report in &manifest.candidates {
        println!(
            "  {:<20} accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
            report.name,
            report.metrics.accuracy,
            report.metrics.precision,
            report.metrics.recall,
            report.metrics.f1
        );
    }
    for failure in &manifest.skipped {
        println!("  {:<20} skipped: {}", failure.model, failure.reason);
    }
    println!();
    println!("Best model: {} (F1 {:.4})", manifest.model_name, manifest.metrics.f1);

    let written = bundle
        .save(&artifact_dir)
        .with_context(|| format!("failed to write artifacts to {}", artifact_dir.display()))?;
    println!("Artifacts saved to {}:", artifact_dir.display());
    for file in written.checksums.keys() {
        println!("  - {}", file);
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let artifact_dir = args.artifacts.clone().unwrap_or_else(constants::get_artifact_dir);
    let predictor = Predictor::load(&artifact_dir)
        .with_context(|| format!("cannot load artifacts from {}", artifact_dir.display()))?;

    let prediction = predictor
        .predict(&args.features())
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.guidance()))?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}
