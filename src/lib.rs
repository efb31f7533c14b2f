//! Birdcrop: square-crop and stratify a bounding-box annotated image dataset.
//!
//! Birdcrop turns a directory of photos plus two flat manifests (image names
//! and one bounding box per image) into uniformly sized square crops, caches
//! them in a compressed archive, and partitions them into train, test and
//! validation sets with per-category proportions.
//!
//! # Modules
//!
//! - [`manifest`]: Readers for the id list and bounding-box manifests
//! - [`geometry`]: Box conversion and square normalization
//! - [`source`]: Image decoding, cropping and downsizing
//! - [`assemble`]: The two-pass dataset assembler
//! - [`split`]: Category-stratified splitting
//! - [`archive`]: Compressed archive persistence
//! - [`error`]: Error types for birdcrop operations

pub mod archive;
pub mod assemble;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod manifest;
pub mod source;
pub mod split;

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, Subcommand};

pub use dataset::{CategoryId, Dataset, LabeledSample, Sample};
pub use error::BirdcropError;

use assemble::AssemblyReport;
use split::{SplitOptions, SplitReport, DEFAULT_PERCENT_TEST, DEFAULT_PERCENT_TRAIN};

/// Seed used when none is given on the command line.
const DEFAULT_SEED: u64 = 12345;

/// The birdcrop CLI application.
#[derive(Parser)]
#[command(name = "birdcrop")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Square-crop every image and save the result to an archive.
    Prepare(PrepareArgs),
    /// Split a dataset (built fresh or loaded from an archive) into train/test/valid.
    Split(SplitArgs),
}

/// Arguments for the prepare subcommand.
#[derive(clap::Args)]
struct PrepareArgs {
    /// Directory containing the images named in the id list.
    #[arg(short = 'd', long)]
    images_directory: PathBuf,

    /// File with image ids and names (images.txt).
    #[arg(short = 'l', long)]
    image_list: PathBuf,

    /// File with one bounding box per image (bounding_boxes.txt).
    #[arg(short = 'b', long)]
    bounding_box_file: PathBuf,

    /// Archive to write the cropped images to (.npz).
    #[arg(short = 'o', long)]
    output_file: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
#[command(group(
    ArgGroup::new("archive")
        .required(true)
        .args(["output_file", "input_file"])
))]
struct SplitArgs {
    /// Directory containing the images. Not used with --input-file.
    #[arg(short = 'd', long)]
    images_directory: Option<PathBuf>,

    /// File with image ids and names (images.txt). Not used with --input-file.
    #[arg(short = 'l', long)]
    image_list: Option<PathBuf>,

    /// File with one bounding box per image. Not used with --input-file.
    #[arg(short = 'b', long)]
    bounding_box_file: Option<PathBuf>,

    /// Build the dataset from the manifests and cache it in this archive.
    #[arg(
        short = 'o',
        long,
        requires_all = ["images_directory", "image_list", "bounding_box_file"]
    )]
    output_file: Option<PathBuf>,

    /// Load a previously prepared archive instead of reading images.
    #[arg(short = 'i', long)]
    input_file: Option<PathBuf>,

    /// Share of each category used for training.
    #[arg(long, default_value_t = DEFAULT_PERCENT_TRAIN)]
    train: f64,

    /// Share of each category used for testing; the rest is validation.
    #[arg(long, default_value_t = DEFAULT_PERCENT_TEST)]
    test: f64,

    /// Seed for the per-category shuffles.
    #[arg(long, env = "BIRDCROP_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the birdcrop CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BirdcropError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prepare(args)) => run_prepare(args),
        Some(Commands::Split(args)) => run_split(args),
        None => {
            println!("birdcrop {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Square-crop and stratify bounding-box annotated images.");
            println!();
            println!("Run 'birdcrop --help' for usage information.");
            Ok(())
        }
    }
}

/// Read both manifests and assemble a dataset from images under `images_directory`.
pub fn build_dataset(
    images_directory: &Path,
    image_list: &Path,
    bounding_box_file: &Path,
) -> Result<(Dataset, AssemblyReport), BirdcropError> {
    let names = manifest::load_id_list(image_list)?;
    let boxes = manifest::load_bounding_boxes(bounding_box_file)?;
    let source = source::DirectorySource::new(images_directory);
    assemble::assemble_dataset(&source, &names, &boxes)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output(raw: &str) -> Result<OutputFormat, BirdcropError> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(BirdcropError::UnsupportedOutput(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}

/// Execute the prepare subcommand.
fn run_prepare(args: PrepareArgs) -> Result<(), BirdcropError> {
    let output = parse_output(&args.output)?;

    let (dataset, report) = build_dataset(
        &args.images_directory,
        &args.image_list,
        &args.bounding_box_file,
    )?;

    if output == OutputFormat::Text {
        print!("{}", report);
        println!("Saving image data to {}...", args.output_file.display());
    }
    archive::save_archive(&args.output_file, &dataset)?;

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), BirdcropError> {
    let output = parse_output(&args.output)?;
    let opts = SplitOptions {
        percent_train: args.train,
        percent_test: args.test,
        seed: Some(args.seed),
    };
    // Fail on bad percentages before touching any image.
    split::validate_split_options(&opts)?;

    let (dataset, assembly) = match (
        &args.input_file,
        &args.output_file,
        &args.images_directory,
        &args.image_list,
        &args.bounding_box_file,
    ) {
        (Some(input), ..) => (archive::load_archive(input)?, None),
        (None, Some(output_file), Some(images), Some(image_list), Some(boxes)) => {
            let (dataset, report) = build_dataset(images, image_list, boxes)?;
            archive::save_archive(output_file, &dataset)?;
            (dataset, Some(report))
        }
        _ => {
            return Err(BirdcropError::InvalidSplitConfig {
                message: "pass --input-file, or --output-file with -d, -l and -b".to_string(),
            });
        }
    };

    let split = split::split_dataset(dataset, &opts)?;
    let report = SplitReport::new(&split, &opts);

    match output {
        OutputFormat::Text => {
            if let Some(assembly) = &assembly {
                print!("{}", assembly);
                println!();
            }
            print!("{}", report);
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "assembly": assembly,
                "split": report,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
