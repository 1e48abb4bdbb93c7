//! bfb-unpack: split a BFB boot stream into its sub-images.
//!
//! `unpack` writes every image to `image_<name>` (current directory by default),
//! `list` prints the images without writing, `images` prints the known image types.
//! A malformed container is reported with the failing offset and nothing is written.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use bfb::{describe, extract_all, BfbSource, Config, DuplicatePolicy, UnpackOverrides, IMAGE_TYPES};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract every image in a BFB file.
    Unpack(UnpackArgs),
    /// List the images in a BFB file.
    List {
        file: PathBuf,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the image types this tool recognizes.
    Images,
}

#[derive(clap::Args)]
struct UnpackArgs {
    file: PathBuf,
    /// Output directory (default: current directory).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Artifact name prefix (default: image_).
    #[arg(long)]
    prefix: Option<String>,
    /// How to name images that appear more than once.
    #[arg(long, value_enum)]
    duplicates: Option<DuplicatePolicy>,
    /// Only extract these images (repeatable).
    #[arg(long)]
    only: Vec<String>,
    /// TOML file with an [unpack] table of defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Unpack(args) => unpack(args),
        Command::List { file, json } => list(file, json),
        Command::Images => {
            for t in IMAGE_TYPES {
                println!("{:>3}  {}", t.id, t.name);
            }
            Ok(())
        }
    }
}

fn unpack(args: UnpackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let options = config.extract_options_with(UnpackOverrides {
        output_dir: args.output,
        prefix: args.prefix,
        duplicates: args.duplicates,
        only: args.only,
    })?;

    let source = BfbSource::open(&args.file)?;
    let written = extract_all(source.as_bytes(), &options)?;
    eprintln!("{}: {} images written to {}", args.file.display(), written.len(), options.output_dir.display());
    Ok(())
}

fn list(file: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = BfbSource::open(&file)?;
    let images = describe(source.as_bytes())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&images)?);
        return Ok(());
    }
    println!("{:>3}  {:>10}  {:>3}  {:<18} {:>10}  sha256", "#", "offset", "id", "name", "length");
    for i in &images {
        println!(
            "{:>3}  {:#010x}  {:>3}  {:<18} {:>10}  {}",
            i.index, i.offset, i.image_id, i.name, i.image_len, i.sha256
        );
    }
    Ok(())
}
