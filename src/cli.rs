use crate::constants::*;
use anyhow::{anyhow, Result};
use chrono::Datelike;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = option_env!("VERGEN_GIT_DESCRIBE").unwrap_or_default();
    if git_describe.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="somx",
          version=&**FULL_VERSION,
          about="Somatic small variant merger and filter",
          long_about = None,
          after_help = format!("Copyright (C) 2019-{}
          This program comes with ABSOLUTELY NO WARRANTY; it is intended for
          Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge the caller's SNV and indel VCFs
    Merge(MergeArgs),
    /// Classify the records of a merged and normalized VCF
    Filter(FilterArgs),
    /// Run the caller and the complete post-processing pipeline
    Run(RunArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Merge(_) => "merge",
            Command::Filter(_) => "filter",
            Command::Run(_) => "run",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct MergeArgs {
    /// SNV VCF written by the caller (multi-allelic records split)
    #[arg(long = "snvs", value_name = "VCF", value_parser = check_file_exists)]
    pub snvs: PathBuf,

    /// Indel VCF written by the caller (multi-allelic records split)
    #[arg(long = "indels", value_name = "VCF", value_parser = check_file_exists)]
    pub indels: PathBuf,

    /// Write output to a file [default: standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct FilterArgs {
    /// Merged, left-normalized and sorted VCF
    #[arg(long = "vcf", value_name = "VCF", value_parser = check_file_exists)]
    pub vcf: PathBuf,

    /// Tumor BAM file or sample name, used to name the tumor column
    #[arg(long = "tumor", value_name = "TUMOR")]
    pub tumor: String,

    /// Normal BAM file or sample name, used to name the normal column
    #[arg(long = "normal", value_name = "NORMAL")]
    pub normal: String,

    /// Write output to a file [default: standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<String>,

    /// Enrichment target BED file, records outside are flagged 'off-target'
    #[arg(long = "target", value_name = "BED", value_parser = check_file_exists)]
    pub target: Option<PathBuf>,

    /// Number of threads to use
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    #[command(flatten)]
    pub classifier_args: ClassifierArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct RunArgs {
    /// Tumor sample BAM file
    #[arg(long = "tumor-bam", value_name = "BAM", value_parser = check_file_exists)]
    pub tumor_bam: PathBuf,

    /// Normal sample BAM file
    #[arg(long = "normal-bam", value_name = "BAM", value_parser = check_file_exists)]
    pub normal_bam: PathBuf,

    /// Output VCF, bgzip-compressed and tabix-indexed when ending in .gz
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: String,

    /// Candidate small indels for improved indel calling
    #[arg(long = "small-indels", value_name = "VCF")]
    pub small_indels: Option<String>,

    /// Enrichment target BED file, records outside are flagged 'off-target'
    #[arg(long = "target", value_name = "BED", value_parser = check_file_exists)]
    pub target: Option<PathBuf>,

    /// Genome build to use
    #[arg(long = "build", value_name = "BUILD", default_value = DEFAULT_BUILD)]
    pub build: String,

    /// Directory holding one <BUILD>.fa reference per genome build
    #[arg(long = "genome-dir", value_name = "DIR", default_value = DEFAULT_GENOME_DIR)]
    pub genome_dir: PathBuf,

    /// Treat input as whole genome samples (default: exome)
    #[arg(long = "wgs")]
    pub wgs: bool,

    /// Configuration file for the caller
    #[arg(long = "config", value_name = "INI", value_parser = check_file_exists)]
    pub config: Option<PathBuf>,

    /// Keep the caller's analysis files in this directory
    #[arg(long = "analysis-dir", value_name = "DIR")]
    pub analysis_dir: Option<PathBuf>,

    /// Limit the analysis to one region, e.g., chr1:10000-20000
    #[arg(long = "debug-region", value_name = "REGION", help_heading = "Advanced")]
    pub debug_region: Option<String>,

    /// Number of threads to use
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value_t = DEFAULT_RUN_THREADS,
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Directory of the caller's workflow scripts [default: PATH lookup]
    #[arg(long = "strelka-dir", value_name = "DIR", help_heading = "Advanced")]
    pub strelka_dir: Option<PathBuf>,

    /// Directory of the splitting, normalization and sorting tools [default: PATH lookup]
    #[arg(long = "tools-dir", value_name = "DIR", help_heading = "Advanced")]
    pub tools_dir: Option<PathBuf>,

    #[command(flatten)]
    pub classifier_args: ClassifierArgs,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ClassifierArgs {
    /// Minimum sequencing depth in the tumor
    #[arg(
        help_heading("Filter"),
        long,
        default_value_t = DEFAULT_MIN_TUMOR_DEPTH
    )]
    pub min_tumor_depth: u32,

    /// Minimum allele frequency in the tumor
    #[arg(
        help_heading("Filter"),
        long = "min-tumor-af",
        default_value_t = DEFAULT_MIN_TUMOR_AF,
        value_parser = fraction_in_range
    )]
    pub min_tumor_af: f64,

    /// Minimum number of supporting reads in the tumor
    #[arg(
        help_heading("Filter"),
        long,
        default_value_t = DEFAULT_MIN_TUMOR_SUPPORT
    )]
    pub min_tumor_support: u32,

    /// Minimum sequencing depth in the normal
    #[arg(
        help_heading("Filter"),
        long,
        default_value_t = DEFAULT_MIN_NORMAL_DEPTH
    )]
    pub min_normal_depth: u32,

    /// Maximum normal allele frequency, relative to the tumor allele frequency
    #[arg(
        help_heading("Filter"),
        long = "max-normal-af-ratio",
        default_value_t = DEFAULT_MAX_NORMAL_AF_RATIO,
        value_parser = ratio_in_range
    )]
    pub max_normal_af_ratio: f64,

    /// Keep records not passed by the caller, with the caller's filters retained
    #[arg(
        help_heading("Filter"),
        long = "keep-lq",
        default_value_t = DEFAULT_KEEP_LOW_QUALITY
    )]
    pub keep_low_quality: bool,
}

impl ClassifierArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, updates: impl FnOnce(&mut Self)) -> Self {
        updates(&mut self);
        self
    }
}

impl Default for ClassifierArgs {
    fn default() -> Self {
        Self {
            min_tumor_depth: DEFAULT_MIN_TUMOR_DEPTH,
            min_tumor_af: DEFAULT_MIN_TUMOR_AF,
            min_tumor_support: DEFAULT_MIN_TUMOR_SUPPORT,
            min_normal_depth: DEFAULT_MIN_NORMAL_DEPTH,
            max_normal_af_ratio: DEFAULT_MAX_NORMAL_AF_RATIO,
            keep_low_quality: DEFAULT_KEEP_LOW_QUALITY,
        }
    }
}

/// Initializes the verbosity level for logging based on the command-line arguments.
///
/// Info by default, `-v` for debug and `-vv` (or more) for trace output.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid thread number", s))?;
    if thread == 0 {
        return Err(anyhow!("Number of threads must be >= 1"));
    }
    Ok(thread)
}

fn fraction_in_range(s: &str) -> Result<f64> {
    let value: f64 = s
        .parse::<f64>()
        .map_err(|_| anyhow!("`{}` is not a valid allele frequency", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("Allele frequency must be within [0, 1], got {}", s));
    }
    Ok(value)
}

fn ratio_in_range(s: &str) -> Result<f64> {
    let value: f64 = s
        .parse::<f64>()
        .map_err(|_| anyhow!("`{}` is not a valid ratio", s))?;
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow!("Ratio must be a finite value >= 0, got {}", s));
    }
    Ok(value)
}

/// Checks if the provided file path exists.
fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}
