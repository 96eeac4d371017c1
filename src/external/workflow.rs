//! Steps of the pipeline delegated to external programs.

use super::tool::ExternalTool;
use crate::{cli::RunArgs, utils::util::Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub const CONFIGURE_SCRIPT: &str = "configureStrelkaSomaticWorkflow.py";
pub const RUN_SCRIPT: &str = "runWorkflow.py";
pub const SPLITTER: &str = "vcfbreakmulti";
pub const LEFT_NORMALIZER: &str = "VcfLeftNormalize";
pub const SORTER: &str = "VcfSort";

/// Memory limit (GB) handed to the caller's workflow runner.
const CALLER_MEMORY_GB: usize = 4;

/// Reference FASTA of a genome build: `<genome_dir>/<build>.fa`.
pub fn genome_fasta(genome_dir: &Path, build: &str) -> PathBuf {
    genome_dir.join(format!("{build}.fa"))
}

/// Raw caller output inside its run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerOutput {
    pub snvs: PathBuf,
    pub indels: PathBuf,
}

impl CallerOutput {
    pub fn in_run_dir(run_dir: &Path) -> Self {
        let variants = run_dir.join("results").join("variants");
        Self {
            snvs: variants.join("somatic.snvs.vcf.gz"),
            indels: variants.join("somatic.indels.vcf.gz"),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| crate::somx_error!("Failed to resolve {}: {}", path.display(), e))
}

/// Arguments of the caller's configuration script.
pub fn configure_args(args: &RunArgs, reference: &Path, run_dir: &Path) -> Result<Vec<OsString>> {
    let mut configure: Vec<OsString> = vec![
        "--tumor".into(),
        absolute(&args.tumor_bam)?.into(),
        "--normal".into(),
        absolute(&args.normal_bam)?.into(),
        "--referenceFasta".into(),
        reference.into(),
        "--runDir".into(),
        run_dir.into(),
    ];
    if let Some(ref config) = args.config {
        configure.push("--config".into());
        configure.push(config.into());
    }
    if !args.wgs {
        configure.push("--exome".into());
    }
    if let Some(ref small_indels) = args.small_indels {
        configure.push("--indelCandidates".into());
        configure.push(small_indels.into());
    }
    if let Some(ref region) = args.debug_region {
        configure.push("--region".into());
        configure.push(region.into());
    }
    Ok(configure)
}

/// Configures and runs the somatic caller, returning its raw outputs.
pub fn run_caller(args: &RunArgs, reference: &Path, run_dir: &Path) -> Result<CallerOutput> {
    let configure = ExternalTool::locate(CONFIGURE_SCRIPT, args.strelka_dir.as_deref());
    configure.run(configure_args(args, reference, run_dir)?)?;

    let workflow = ExternalTool::locate(RUN_SCRIPT, Some(run_dir));
    workflow.run([
        "-m".to_string(),
        "local".to_string(),
        "-j".to_string(),
        args.num_threads.to_string(),
        "-g".to_string(),
        CALLER_MEMORY_GB.to_string(),
    ])?;

    let output = CallerOutput::in_run_dir(run_dir);
    for path in [&output.snvs, &output.indels] {
        if !path.exists() {
            return Err(crate::somx_error!(
                "Caller finished without writing {}",
                path.display()
            ));
        }
    }
    Ok(output)
}

/// Splits multi-allelic records of `input` into one record per alternate allele.
pub fn split_multiallelic(tools_dir: Option<&Path>, input: &Path, output: &Path) -> Result<()> {
    ExternalTool::locate(SPLITTER, tools_dir).filter_file(Vec::<&str>::new(), input, output)
}

/// Left-aligns indels against `reference` and sorts by coordinate.
pub fn normalize(
    tools_dir: Option<&Path>,
    reference: &Path,
    input: &Path,
    aligned: &Path,
    sorted: &Path,
) -> Result<()> {
    let left_normalize = ExternalTool::locate(LEFT_NORMALIZER, tools_dir);
    left_normalize.run([
        OsString::from("-in"),
        input.into(),
        "-out".into(),
        aligned.into(),
        "-ref".into(),
        reference.into(),
    ])?;
    ExternalTool::locate(SORTER, tools_dir).run([
        OsString::from("-in"),
        aligned.into(),
        "-out".into(),
        sorted.into(),
    ])
}
