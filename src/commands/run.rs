use super::{filter::apply_filters, merge::merge_files};
use crate::{
    cli::RunArgs,
    core::header::SampleNames,
    external::workflow::{genome_fasta, normalize, run_caller, split_multiallelic},
    io::{vcf_reader::read_vcf, vcf_writer::write_vcf},
    utils::util::{try_exists, Result},
};
use std::{
    fs,
    path::{Path, PathBuf},
    time,
};
use tempfile::TempDir;

/// Intermediate files of one pipeline run.
struct WorkFiles {
    run_dir: PathBuf,
    snvs: PathBuf,
    indels: PathBuf,
    merged: PathBuf,
    aligned: PathBuf,
    sorted: PathBuf,
}

impl WorkFiles {
    fn in_dir(dir: &Path) -> Self {
        Self {
            run_dir: dir.join("strelka"),
            snvs: dir.join("somatic.snvs.split.vcf"),
            indels: dir.join("somatic.indels.split.vcf"),
            merged: dir.join("somatic.merged.vcf"),
            aligned: dir.join("somatic.left_aligned.vcf"),
            sorted: dir.join("somatic.sorted.vcf"),
        }
    }
}

/// Analysis directory, kept when given and removed on drop otherwise.
enum WorkDir {
    Kept(PathBuf),
    Temporary(TempDir),
}

impl WorkDir {
    fn create(analysis_dir: Option<&Path>) -> Result<Self> {
        match analysis_dir {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|e| {
                    crate::somx_error!("Failed to create {}: {}", dir.display(), e)
                })?;
                Ok(WorkDir::Kept(dir.to_path_buf()))
            }
            None => Ok(WorkDir::Temporary(tempfile::Builder::new().prefix("somx").tempdir()?)),
        }
    }

    fn path(&self) -> &Path {
        match self {
            WorkDir::Kept(dir) => dir.as_path(),
            WorkDir::Temporary(dir) => dir.path(),
        }
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let reference = genome_fasta(&args.genome_dir, &args.build);
    try_exists(&reference)?;

    let work_dir = WorkDir::create(args.analysis_dir.as_deref())?;
    log::debug!("Run: Working directory {}", work_dir.path().display());
    let files = WorkFiles::in_dir(work_dir.path());
    let tools_dir = args.tools_dir.as_deref();

    let timer = time::Instant::now();
    log::info!("Calling somatic variants with {} threads", args.num_threads);
    let caller_output = run_caller(&args, &reference, &files.run_dir)?;
    log::info!("Variant calling finished in {:.2?}", timer.elapsed());

    let timer = time::Instant::now();
    split_multiallelic(tools_dir, &caller_output.snvs, &files.snvs)?;
    split_multiallelic(tools_dir, &caller_output.indels, &files.indels)?;
    let (merged, _) = merge_files(&files.snvs, &files.indels)?;
    let merged_path = files.merged.to_str().ok_or_else(|| {
        crate::somx_error!("Invalid UTF-8 in path {}", files.merged.display())
    })?;
    write_vcf(&merged, Some(merged_path))?;
    drop(merged);

    normalize(
        tools_dir,
        &reference,
        &files.merged,
        &files.aligned,
        &files.sorted,
    )?;
    log::info!("Merging and normalization finished in {:.2?}", timer.elapsed());

    let timer = time::Instant::now();
    let names = SampleNames::from_sources(
        &args.tumor_bam.to_string_lossy(),
        &args.normal_bam.to_string_lossy(),
    );
    let filtered = apply_filters(
        read_vcf(&files.sorted)?,
        &args.classifier_args,
        &names,
        args.target.as_deref(),
        args.num_threads,
    )?;
    write_vcf(&filtered, Some(args.output.as_str()))?;
    log::info!(
        "Filtering finished in {:.2?}, output written to {}",
        timer.elapsed(),
        args.output
    );
    Ok(())
}
