use crate::{
    cli::{ClassifierArgs, FilterArgs},
    core::{
        classifier::{classify_stream, ClassifySummary},
        header::SampleNames,
        record::RecordStream,
        region_flagger::flag_off_target,
    },
    io::{bed_reader::TargetRegions, vcf_reader::read_vcf, vcf_writer::write_vcf},
    utils::util::{format_number_with_commas, Result},
};
use std::path::Path;

/// Classifies `stream` and, with a target BED, flags records outside of it.
pub fn apply_filters(
    stream: RecordStream,
    args: &ClassifierArgs,
    names: &SampleNames,
    target: Option<&Path>,
    threads: usize,
) -> Result<RecordStream> {
    let (classified, summary) = classify_stream(stream, args, names, threads)?;
    log_summary(&summary);

    let Some(target) = target else {
        return Ok(classified);
    };
    log::debug!("Filter: Loading target regions from {}", target.display());
    let targets = TargetRegions::new(target)?;
    let (flagged, off_target) = flag_off_target(classified, &targets);
    log::info!(
        "Flagged {} record(s) as off-target",
        format_number_with_commas(off_target)
    );
    Ok(flagged)
}

fn log_summary(summary: &ClassifySummary) {
    log::info!(
        "Classified {} record(s): {} dropped, {} written ({} post-calls), {} PASS",
        format_number_with_commas(summary.input),
        format_number_with_commas(summary.dropped),
        format_number_with_commas(summary.emitted),
        format_number_with_commas(summary.postcalls),
        format_number_with_commas(summary.passed)
    );
}

pub fn filter(args: FilterArgs) -> Result<()> {
    let stream = read_vcf(&args.vcf)?;
    let names = SampleNames::from_sources(&args.tumor, &args.normal);
    let filtered = apply_filters(
        stream,
        &args.classifier_args,
        &names,
        args.target.as_deref(),
        args.num_threads,
    )?;
    write_vcf(&filtered, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::{snv_line, vcf_text};
    use std::fs;

    fn filter_args(dir: &Path, lines: &[String], target: Option<&str>) -> FilterArgs {
        let vcf = dir.join("normalized.vcf");
        fs::write(&vcf, vcf_text(&["##fileformat=VCFv4.1"], lines)).unwrap();
        let target = target.map(|bed| {
            let path = dir.join("targets.bed");
            fs::write(&path, bed).unwrap();
            path
        });
        FilterArgs {
            vcf,
            tumor: "/data/patient1_tumor.bam".to_string(),
            normal: "/data/patient1_normal.bam".to_string(),
            output: Some(dir.join("filtered.vcf").display().to_string()),
            target,
            num_threads: 2,
            classifier_args: ClassifierArgs::default(),
        }
    }

    #[test]
    fn test_filter_writes_classified_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut lines = vec![
            snv_line("chr1", 100, "A", "G"),
            snv_line("chr1", 200, "A", "G"),
            snv_line("chrUn_gl000220", 300, "A", "G"),
        ];
        lines[1] = lines[1].replace("\tPASS\t", "\tLowQscore\t");
        let args = filter_args(dir.path(), &lines, None);
        let output = dir.path().join("filtered.vcf");

        filter(args).unwrap();
        let filtered = read_vcf(&output).unwrap();
        assert_eq!(
            filtered.header.sample_names(),
            &["patient1_normal".to_string(), "patient1_tumor".to_string()]
        );
        let filters: Vec<String> = filtered.records.iter().map(|r| r.filter.to_string()).collect();
        assert_eq!(filters, vec!["PASS", "special-chromosome"]);
        let filter_lines = filtered
            .comments
            .iter()
            .filter(|line| line.starts_with("##FILTER="))
            .count();
        assert_eq!(filter_lines, 7);
    }

    #[test]
    fn test_filter_flags_off_target_records() {
        let dir = tempfile::tempdir().unwrap();
        let lines = vec![snv_line("chr1", 100, "A", "G"), snv_line("chr1", 5000, "A", "G")];
        let args = filter_args(dir.path(), &lines, Some("chr1\t50\t150\n"));
        let output = dir.path().join("filtered.vcf");

        filter(args).unwrap();
        let filtered = read_vcf(&output).unwrap();
        let filters: Vec<String> = filtered.records.iter().map(|r| r.filter.to_string()).collect();
        assert_eq!(filters, vec!["PASS", "off-target"]);
        assert!(filtered
            .comments
            .iter()
            .any(|line| line.starts_with("##FILTER=<ID=off-target")));
    }
}
