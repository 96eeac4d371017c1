use crate::{
    cli::MergeArgs,
    core::{
        merger::{merge_streams, MergeSummary},
        record::RecordStream,
    },
    io::{vcf_reader::read_vcf, vcf_writer::write_vcf},
    utils::util::{format_number_with_commas, Result},
};
use std::path::Path;

/// Reads and merges the caller's SNV and indel files.
pub fn merge_files(snvs: &Path, indels: &Path) -> Result<(RecordStream, MergeSummary)> {
    log::debug!("Merge: Reading SNVs from {}", snvs.display());
    let snv_stream = read_vcf(snvs)?;
    log::debug!("Merge: Reading indels from {}", indels.display());
    let indel_stream = read_vcf(indels)?;

    let (merged, summary) = merge_streams(snv_stream, indel_stream)?;
    log::info!(
        "Merged {} SNVs and {} indels",
        format_number_with_commas(summary.snvs),
        format_number_with_commas(summary.indels)
    );
    Ok((merged, summary))
}

pub fn merge(args: MergeArgs) -> Result<()> {
    let (merged, _) = merge_files(&args.snvs, &args.indels)?;
    write_vcf(&merged, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::test_utils::{snv_line, vcf_text},
        io::vcf_reader::read_vcf,
    };
    use std::fs;

    #[test]
    fn test_merge_files_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let snvs = dir.path().join("somatic.snvs.vcf");
        let indels = dir.path().join("somatic.indels.vcf");
        let output = dir.path().join("merged.vcf");
        fs::write(
            &snvs,
            vcf_text(
                &["##fileformat=VCFv4.1", "##source=strelka"],
                &[snv_line("chr1", 100, "A", "G")],
            ),
        )
        .unwrap();
        let indel = "chr1\t50\t.\tAT.\tA\t.\tPASS\tSOMATIC\tDP:TAR:TIR\t30:28,28:0,0\t30:20,20:10,10"
            .to_string();
        fs::write(
            &indels,
            vcf_text(
                &["##fileformat=VCFv4.1", "##contig=<ID=chr1,length=1000>"],
                &[indel],
            ),
        )
        .unwrap();

        let args = MergeArgs {
            snvs,
            indels,
            output: Some(output.display().to_string()),
        };
        merge(args).unwrap();

        let merged = read_vcf(&output).unwrap();
        assert_eq!(
            merged.comments,
            vec![
                "##fileformat=VCFv4.1".to_string(),
                "##source=strelka".to_string(),
                "##contig=<ID=chr1,length=1000>".to_string(),
            ]
        );
        assert_eq!(merged.records.len(), 2);
        assert_eq!(merged.records[0].pos, 100);
        assert_eq!(merged.records[1].reference, "AT");
    }

    #[test]
    fn test_merge_rejects_different_samples() {
        let dir = tempfile::tempdir().unwrap();
        let snvs = dir.path().join("snvs.vcf");
        let indels = dir.path().join("indels.vcf");
        fs::write(&snvs, vcf_text(&[], &[])).unwrap();
        fs::write(
            &indels,
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tTUMOR\tNORMAL\n",
        )
        .unwrap();
        assert!(merge_files(&snvs, &indels).is_err());
    }
}
