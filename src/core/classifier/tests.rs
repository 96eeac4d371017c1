use super::*;
use crate::{
    cli::ClassifierArgs,
    core::{
        filter_tag::FilterSet,
        header::{Header, SampleColumns, SampleNames},
        merger::merge_streams,
        test_utils::{caller_header, indel_record, snv_line, snv_record, stream_from_lines},
    },
    utils::util::init_logger,
};
use approx::assert_relative_eq;

fn columns() -> SampleColumns {
    SampleColumns::from_header(&caller_header()).unwrap()
}

fn classify(args: &ClassifierArgs, record: &Record) -> Vec<Record> {
    match FilterClassifier::new(args, columns()).classify(record).unwrap() {
        Classification::Calls(calls) => calls,
        Classification::Dropped => panic!("record should not be dropped"),
    }
}

fn tag_ids(record: &Record) -> Vec<String> {
    match &record.filter {
        FilterStatus::Tags(tags) => tags.iter().map(|t| t.id().to_string()).collect(),
        FilterStatus::Pass => vec!["PASS".to_string()],
        FilterStatus::Missing => vec![".".to_string()],
    }
}

fn keep_lq() -> ClassifierArgs {
    ClassifierArgs::new().with(|args| args.keep_low_quality = true)
}

#[test]
fn test_scenario_a_clean_snv_passes() {
    init_logger();
    let args = ClassifierArgs::new();
    // tumor: depth 30, G at 0.40; normal: depth 25, no G
    let record = snv_record("chr1", "A", "G", "PASS", [18, 0, 12, 0], [25, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].filter.is_pass());
    assert_eq!(calls[0].alternate, "G");

    let classifier = FilterClassifier::new(&args, columns());
    let tumor = GenotypeStats::from_counts(12, 30);
    let normal = GenotypeStats::from_counts(0, 25);
    assert!(classifier.rule_tags(&tumor, &normal).is_empty());
}

#[test]
fn test_scenario_b_low_tumor_depth() {
    let args = ClassifierArgs::new();
    let record = snv_record("chr1", "A", "G", "PASS", [6, 0, 4, 0], [25, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 1);
    assert_eq!(tag_ids(&calls[0]), vec!["depth-tum"]);
}

#[test]
fn test_scenario_c_trimmed_indel_low_frequency() {
    let args = ClassifierArgs::new();
    let mut indel = indel_record("ATG", "A..", "PASS", (49, 1), (40, 0));
    indel.pos = 3000;
    let indels = RecordStream::new(Vec::new(), caller_header(), vec![indel]);
    let snvs = stream_from_lines(&[], &[]);
    let (merged, _) = merge_streams(snvs, indels).unwrap();
    assert_eq!(merged.records[0].alternate, "A");

    let calls = classify(&args, &merged.records[0]);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].alternate, "A");
    let ids = tag_ids(&calls[0]);
    assert!(ids.contains(&"freq-tum".to_string()));
    assert_eq!(ids, vec!["lt-3-reads", "freq-tum"]);
}

#[test]
fn test_scenario_d_unresolved_allele_skips_statistics() {
    let args = ClassifierArgs::new();
    // statistics would trigger every depth rule if they were evaluated
    let record = snv_record("chr1", "A", "N", "PASS", [1, 0, 0, 0], [1, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 1);
    assert_eq!(tag_ids(&calls[0]), vec!["all-unknown"]);
}

#[test]
fn test_unresolved_allele_on_indel_still_decodes() {
    let args = ClassifierArgs::new();
    let record = indel_record("A", "AN", "PASS", (10, 0), (30, 0));
    let calls = classify(&args, &record);
    assert_eq!(
        tag_ids(&calls[0]),
        vec!["all-unknown", "lt-3-reads", "depth-tum", "freq-tum"]
    );
}

#[test]
fn test_scenario_e_special_chromosome_keeps_other_rules() {
    let args = ClassifierArgs::new();
    let record = snv_record("chrUn_random", "A", "G", "PASS", [6, 0, 4, 0], [25, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(tag_ids(&calls[0]), vec!["special-chromosome", "depth-tum"]);

    let clean = snv_record("chrUn_random", "A", "G", "PASS", [18, 0, 12, 0], [25, 0, 0, 0]);
    assert_eq!(tag_ids(&classify(&args, &clean)[0]), vec!["special-chromosome"]);
}

#[test]
fn test_rule_order() {
    let args = ClassifierArgs::new();
    let classifier = FilterClassifier::new(&args, columns());
    // tumor 0/10, normal 2/5
    let tumor = GenotypeStats::from_counts(0, 10);
    let normal = GenotypeStats::from_counts(2, 5);
    let ids: Vec<String> = classifier
        .rule_tags(&tumor, &normal)
        .iter()
        .map(|tag| tag.id().to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["lt-3-reads", "depth-tum", "depth-nor", "freq-tum", "freq-nor"]
    );
}

#[test]
fn test_normal_frequency_is_relative_to_tumor() {
    let args = ClassifierArgs::new();
    // tumor G at 0.6 allows a normal frequency up to 0.1
    let ok = snv_record("chr1", "A", "G", "PASS", [20, 0, 30, 0], [28, 0, 2, 0]);
    assert!(classify(&args, &ok)[0].filter.is_pass());
    let high = snv_record("chr1", "A", "G", "PASS", [20, 0, 30, 0], [24, 0, 6, 0]);
    assert_eq!(tag_ids(&classify(&args, &high)[0]), vec!["freq-nor"]);
}

#[test]
fn test_supporting_read_threshold_uses_exact_counts() {
    let args = ClassifierArgs::new();
    // tumor depth 47 with exactly 3 G reads, frequency 0.064
    let record = snv_record("chr1", "A", "G", "PASS", [44, 0, 3, 0], [30, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].filter.is_pass());

    let args = ClassifierArgs::new().with(|args| args.min_tumor_af = 0.0);
    let record = snv_record("chr1", "A", "G", "PASS", [45, 0, 2, 0], [30, 0, 0, 0]);
    assert_eq!(tag_ids(&classify(&args, &record)[0]), vec!["lt-3-reads"]);
}

#[test]
fn test_low_quality_record_dropped_by_default() {
    let args = ClassifierArgs::new();
    let record = snv_record("chr1", "A", "G", "LowEVS", [18, 0, 12, 0], [25, 0, 0, 0]);
    let classifier = FilterClassifier::new(&args, columns());
    assert_eq!(classifier.classify(&record).unwrap(), Classification::Dropped);

    let missing = record.with_filter(FilterStatus::Missing);
    assert_eq!(classifier.classify(&missing).unwrap(), Classification::Dropped);
}

#[test]
fn test_keep_low_quality_retains_caller_tags() {
    let args = keep_lq();
    let record = snv_record("chr1", "A", "G", "LowEVS;LowDepth", [6, 0, 4, 0], [25, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(tag_ids(&calls[0]), vec!["LowEVS", "LowDepth", "depth-tum"]);

    let caller_tags = record.filter.tags();
    let final_tags = calls[0].filter.tags();
    assert!(caller_tags.iter().all(|tag| final_tags.contains(tag)));
}

#[test]
fn test_keep_low_quality_clean_caller_tags_pass() {
    let args = keep_lq();
    let record = snv_record("chr1", "A", "G", ".", [18, 0, 12, 0], [25, 0, 0, 0]);
    assert!(classify(&args, &record)[0].filter.is_pass());
}

#[test]
fn test_reclassification_is_idempotent() {
    let args = keep_lq();
    let records = [
        snv_record("chr1", "A", "G", "PASS", [18, 0, 12, 0], [25, 0, 0, 0]),
        snv_record("chrUn_random", "A", "G", "LowEVS", [6, 0, 4, 0], [2, 0, 1, 0]),
        snv_record("chr1", "A", "N", "PASS", [6, 0, 4, 0], [25, 0, 0, 0]),
        indel_record("ATG", "A", "PASS", (49, 1), (40, 0)),
    ];
    for record in &records {
        let first = classify(&args, record);
        let again = classify(&args, &first[0]);
        assert_eq!(first[0].filter, again[0].filter);
    }
}

#[test]
fn test_lowering_min_tumor_depth_is_monotone() {
    let records = [
        snv_record("chr1", "A", "G", "PASS", [6, 0, 4, 0], [25, 0, 0, 0]),
        snv_record("chr1", "A", "G", "PASS", [18, 0, 12, 0], [25, 0, 0, 0]),
        indel_record("AT", "A", "PASS", (10, 5), (40, 0)),
    ];
    for record in &records {
        let mut had_tag = true;
        for min_depth in (0..=40).rev() {
            let args = ClassifierArgs::new().with(|args| args.min_tumor_depth = min_depth);
            let tags = classify(&args, record)[0].filter.tags();
            let has_tag = tags.contains(&FilterTag::TumorDepthLow);
            assert!(had_tag || !has_tag, "tag appeared at min depth {min_depth}");
            had_tag = has_tag;
        }
    }
}

#[test]
fn test_postcall_expansion() {
    let args = ClassifierArgs::new();
    // tumor depth 40: G at 0.3, T at 0.2, C at 0.025
    let record = snv_record("chr1", "A", "G", "PASS", [19, 1, 12, 8], [30, 0, 0, 0]);
    let calls = classify(&args, &record);
    let alts: Vec<&str> = calls.iter().map(|r| r.alternate.as_str()).collect();
    assert_eq!(alts, vec!["G", "T"]);
    for call in &calls {
        assert_eq!(call.chrom, record.chrom);
        assert_eq!(call.pos, record.pos);
        assert_eq!(call.reference, record.reference);
        assert_eq!(call.format, record.format);
        assert!(call.filter.is_pass());
    }
}

#[test]
fn test_postcalls_never_below_frequency_threshold() {
    for min_af in [0.01, 0.05, 0.1, 0.25] {
        let args = ClassifierArgs::new().with(|args| args.min_tumor_af = min_af);
        let record = snv_record("chr1", "A", "G", "PASS", [50, 3, 30, 17], [30, 0, 0, 0]);
        let calls = classify(&args, &record);
        for derived in &calls[1..] {
            assert!(!derived.filter.tags().contains(&FilterTag::TumorFreqLow));
        }
        let tumor = record.sample(columns().tumor).unwrap();
        for (_, stats) in snv_postcalls(&record.format, tumor, 'A', 'G', min_af).unwrap() {
            assert!(stats.frequency >= min_af);
        }
    }
}

#[test]
fn test_postcalls_inherit_base_tags() {
    let args = keep_lq();
    let record = snv_record("chrM", "A", "G", "LowEVS", [20, 0, 12, 8], [30, 0, 0, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(tag_ids(call), vec!["LowEVS", "special-chromosome"]);
    }
}

#[test]
fn test_decode_error_carries_record_context() {
    let args = ClassifierArgs::new();
    let mut record = snv_record("chr5", "A", "G", "PASS", [18, 0, 12, 0], [25, 0, 0, 0]);
    record.samples[1] = "30:0:0".to_string();
    let err = FilterClassifier::new(&args, columns())
        .classify(&record)
        .unwrap_err();
    assert!(err.to_string().contains("chr5:1000"));
}

#[test]
fn test_resolved_alleles() {
    assert!(is_resolved_allele("ACGT"));
    assert!(is_resolved_allele("acgt"));
    assert!(!is_resolved_allele("N"));
    assert!(!is_resolved_allele("A*"));
    assert!(!is_resolved_allele("<DEL>"));
}

#[test]
fn test_filter_descriptions_use_thresholds() {
    let args = ClassifierArgs::new().with(|args| args.min_tumor_depth = 35);
    assert_eq!(
        filter_description(&FilterTag::TumorDepthLow, &args).unwrap(),
        "Sequencing depth in tumor is too low (< 35)"
    );
    assert_eq!(
        filter_description(&FilterTag::NormalFreqHigh, &args).unwrap(),
        "Allele frequency in normal > 0.17 * allele frequency in tumor"
    );
    assert!(filter_description(&FilterTag::OffTarget, &args).is_none());
}

#[test]
fn test_classify_stream() {
    let args = ClassifierArgs::new();
    let mut lines = vec![
        snv_line("chr1", 100, "A", "G"),
        snv_line("chr1", 200, "C", "N"),
        snv_line("chr2", 300, "A", "G"),
    ];
    lines[1] = lines[1].replace("\tPASS\t", "\tLowEVS\t");
    let stream = stream_from_lines(&["##fileformat=VCFv4.1", "##FORMAT=<ID=DP>"], &lines);
    let names = SampleNames::from_sources("/bams/tumor_01.bam", "/bams/normal_01.bam");

    let (classified, summary) = classify_stream(stream, &args, &names, 2).unwrap();
    assert_eq!(
        classified.header,
        Header::parse("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tnormal_01\ttumor_01")
            .unwrap()
    );
    let positions: Vec<u64> = classified.records.iter().map(|r| r.pos).collect();
    assert_eq!(positions, vec![100, 300]);
    assert_eq!(
        summary,
        ClassifySummary {
            input: 3,
            dropped: 1,
            emitted: 2,
            postcalls: 0,
            passed: 2,
        }
    );

    assert_eq!(classified.comments[0], "##fileformat=VCFv4.1");
    assert_eq!(classified.comments.last().unwrap(), "##FORMAT=<ID=DP>");
    let filter_lines = classified
        .comments
        .iter()
        .filter(|line| line.starts_with("##FILTER="))
        .count();
    assert_eq!(filter_lines, FilterTag::CLASSIFIER_TAGS.len());
}

#[test]
fn test_classify_stream_requires_role_labels() {
    let args = ClassifierArgs::new();
    let mut stream = stream_from_lines(&[], &[]);
    stream.header = Header::parse("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tN\tT")
        .unwrap();
    let names = SampleNames::from_sources("t.bam", "n.bam");
    assert!(classify_stream(stream, &args, &names, 1).is_err());
}

#[test]
fn test_derived_frequency_is_recomputed() {
    let args = ClassifierArgs::new();
    let record = snv_record("chr1", "A", "G", "PASS", [20, 0, 12, 8], [30, 0, 0, 0]);
    let tumor = record.sample(columns().tumor).unwrap();
    let postcalls = snv_postcalls(&record.format, tumor, 'A', 'G', args.min_tumor_af).unwrap();
    assert_eq!(postcalls.len(), 1);
    assert_relative_eq!(postcalls[0].1.frequency, 0.2);
    let tags: FilterSet = classify(&args, &record)[1].filter.tags();
    assert!(tags.is_empty());
}

#[test]
fn test_postcalls_use_primary_normal_statistics() {
    let args = ClassifierArgs::new();
    // normal supports T at 0.33 but not the called G
    let record = snv_record("chr1", "A", "G", "PASS", [20, 0, 12, 8], [20, 0, 0, 10]);
    let calls = classify(&args, &record);
    let alts: Vec<&str> = calls.iter().map(|r| r.alternate.as_str()).collect();
    assert_eq!(alts, vec!["G", "T"]);
    assert!(calls[1].filter.is_pass());
}

#[test]
fn test_postcalls_inherit_primary_normal_frequency() {
    let args = ClassifierArgs::new();
    // normal G at 0.2 exceeds 1/6 of both tumor G (0.3) and tumor T (0.2)
    let record = snv_record("chr1", "A", "G", "PASS", [20, 0, 12, 8], [24, 0, 6, 0]);
    let calls = classify(&args, &record);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].alternate, "T");
    assert_eq!(tag_ids(&calls[0]), vec!["freq-nor"]);
    assert_eq!(tag_ids(&calls[1]), vec!["freq-nor"]);
}
