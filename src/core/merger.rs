use super::{
    comments::{apply_rules, sort_comments, union_comments, MERGE_COMMENT_RULES},
    record::{Record, RecordStream},
};
use crate::{constants::ALLELE_PADDING, error::SomxError, utils::util::Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub snvs: usize,
    pub indels: usize,
    pub trimmed_indels: usize,
}

fn trim_padding(allele: &str) -> &str {
    allele.trim_matches(ALLELE_PADDING)
}

/// Strips the caller's padding from both alleles of an indel.
///
/// Long indels occasionally come out of the caller with leading or trailing
/// padding characters; this undoes that until the caller is fixed.
pub fn clean_indel(record: Record) -> (Record, bool) {
    let reference = trim_padding(&record.reference);
    let alternate = trim_padding(&record.alternate);
    let changed = reference.len() != record.reference.len()
        || alternate.len() != record.alternate.len();
    if !changed {
        return (record, false);
    }
    let cleaned = Record {
        reference: reference.to_string(),
        alternate: alternate.to_string(),
        ..record
    };
    (cleaned, true)
}

/// Merges the caller's SNV and indel outputs into one stream.
///
/// SNVs come first, then indels, each in input order. The header is the SNV header.
pub fn merge_streams(snvs: RecordStream, indels: RecordStream) -> Result<(RecordStream, MergeSummary)> {
    if snvs.header != indels.header {
        return Err(SomxError::HeaderMismatch {
            snv: snvs.header.columns().to_vec(),
            indel: indels.header.columns().to_vec(),
        });
    }

    let comments = sort_comments(apply_rules(
        union_comments(&snvs.comments, &indels.comments),
        MERGE_COMMENT_RULES,
    ));

    let mut summary = MergeSummary {
        snvs: snvs.records.len(),
        indels: indels.records.len(),
        trimmed_indels: 0,
    };

    let mut records = snvs.records;
    records.reserve(indels.records.len());
    for indel in indels.records {
        let (cleaned, trimmed) = clean_indel(indel);
        if trimmed {
            log::trace!(
                "Removed allele padding at {}:{}",
                cleaned.chrom,
                cleaned.pos
            );
            summary.trimmed_indels += 1;
        }
        records.push(cleaned);
    }

    if summary.trimmed_indels > 0 {
        log::warn!(
            "Removed '{}' padding from the alleles of {} indel(s)",
            ALLELE_PADDING,
            summary.trimmed_indels
        );
    }

    Ok((RecordStream::new(comments, snvs.header, records), summary))
}
