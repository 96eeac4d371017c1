use super::{
    comments::{filter_comment, sort_comments},
    filter_tag::{FilterStatus, FilterTag},
    record::{Record, RecordStream},
};
use crate::io::bed_reader::TargetRegions;

pub const OFF_TARGET_DESCRIPTION: &str = "Variant marked as 'off-target'.";

/// Adds `off-target` to records not overlapping any target region.
pub fn flag_record(record: Record, targets: &TargetRegions) -> (Record, bool) {
    let (start, stop) = record.span();
    if targets.overlaps(&record.chrom, start, stop) {
        return (record, false);
    }
    let mut tags = record.filter.tags();
    tags.insert(FilterTag::OffTarget);
    let flagged = Record {
        filter: FilterStatus::resolve(tags),
        ..record
    };
    (flagged, true)
}

pub fn flag_off_target(stream: RecordStream, targets: &TargetRegions) -> (RecordStream, usize) {
    let mut comments = stream.comments;
    comments.push(filter_comment(
        FilterTag::OffTarget.id(),
        OFF_TARGET_DESCRIPTION,
    ));

    let mut flagged = 0;
    let records = stream
        .records
        .into_iter()
        .map(|record| {
            let (record, off_target) = flag_record(record, targets);
            flagged += usize::from(off_target);
            record
        })
        .collect();

    (
        RecordStream::new(sort_comments(comments), stream.header, records),
        flagged,
    )
}
