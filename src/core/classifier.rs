use super::{
    chromosome::is_standard_chromosome,
    comments::{filter_comment, sort_comments},
    filter_tag::{FilterStatus, FilterTag},
    genotype::{decode, snv_postcalls, GenotypeStats},
    header::{SampleColumns, SampleNames},
    record::{Record, RecordStream, VariantType},
};
use crate::{cli::ClassifierArgs, utils::util::Result};
use rayon::{prelude::*, ThreadPoolBuilder};

#[cfg(test)]
mod tests;

/// Outcome of classifying one input record.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Caller did not pass the record and low quality calls are not kept.
    Dropped,
    /// Primary call first, followed by any post-calls.
    Calls(Vec<Record>),
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    alternate: String,
    tumor: GenotypeStats,
    normal: GenotypeStats,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassifySummary {
    pub input: usize,
    pub dropped: usize,
    pub emitted: usize,
    pub postcalls: usize,
    pub passed: usize,
}

pub fn is_resolved_allele(allele: &str) -> bool {
    allele
        .chars()
        .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T'))
}

pub struct FilterClassifier<'a> {
    args: &'a ClassifierArgs,
    columns: SampleColumns,
}

impl<'a> FilterClassifier<'a> {
    pub fn new(args: &'a ClassifierArgs, columns: SampleColumns) -> Self {
        Self { args, columns }
    }

    pub fn classify(&self, record: &Record) -> Result<Classification> {
        if !self.args.keep_low_quality && !record.filter.is_pass() {
            log::trace!(
                "Dropping {}:{} {}>{} with filter {}",
                record.chrom,
                record.pos,
                record.reference,
                record.alternate,
                record.filter
            );
            return Ok(Classification::Dropped);
        }

        let mut base_tags = record.filter.tags();
        let resolved = is_resolved_allele(&record.alternate);
        if !resolved {
            base_tags.insert(FilterTag::UnresolvedAllele);
        }
        if !is_standard_chromosome(&record.chrom) {
            base_tags.insert(FilterTag::NonStandardChromosome);
        }

        let variant_type = record.variant_type();
        if variant_type == VariantType::Snv && !resolved {
            return Ok(Classification::Calls(vec![
                record.with_filter(FilterStatus::resolve(base_tags))
            ]));
        }

        let calls = self.calls(record, variant_type).map_err(|e| {
            crate::somx_error!(
                "Error at {} record {}:{}: {}",
                variant_type,
                record.chrom,
                record.pos,
                e
            )
        })?;

        Ok(Classification::Calls(
            calls
                .into_iter()
                .map(|call| {
                    let mut tags = base_tags.clone();
                    tags.extend(self.rule_tags(&call.tumor, &call.normal));
                    record.derive(call.alternate, FilterStatus::resolve(tags))
                })
                .collect(),
        ))
    }

    fn calls(&self, record: &Record, variant_type: VariantType) -> Result<Vec<Call>> {
        let tumor_value = record.sample(self.columns.tumor)?;
        let normal_value = record.sample(self.columns.normal)?;
        let tumor = decode(variant_type, &record.format, tumor_value, &record.alternate)?;
        let normal = decode(variant_type, &record.format, normal_value, &record.alternate)?;
        let primary = Call {
            alternate: record.alternate.clone(),
            tumor,
            normal,
        };

        let postcalls = match variant_type {
            VariantType::Indel => Vec::new(),
            VariantType::Snv => {
                let reference = record.reference.chars().next().unwrap_or('N');
                let alternate = record.alternate.chars().next().unwrap_or('N');
                snv_postcalls(
                    &record.format,
                    tumor_value,
                    reference,
                    alternate,
                    self.args.min_tumor_af,
                )?
            }
        };

        Ok(std::iter::once(primary)
            .chain(postcalls.into_iter().map(|(base, stats)| Call {
                alternate: base.to_string(),
                tumor: GenotypeStats {
                    depth: tumor.depth,
                    ..stats
                },
                normal,
            }))
            .collect())
    }

    /// Depth and frequency tags, in output order.
    pub fn rule_tags(&self, tumor: &GenotypeStats, normal: &GenotypeStats) -> Vec<FilterTag> {
        let args = self.args;
        let rules = [
            (
                tumor.supporting_reads() < args.min_tumor_support,
                FilterTag::TooFewSupportingReads,
            ),
            (tumor.depth < args.min_tumor_depth, FilterTag::TumorDepthLow),
            (normal.depth < args.min_normal_depth, FilterTag::NormalDepthLow),
            (tumor.frequency < args.min_tumor_af, FilterTag::TumorFreqLow),
            (
                normal.frequency > args.max_normal_af_ratio * tumor.frequency,
                FilterTag::NormalFreqHigh,
            ),
        ];
        rules
            .into_iter()
            .filter_map(|(triggered, tag)| triggered.then_some(tag))
            .collect()
    }
}

/// FILTER header description for a classifier tag.
pub fn filter_description(tag: &FilterTag, args: &ClassifierArgs) -> Option<String> {
    let description = match tag {
        FilterTag::UnresolvedAllele => "Allele unknown".to_string(),
        FilterTag::NonStandardChromosome => "Special chromosome".to_string(),
        FilterTag::TumorDepthLow => format!(
            "Sequencing depth in tumor is too low (< {})",
            args.min_tumor_depth
        ),
        FilterTag::TumorFreqLow => format!("Allele frequency in tumor < {}", args.min_tumor_af),
        FilterTag::NormalDepthLow => format!(
            "Sequencing depth in normal is too low (< {})",
            args.min_normal_depth
        ),
        FilterTag::NormalFreqHigh => format!(
            "Allele frequency in normal > {:.2} * allele frequency in tumor",
            args.max_normal_af_ratio
        ),
        FilterTag::TooFewSupportingReads => format!(
            "Less than {} supporting tumor reads",
            args.min_tumor_support
        ),
        FilterTag::OffTarget | FilterTag::Caller(_) => return None,
    };
    Some(description)
}

/// Classifies every record of a merged, normalized stream.
///
/// The caller's sample labels are replaced by `names`; records are classified on a
/// pool of `threads` workers and emitted in input order.
pub fn classify_stream(
    stream: RecordStream,
    args: &ClassifierArgs,
    names: &SampleNames,
    threads: usize,
) -> Result<(RecordStream, ClassifySummary)> {
    let columns = SampleColumns::from_header(&stream.header)?;
    let header = stream.header.reconcile_sample_names(names)?;
    log::debug!(
        "Sample columns: tumor={} ({}), normal={} ({})",
        columns.tumor,
        names.tumor,
        columns.normal,
        names.normal
    );

    let mut comments = stream.comments;
    comments.extend(FilterTag::CLASSIFIER_TAGS.iter().filter_map(|tag| {
        filter_description(tag, args).map(|description| filter_comment(tag.id(), &description))
    }));
    let comments = sort_comments(comments);

    let classifier = FilterClassifier::new(args, columns);
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| crate::somx_error!("Failed to build classifier thread pool: {e}"))?;
    let classified: Vec<Classification> = pool.install(|| {
        stream
            .records
            .par_iter()
            .map(|record| classifier.classify(record))
            .collect::<Result<Vec<_>>>()
    })?;

    let mut summary = ClassifySummary {
        input: stream.records.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(classified.len());
    for classification in classified {
        match classification {
            Classification::Dropped => summary.dropped += 1,
            Classification::Calls(calls) => {
                summary.postcalls += calls.len().saturating_sub(1);
                records.extend(calls);
            }
        }
    }
    summary.emitted = records.len();
    summary.passed = records.iter().filter(|r| r.filter.is_pass()).count();

    Ok((RecordStream::new(comments, header, records), summary))
}

