//! Depth and allele frequency statistics from the caller's per-sample FORMAT values.
//!
//! SNV records carry one `<base>U` key per nucleotide (`AU`, `CU`, `GU`, `TU`),
//! indel records carry `TAR` (reference support) and `TIR` (indel support).
//! Every such value is a `tier1,tier2` pair, only tier 1 is used.

use super::record::VariantType;
use crate::{error::SomxError, utils::util::Result};
use std::collections::HashMap;

/// Base order of the caller's allele-specific count keys.
pub const SNV_BASES: [char; 4] = ['A', 'C', 'G', 'T'];

const INDEL_REF_KEY: &str = "TAR";
const INDEL_ALT_KEY: &str = "TIR";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeStats {
    pub depth: u32,
    /// Tier 1 reads supporting the allele, equal to `depth * frequency`.
    pub supporting: u32,
    pub frequency: f64,
}

impl GenotypeStats {
    pub fn from_counts(supporting: u32, depth: u32) -> Self {
        let frequency = if depth == 0 {
            0.0
        } else {
            f64::from(supporting) / f64::from(depth)
        };
        Self {
            depth,
            supporting,
            frequency,
        }
    }

    /// Reads supporting the allele (depth times frequency, rounded down).
    pub fn supporting_reads(&self) -> u32 {
        self.supporting
    }
}

/// One sample's FORMAT values keyed by the FORMAT schema.
#[derive(Debug)]
pub struct SampleFields<'a> {
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> SampleFields<'a> {
    pub fn parse(format: &'a str, sample: &'a str) -> Result<Self> {
        let keys: Vec<&str> = format.split(':').collect();
        let values: Vec<&str> = sample.split(':').collect();
        if keys.len() != values.len() {
            return Err(SomxError::decode(format!(
                "FORMAT '{format}' has {} fields but sample value '{sample}' has {}",
                keys.len(),
                values.len()
            )));
        }
        Ok(Self {
            fields: keys.into_iter().zip(values).collect(),
        })
    }

    /// First (tier 1) entry of a `tier1,tier2` count.
    pub fn tier1(&self, key: &str) -> Result<u32> {
        let value = self
            .fields
            .get(key)
            .ok_or_else(|| SomxError::decode(format!("FORMAT field {key} missing")))?;
        let tier1 = value.split(',').next().unwrap_or_default();
        tier1.parse::<u32>().map_err(|_| {
            SomxError::decode(format!(
                "FORMAT field {key} has non-numeric tier1 count '{value}'"
            ))
        })
    }

    fn base_counts(&self) -> Result<[u32; 4]> {
        let mut counts = [0u32; 4];
        for (count, base) in counts.iter_mut().zip(SNV_BASES) {
            *count = self.tier1(&format!("{base}U"))?;
        }
        Ok(counts)
    }
}

fn base_index(base: char) -> Result<usize> {
    let upper = base.to_ascii_uppercase();
    SNV_BASES
        .iter()
        .position(|b| *b == upper)
        .ok_or_else(|| SomxError::decode(format!("'{base}' is not one of A, C, G, T")))
}

/// Depth (sum of tier 1 base counts) and frequency of `alt` in one sample.
pub fn decode_snv(format: &str, sample: &str, alt: char) -> Result<GenotypeStats> {
    let counts = SampleFields::parse(format, sample)?.base_counts()?;
    let depth = counts.iter().sum();
    Ok(GenotypeStats::from_counts(counts[base_index(alt)?], depth))
}

/// Bases other than `reference` and `alt` whose tumor frequency reaches `min_frequency`.
///
/// Bases without any supporting read are never reported.
pub fn snv_postcalls(
    format: &str,
    tumor: &str,
    reference: char,
    alt: char,
    min_frequency: f64,
) -> Result<Vec<(char, GenotypeStats)>> {
    let counts = SampleFields::parse(format, tumor)?.base_counts()?;
    let depth: u32 = counts.iter().sum();
    let reference = reference.to_ascii_uppercase();
    let alt = alt.to_ascii_uppercase();

    Ok(SNV_BASES
        .iter()
        .zip(counts)
        .filter(|(base, count)| **base != reference && **base != alt && *count > 0)
        .map(|(base, count)| (*base, GenotypeStats::from_counts(count, depth)))
        .filter(|(_, stats)| stats.frequency >= min_frequency)
        .collect())
}

/// Depth (`TAR` + `TIR`) and indel frequency in one sample.
pub fn decode_indel(format: &str, sample: &str) -> Result<GenotypeStats> {
    let fields = SampleFields::parse(format, sample)?;
    let reference = fields.tier1(INDEL_REF_KEY)?;
    let indel = fields.tier1(INDEL_ALT_KEY)?;
    Ok(GenotypeStats::from_counts(indel, reference + indel))
}

pub fn decode(
    variant_type: VariantType,
    format: &str,
    sample: &str,
    alt: &str,
) -> Result<GenotypeStats> {
    match variant_type {
        VariantType::Snv => {
            let base = alt
                .chars()
                .next()
                .ok_or_else(|| SomxError::decode("empty alternate allele"))?;
            decode_snv(format, sample, base)
        }
        VariantType::Indel => decode_indel(format, sample),
    }
}
