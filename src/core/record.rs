use super::{filter_tag::FilterStatus, header::Header};
use crate::{error::SomxError, utils::util::Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    Snv,
    Indel,
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantType::Snv => f.write_str("SNV"),
            VariantType::Indel => f.write_str("INDEL"),
        }
    }
}

/// One biallelic VCF data line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alternate: String,
    pub qual: String,
    pub filter: FilterStatus,
    pub info: String,
    pub format: String,
    pub samples: Vec<String>,
}

impl Record {
    /// Parses a tab-separated data line carrying `sample_count` sample columns.
    pub fn from_line(line: &str, line_number: usize, sample_count: usize) -> Result<Self> {
        let malformed = |message: String| SomxError::MalformedRecord {
            line: line_number,
            message,
        };

        let fields: Vec<&str> = line.split('\t').collect();
        let expected = 9 + sample_count;
        if fields.len() != expected {
            return Err(malformed(format!(
                "expected {expected} columns, found {}",
                fields.len()
            )));
        }

        let pos = fields[1]
            .parse::<u64>()
            .map_err(|e| malformed(format!("invalid position '{}': {e}", fields[1])))?;
        if fields[4].contains(',') {
            return Err(malformed(format!(
                "multi-allelic record at {}:{} must be split first",
                fields[0], pos
            )));
        }

        Ok(Record {
            chrom: fields[0].to_string(),
            pos,
            id: fields[2].to_string(),
            reference: fields[3].to_string(),
            alternate: fields[4].to_string(),
            qual: fields[5].to_string(),
            filter: FilterStatus::parse(fields[6]),
            info: fields[7].to_string(),
            format: fields[8].to_string(),
            samples: fields[9..].iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn variant_type(&self) -> VariantType {
        if self.reference.len() == 1 && self.alternate.len() == 1 {
            VariantType::Snv
        } else {
            VariantType::Indel
        }
    }

    pub fn sample(&self, index: usize) -> Result<&str> {
        self.samples.get(index).map(String::as_str).ok_or_else(|| {
            crate::somx_error!(
                "Record {}:{} has no sample column {}",
                self.chrom,
                self.pos,
                index
            )
        })
    }

    /// Copy of this record carrying another alternate allele and filter status.
    pub fn derive(&self, alternate: String, filter: FilterStatus) -> Record {
        Record {
            alternate,
            filter,
            ..self.clone()
        }
    }

    /// Copy of this record with a replaced filter status.
    pub fn with_filter(&self, filter: FilterStatus) -> Record {
        Record {
            filter,
            ..self.clone()
        }
    }

    /// Zero-based, inclusive span of reference bases.
    pub fn span(&self) -> (u64, u64) {
        let start = self.pos.saturating_sub(1);
        let len = self.reference.len().max(1) as u64;
        (start, start + len - 1)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.reference,
            self.alternate,
            self.qual,
            self.filter,
            self.info,
            self.format
        )?;
        for sample in &self.samples {
            write!(f, "\t{sample}")?;
        }
        Ok(())
    }
}

/// Comments, header and records of one VCF.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStream {
    pub comments: Vec<String>,
    pub header: Header,
    pub records: Vec<Record>,
}

impl RecordStream {
    pub fn new(comments: Vec<String>, header: Header, records: Vec<Record>) -> Self {
        Self {
            comments,
            header,
            records,
        }
    }
}
