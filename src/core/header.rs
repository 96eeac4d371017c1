use crate::{
    constants::{ALIGNMENT_SUFFIX, NORMAL_LABEL, TUMOR_LABEL},
    error::SomxError,
    utils::util::Result,
};
use std::path::Path;

/// Fixed VCF columns preceding the sample columns.
pub const FIXED_COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// The `#CHROM` column-name line of a VCF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.len() < FIXED_COLUMNS.len()
            || columns
                .iter()
                .zip(FIXED_COLUMNS.iter())
                .any(|(column, expected)| column != expected)
        {
            return Err(crate::somx_error!(
                "Header must start with the columns {}, found: {}",
                FIXED_COLUMNS.join(" "),
                columns.join(" ")
            ));
        }
        Ok(Self { columns })
    }

    pub fn parse(line: &str) -> Result<Self> {
        Self::new(line.split('\t').map(str::to_string).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sample_names(&self) -> &[String] {
        &self.columns[FIXED_COLUMNS.len()..]
    }

    pub fn sample_count(&self) -> usize {
        self.columns.len() - FIXED_COLUMNS.len()
    }

    /// Position of a sample among the sample columns.
    pub fn sample_index(&self, label: &str) -> Result<usize> {
        self.sample_names()
            .iter()
            .position(|name| name == label)
            .ok_or_else(|| SomxError::MissingHeaderColumn {
                label: label.to_string(),
            })
    }

    /// Replaces the caller's role labels with real sample identifiers.
    pub fn reconcile_sample_names(&self, names: &SampleNames) -> Result<Header> {
        let columns = SampleColumns::from_header(self)?;
        let mut reconciled = self.clone();
        let offset = FIXED_COLUMNS.len();
        reconciled.columns[offset + columns.tumor] = names.tumor.clone();
        reconciled.columns[offset + columns.normal] = names.normal.clone();
        Ok(reconciled)
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.columns.join("\t"))
    }
}

/// Indices of the tumor and normal values within a record's sample columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleColumns {
    pub tumor: usize,
    pub normal: usize,
}

impl SampleColumns {
    pub fn from_header(header: &Header) -> Result<Self> {
        Ok(Self {
            tumor: header.sample_index(TUMOR_LABEL)?,
            normal: header.sample_index(NORMAL_LABEL)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleNames {
    pub tumor: String,
    pub normal: String,
}

impl SampleNames {
    pub fn from_sources(tumor: &str, normal: &str) -> Self {
        Self {
            tumor: sample_id_from_source(tumor),
            normal: sample_id_from_source(normal),
        }
    }
}

/// File name of an alignment source without directory and `.bam` suffix.
pub fn sample_id_from_source(source: &str) -> String {
    let name = Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    match name.strip_suffix(ALIGNMENT_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
