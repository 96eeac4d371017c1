pub const DEFAULT_MIN_TUMOR_DEPTH: u32 = 20;
pub const DEFAULT_MIN_TUMOR_AF: f64 = 0.05;
pub const DEFAULT_MIN_TUMOR_SUPPORT: u32 = 3;
pub const DEFAULT_MIN_NORMAL_DEPTH: u32 = 20;
pub const DEFAULT_MAX_NORMAL_AF_RATIO: f64 = 1.0 / 6.0;
pub const DEFAULT_KEEP_LOW_QUALITY: bool = false;

pub const DEFAULT_BUILD: &str = "GRCh37";
pub const DEFAULT_GENOME_DIR: &str = "genomes";
pub const DEFAULT_RUN_THREADS: usize = 4;

/// Sample column labels written by the caller before reconciliation.
pub const TUMOR_LABEL: &str = "TUMOR";
pub const NORMAL_LABEL: &str = "NORMAL";

/// Suffix removed from alignment file names to obtain sample identifiers.
pub const ALIGNMENT_SUFFIX: &str = ".bam";

/// Character the caller pads long indel alleles with.
pub const ALLELE_PADDING: char = '.';

pub const PASS: &str = "PASS";
pub const MISSING: &str = ".";
