use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

pub type SomxResult<T> = std::result::Result<T, SomxError>;

#[derive(Debug, Error)]
pub enum SomxError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
    #[error("Column '{label}' not found in VCF header")]
    MissingHeaderColumn { label: String },
    #[error(
        "SNV and indel headers define different columns: [{}] vs [{}]",
        snv.join(", "),
        indel.join(", ")
    )]
    HeaderMismatch {
        snv: Vec<String>,
        indel: Vec<String>,
    },
    #[error("Malformed VCF line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("Genotype decode error: {message}")]
    GenotypeDecode { message: String },
    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        source: std::io::Error,
    },
    #[error("{tool} failed with {status}")]
    ToolFailed { tool: String, status: ExitStatus },
}

impl SomxError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::GenotypeDecode {
            message: message.into(),
        }
    }
}

#[macro_export]
macro_rules! somx_error {
    ($($arg:tt)*) => {
        $crate::error::SomxError::message(format!($($arg)*))
    };
}
