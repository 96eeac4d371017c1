use super::readers::open_text_reader;
use crate::{
    core::{
        header::Header,
        record::{Record, RecordStream},
    },
    error::SomxError,
    utils::util::Result,
};
use std::{
    io::{BufRead, Lines},
    path::Path,
};

const COMMENT_PREFIX: &str = "##";
const HEADER_PREFIX: &str = "#CHROM";

/// Line-oriented VCF reader; yields records lazily after the meta lines and header.
pub struct VcfReader {
    pub comments: Vec<String>,
    pub header: Header,
    lines: Lines<Box<dyn BufRead>>,
    line_number: usize,
}

impl VcfReader {
    pub fn from_path(path: &Path) -> Result<Self> {
        log::trace!("Start loading VCF {:?}", path);
        let reader = open_text_reader(path)?;
        Self::new(reader).map_err(|e| crate::somx_error!("Error reading {}: {}", path.display(), e))
    }

    pub fn new(reader: Box<dyn BufRead>) -> Result<Self> {
        let mut lines = reader.lines();
        let mut comments = Vec::new();
        let mut line_number = 0;

        let header = loop {
            let Some(line) = lines.next() else {
                return Err(crate::somx_error!("VCF header line ({HEADER_PREFIX}) not found"));
            };
            line_number += 1;
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.starts_with(COMMENT_PREFIX) {
                comments.push(line.to_string());
            } else if line.starts_with(HEADER_PREFIX) {
                break Header::parse(line)?;
            } else if !line.is_empty() {
                return Err(SomxError::MalformedRecord {
                    line: line_number,
                    message: "data line before the header line".to_string(),
                });
            }
        };

        Ok(Self {
            comments,
            header,
            lines,
            line_number,
        })
    }

    /// Reads all remaining records.
    pub fn into_stream(self) -> Result<RecordStream> {
        let comments = self.comments.clone();
        let header = self.header.clone();
        let records = self.collect::<Result<Vec<_>>>()?;
        log::debug!("Read {} records", records.len());
        Ok(RecordStream::new(comments, header, records))
    }
}

impl Iterator for VcfReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            return Some(Record::from_line(
                line,
                self.line_number,
                self.header.sample_count(),
            ));
        }
    }
}

pub fn read_vcf(path: &Path) -> Result<RecordStream> {
    let stream = VcfReader::from_path(path)?.into_stream()?;
    log::trace!("Finished loading VCF {:?}", path);
    Ok(stream)
}
