use crate::{core::record::RecordStream, utils::util::Result};
use rust_htslib::{bcf, bgzf};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Plain text VCF.
    Vcf,
    /// BGZF-compressed VCF with a tabix index.
    VcfGz,
}

impl OutputType {
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".gz") || path.ends_with(".bgz") {
            OutputType::VcfGz
        } else {
            OutputType::Vcf
        }
    }
}

pub struct VcfWriter {
    writer: Box<dyn Write>,
    output: Option<String>,
    output_type: OutputType,
}

impl VcfWriter {
    /// Writes to `output`, or standard output when `None`.
    pub fn new(output: Option<&str>) -> Result<Self> {
        let output_type = output.map_or(OutputType::Vcf, OutputType::from_path);
        log::trace!("{:?}", &output_type);

        let writer: Box<dyn Write> = match (output, output_type) {
            (None, _) => Box::new(BufWriter::new(io::stdout().lock())),
            (Some(path), OutputType::Vcf) => Box::new(BufWriter::new(
                File::create(path)
                    .map_err(|e| crate::somx_error!("Failed to create {}: {}", path, e))?,
            )),
            (Some(path), OutputType::VcfGz) => Box::new(bgzf::Writer::from_path(path)?),
        };

        Ok(Self {
            writer,
            output: output.map(str::to_string),
            output_type,
        })
    }

    pub fn write_stream(&mut self, stream: &RecordStream) -> Result<()> {
        for comment in &stream.comments {
            writeln!(self.writer, "{comment}")?;
        }
        writeln!(self.writer, "{}", stream.header)?;
        for record in &stream.records {
            writeln!(self.writer, "{record}")?;
        }
        Ok(())
    }

    /// Flushes and closes the output, then builds the tabix index for compressed files.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        drop(self.writer);

        let (Some(path), OutputType::VcfGz) = (self.output, self.output_type) else {
            return Ok(());
        };
        log::debug!("Writer: Building tabix index for {}", path);
        bcf::index::build(&path, None, 1, bcf::index::Type::Tbx).map_err(|error| {
            crate::somx_error!("Failed to build tabix index for {}: {}", path, error)
        })?;
        Ok(())
    }
}

/// Writes a complete stream to `output` (standard output when `None`).
pub fn write_vcf(stream: &RecordStream, output: Option<&str>) -> Result<()> {
    let mut writer = VcfWriter::new(output)?;
    writer.write_stream(stream)?;
    writer.finish()
}
