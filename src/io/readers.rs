use crate::{error::SomxError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

fn has_gzip_magic(path: &Path) -> Result<bool> {
    let mut f = File::open(path)
        .map_err(|e| crate::somx_error!("Failed to open {}: {e}", path.display()))?;
    let mut m = [0u8; 2];
    let n = f
        .read(&mut m)
        .map_err(|e| crate::somx_error!("Failed to read {}: {e}", path.display()))?;
    Ok(n == 2 && m == [0x1f, 0x8b])
}

/// Opens a plain or gzip/BGZF-compressed text file, detected by its magic bytes.
pub fn open_text_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let gzipped = has_gzip_magic(path)?;
    let file = File::open(path)
        .map_err(|error| crate::somx_error!("Failed to open file {}: {error}", path.display()))?;
    if gzipped {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(Box::new(BufReader::new(gz_decoder)))
        } else {
            Err(SomxError::InvalidGzipHeader {
                path: path.to_path_buf(),
            })
        }
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
