use super::readers::open_text_reader;
use crate::{
    core::containers::interval_tree::{Interval, IntervalTree},
    utils::util::Result,
};
use std::{collections::HashMap, io::BufRead, path::Path};

fn is_bed_preamble(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

/// Parses `chrom start end [...]`, returning `None` for empty regions.
///
/// BED coordinates are zero-based half-open, the interval is closed.
pub fn line_to_interval(line: &str) -> Result<Option<(String, Interval)>> {
    const MIN_FIELD_COUNT: usize = 3;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELD_COUNT {
        return Err(crate::somx_error!(
            "Expected at least {} fields in the format 'chrom start end', found {}: {}",
            MIN_FIELD_COUNT,
            fields.len(),
            line
        ));
    }

    let start: u64 = fields[1]
        .parse()
        .map_err(|e| crate::somx_error!("Invalid start position: {}", e))?;
    let end: u64 = fields[2]
        .parse()
        .map_err(|e| crate::somx_error!("Invalid end position: {}", e))?;
    if end < start {
        return Err(crate::somx_error!(
            "End position {} is before start position {}",
            end,
            start
        ));
    }
    if end == start {
        return Ok(None);
    }
    Ok(Some((fields[0].to_string(), Interval::new(start, end - 1))))
}

/// Target regions grouped by contig.
pub struct TargetRegions {
    pub interval_map: HashMap<String, IntervalTree>,
}

impl TargetRegions {
    pub fn new<P: AsRef<Path>>(bed_path: P) -> Result<Self> {
        let reader = open_text_reader(bed_path.as_ref())?;
        let mut intervals: HashMap<String, Vec<Interval>> = HashMap::new();

        for (line_number, result_line) in reader.lines().enumerate() {
            let line = result_line
                .map_err(|e| crate::somx_error!("Error at BED line {}: {}", line_number + 1, e))?;
            let line = line.trim_end();
            if is_bed_preamble(line) {
                continue;
            }
            let parsed = line_to_interval(line)
                .map_err(|e| crate::somx_error!("Error at BED line {}: {}", line_number + 1, e))?;
            if let Some((chrom, interval)) = parsed {
                intervals.entry(chrom).or_default().push(interval);
            }
        }

        let interval_map: HashMap<String, IntervalTree> = intervals
            .into_iter()
            .map(|(chrom, intervals)| (chrom, IntervalTree::new(intervals)))
            .collect();
        log::debug!(
            "Loaded target regions for {} contig(s) from {}",
            interval_map.len(),
            bed_path.as_ref().display()
        );
        Ok(Self { interval_map })
    }

    /// True if any target region overlaps the closed span `[start, stop]` on `chrom`.
    pub fn overlaps(&self, chrom: &str, start: u64, stop: u64) -> bool {
        self.interval_map
            .get(chrom)
            .is_some_and(|tree| tree.any_overlapping(start, stop))
    }
}
