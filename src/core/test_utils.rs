use super::{
    header::Header,
    record::{Record, RecordStream},
};

pub const CALLER_HEADER: &str =
    "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR";
pub const SNV_FORMAT: &str = "DP:FDP:SDP:SUBDP:AU:CU:GU:TU";
pub const INDEL_FORMAT: &str = "DP:DP2:TAR:TIR:TOR:DP50:FDP50:SUBDP50:BCN50";

pub fn caller_header() -> Header {
    Header::parse(CALLER_HEADER).unwrap()
}

/// SNV sample value with the given tier 1 counts for A, C, G, T.
pub fn snv_sample(counts: [u32; 4]) -> String {
    let depth: u32 = counts.iter().sum();
    format!(
        "{depth}:0:0:0:{a},{a}:{c},{c}:{g},{g}:{t},{t}",
        a = counts[0],
        c = counts[1],
        g = counts[2],
        t = counts[3]
    )
}

/// Indel sample value with the given tier 1 reference and indel support.
pub fn indel_sample(reference: u32, indel: u32) -> String {
    let depth = reference + indel;
    format!("{depth}:{depth}:{reference},{reference}:{indel},{indel}:0,0:{depth}:0:0:0.00")
}

/// A PASS SNV line with default, unremarkable sample values.
pub fn snv_line(chrom: &str, pos: u64, reference: &str, alternate: &str) -> String {
    format!(
        "{chrom}\t{pos}\t.\t{reference}\t{alternate}\t.\tPASS\tSOMATIC\t{SNV_FORMAT}\t{}\t{}",
        snv_sample([30, 0, 0, 0]),
        snv_sample([18, 0, 12, 0])
    )
}

pub fn snv_record(
    chrom: &str,
    reference: &str,
    alternate: &str,
    filter: &str,
    tumor: [u32; 4],
    normal: [u32; 4],
) -> Record {
    let line = format!(
        "{chrom}\t1000\t.\t{reference}\t{alternate}\t.\t{filter}\tSOMATIC\t{SNV_FORMAT}\t{}\t{}",
        snv_sample(normal),
        snv_sample(tumor)
    );
    Record::from_line(&line, 1, 2).unwrap()
}

pub fn indel_record(
    reference: &str,
    alternate: &str,
    filter: &str,
    tumor: (u32, u32),
    normal: (u32, u32),
) -> Record {
    let line = format!(
        "chr1\t2000\t.\t{reference}\t{alternate}\t.\t{filter}\tSOMATIC\t{INDEL_FORMAT}\t{}\t{}",
        indel_sample(normal.0, normal.1),
        indel_sample(tumor.0, tumor.1)
    );
    Record::from_line(&line, 1, 2).unwrap()
}

pub fn stream_from_lines(comments: &[&str], lines: &[String]) -> RecordStream {
    let records = lines
        .iter()
        .enumerate()
        .map(|(i, line)| Record::from_line(line, i + 1, 2).unwrap())
        .collect();
    RecordStream::new(
        comments.iter().map(|s| s.to_string()).collect(),
        caller_header(),
        records,
    )
}

/// Full VCF text for the given comment and data lines.
pub fn vcf_text(comments: &[&str], lines: &[String]) -> String {
    let mut text = String::new();
    for comment in comments {
        text.push_str(comment);
        text.push('\n');
    }
    text.push_str(CALLER_HEADER);
    text.push('\n');
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
