//! Bookkeeping for `##` meta-information lines.

use std::collections::HashSet;

/// Replaces one meta line by another, or drops it when `replacement` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRule {
    pub target: &'static str,
    pub replacement: Option<&'static str>,
}

/// Conflicting definitions between the caller's SNV and indel outputs.
///
/// The SNV output's `DP` line ("Read depth for tier1 (used+filtered)") is dropped so
/// the indel output's "Read depth for tier1" definition is kept. The generic
/// `QSI_NT` description is retagged as indel specific.
pub const MERGE_COMMENT_RULES: &[CommentRule] = &[
    CommentRule {
        target: r#"##FORMAT=<ID=DP,Number=1,Type=Integer,Description="Read depth for tier1 (used+filtered)">"#,
        replacement: None,
    },
    CommentRule {
        target: r#"##INFO=<ID=QSI_NT,Number=1,Type=Integer,Description="Quality score reflecting the joint probability of a somatic variant and NT">"#,
        replacement: Some(
            r#"##INFO=<ID=QSI_NT,Number=1,Type=Integer,Description="Quality score reflecting the joint probability of a somatic variant (indels) and NT">"#,
        ),
    },
];

/// Union of two comment sets, keeping the first occurrence of identical lines.
pub fn union_comments(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|line| seen.insert(line.as_str()))
        .cloned()
        .collect()
}

/// Applies each rule whose target line is present.
///
/// A replacement line is only added in place of its target. Comment sets without
/// the target line get no replacement, so a missing `QSI_NT` definition is not
/// synthesized.
pub fn apply_rules(comments: Vec<String>, rules: &[CommentRule]) -> Vec<String> {
    let mut reconciled = comments;
    for rule in rules {
        let before = reconciled.len();
        reconciled.retain(|line| line != rule.target);
        if reconciled.len() == before {
            continue;
        }
        log::debug!("Reconciled header line {}", rule.target);
        if let Some(replacement) = rule.replacement {
            if !reconciled.iter().any(|line| line == replacement) {
                reconciled.push(replacement.to_string());
            }
        }
    }
    reconciled
}

pub fn filter_comment(id: &str, description: &str) -> String {
    format!("##FILTER=<ID={id},Description=\"{description}\">")
}

fn category_rank(line: &str) -> usize {
    const ORDER: [&str; 8] = [
        "##fileformat=",
        "##fileDate=",
        "##source=",
        "##reference=",
        "##contig=",
        "##INFO=",
        "##FILTER=",
        "##FORMAT=",
    ];
    ORDER
        .iter()
        .position(|prefix| line.starts_with(prefix))
        .unwrap_or(ORDER.len())
}

/// Canonical order: `##fileformat` first, then by meta-line category.
///
/// Lines keep their relative order within a category, so contigs stay in reference order.
pub fn sort_comments(mut comments: Vec<String>) -> Vec<String> {
    comments.sort_by_key(|line| category_rank(line));
    comments
}
