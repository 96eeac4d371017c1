use crate::constants::{MISSING, PASS};
use std::fmt;

/// Reasons a call is flagged as lower confidence.
///
/// The named variants are assigned by this crate; anything else read from a
/// FILTER column is carried through untouched as `Caller`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterTag {
    UnresolvedAllele,
    NonStandardChromosome,
    TooFewSupportingReads,
    TumorDepthLow,
    NormalDepthLow,
    TumorFreqLow,
    NormalFreqHigh,
    OffTarget,
    Caller(String),
}

impl FilterTag {
    /// Tags assigned by the classifier, in the order their FILTER header lines are written.
    pub const CLASSIFIER_TAGS: [FilterTag; 7] = [
        FilterTag::UnresolvedAllele,
        FilterTag::NonStandardChromosome,
        FilterTag::TumorDepthLow,
        FilterTag::TumorFreqLow,
        FilterTag::NormalDepthLow,
        FilterTag::NormalFreqHigh,
        FilterTag::TooFewSupportingReads,
    ];

    pub fn id(&self) -> &str {
        match self {
            FilterTag::UnresolvedAllele => "all-unknown",
            FilterTag::NonStandardChromosome => "special-chromosome",
            FilterTag::TooFewSupportingReads => "lt-3-reads",
            FilterTag::TumorDepthLow => "depth-tum",
            FilterTag::NormalDepthLow => "depth-nor",
            FilterTag::TumorFreqLow => "freq-tum",
            FilterTag::NormalFreqHigh => "freq-nor",
            FilterTag::OffTarget => "off-target",
            FilterTag::Caller(id) => id,
        }
    }

    pub fn parse(id: &str) -> Self {
        match id {
            "all-unknown" => FilterTag::UnresolvedAllele,
            "special-chromosome" => FilterTag::NonStandardChromosome,
            "lt-3-reads" => FilterTag::TooFewSupportingReads,
            "depth-tum" => FilterTag::TumorDepthLow,
            "depth-nor" => FilterTag::NormalDepthLow,
            "freq-tum" => FilterTag::TumorFreqLow,
            "freq-nor" => FilterTag::NormalFreqHigh,
            "off-target" => FilterTag::OffTarget,
            other => FilterTag::Caller(other.to_string()),
        }
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Insertion-ordered set of filter tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    tags: Vec<FilterTag>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the tag was already present.
    pub fn insert(&mut self, tag: FilterTag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &FilterTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterTag> {
        self.tags.iter()
    }
}

impl FromIterator<FilterTag> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterTag>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl Extend<FilterTag> for FilterSet {
    fn extend<I: IntoIterator<Item = FilterTag>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

/// Content of a record's FILTER column.
///
/// `Tags` never holds an empty set, use [`FilterStatus::resolve`] to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStatus {
    Missing,
    Pass,
    Tags(FilterSet),
}

impl FilterStatus {
    pub fn parse(column: &str) -> Self {
        match column {
            "" | MISSING => FilterStatus::Missing,
            PASS => FilterStatus::Pass,
            _ => {
                let tags: FilterSet = column
                    .split(';')
                    .filter(|id| !id.is_empty() && *id != PASS)
                    .map(FilterTag::parse)
                    .collect();
                Self::resolve(tags)
            }
        }
    }

    /// `Pass` for an empty set, the set itself otherwise.
    pub fn resolve(tags: FilterSet) -> Self {
        if tags.is_empty() {
            FilterStatus::Pass
        } else {
            FilterStatus::Tags(tags)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, FilterStatus::Pass)
    }

    /// Tags other than the pass sentinel, empty for `Pass` and `Missing`.
    pub fn tags(&self) -> FilterSet {
        match self {
            FilterStatus::Tags(tags) => tags.clone(),
            FilterStatus::Missing | FilterStatus::Pass => FilterSet::new(),
        }
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStatus::Missing => f.write_str(MISSING),
            FilterStatus::Pass => f.write_str(PASS),
            FilterStatus::Tags(tags) => {
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{tag}")?;
                }
                Ok(())
            }
        }
    }
}
