use std::fmt;

/// Closed genomic interval `[start, stop]` in zero-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u64,
    pub stop: u64,
}

impl Interval {
    pub fn new(s: u64, e: u64) -> Self {
        let (start, stop) = if s <= e { (s, e) } else { (e, s) };
        Self { start, stop }
    }

    #[inline]
    pub fn overlaps(&self, start: u64, stop: u64) -> bool {
        self.stop >= start && self.start <= stop
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}

const MAX_DEPTH: usize = 16;
const MIN_BUCKET: usize = 64;

/// Centered interval tree over the target regions of one contig.
#[derive(Debug, Default)]
pub struct IntervalTree {
    intervals: Vec<Interval>,
    left: Option<Box<IntervalTree>>,
    right: Option<Box<IntervalTree>>,
    center: u64,
}

impl IntervalTree {
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        if intervals.is_empty() {
            return Self::default();
        }
        intervals.sort_unstable_by_key(|i| (i.start, i.stop));
        let left_extent = intervals[0].start;
        let right_extent = intervals.iter().map(|i| i.stop).max().unwrap_or(left_extent);
        Self::build(intervals, MAX_DEPTH, left_extent, right_extent)
    }

    fn build(intervals: Vec<Interval>, depth: usize, left_extent: u64, right_extent: u64) -> Self {
        let center = left_extent + (right_extent - left_extent) / 2;
        if depth == 0 || intervals.len() < MIN_BUCKET {
            return Self {
                intervals,
                left: None,
                right: None,
                center,
            };
        }

        let (lefts, rest): (Vec<_>, Vec<_>) = intervals.into_iter().partition(|i| i.stop < center);
        let (centers, rights): (Vec<_>, Vec<_>) = rest.into_iter().partition(|i| i.start <= center);

        let left = (!lefts.is_empty())
            .then(|| Box::new(Self::build(lefts, depth - 1, left_extent, center)));
        let right = (!rights.is_empty())
            .then(|| Box::new(Self::build(rights, depth - 1, center, right_extent)));

        Self {
            intervals: centers,
            left,
            right,
            center,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
            && self.left.as_ref().is_none_or(|l| l.is_empty())
            && self.right.as_ref().is_none_or(|r| r.is_empty())
    }

    /// Calls `f` on every interval overlapping `[start, stop]` until it returns false.
    fn visit_overlapping<F>(&self, start: u64, stop: u64, f: &mut F) -> bool
    where
        F: FnMut(&Interval) -> bool,
    {
        for interval in &self.intervals {
            if interval.overlaps(start, stop) && !f(interval) {
                return false;
            }
        }
        if start <= self.center {
            if let Some(ref left) = self.left {
                if !left.visit_overlapping(start, stop, f) {
                    return false;
                }
            }
        }
        if stop >= self.center {
            if let Some(ref right) = self.right {
                if !right.visit_overlapping(start, stop, f) {
                    return false;
                }
            }
        }
        true
    }

    pub fn find_overlapping(&self, start: u64, stop: u64) -> Vec<Interval> {
        let mut found = Vec::new();
        self.visit_overlapping(start, stop, &mut |i| {
            found.push(*i);
            true
        });
        found
    }

    pub fn any_overlapping(&self, start: u64, stop: u64) -> bool {
        !self.visit_overlapping(start, stop, &mut |_| false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(intervals: &[Interval], start: u64, stop: u64) -> Vec<Interval> {
        let mut hits: Vec<Interval> = intervals
            .iter()
            .filter(|i| i.overlaps(start, stop))
            .copied()
            .collect();
        hits.sort_by_key(|i| (i.start, i.stop));
        hits
    }

    #[test]
    fn test_interval_new_ordering() {
        assert_eq!(Interval::new(20, 10), Interval { start: 10, stop: 20 });
        assert_eq!(Interval::new(5, 5).to_string(), "[5, 5]");
    }

    #[test]
    fn test_empty_tree() {
        let tree = IntervalTree::new(Vec::new());
        assert!(tree.is_empty());
        assert!(!tree.any_overlapping(0, u64::MAX));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let tree = IntervalTree::new(vec![Interval::new(10, 20)]);
        assert!(tree.any_overlapping(20, 30));
        assert!(tree.any_overlapping(0, 10));
        assert!(!tree.any_overlapping(21, 30));
        assert!(!tree.any_overlapping(0, 9));
    }

    #[test]
    fn test_matches_brute_force_on_deep_tree() {
        // enough intervals to force several levels
        let intervals: Vec<Interval> = (0..1_000u64)
            .map(|i| {
                let start = (i * 7_919) % 100_000;
                Interval::new(start, start + (i % 50) * 13)
            })
            .collect();
        let tree = IntervalTree::new(intervals.clone());
        assert!(!tree.is_empty());
        for query in (0..100_000u64).step_by(997) {
            let stop = query + 250;
            let mut found = tree.find_overlapping(query, stop);
            found.sort_by_key(|i| (i.start, i.stop));
            assert_eq!(found, brute_force(&intervals, query, stop));
            assert_eq!(tree.any_overlapping(query, stop), !found.is_empty());
        }
    }
}
