//! Running counters filled in by the [`Extractor`](crate::extractor::Extractor).
//!
//! A [`Stats`] value is owned by the caller and lent to the extractor page by page. To process
//! pages in parallel, give every worker its own `Stats` and [`merge`](Stats::merge) them
//! afterwards.

use std::ops::{AddAssign, Index, IndexMut};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use crate::appearance::AppearanceBucket;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Performance {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub revisions_analyzed: u64,
    pub pages_analyzed: u64,
}

/// Identifier counts per [`AppearanceBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts([u64; AppearanceBucket::ALL.len()]);

impl BucketCounts {
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(key, count)` for every bucket, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (AppearanceBucket, u64)> + '_ {
        AppearanceBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, self[bucket]))
    }
}

impl Index<AppearanceBucket> for BucketCounts {
    type Output = u64;

    fn index(&self, bucket: AppearanceBucket) -> &u64 {
        &self.0[bucket.index()]
    }
}

impl IndexMut<AppearanceBucket> for BucketCounts {
    fn index_mut(&mut self, bucket: AppearanceBucket) -> &mut u64 {
        &mut self.0[bucket.index()]
    }
}

impl AddAssign<&BucketCounts> for BucketCounts {
    fn add_assign(&mut self, other: &BucketCounts) {
        for (count, other) in self.0.iter_mut().zip(other.0) {
            *count += other;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierStats {
    pub global: BucketCounts,
    /// Only identifiers found in the last revision of each page.
    pub last_revision: BucketCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCounts(FxHashMap<String, u64>);

impl NameCounts {
    pub fn increment(&mut self, name: &str) {
        match self.0.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.0.insert(name.to_string(), 1);
            }
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names by descending count, ties broken alphabetically.
    pub fn most_common(&self) -> Vec<(&str, u64)> {
        let mut names: Vec<_> = self
            .0
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .collect();
        names.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        names
    }

    fn merge(&mut self, other: &NameCounts) {
        for (name, count) in &other.0 {
            *self.0.entry(name.clone()).or_default() += count;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNameStats {
    pub global: NameCounts,
    pub last_revision: NameCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub performance: Performance,
    pub identifiers: IdentifierStats,
    pub section_names: SectionNameStats,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start time; call before handing the first page to the extractor.
    pub fn start(&mut self) {
        self.performance.start_time = Some(Utc::now());
    }

    pub fn finish(&mut self) {
        self.performance.end_time = Some(Utc::now());
    }

    pub fn record_identifier(&mut self, bucket: AppearanceBucket, is_last_revision: bool) {
        self.identifiers.global[bucket] += 1;
        if is_last_revision {
            self.identifiers.last_revision[bucket] += 1;
        }
    }

    pub fn record_section_name(&mut self, name: &str, is_last_revision: bool) {
        self.section_names.global.increment(name);
        if is_last_revision {
            self.section_names.last_revision.increment(name);
        }
    }

    /// Fold `other` into `self`. Counters are summed, the time window is widened to cover both.
    pub fn merge(&mut self, other: &Stats) {
        let performance = &mut self.performance;
        performance.start_time = match (performance.start_time, other.performance.start_time) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        performance.end_time = match (performance.end_time, other.performance.end_time) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        performance.revisions_analyzed += other.performance.revisions_analyzed;
        performance.pages_analyzed += other.performance.pages_analyzed;

        self.identifiers.global += &other.identifiers.global;
        self.identifiers.last_revision += &other.identifiers.last_revision;

        self.section_names.global.merge(&other.section_names.global);
        self.section_names
            .last_revision
            .merge(&other.section_names.last_revision);
    }
}
