// src/rules.rs

//! Classification and filtering rules.
//!
//! Two rule generations exist in the wild and both stay supported behind
//! the [`Ruleset`] selector; `strict` is the authoritative default.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format;
use crate::models::{JobRecord, Region};

/// Annual USD above which a sort salary is treated as corrupted data
/// (usually an hourly rate annualized by mistake).
pub const SALARY_SORT_CAP: u64 = 600_000;

/// Titles that are storefronts rather than postings; matched full-string,
/// case-insensitively, after trimming.
const NOISE_TITLES: &[&str] = &[
    "careers",
    "career",
    "jobs",
    "open positions",
    "open roles",
    "join our team",
    "join us",
    "we're hiring",
    "view all jobs",
];

/// Versioned rule generation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    /// Current rules: unknown regions dropped, numeric-only salary display,
    /// freshness-only sort.
    #[default]
    Strict,
    /// Earlier rules: unknown regions fold into WW, raw salary string
    /// preferred for display, salary-first sort.
    Legacy,
}

/// Whether a title is a generic non-job phrase.
pub fn is_noise(title: &str) -> bool {
    let trimmed = title.trim().to_lowercase();
    NOISE_TITLES.contains(&trimmed.as_str())
}

/// Salary value used for ordering, after corruption capping.
///
/// Returns 0 when no bound is present, when the best bound exceeds
/// [`SALARY_SORT_CAP`], or when the display string marks an hourly rate.
pub fn sort_salary(job: &JobRecord) -> u64 {
    if let Some(s) = &job.salary {
        let s = s.to_lowercase();
        if s.contains("/hr") || s.contains("/hour") || s.contains("hourly") || s.contains("per hour")
        {
            return 0;
        }
    }
    let value = job.salary_max.or(job.salary_min).unwrap_or(0);
    if value > SALARY_SORT_CAP { 0 } else { value }
}

fn collected_at(job: &JobRecord) -> Option<DateTime<Utc>> {
    job.scraped_at.as_deref().and_then(format::parse_timestamp)
}

/// Sort a bucket in display order for the active ruleset.
pub fn sort_for_display(jobs: &mut [JobRecord], ruleset: Ruleset) {
    match ruleset {
        // Freshness only: newest collection time first, undated last.
        Ruleset::Strict => {
            jobs.sort_by(|a, b| collected_at(b).cmp(&collected_at(a)));
        }
        // Salaried first, richest first, freshness breaks ties.
        Ruleset::Legacy => {
            jobs.sort_by(|a, b| {
                sort_salary(b)
                    .cmp(&sort_salary(a))
                    .then_with(|| collected_at(b).cmp(&collected_at(a)))
            });
        }
    }
}

/// Decide the bucket for one surviving record.
///
/// Returns `None` when the record belongs to no bucket: a WW-coded (or
/// region-absent) record that is not explicitly remote, or an unrecognized
/// region code under the strict ruleset.
pub fn classify_region(job: &JobRecord, ruleset: Ruleset) -> Option<Region> {
    let region = match job.region.as_deref() {
        None => Some(Region::Ww),
        Some(code) => Region::parse(code),
    };
    match region {
        // WW is reserved for genuinely unrestricted remote work.
        Some(Region::Ww) => job.is_remote.then_some(Region::Ww),
        Some(other) => Some(other),
        None => match ruleset {
            Ruleset::Strict => None,
            Ruleset::Legacy => job.is_remote.then_some(Region::Ww),
        },
    }
}

/// Filter noise, assign regions and sort each bucket.
///
/// Records failing the noise filter never reach a bucket; bucket order
/// follows [`Region`]'s declaration order.
pub fn bucketize(records: Vec<JobRecord>, ruleset: Ruleset) -> BTreeMap<Region, Vec<JobRecord>> {
    let mut buckets: BTreeMap<Region, Vec<JobRecord>> = BTreeMap::new();
    for job in records {
        if is_noise(&job.title) {
            continue;
        }
        if let Some(region) = classify_region(&job, ruleset) {
            buckets.entry(region).or_default().push(job);
        }
    }
    for jobs in buckets.values_mut() {
        sort_for_display(jobs, ruleset);
    }
    buckets
}
