//! Machine-readable export of simplified job records.

use serde::Serialize;

use crate::format;
use crate::models::{JobRecord, Region, Visibility};
use crate::rules::Ruleset;

/// One simplified record in the JSON export.
///
/// Teaser records carry `company: null` and `url: null`; the real values
/// must never reach the export.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobExport {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub region: String,
    pub salary: String,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub skills: Vec<String>,
    pub seniority: Option<String>,
    pub ats: Option<String>,
    pub verified_at: Option<String>,
    pub scraped_at: Option<String>,
    pub url: Option<String>,
    pub visibility: Visibility,
}

/// Salary display string for one record under the active ruleset.
pub fn salary_display(job: &JobRecord, ruleset: Ruleset) -> String {
    match ruleset {
        Ruleset::Strict => format::salary_numeric(job.salary_min, job.salary_max),
        Ruleset::Legacy => {
            format::salary_preferring_string(job.salary.as_deref(), job.salary_min, job.salary_max)
        }
    }
}

/// Convert one bucket's records into export form.
pub fn export_records(region: Region, jobs: &[JobRecord], ruleset: Ruleset) -> Vec<JobExport> {
    jobs.iter()
        .map(|job| {
            let teaser = job.is_teaser();
            JobExport {
                id: job.id.clone(),
                title: job.title.clone(),
                company: (!teaser).then(|| job.company.clone()),
                region: region.code().to_string(),
                salary: salary_display(job, ruleset),
                salary_min: job.salary_min,
                salary_max: job.salary_max,
                skills: format::parse_skills(job.skills.as_deref()),
                seniority: job.seniority.clone(),
                ats: job.ats.clone(),
                verified_at: job.verified_at.clone(),
                scraped_at: job.scraped_at.clone(),
                url: if teaser { None } else { job.url.clone() },
                visibility: job.visibility,
            }
        })
        .collect()
}
