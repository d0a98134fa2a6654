//! Markdown document rendering.
//!
//! All functions are deterministic given the dataset and the injected
//! `now`; nothing here reads the wall clock.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::format;
use crate::history::HistoryTable;
use crate::models::{FeedMeta, JobRecord, Region};
use crate::render::export::salary_display;
use crate::rules::Ruleset;

/// Soft cap on rows per section; rows beyond it are silently omitted.
pub const ROW_CAP: usize = 500;

/// Call-to-action destination for teaser rows.
pub const UPGRADE_URL: &str = "https://jobpress.dev/upgrade";

/// How many skills a table cell shows before the `+N` marker.
const SKILLS_SHOWN: usize = 3;

/// Shared inputs for one render pass.
pub struct RenderContext<'a> {
    pub meta: &'a FeedMeta,
    pub ruleset: Ruleset,
    pub now: DateTime<Utc>,
}

/// Counts derived from the rows actually rendered (post-cap), so headers
/// and summaries can never disagree with the table below them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionStats {
    pub rendered: usize,
    pub with_salary: usize,
}

fn company_cell(job: &JobRecord, ctx: &RenderContext<'_>) -> String {
    if job.is_teaser() {
        return format::masked_company(&job.title, &job.id);
    }
    let name = format::escape_cell(&job.company);
    match ctx.meta.logo_for(&job.company) {
        Some(logo) => format!("![logo]({logo}) {name}"),
        None => name,
    }
}

fn apply_cell(job: &JobRecord) -> String {
    if job.is_teaser() {
        return format!("[Unlock]({UPGRADE_URL})");
    }
    match job.url.as_deref() {
        Some(url) => format!("[Apply]({url})"),
        None => String::new(),
    }
}

fn job_row(job: &JobRecord, ctx: &RenderContext<'_>) -> String {
    let skills = format::parse_skills(job.skills.as_deref());
    format!(
        "| {} | {} | {} | {} | {} | {} | {} |",
        company_cell(job, ctx),
        format::escape_cell(&job.title),
        format::escape_cell(job.location.as_deref().unwrap_or("")),
        format::escape_cell(&salary_display(job, ctx.ruleset)),
        format::escape_cell(&format::top_skills(&skills, SKILLS_SHOWN)),
        format::age_label(job.scraped_at.as_deref(), ctx.now),
        apply_cell(job),
    )
}

/// Render one region section: header with post-cap counts, then the table.
pub fn render_section(
    region: Region,
    jobs: &[JobRecord],
    ctx: &RenderContext<'_>,
) -> (String, SectionStats) {
    let shown = &jobs[..jobs.len().min(ROW_CAP)];
    let stats = SectionStats {
        rendered: shown.len(),
        with_salary: shown
            .iter()
            .filter(|j| !salary_display(j, ctx.ruleset).is_empty())
            .count(),
    };

    let mut out = format!(
        "## {} ({} roles, {} with salary)\n\n",
        region.display_name(),
        stats.rendered,
        stats.with_salary
    );
    out.push_str("| Company | Role | Location | Salary | Skills | Age | Apply |\n");
    out.push_str("|---|---|---|---|---|---|---|\n");
    for job in shown {
        out.push_str(&job_row(job, ctx));
        out.push('\n');
    }
    (out, stats)
}

/// Render the combined publication-history table.
pub fn render_history(history: &HistoryTable) -> String {
    let mut out = String::from("## Publication history\n\n");
    if history.rows.is_empty() {
        out.push_str("No prior publications.\n");
        return out;
    }
    out.push_str("| Published | Worldwide |");
    for label in &history.labels {
        out.push_str(&format!(" {label} |"));
    }
    out.push('\n');
    out.push_str(&"|---".repeat(2 + history.labels.len()));
    out.push_str("|\n");
    for row in &history.rows {
        out.push_str(&format!("| {} | {} |", row.timestamp, row.primary));
        for cell in &row.cells {
            out.push_str(&format!(" {} |", cell.as_deref().unwrap_or("-")));
        }
        out.push('\n');
    }
    out
}

/// Render the primary overview document: every region section plus the
/// cross-target history. Returns the document and per-region stats.
pub fn render_overview(
    buckets: &BTreeMap<Region, Vec<JobRecord>>,
    ctx: &RenderContext<'_>,
    history: &HistoryTable,
) -> (String, BTreeMap<Region, SectionStats>) {
    let mut sections = String::new();
    let mut stats: BTreeMap<Region, SectionStats> = BTreeMap::new();
    for region in Region::ALL {
        let Some(jobs) = buckets.get(&region) else {
            continue;
        };
        let (section, section_stats) = render_section(region, jobs, ctx);
        sections.push_str(&section);
        sections.push('\n');
        stats.insert(region, section_stats);
    }

    let total: usize = stats.values().map(|s| s.rendered).sum();
    let mut out = format!(
        "# Job Board\n\nUpdated {} · {} open roles\n\n",
        format::stamp(ctx.now),
        total
    );
    for (region, section_stats) in &stats {
        out.push_str(&format!(
            "- {}: {} roles\n",
            region.display_name(),
            section_stats.rendered
        ));
    }
    out.push('\n');
    out.push_str(&sections);
    out.push_str(&render_history(history));
    (out, stats)
}

/// Render a standalone single-region document.
pub fn render_regional(
    region: Region,
    jobs: &[JobRecord],
    ctx: &RenderContext<'_>,
) -> (String, SectionStats) {
    let (section, stats) = render_section(region, jobs, ctx);
    let out = format!(
        "# Job Board: {}\n\nUpdated {}\n\n{}",
        region.display_name(),
        format::stamp(ctx.now),
        section
    );
    (out, stats)
}

/// One-line change descriptor for the primary target.
pub fn summary_line_primary(stats: &BTreeMap<Region, SectionStats>, now: DateTime<Utc>) -> String {
    let total: usize = stats.values().map(|s| s.rendered).sum();
    let with_salary: usize = stats.values().map(|s| s.with_salary).sum();
    format!(
        "{} jobs ({} with salary) across {} regions | {}",
        total,
        with_salary,
        stats.len(),
        format::stamp(now)
    )
}

/// One-line change descriptor for a secondary target.
pub fn summary_line_regional(region: Region, stats: SectionStats, now: DateTime<Utc>) -> String {
    format!(
        "{} {} jobs ({} with salary) | {}",
        stats.rendered,
        region.code(),
        stats.with_salary,
        format::stamp(now)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryRow;
    use crate::models::Visibility;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 26, 4, 35, 0).unwrap()
    }

    fn job(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            region: None,
            is_remote: true,
            location: Some("Anywhere".to_string()),
            salary: None,
            salary_min: Some(100_000),
            salary_max: Some(100_000),
            skills: Some("Rust, Go".to_string()),
            seniority: None,
            ats: None,
            verified_at: None,
            scraped_at: Some("2026-02-26T04:00:00Z".to_string()),
            url: Some("https://acme.example/1".to_string()),
            visibility: Visibility::Full,
        }
    }

    fn ctx<'a>(meta: &'a FeedMeta) -> RenderContext<'a> {
        RenderContext {
            meta,
            ruleset: Ruleset::Strict,
            now: fixed_now(),
        }
    }

    #[test]
    fn section_counts_match_rendered_rows() {
        let meta = FeedMeta::default();
        let mut jobs: Vec<JobRecord> = (0..3).map(|i| job(&i.to_string())).collect();
        jobs[2].salary_min = None;
        jobs[2].salary_max = None;

        let (section, stats) = render_section(Region::Ww, &jobs, &ctx(&meta));
        assert_eq!(stats.rendered, 3);
        assert_eq!(stats.with_salary, 2);
        assert!(section.starts_with("## Worldwide Remote (3 roles, 2 with salary)"));
        let data_rows = section.lines().filter(|l| l.contains("[Apply]")).count();
        assert_eq!(data_rows, 3);
    }

    #[test]
    fn row_cap_truncates_silently_and_counts_follow() {
        let meta = FeedMeta::default();
        let jobs: Vec<JobRecord> = (0..ROW_CAP + 20).map(|i| job(&i.to_string())).collect();
        let (section, stats) = render_section(Region::Ww, &jobs, &ctx(&meta));
        assert_eq!(stats.rendered, ROW_CAP);
        assert!(section.contains(&format!("({ROW_CAP} roles")));
        let data_rows = section.lines().filter(|l| l.contains("[Apply]")).count();
        assert_eq!(data_rows, ROW_CAP);
    }

    #[test]
    fn teaser_rows_mask_company_and_link_to_upgrade() {
        let meta = FeedMeta::default();
        let mut j = job("1");
        j.visibility = Visibility::Teaser;
        let (section, _) = render_section(Region::Ww, &[j], &ctx(&meta));
        assert!(!section.contains("Acme"));
        assert!(!section.contains("acme.example"));
        assert!(section.contains(&format!("[Unlock]({UPGRADE_URL})")));
    }

    #[test]
    fn logo_decorates_known_companies_only() {
        let meta = FeedMeta {
            generated_at: None,
            logos: std::collections::HashMap::from([("acme".to_string(), "l-9".to_string())]),
        };
        let (section, _) = render_section(Region::Ww, &[job("1")], &ctx(&meta));
        assert!(section.contains("![logo](l-9) Acme"));
    }

    #[test]
    fn render_is_idempotent_for_fixed_inputs() {
        let meta = FeedMeta::default();
        let buckets = BTreeMap::from([(Region::Ww, vec![job("1"), job("2")])]);
        let history = HistoryTable {
            labels: vec!["EMEA".into()],
            rows: vec![HistoryRow {
                timestamp: "25-Feb-2026 04:35 UTC".into(),
                primary: "2 jobs".into(),
                cells: vec![None],
            }],
        };
        let (a, _) = render_overview(&buckets, &ctx(&meta), &history);
        let (b, _) = render_overview(&buckets, &ctx(&meta), &history);
        assert_eq!(a, b);
    }

    #[test]
    fn history_placeholder_cell_renders_dash() {
        let history = HistoryTable {
            labels: vec!["EMEA".into(), "APAC".into()],
            rows: vec![HistoryRow {
                timestamp: "26-Feb-2026 04:35 UTC".into(),
                primary: "128 jobs".into(),
                cells: vec![Some("40 jobs".into()), None],
            }],
        };
        let table = render_history(&history);
        assert!(table.contains("| 26-Feb-2026 04:35 UTC | 128 jobs | 40 jobs | - |"));
    }

    #[test]
    fn summary_lines_are_deterministic() {
        let stats = BTreeMap::from([
            (
                Region::Ww,
                SectionStats {
                    rendered: 100,
                    with_salary: 40,
                },
            ),
            (
                Region::Emea,
                SectionStats {
                    rendered: 28,
                    with_salary: 14,
                },
            ),
        ]);
        assert_eq!(
            summary_line_primary(&stats, fixed_now()),
            "128 jobs (54 with salary) across 2 regions | 26-Feb-2026 04:35 UTC"
        );
        assert_eq!(
            summary_line_regional(
                Region::Emea,
                SectionStats {
                    rendered: 28,
                    with_salary: 14
                },
                fixed_now()
            ),
            "28 EMEA jobs (14 with salary) | 26-Feb-2026 04:35 UTC"
        );
    }
}
