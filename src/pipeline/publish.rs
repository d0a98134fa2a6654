// src/pipeline/publish.rs

//! The publish pipeline: fetch, classify, render, commit.
//!
//! Rendering is fully buffered into a [`WritePlan`] before the sink is
//! touched, so a render failure on any target leaves every target's prior
//! output intact.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::history;
use crate::models::{Ledger, LedgerEntry, Region};
use crate::render::{
    RenderContext, export_records, render_overview, render_regional, summary_line_primary,
    summary_line_regional,
};
use crate::rules::bucketize;
use crate::services::{FeedClient, FeedPayload};
use crate::storage::{LocalSink, OutputSink, WritePlan};

/// Artifact names within each target directory.
const DOC_FILE: &str = "jobs.md";
const EXPORT_FILE: &str = "jobs.json";
const SUMMARY_FILE: &str = "summary.txt";

/// What a run produced, for exit reporting.
#[derive(Debug)]
pub struct PublishReport {
    /// Rendered row count per region (post-cap)
    pub region_counts: BTreeMap<Region, usize>,
    /// Change-descriptor line per target, in write order
    pub summaries: Vec<(String, String)>,
}

/// Fetch the feed and publish all targets.
pub async fn run_publish(config: &Config, dry_run: bool) -> Result<()> {
    let client = FeedClient::new(Arc::new(config.clone()))?;
    let payload = client.fetch().await?;
    log::info!("Fetched {} job records", payload.jobs.len());

    let sink = LocalSink::new(&config.output.root_dir, dry_run);
    let primary_ledger = sink
        .load_ledger(Path::new(&config.output.primary_dir))
        .await;
    let mut secondary = Vec::new();
    for target in &config.output.secondary {
        let region = target.parsed_region()?;
        let ledger = sink.load_ledger(Path::new(&target.dir)).await;
        secondary.push((region, target.dir.clone(), ledger));
    }

    let now = Utc::now();
    let (plan, report) = build_write_plan(config, payload, primary_ledger, secondary, now)?;

    log::info!(
        "Committing {} files ({} bytes) to {}{}",
        plan.writes.len(),
        plan.total_bytes(),
        config.output.root_dir,
        if dry_run { " [dry-run]" } else { "" }
    );
    sink.commit(&plan).await?;

    for (region, count) in &report.region_counts {
        log::info!("  {}: {} roles", region.code(), count);
    }
    for (dir, summary) in &report.summaries {
        log::info!("  {dir}: {summary}");
    }
    Ok(())
}

/// Render every target into a buffered write plan.
///
/// Pure given its inputs: the same payload, ledgers and `now` always yield
/// a byte-identical plan. An empty feed is rejected here so nothing ever
/// overwrites good prior output with blank documents.
pub fn build_write_plan(
    config: &Config,
    payload: FeedPayload,
    primary_ledger: Ledger,
    secondary: Vec<(Region, String, Ledger)>,
    now: DateTime<Utc>,
) -> Result<(WritePlan, PublishReport)> {
    if payload.jobs.is_empty() {
        return Err(AppError::EmptyFeed);
    }

    let ruleset = config.rules.ruleset;
    let buckets = bucketize(payload.jobs, ruleset);
    let ctx = RenderContext {
        meta: &payload.meta,
        ruleset,
        now,
    };

    // History reflects prior publications; this run's entry is appended to
    // the ledgers afterwards.
    let labeled: Vec<(String, Ledger)> = secondary
        .iter()
        .map(|(region, _, ledger)| (region.code().to_string(), ledger.clone()))
        .collect();
    let history = history::aggregate(&primary_ledger, &labeled);

    let mut plan = WritePlan::default();
    let mut summaries = Vec::new();
    let revision = now.format("%Y%m%d%H%M%S").to_string();

    // Primary target: overview of every region plus the combined export.
    let (overview, stats) = render_overview(&buckets, &ctx, &history);
    let mut all_exports = Vec::new();
    for (region, jobs) in &buckets {
        all_exports.extend(export_records(*region, jobs, ruleset));
    }
    let primary_summary = summary_line_primary(&stats, now);
    let primary_dir = Path::new(&config.output.primary_dir);
    plan.add(primary_dir.join(DOC_FILE), overview.into_bytes());
    plan.add(
        primary_dir.join(EXPORT_FILE),
        serde_json::to_vec_pretty(&all_exports)?,
    );
    plan.add(
        primary_dir.join(SUMMARY_FILE),
        format!("{primary_summary}\n").into_bytes(),
    );
    let mut primary_ledger = primary_ledger;
    primary_ledger.push_front(LedgerEntry {
        revision: revision.clone(),
        timestamp: crate::format::stamp(now),
        summary: primary_summary.clone(),
    });
    plan.add(
        primary_dir.join(crate::models::LEDGER_FILE),
        serde_json::to_vec_pretty(&primary_ledger)?,
    );
    summaries.push((config.output.primary_dir.clone(), primary_summary));

    // Secondary targets, in configured order.
    let no_jobs: Vec<crate::models::JobRecord> = Vec::new();
    for (region, dir, ledger) in secondary {
        let jobs = buckets.get(&region).unwrap_or(&no_jobs);
        let (doc, section_stats) = render_regional(region, jobs, &ctx);
        let exports = export_records(region, jobs, ruleset);
        let summary = summary_line_regional(region, section_stats, now);

        let target_dir = Path::new(&dir);
        plan.add(target_dir.join(DOC_FILE), doc.into_bytes());
        plan.add(
            target_dir.join(EXPORT_FILE),
            serde_json::to_vec_pretty(&exports)?,
        );
        plan.add(
            target_dir.join(SUMMARY_FILE),
            format!("{summary}\n").into_bytes(),
        );
        let mut ledger = ledger;
        ledger.push_front(LedgerEntry {
            revision: revision.clone(),
            timestamp: crate::format::stamp(now),
            summary: summary.clone(),
        });
        plan.add(
            target_dir.join(crate::models::LEDGER_FILE),
            serde_json::to_vec_pretty(&ledger)?,
        );
        summaries.push((dir, summary));
    }

    let report = PublishReport {
        region_counts: stats.iter().map(|(r, s)| (*r, s.rendered)).collect(),
        summaries,
    };
    Ok((plan, report))
}
