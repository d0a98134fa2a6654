//! Rendering of per-target artifacts (markdown, JSON export, summaries).

pub mod export;
pub mod markdown;

pub use export::{JobExport, export_records, salary_display};
pub use markdown::{
    ROW_CAP, RenderContext, SectionStats, render_overview, render_regional, render_section,
    summary_line_primary, summary_line_regional,
};
