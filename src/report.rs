//! Per-student plain-text grade reports.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output::write_text;
use crate::roster::MISSING;
use crate::scoring::{ScoreSummary, ScoredStudent};

/// Renders the report for one student.
pub fn render_report(
    student: &ScoredStudent,
    cut_points: Option<&[f64; 5]>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "------------------ {}: {} ----------------------\n",
        student.id, student.handle
    ));
    out.push_str(&format!("Name: {}\n", student.name));
    out.push_str(&format!("Base score: {}\n", format_score(student.base_score)));
    out.push_str(&format!(
        "Peer rating: {}\n",
        student.peer_rating.map_or(MISSING.to_string(), |r| format!("{r:.2}"))
    ));
    if let Some(cuts) = cut_points {
        let cuts: Vec<String> = cuts.iter().map(|c| format!("{c:.2}")).collect();
        out.push_str(&format!("Class rating percentiles (0/25/50/75/100): {}\n", cuts.join(" / ")));
    }
    out.push_str(&format!(
        "Peer score: {}\n",
        student.peer_score.map_or(MISSING.to_string(), |p| p.to_string())
    ));
    out.push_str(&format!(
        "Total score: {}\n",
        student.total_score.map_or(MISSING.to_string(), format_score)
    ));

    if let Some(feedback) = student.feedback.as_deref().filter(|f| !f.trim().is_empty()) {
        out.push_str("\nFeedback:\n");
        out.push_str(feedback.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\nGenerated {}\n", generated_at.format("%Y-%m-%d %H:%M UTC")));
    out
}

/// Writes one `<id>-<handle>.txt` report per student into `reports_dir`.
///
/// Returns the paths written, in roster order.
#[tracing::instrument(skip_all, fields(reports_dir = %reports_dir.display()))]
pub fn write_reports(reports_dir: &Path, summary: &ScoreSummary) -> Result<Vec<PathBuf>> {
    let generated_at = Utc::now();
    let mut written = Vec::with_capacity(summary.students.len());

    for student in &summary.students {
        let path = reports_dir.join(format!("{}-{}.txt", student.id, student.handle));
        let text = render_report(student, summary.cut_points.as_ref(), generated_at);
        write_text(&path, &text)?;
        written.push(path);
    }

    info!(reports = written.len(), "Reports written");
    Ok(written)
}

/// Whole scores print without a fractional part.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.2}")
    }
}
