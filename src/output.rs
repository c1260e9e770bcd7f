//! Writers for the analysis tables, JSON documents and the text summary.
//!
//! Every writer overwrites its target. Missing numbers become empty CSV
//! cells and JSON `null`.

use crate::analyzers::types::{AnalyticsSummary, DetailRow, SurveyAnalysis};
use crate::analyzers::utility::round_mean;
use crate::config::MetricDefinition;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const KPI_OVERALL_FILE: &str = "kpi_overall.csv";
pub const KPI_BY_GROUP_FILE: &str = "kpi_by_group.csv";
pub const THEMES_OVERALL_FILE: &str = "themes_overall.csv";
pub const THEMES_BY_GROUP_FILE: &str = "themes_by_group.csv";
pub const DETAIL_FILE: &str = "buckets_detail.csv";
pub const SUMMARY_JSON_FILE: &str = "analytics_summary.json";

/// Writes all tables for `analysis` into `dir`, creating it if needed.
#[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn write_analysis(dir: impl AsRef<Path>, analysis: &SurveyAnalysis) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    write_table(dir.join(KPI_OVERALL_FILE), &analysis.kpi_overall)?;
    write_table(dir.join(KPI_BY_GROUP_FILE), &analysis.kpi_by_group)?;
    write_table(dir.join(THEMES_OVERALL_FILE), &analysis.themes_overall)?;
    write_table(dir.join(THEMES_BY_GROUP_FILE), &analysis.themes_by_group)?;
    write_detail_csv(dir.join(DETAIL_FILE), &analysis.metrics, &analysis.detail)?;
    write_json(dir.join(SUMMARY_JSON_FILE), &AnalyticsSummary::from(analysis))?;

    info!(responses = analysis.total_responses, "Analysis tables written");
    Ok(())
}

/// Writes one CSV row per item; headers come from the row type's fields.
pub fn write_table<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV table written");
    Ok(())
}

/// Writes the per-respondent table.
///
/// After the fixed columns come, per metric: `<metric>`, `<metric>_Bucket`,
/// `<metric>_NpsBucket` (NPS-kind metrics only) and `<metric>_Top2Box`.
/// Scores are written to 2 decimals. Each row's scores must follow the
/// order of `metrics`.
pub fn write_detail_csv(
    path: impl AsRef<Path>,
    metrics: &[MetricDefinition],
    rows: &[DetailRow],
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header: Vec<String> = [
        "respondent_id",
        "group",
        "sentiment_overall",
        "themes",
        "theme_sentiments",
        "quote_short",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    for metric in metrics {
        header.push(metric.name.clone());
        header.push(format!("{}_Bucket", metric.name));
        if metric.scale.is_nps() {
            header.push(format!("{}_NpsBucket", metric.name));
        }
        header.push(format!("{}_Top2Box", metric.name));
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.respondent_id.to_string(),
            row.group.clone().unwrap_or_default(),
            row.sentiment_overall.to_string(),
            serde_json::to_string(&row.themes)?,
            serde_json::to_string(&row.theme_sentiments)?,
            row.quote_short.clone(),
        ];
        for score in &row.scores {
            record.push(
                score
                    .value
                    .map(|v| round_mean(v).to_string())
                    .unwrap_or_default(),
            );
            record.push(score.satisfaction_bucket.to_string());
            if let Some(bucket) = score.nps_bucket {
                record.push(bucket.to_string());
            }
            record.push(score.top2_box.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Detail table written");
    Ok(())
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes a title line followed by the points, numbered from 1.
pub fn write_summary(path: impl AsRef<Path>, title: &str, points: &[String]) -> Result<()> {
    let path = path.as_ref();
    let mut body = format!("{title}\n\n");
    for (i, point) in points.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", i + 1, point));
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
