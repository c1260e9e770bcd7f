//! Plain-language highlights assembled from the aggregate tables.

use crate::analyzers::types::{KpiRow, SurveyAnalysis, ThemeRow};
use crate::config::SurveySchema;

const MAX_POINTS: usize = 12;
const TIMING_THEME: &str = "Session Timing & Duration";
const SUGGESTIONS_THEME: &str = "Suggestions/Requests";

/// Builds up to twelve summary points. Points whose inputs are missing
/// (no NPS metric, no groups, no matching themes) are skipped.
pub fn executive_summary(schema: &SurveySchema, analysis: &SurveyAnalysis) -> Vec<String> {
    let mut points = Vec::new();

    let scored: Vec<&KpiRow> = analysis
        .kpi_overall
        .iter()
        .filter(|k| k.mean_0_10.is_some())
        .collect();

    let headline = headline_metric(schema, analysis);

    if let Some(kpi) = headline {
        if let (Some(mean), Some(nps), Some(pro), Some(det)) = (
            kpi.mean_0_10,
            kpi.nps_score,
            kpi.promoter_pct,
            kpi.detractor_pct,
        ) {
            points.push(format!(
                "Overall satisfaction: {mean:.2}/10 with NPS of {nps:.1} ({pro:.1}% promoters, {det:.1}% detractors)"
            ));
        }
    }

    let mut by_top2 = scored.clone();
    by_top2.sort_by(|a, b| b.top2_box_pct.total_cmp(&a.top2_box_pct));
    if !by_top2.is_empty() {
        let listed = by_top2
            .iter()
            .take(3)
            .map(|k| format!("{} ({:.1}% Top-2 Box)", k.metric, k.top2_box_pct))
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("Top-rated elements: {listed}"));
    }

    let mut nps_ranked: Vec<&KpiRow> = scored
        .iter()
        .copied()
        .filter(|k| k.nps_score.is_some())
        .collect();
    nps_ranked.sort_by(|a, b| mean_of(b).total_cmp(&mean_of(a)));
    if nps_ranked.len() > 1 {
        let listed = nps_ranked
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, k)| format!("{}) {} ({:.2}/10)", i + 1, k.metric, mean_of(k)))
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("NPS rankings: {listed}"));
    }

    let strengths = top_themes(analysis, |t| t.pos_pct > 50.0);
    if !strengths.is_empty() {
        let listed = strengths
            .iter()
            .map(|t| format!("{} ({:.0}% positive)", t.theme, t.pos_pct))
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("Key strengths from feedback: {listed}"));
    }

    let concerns = top_themes(analysis, |t| t.neg_pct > 30.0);
    if !concerns.is_empty() {
        let listed = concerns
            .iter()
            .map(|t| format!("{} ({:.0}% negative)", t.theme, t.neg_pct))
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("Areas for improvement: {listed}"));
    }

    if let Some(timing) = analysis.theme(TIMING_THEME) {
        if timing.prevalence_pct > 20.0 {
            points.push(format!(
                "Timing/pacing mentioned by {:.1}% of respondents ({:.0}% negative sentiment) - key concern",
                timing.prevalence_pct, timing.neg_pct
            ));
        }
    }

    let mut by_mean = scored.clone();
    by_mean.sort_by(|a, b| mean_of(a).total_cmp(&mean_of(b)));
    if !by_mean.is_empty() {
        let listed = by_mean
            .iter()
            .take(3)
            .map(|k| format!("{} ({:.2}/10)", k.metric, mean_of(k)))
            .collect::<Vec<_>>()
            .join(", ");
        points.push(format!("Lowest-rated elements: {listed}"));
    }

    if let Some(kpi) = headline {
        if let Some(point) = group_spread(analysis, &kpi.metric) {
            points.push(point);
        }
    }

    if let Some(suggestions) = analysis.theme(SUGGESTIONS_THEME) {
        points.push(format!(
            "Future content requests from {:.1}% of respondents - review for next year's planning",
            suggestions.prevalence_pct
        ));
    }

    if let Some(avg) = average_mean(&scored, "Relevant") {
        points.push(format!(
            "Content relevance average across all sessions: {avg:.2}/10"
        ));
    }

    if let Some(avg) = average_mean(&scored, "Engaging") {
        points.push(format!(
            "Speaker engagement average across all sessions: {avg:.2}/10"
        ));
    }

    if let Some(nps) = headline.and_then(|k| k.nps_score) {
        let closing = if nps > 30.0 {
            "Strong overall performance with healthy NPS - focus on optimizing timing/pacing"
        } else if nps > 0.0 {
            "Positive overall response - address timing concerns and content depth for improvement"
        } else {
            "Event requires significant improvements - review all elements"
        };
        points.push(closing.to_string());
    }

    points.truncate(MAX_POINTS);
    points
}

/// The first NPS-kind metric in schema order.
pub fn headline_metric<'a>(
    schema: &SurveySchema,
    analysis: &'a SurveyAnalysis,
) -> Option<&'a KpiRow> {
    let metric = schema.metrics.iter().find(|m| m.scale.is_nps())?;
    analysis.kpi(&metric.name)
}

fn mean_of(kpi: &KpiRow) -> f64 {
    kpi.mean_0_10.unwrap_or(0.0)
}

/// Up to three themes passing `keep`, most prevalent first.
fn top_themes(analysis: &SurveyAnalysis, keep: impl Fn(&ThemeRow) -> bool) -> Vec<&ThemeRow> {
    let mut themes: Vec<&ThemeRow> = analysis.themes_overall.iter().filter(|t| keep(*t)).collect();
    themes.sort_by(|a, b| b.prevalence_pct.total_cmp(&a.prevalence_pct));
    themes.truncate(3);
    themes
}

fn group_spread(analysis: &SurveyAnalysis, metric: &str) -> Option<String> {
    let rows: Vec<(&str, f64)> = analysis
        .kpi_by_group
        .iter()
        .filter(|r| r.metric == metric)
        .filter_map(|r| r.mean_0_10.map(|m| (r.group.as_str(), m)))
        .collect();

    if rows.len() < 2 {
        return None;
    }

    let (max_group, max) = rows
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    let (min_group, min) = rows
        .iter()
        .copied()
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    let gap = max - min;

    if gap > 1.0 {
        Some(format!(
            "Group variance: {max_group} highest ({max:.2}/10) vs {min_group} lowest ({min:.2}/10) - {gap:.1} point gap"
        ))
    } else {
        Some("Satisfaction relatively consistent across groups (variance <1.0 point)".to_string())
    }
}

fn average_mean(scored: &[&KpiRow], name_fragment: &str) -> Option<f64> {
    let means: Vec<f64> = scored
        .iter()
        .filter(|k| k.metric.contains(name_fragment))
        .filter_map(|k| k.mean_0_10)
        .collect();
    crate::analyzers::utility::mean(&means)
}
