//! Dashboard-ready JSON document built from a finished analysis.

use crate::analyzers::aggregate::groups;
use crate::analyzers::summary::headline_metric;
use crate::analyzers::tagger::Sentiment;
use crate::analyzers::types::{GroupKpiRow, GroupThemeRow, KpiRow, SurveyAnalysis, ThemeRow};
use crate::config::SurveySchema;
use crate::response::Response;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const NPS_SUFFIX: &str = "_NPS";

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub headline: Option<HeadlineMetric>,
    pub session_performance: Vec<SessionPerformance>,
    pub group_comparison: Vec<GroupComparison>,
    pub themes: DashboardThemes,
    pub tallies: BTreeMap<String, Vec<ValueCount>>,
    pub all_metrics: Vec<KpiRow>,
    pub kpi_by_group: Vec<GroupKpiRow>,
    pub sentiment_distribution: SentimentDistribution,
}

#[derive(Debug, Serialize)]
pub struct DashboardMetadata {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub total_responses: usize,
    pub survey_start: Option<NaiveDateTime>,
    pub survey_end: Option<NaiveDateTime>,
    /// Responses per group, largest first.
    pub groups: Vec<ValueCount>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct HeadlineMetric {
    pub metric: String,
    pub score: Option<f64>,
    pub nps: Option<f64>,
    pub promoters: Option<f64>,
    pub passives: Option<f64>,
    pub detractors: Option<f64>,
    pub top2_box: f64,
}

/// An NPS metric named `<Prefix>_NPS` together with the means of its
/// `<Prefix>_*` companion metrics.
#[derive(Debug, PartialEq, Serialize)]
pub struct SessionPerformance {
    pub name: String,
    pub metric: String,
    pub score: Option<f64>,
    pub nps: Option<f64>,
    pub promoters: Option<f64>,
    pub passives: Option<f64>,
    pub detractors: Option<f64>,
    pub top2_box: f64,
    /// Companion metric suffix, lowercased → mean.
    pub details: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct GroupComparison {
    pub group: String,
    pub score: Option<f64>,
    pub nps: Option<f64>,
    pub promoters: Option<f64>,
    pub passives: Option<f64>,
    pub detractors: Option<f64>,
    pub respondents: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardThemes {
    pub overall: Vec<ThemeRow>,
    pub by_group: Vec<GroupThemeRow>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

pub fn build_dashboard(
    schema: &SurveySchema,
    responses: &[Response],
    analysis: &SurveyAnalysis,
) -> Dashboard {
    let headline = headline_metric(schema, analysis);

    let mut group_counts: Vec<ValueCount> = groups(&analysis.detail)
        .into_iter()
        .map(|(group, rows)| ValueCount {
            value: group.to_string(),
            count: rows.len(),
        })
        .collect();
    group_counts.sort_by(|a, b| b.count.cmp(&a.count));

    let metadata = DashboardMetadata {
        title: analysis.title.clone(),
        generated_at: analysis.generated_at,
        total_responses: analysis.total_responses,
        survey_start: responses.iter().filter_map(|r| r.submitted_at).min(),
        survey_end: responses.iter().filter_map(|r| r.submitted_at).max(),
        groups: group_counts,
    };

    let session_performance = analysis
        .kpi_overall
        .iter()
        .filter(|k| is_nps(schema, &k.metric))
        .filter(|k| headline.is_none_or(|h| h.metric != k.metric))
        .map(|k| session(schema, k, &analysis.kpi_overall))
        .collect();

    let mut group_comparison: Vec<GroupComparison> = match headline {
        Some(h) => analysis
            .kpi_by_group
            .iter()
            .filter(|r| r.metric == h.metric)
            .map(|r| GroupComparison {
                group: r.group.clone(),
                score: r.mean_0_10,
                nps: r.nps_score,
                promoters: r.promoter_pct,
                passives: r.passive_pct,
                detractors: r.detractor_pct,
                respondents: r.n_responses,
            })
            .collect(),
        None => Vec::new(),
    };
    group_comparison.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .total_cmp(&a.score.unwrap_or(0.0))
    });

    let tallies = schema
        .tally_columns
        .iter()
        .map(|t| {
            let values = responses.iter().filter_map(|r| r.tallies.get(&t.name));
            (t.name.clone(), value_counts(values))
        })
        .collect();

    let mut sentiment_distribution = SentimentDistribution::default();
    for row in &analysis.detail {
        match row.sentiment_overall {
            Sentiment::Positive => sentiment_distribution.positive += 1,
            Sentiment::Neutral => sentiment_distribution.neutral += 1,
            Sentiment::Negative => sentiment_distribution.negative += 1,
        }
    }

    Dashboard {
        metadata,
        headline: headline.map(|k| HeadlineMetric {
            metric: k.metric.clone(),
            score: k.mean_0_10,
            nps: k.nps_score,
            promoters: k.promoter_pct,
            passives: k.passive_pct,
            detractors: k.detractor_pct,
            top2_box: k.top2_box_pct,
        }),
        session_performance,
        group_comparison,
        themes: DashboardThemes {
            overall: analysis.themes_overall.clone(),
            by_group: analysis.themes_by_group.clone(),
        },
        tallies,
        all_metrics: analysis.kpi_overall.clone(),
        kpi_by_group: analysis.kpi_by_group.clone(),
        sentiment_distribution,
    }
}

fn is_nps(schema: &SurveySchema, metric: &str) -> bool {
    schema.metric(metric).is_some_and(|m| m.scale.is_nps())
}

fn session(schema: &SurveySchema, kpi: &KpiRow, all: &[KpiRow]) -> SessionPerformance {
    let prefix = kpi.metric.strip_suffix(NPS_SUFFIX).unwrap_or(&kpi.metric);

    let details = all
        .iter()
        .filter(|other| !is_nps(schema, &other.metric))
        .filter_map(|other| {
            let suffix = other.metric.strip_prefix(prefix)?.strip_prefix('_')?;
            Some((suffix.to_lowercase(), other.mean_0_10))
        })
        .collect();

    SessionPerformance {
        name: prefix.replace('_', " "),
        metric: kpi.metric.clone(),
        score: kpi.mean_0_10,
        nps: kpi.nps_score,
        promoters: kpi.promoter_pct,
        passives: kpi.passive_pct,
        detractors: kpi.detractor_pct,
        top2_box: kpi.top2_box_pct,
        details,
    }
}

/// Distinct values with their counts, most frequent first; ties keep
/// first-seen order.
fn value_counts<'a>(values: impl Iterator<Item = &'a String>) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in values {
        match counts.iter().position(|c| &c.value == value) {
            Some(i) => counts[i].count += 1,
            None => counts.push(ValueCount {
                value: value.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
