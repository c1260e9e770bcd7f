//! Data types produced by the analysis pipeline.
//!
//! Every table field is either a finite, rounded number or `None`, which
//! serializes as an empty CSV cell or JSON `null`. Per-respondent scores
//! keep full precision until they are written out.

use crate::analyzers::bucket::{NpsBucket, SatisfactionBucket};
use crate::analyzers::tagger::{Sentiment, ThemeSentiment};
use crate::config::MetricDefinition;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary statistics for one metric across all responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub metric: String,
    /// `None` when no response scored this metric.
    pub mean_0_10: Option<f64>,
    pub top2_box_pct: f64,
    pub n_responses: usize,
    // NPS-kind metrics only.
    pub detractor_pct: Option<f64>,
    pub passive_pct: Option<f64>,
    pub promoter_pct: Option<f64>,
    pub nps_score: Option<f64>,
}

/// [`KpiRow`] restricted to one value of the grouping column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupKpiRow {
    pub group: String,
    pub metric: String,
    pub mean_0_10: Option<f64>,
    pub top2_box_pct: f64,
    pub n_responses: usize,
    pub detractor_pct: Option<f64>,
    pub passive_pct: Option<f64>,
    pub promoter_pct: Option<f64>,
    pub nps_score: Option<f64>,
}

impl KpiRow {
    pub fn for_group(self, group: &str) -> GroupKpiRow {
        GroupKpiRow {
            group: group.to_string(),
            metric: self.metric,
            mean_0_10: self.mean_0_10,
            top2_box_pct: self.top2_box_pct,
            n_responses: self.n_responses,
            detractor_pct: self.detractor_pct,
            passive_pct: self.passive_pct,
            promoter_pct: self.promoter_pct,
            nps_score: self.nps_score,
        }
    }
}

/// How often a theme came up and how people felt when it did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeRow {
    pub theme: String,
    /// Mentions as a share of all responses in scope.
    pub prevalence_pct: f64,
    pub mentions: usize,
    // Shares of `mentions`.
    pub pos_pct: f64,
    pub neu_pct: f64,
    pub neg_pct: f64,
    pub sample_quote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupThemeRow {
    pub group: String,
    pub theme: String,
    pub prevalence_pct: f64,
    pub mentions: usize,
    pub pos_pct: f64,
    pub neu_pct: f64,
    pub neg_pct: f64,
    pub sample_quote: String,
}

impl ThemeRow {
    pub fn for_group(self, group: &str) -> GroupThemeRow {
        GroupThemeRow {
            group: group.to_string(),
            theme: self.theme,
            prevalence_pct: self.prevalence_pct,
            mentions: self.mentions,
            pos_pct: self.pos_pct,
            neu_pct: self.neu_pct,
            neg_pct: self.neg_pct,
            sample_quote: self.sample_quote,
        }
    }
}

/// One metric for one respondent after normalization and bucketing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric: String,
    /// Unrounded; buckets and means are computed from this.
    pub value: Option<f64>,
    pub satisfaction_bucket: SatisfactionBucket,
    /// Set for NPS-kind metrics only.
    pub nps_bucket: Option<NpsBucket>,
    pub top2_box: bool,
}

/// Row-level view of one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub respondent_id: u32,
    pub group: Option<String>,
    pub sentiment_overall: Sentiment,
    pub themes: Vec<String>,
    pub theme_sentiments: Vec<ThemeSentiment>,
    pub quote_short: String,
    pub scores: Vec<MetricScore>,
}

impl DetailRow {
    pub fn score(&self, metric: &str) -> Option<&MetricScore> {
        self.scores.iter().find(|s| s.metric == metric)
    }
}

/// Everything computed for one survey run.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyAnalysis {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub total_responses: usize,
    /// Metrics that were scored, in schema order.
    pub metrics: Vec<MetricDefinition>,
    pub kpi_overall: Vec<KpiRow>,
    pub kpi_by_group: Vec<GroupKpiRow>,
    pub themes_overall: Vec<ThemeRow>,
    pub themes_by_group: Vec<GroupThemeRow>,
    pub detail: Vec<DetailRow>,
}

impl SurveyAnalysis {
    pub fn kpi(&self, metric: &str) -> Option<&KpiRow> {
        self.kpi_overall.iter().find(|k| k.metric == metric)
    }

    pub fn theme(&self, theme: &str) -> Option<&ThemeRow> {
        self.themes_overall.iter().find(|t| t.theme == theme)
    }
}

/// The four aggregate tables, written as `analytics_summary.json`.
#[derive(Serialize)]
pub struct AnalyticsSummary<'a> {
    pub title: &'a str,
    pub generated_at: DateTime<Utc>,
    pub total_responses: usize,
    pub kpi_overall: &'a [KpiRow],
    pub kpi_by_group: &'a [GroupKpiRow],
    pub themes_overall: &'a [ThemeRow],
    pub themes_by_group: &'a [GroupThemeRow],
}

impl<'a> From<&'a SurveyAnalysis> for AnalyticsSummary<'a> {
    fn from(a: &'a SurveyAnalysis) -> Self {
        AnalyticsSummary {
            title: &a.title,
            generated_at: a.generated_at,
            total_responses: a.total_responses,
            kpi_overall: &a.kpi_overall,
            kpi_by_group: &a.kpi_by_group,
            themes_overall: &a.themes_overall,
            themes_by_group: &a.themes_by_group,
        }
    }
}
