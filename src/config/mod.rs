//! Survey schema: which columns hold which metrics, and the lookup tables
//! used to score them.
//!
//! A schema is plain data. It is loaded once, validated, and then passed by
//! reference into the parser and analyzers, so two surveys with different
//! layouts can be processed side by side.

mod lexicon;
mod presets;

pub use lexicon::{ScaleLexicon, SentimentLexicon, ThemeDefinition, ThemeTaxonomy};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// How a metric's raw answers are turned into a 0–10 score.
///
/// Chosen once per metric in the schema instead of guessed per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Already 0–10 (NPS-style "how likely are you to recommend").
    #[serde(rename = "nps")]
    NumericPassthrough,
    /// Excellent … Very Poor.
    #[serde(rename = "quality")]
    QualityScale,
    /// Strongly Agree … Strongly Disagree.
    #[serde(rename = "agreement")]
    AgreementScale,
}

impl ScaleKind {
    pub fn is_nps(self) -> bool {
        matches!(self, ScaleKind::NumericPassthrough)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Output key, e.g. `Overall_NPS`.
    pub name: String,
    /// Exact input header.
    pub column: String,
    pub scale: ScaleKind,
}

/// A categorical column whose value counts are reported as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyColumn {
    pub name: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySchema {
    pub title: String,
    pub group_column: String,
    #[serde(default)]
    pub timestamp_column: Option<String>,
    #[serde(default)]
    pub free_text_columns: Vec<String>,
    pub metrics: Vec<MetricDefinition>,
    #[serde(default)]
    pub tally_columns: Vec<TallyColumn>,
    #[serde(default)]
    pub scales: ScaleLexicon,
    #[serde(default)]
    pub sentiment: SentimentLexicon,
    #[serde(default)]
    pub themes: ThemeTaxonomy,
}

impl SurveySchema {
    /// Loads and validates a schema from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?;
        let mut schema: SurveySchema = serde_json::from_str(&content)
            .with_context(|| format!("invalid schema JSON in {}", path.display()))?;

        schema.scales = schema.scales.case_folded();
        schema.validate()?;

        info!(
            path = %path.display(),
            title = %schema.title,
            metrics = schema.metrics.len(),
            "Schema loaded"
        );
        Ok(schema)
    }

    /// Writes the schema as pretty-printed JSON, overwriting `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body)
            .with_context(|| format!("failed to write schema {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            bail!("schema '{}' defines no metrics", self.title);
        }

        let mut seen = HashSet::new();
        for metric in &self.metrics {
            if !seen.insert(metric.name.as_str()) {
                bail!("duplicate metric name '{}'", metric.name);
            }
        }

        if self
            .themes
            .themes
            .iter()
            .any(|t| t.name == self.themes.fallback)
        {
            bail!(
                "theme '{}' is reserved as the fallback theme",
                self.themes.fallback
            );
        }

        for (label, score) in self.scales.quality.iter().chain(&self.scales.agreement) {
            if !(1..=5).contains(score) {
                bail!("scale label '{label}' maps to {score}, expected 1..=5");
            }
        }

        Ok(())
    }

    /// Returns a copy restricted to the columns present in `headers`.
    ///
    /// Metrics, free-text and tally columns without a matching header are
    /// dropped with a warning. The group column is required.
    pub fn retain_columns(&self, headers: &[String]) -> Result<Self> {
        let present: HashSet<&str> = headers.iter().map(|h| h.trim()).collect();

        if !present.contains(self.group_column.as_str()) {
            bail!("input is missing group column '{}'", self.group_column);
        }

        let mut schema = self.clone();

        schema.metrics.retain(|m| {
            let keep = present.contains(m.column.as_str());
            if !keep {
                warn!(metric = %m.name, column = %m.column, "Metric column not found, skipping");
            }
            keep
        });

        schema.free_text_columns.retain(|c| {
            let keep = present.contains(c.as_str());
            if !keep {
                warn!(column = %c, "Free-text column not found, skipping");
            }
            keep
        });

        schema.tally_columns.retain(|t| {
            let keep = present.contains(t.column.as_str());
            if !keep {
                warn!(tally = %t.name, column = %t.column, "Tally column not found, skipping");
            }
            keep
        });

        if let Some(ts) = &schema.timestamp_column {
            if !present.contains(ts.as_str()) {
                warn!(column = %ts, "Timestamp column not found, ignoring");
                schema.timestamp_column = None;
            }
        }

        if schema.metrics.is_empty() {
            bail!("none of the schema's metric columns are present in the input");
        }

        Ok(schema)
    }

    pub fn metric(&self, name: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn small_schema() -> SurveySchema {
        SurveySchema {
            title: "Test".into(),
            group_column: "Dept".into(),
            timestamp_column: Some("Timestamp".into()),
            free_text_columns: vec!["Feedback".into()],
            metrics: vec![
                MetricDefinition {
                    name: "Overall_NPS".into(),
                    column: "Recommend".into(),
                    scale: ScaleKind::NumericPassthrough,
                },
                MetricDefinition {
                    name: "Venue".into(),
                    column: "Venue rating".into(),
                    scale: ScaleKind::QualityScale,
                },
            ],
            tally_columns: vec![],
            scales: ScaleLexicon::default(),
            sentiment: SentimentLexicon::default(),
            themes: ThemeTaxonomy::default(),
        }
    }

    #[test]
    fn test_scale_kind_json_names() {
        let kind: ScaleKind = serde_json::from_str("\"agreement\"").unwrap();
        assert_eq!(kind, ScaleKind::AgreementScale);
        assert_eq!(
            serde_json::to_string(&ScaleKind::NumericPassthrough).unwrap(),
            "\"nps\""
        );
        assert!(ScaleKind::NumericPassthrough.is_nps());
        assert!(!ScaleKind::QualityScale.is_nps());
    }

    #[test]
    fn test_load_fills_defaults() {
        let path = temp_path("survey_analytics_test_schema_defaults.json");
        fs::write(
            &path,
            r#"{
                "title": "Minimal",
                "group_column": "Dept",
                "metrics": [{"name": "Overall_NPS", "column": "Recommend", "scale": "nps"}]
            }"#,
        )
        .unwrap();

        let schema = SurveySchema::load(&path).unwrap();
        assert_eq!(schema.sentiment.negation_window, 3);
        assert_eq!(schema.themes.fallback, "Other");
        assert!(schema.free_text_columns.is_empty());
        assert!(schema.timestamp_column.is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_validate_rejects_duplicate_metrics() {
        let mut schema = small_schema();
        schema.metrics.push(schema.metrics[0].clone());
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_label() {
        let mut schema = small_schema();
        schema.scales.quality.insert("superb".into(), 7);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_theme_named_like_fallback() {
        let mut schema = small_schema();
        schema.themes.themes.push(ThemeDefinition {
            name: "Other".into(),
            keywords: vec!["misc".into()],
        });
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_retain_columns_drops_absent_metrics() {
        let schema = small_schema();
        let kept = schema
            .retain_columns(&headers(&["Dept", "Recommend", "Feedback"]))
            .unwrap();

        assert_eq!(kept.metrics.len(), 1);
        assert_eq!(kept.metrics[0].name, "Overall_NPS");
        assert_eq!(kept.free_text_columns, vec!["Feedback".to_string()]);
        assert!(kept.timestamp_column.is_none());
    }

    #[test]
    fn test_retain_columns_requires_group_column() {
        let schema = small_schema();
        assert!(schema
            .retain_columns(&headers(&["Recommend", "Venue rating"]))
            .is_err());
    }

    #[test]
    fn test_preset_round_trips_through_file() {
        let path = temp_path("survey_analytics_test_schema_preset.json");
        let preset = SurveySchema::staff_development_2025();
        preset.write(&path).unwrap();

        let loaded = SurveySchema::load(&path).unwrap();
        assert_eq!(loaded, preset);

        fs::remove_file(&path).unwrap();
    }
}
