use crate::analyzers::aggregate::{kpi_by_group, kpi_overall, themes_by_group, themes_overall};
use crate::analyzers::bucket::{is_top2_box, nps_bucket, satisfaction_bucket};
use crate::analyzers::tagger::{TextTagger, extract_quote, theme_sentiments};
use crate::analyzers::types::{DetailRow, MetricScore, SurveyAnalysis};
use crate::config::SurveySchema;
use crate::normalize::normalize;
use crate::response::Response;
use chrono::Utc;
use tracing::{debug, info};

/// Normalizes, buckets and tags a single response.
pub fn score_response<T: TextTagger + ?Sized>(
    schema: &SurveySchema,
    response: &Response,
    tagger: &T,
) -> DetailRow {
    let scores = schema
        .metrics
        .iter()
        .map(|metric| {
            let value = normalize(response.answer(&metric.name), metric.scale, &schema.scales);

            MetricScore {
                metric: metric.name.clone(),
                value,
                satisfaction_bucket: satisfaction_bucket(value),
                nps_bucket: metric.scale.is_nps().then(|| nps_bucket(value)),
                top2_box: is_top2_box(value),
            }
        })
        .collect();

    let text = response.combined_text();
    let tags = tagger.tag(&text);

    DetailRow {
        respondent_id: response.id,
        group: response.group.clone(),
        sentiment_overall: tags.sentiment,
        theme_sentiments: theme_sentiments(&tags),
        themes: tags.themes,
        quote_short: extract_quote(&text),
        scores,
    }
}

pub fn score_responses<T: TextTagger + ?Sized>(
    schema: &SurveySchema,
    responses: &[Response],
    tagger: &T,
) -> Vec<DetailRow> {
    responses
        .iter()
        .map(|r| score_response(schema, r, tagger))
        .collect()
}

/// Runs the full pipeline: normalize, bucket, tag, then aggregate.
#[tracing::instrument(skip_all, fields(title = %schema.title, responses = responses.len()))]
pub fn analyze<T: TextTagger + ?Sized>(
    schema: &SurveySchema,
    responses: &[Response],
    tagger: &T,
) -> SurveyAnalysis {
    let detail = score_responses(schema, responses, tagger);
    info!(metrics = schema.metrics.len(), "Responses normalized and tagged");

    let kpi_overall = kpi_overall(schema, &detail);
    for kpi in &kpi_overall {
        debug!(
            metric = %kpi.metric,
            mean = ?kpi.mean_0_10,
            n = kpi.n_responses,
            "Metric aggregated"
        );
    }

    let kpi_by_group = kpi_by_group(schema, &detail);
    let themes_overall = themes_overall(&schema.themes, &detail);
    let themes_by_group = themes_by_group(&schema.themes, &detail);

    info!(
        kpi_overall = kpi_overall.len(),
        kpi_by_group = kpi_by_group.len(),
        themes_overall = themes_overall.len(),
        themes_by_group = themes_by_group.len(),
        "Aggregation complete"
    );

    SurveyAnalysis {
        title: schema.title.clone(),
        generated_at: Utc::now(),
        total_responses: responses.len(),
        metrics: schema.metrics.clone(),
        kpi_overall,
        kpi_by_group,
        themes_overall,
        themes_by_group,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::bucket::{NpsBucket, SatisfactionBucket};
    use crate::analyzers::tagger::{KeywordTagger, Sentiment, TextTags};
    use crate::config::{MetricDefinition, ScaleKind};
    use crate::response::RawAnswer;

    fn schema() -> SurveySchema {
        SurveySchema {
            title: "Pipeline".into(),
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
            ..SurveySchema::staff_development_2025()
        }
    }

    /// Tags everything as negative "Venue & Logistics" feedback.
    struct FixedTagger;

    impl TextTagger for FixedTagger {
        fn tag(&self, _text: &str) -> TextTags {
            TextTags {
                sentiment: Sentiment::Negative,
                themes: vec!["Venue & Logistics".into()],
            }
        }
    }

    #[test]
    fn test_score_response_buckets_each_metric() {
        let schema = schema();
        let response = Response::new(7)
            .with_group("Finance")
            .with_answer("Overall_NPS", RawAnswer::Number(9.0))
            .with_answer("Venue", RawAnswer::Text("Superb".into()))
            .with_text("The breakout timing felt rushed")
            .with_text("");

        let row = score_response(&schema, &response, &KeywordTagger::from_schema(&schema));

        assert_eq!(row.respondent_id, 7);
        assert_eq!(row.group.as_deref(), Some("Finance"));

        let nps = row.score("Overall_NPS").unwrap();
        assert_eq!(nps.value, Some(9.0));
        assert_eq!(nps.nps_bucket, Some(NpsBucket::Promoter));
        assert_eq!(nps.satisfaction_bucket, SatisfactionBucket::High);
        assert!(nps.top2_box);

        let venue = row.score("Venue").unwrap();
        assert_eq!(venue.value, None);
        assert_eq!(venue.nps_bucket, None);
        assert_eq!(venue.satisfaction_bucket, SatisfactionBucket::Missing);
        assert!(!venue.top2_box);

        assert_eq!(row.sentiment_overall, Sentiment::Negative);
        assert_eq!(row.themes.len(), 2);
        assert_eq!(row.quote_short, "The breakout timing felt rushed");
    }

    #[test]
    fn test_buckets_read_unrounded_scores() {
        let schema = schema();
        let score = |answer: f64| {
            let response =
                Response::new(1).with_answer("Overall_NPS", RawAnswer::Number(answer));
            let row = score_response(&schema, &response, &FixedTagger);
            row.score("Overall_NPS").unwrap().clone()
        };

        let just_below_eight = score(7.999);
        assert_eq!(just_below_eight.value, Some(7.999));
        assert_eq!(just_below_eight.satisfaction_bucket, SatisfactionBucket::Medium);
        assert!(!just_below_eight.top2_box);

        let just_below_nine = score(8.996);
        assert_eq!(just_below_nine.value, Some(8.996));
        assert_eq!(just_below_nine.nps_bucket, Some(NpsBucket::Passive));
        assert_eq!(just_below_nine.satisfaction_bucket, SatisfactionBucket::High);
    }

    #[test]
    fn test_analyze_uses_supplied_tagger() {
        let schema = schema();
        let responses = vec![
            Response::new(1)
                .with_group("IT")
                .with_answer("Venue", RawAnswer::Text("Excellent".into())),
            Response::new(2)
                .with_group("IT")
                .with_answer("Venue", RawAnswer::Text("Fair".into())),
        ];

        let analysis = analyze(&schema, &responses, &FixedTagger);

        assert_eq!(analysis.total_responses, 2);
        assert_eq!(analysis.themes_overall.len(), 1);
        assert_eq!(analysis.themes_overall[0].theme, "Venue & Logistics");
        assert_eq!(analysis.themes_overall[0].neg_pct, 100.0);

        let venue = analysis.kpi("Venue").unwrap();
        assert_eq!(venue.mean_0_10, Some(7.5));
        assert_eq!(venue.n_responses, 2);

        let nps = analysis.kpi("Overall_NPS").unwrap();
        assert_eq!(nps.mean_0_10, None);
        assert_eq!(nps.n_responses, 0);

        // The NPS metric has no answers in IT, so only Venue is reported.
        assert_eq!(analysis.kpi_by_group.len(), 1);
        assert_eq!(analysis.kpi_by_group[0].metric, "Venue");
    }

    #[test]
    fn test_analyze_empty_input() {
        let schema = schema();
        let analysis = analyze(&schema, &[], &KeywordTagger::from_schema(&schema));

        assert_eq!(analysis.total_responses, 0);
        assert!(analysis.kpi_overall.iter().all(|k| k.mean_0_10.is_none()));
        assert!(analysis.kpi_by_group.is_empty());
        assert!(analysis.themes_overall.is_empty());
    }
}
