use crate::analyzers::bucket::{NpsBucket, is_top2_box, nps_bucket};
use crate::analyzers::tagger::Sentiment;
use crate::analyzers::types::{DetailRow, GroupKpiRow, GroupThemeRow, KpiRow, ThemeRow};
use crate::analyzers::utility::{mean, pct, round_mean, round_pct};
use crate::config::{MetricDefinition, SurveySchema, ThemeTaxonomy};

/// Aggregates one metric over `rows`.
///
/// Missing scores are excluded from every numerator and denominator. With no
/// scored rows the mean is `None` and every percentage is 0.
pub fn kpi_for(metric: &MetricDefinition, rows: &[&DetailRow]) -> KpiRow {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.score(&metric.name).and_then(|s| s.value))
        .collect();
    let n = values.len();

    let top2 = values.iter().filter(|v| is_top2_box(Some(**v))).count();

    let mut row = KpiRow {
        metric: metric.name.clone(),
        mean_0_10: mean(&values).map(round_mean),
        top2_box_pct: round_pct(pct(top2, n)),
        n_responses: n,
        detractor_pct: None,
        passive_pct: None,
        promoter_pct: None,
        nps_score: None,
    };

    if metric.scale.is_nps() {
        let count = |bucket: NpsBucket| {
            values
                .iter()
                .filter(|v| nps_bucket(Some(**v)) == bucket)
                .count()
        };
        let detractor = round_pct(pct(count(NpsBucket::Detractor), n));
        let passive = round_pct(pct(count(NpsBucket::Passive), n));
        let promoter = round_pct(pct(count(NpsBucket::Promoter), n));

        row.detractor_pct = Some(detractor);
        row.passive_pct = Some(passive);
        row.promoter_pct = Some(promoter);
        row.nps_score = Some(round_pct(promoter - detractor));
    }

    row
}

/// One row per schema metric, in schema order, over every response.
pub fn kpi_overall(schema: &SurveySchema, detail: &[DetailRow]) -> Vec<KpiRow> {
    let rows: Vec<&DetailRow> = detail.iter().collect();
    schema.metrics.iter().map(|m| kpi_for(m, &rows)).collect()
}

/// Per group (first-seen order), one row per metric that has at least one
/// scored response in that group.
pub fn kpi_by_group(schema: &SurveySchema, detail: &[DetailRow]) -> Vec<GroupKpiRow> {
    let mut out = Vec::new();

    for (group, rows) in groups(detail) {
        for metric in &schema.metrics {
            let kpi = kpi_for(metric, &rows);
            if kpi.n_responses == 0 {
                continue;
            }
            out.push(kpi.for_group(group));
        }
    }

    out
}

/// Theme statistics over `rows`, or `None` if nobody mentioned the theme.
pub fn theme_for(theme: &str, rows: &[&DetailRow]) -> Option<ThemeRow> {
    let mentioning: Vec<&&DetailRow> = rows
        .iter()
        .filter(|r| r.themes.iter().any(|t| t == theme))
        .collect();

    let mentions = mentioning.len();
    if mentions == 0 {
        return None;
    }

    let count = |sentiment: Sentiment| {
        mentioning
            .iter()
            .filter(|r| r.sentiment_overall == sentiment)
            .count()
    };

    let sample_quote = mentioning
        .iter()
        .map(|r| r.quote_short.as_str())
        .find(|q| !q.is_empty())
        .unwrap_or_default()
        .to_string();

    Some(ThemeRow {
        theme: theme.to_string(),
        prevalence_pct: round_pct(pct(mentions, rows.len())),
        mentions,
        pos_pct: round_pct(pct(count(Sentiment::Positive), mentions)),
        neu_pct: round_pct(pct(count(Sentiment::Neutral), mentions)),
        neg_pct: round_pct(pct(count(Sentiment::Negative), mentions)),
        sample_quote,
    })
}

/// Mentioned themes over every response, most prevalent first. Ties keep
/// taxonomy order.
pub fn themes_overall(taxonomy: &ThemeTaxonomy, detail: &[DetailRow]) -> Vec<ThemeRow> {
    let rows: Vec<&DetailRow> = detail.iter().collect();

    let mut out: Vec<ThemeRow> = taxonomy
        .names()
        .filter_map(|theme| theme_for(theme, &rows))
        .collect();

    out.sort_by(|a, b| b.prevalence_pct.total_cmp(&a.prevalence_pct));
    out
}

/// Mentioned themes per group (first-seen order), in taxonomy order.
pub fn themes_by_group(taxonomy: &ThemeTaxonomy, detail: &[DetailRow]) -> Vec<GroupThemeRow> {
    let mut out = Vec::new();

    for (group, rows) in groups(detail) {
        out.extend(
            taxonomy
                .names()
                .filter_map(|theme| theme_for(theme, &rows))
                .map(|row| row.for_group(group)),
        );
    }

    out
}

/// Rows partitioned by group value in order of first appearance. Rows
/// without a group are left out.
pub fn groups(detail: &[DetailRow]) -> Vec<(&str, Vec<&DetailRow>)> {
    let mut out: Vec<(&str, Vec<&DetailRow>)> = Vec::new();

    for row in detail {
        let Some(group) = row.group.as_deref() else {
            continue;
        };
        match out.iter().position(|(g, _)| *g == group) {
            Some(i) => out[i].1.push(row),
            None => out.push((group, vec![row])),
        }
    }

    out
}
