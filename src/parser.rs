//! CSV reader for survey exports.
//!
//! The first row is the header. Columns are matched against the schema by
//! exact (trimmed) header text; columns the schema does not name are ignored.

use crate::config::SurveySchema;
use crate::response::{RawAnswer, Response};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads every response from the CSV file at `path`.
///
/// Returns the schema narrowed to the columns actually present alongside
/// the responses; downstream steps should use the narrowed schema.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_responses(
    path: impl AsRef<Path>,
    schema: &SurveySchema,
) -> Result<(SurveySchema, Vec<Response>)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open responses {}", path.display()))?;
    read_responses(file, schema).with_context(|| format!("failed to read {}", path.display()))
}

pub fn read_responses<R: Read>(
    reader: R,
    schema: &SurveySchema,
) -> Result<(SurveySchema, Vec<Response>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("missing header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let schema = schema.retain_columns(&headers)?;

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let col = |name: &str| index.get(name).copied();

    let mut responses = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("malformed row {}", i + 2))?;
        let cell = |name: &str| col(name).and_then(|c| record.get(c)).unwrap_or("");

        let mut response = Response::new(i as u32 + 1).with_group(cell(&schema.group_column));

        if let Some(ts) = &schema.timestamp_column {
            let raw = cell(ts);
            response.submitted_at = parse_timestamp(raw);
            if response.submitted_at.is_none() && !raw.trim().is_empty() {
                warn!(row = i + 2, value = raw, "Unrecognized timestamp");
            }
        }

        for metric in &schema.metrics {
            response
                .answers
                .insert(metric.name.clone(), RawAnswer::from_cell(cell(&metric.column)));
        }

        for column in &schema.free_text_columns {
            response.free_text.push(cell(column).trim().to_string());
        }

        for tally in &schema.tally_columns {
            let value = cell(&tally.column).trim();
            if !value.is_empty() {
                response.tallies.insert(tally.name.clone(), value.to_string());
            }
        }

        responses.push(response);
    }

    let grouped = responses.iter().filter(|r| r.group.is_some()).count();
    debug!(ungrouped = responses.len() - grouped, "Group column read");
    info!(
        responses = responses.len(),
        metrics = schema.metrics.len(),
        "Responses loaded"
    );

    Ok((schema, responses))
}

/// Parses the timestamp layouts seen in form exports. A bare date is taken
/// as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MetricDefinition, ScaleKind, TallyColumn};

    fn schema() -> SurveySchema {
        SurveySchema {
            title: "Parser".into(),
            group_column: "Department".into(),
            timestamp_column: Some("Timestamp".into()),
            free_text_columns: vec!["Comments".into(), "Ideas".into()],
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
            tally_columns: vec![TallyColumn {
                name: "breakout".into(),
                column: "Breakout".into(),
            }],
            ..SurveySchema::staff_development_2025()
        }
    }

    #[test]
    fn test_read_responses_maps_columns() {
        let data = "\
Timestamp,Department,Recommend,Venue rating,Comments,Ideas,Breakout,Ignored
2025-10-10 09:15:00, IT ,9,Excellent,Great day,,Excel 201,x
10/10/2025 10:00:00,,,Fair,,More coffee,,y
";
        let (schema, responses) = read_responses(data.as_bytes(), &schema()).unwrap();

        assert_eq!(schema.metrics.len(), 2);
        assert_eq!(responses.len(), 2);

        let first = &responses[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.group.as_deref(), Some("IT"));
        assert_eq!(first.answer("Overall_NPS"), &RawAnswer::Number(9.0));
        assert_eq!(first.answer("Venue"), &RawAnswer::Text("Excellent".into()));
        assert_eq!(first.free_text, vec!["Great day".to_string(), String::new()]);
        assert_eq!(first.tallies.get("breakout").map(String::as_str), Some("Excel 201"));
        assert!(first.submitted_at.is_some());

        let second = &responses[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.group, None);
        assert_eq!(second.answer("Overall_NPS"), &RawAnswer::Missing);
        assert!(second.tallies.is_empty());
        assert!(second.submitted_at.is_some());
    }

    #[test]
    fn test_missing_metric_column_is_dropped() {
        let data = "Department,Recommend\nIT,7\n";
        let (schema, responses) = read_responses(data.as_bytes(), &schema()).unwrap();

        assert_eq!(schema.metrics.len(), 1);
        assert_eq!(schema.metrics[0].name, "Overall_NPS");
        assert!(schema.free_text_columns.is_empty());
        assert_eq!(schema.timestamp_column, None);
        assert_eq!(responses[0].answer("Venue"), &RawAnswer::Missing);
    }

    #[test]
    fn test_missing_group_column_is_an_error() {
        let data = "Recommend,Venue rating\n7,Good\n";
        assert!(read_responses(data.as_bytes(), &schema()).is_err());
    }

    #[test]
    fn test_header_only_yields_no_responses() {
        let data = "Department,Recommend\n";
        let (_, responses) = read_responses(data.as_bytes(), &schema()).unwrap();
        assert!(responses.is_empty());
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-10-10 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("10/10/2025 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-10T09:15:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-10-10"),
            NaiveDate::from_ymd_opt(2025, 10, 10).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_load_responses_missing_file() {
        let err = load_responses("/nonexistent/responses.csv", &schema()).unwrap_err();
        assert!(err.to_string().contains("failed to open responses"));
    }
}
