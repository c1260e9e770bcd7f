//! Built-in schema for the Staff Development Day 2025 response export.

use super::{
    MetricDefinition, ScaleKind, ScaleLexicon, SentimentLexicon, SurveySchema, TallyColumn,
    ThemeTaxonomy,
};

const MORNING_KEYNOTE: &str = "Regarding the MORNING KEYNOTE SPEAKER - Katie DeWulf - The Big Apple Red: \"Navigate the Shift: Practical Strategies for Thriving Through Change\", please rate the following questions:";
const FIRESIDE: &str = "Regarding the LUNCH AND FIRESIDE CHAT - Beyond the Buzz: \"Real Talk on AI\", please rate the following questions:";
const AFTERNOON_KEYNOTE: &str = "Regarding the AFTERNOON KEYNOTE SPEAKER - Stuart MacDonald: \"Continuous Improvement and Magic,\" please rate the following questions:";
const MORNING_BREAKOUT: &str = "Regarding the MORNING BREAKOUT SESSION you attended.";
const AFTERNOON_BREAKOUT: &str = "Regarding the AFTERNOON BREAKOUT SESSION you attended.";
const EVENT_RATING: &str =
    "Regarding the Staff Development Day, how would you rate the following?";

impl SurveySchema {
    pub fn staff_development_2025() -> Self {
        let nps = [
            (
                "Overall_NPS",
                "On a scale of 0-10, how likely are you to recommend Staff Development Day to a colleague?",
            ),
            (
                "Morning_Keynote_NPS",
                "MORNING KEYNOTE SPEAKER - On a scale of 0-10, how likely are you to recommend the morning keynote speaker, Katie DeWulf : \"Practical Strategies for Thriving Through Change\" to a colleague?",
            ),
            (
                "Fireside_NPS",
                "LUNCH AND FIRESIDE CHAT On a scale of 0-10, how likely are you to recommend the lunch and fireside chat: \"Beyond the Buzz: Real Talk on AI\" to a colleague?",
            ),
            (
                "Afternoon_Keynote_NPS",
                "AFTERNOON KEYNOTE SPEAKER - On a scale of 0-10, how likely would you recommend the afternoon keynote speaker, Stuart MacDonald: \"Continuous Improvement & Magic?\":",
            ),
            (
                "Morning_Breakout_NPS",
                "On a scale of 0-10, how likely do you recommend attending the morning breakout session you attended to a friend or colleague?",
            ),
            (
                "Afternoon_Breakout_NPS",
                "On a scale of 0-10, how likely do you recommend attending the afternoon breakout session you attended to a friend or colleague?",
            ),
        ];

        let quality = [
            ("Organization_Flow", "The organization and flow of the event?"),
            ("Venue", "The venue of the event?"),
            ("Duration", "The duration of the event?"),
        ];

        // (metric prefix, question stem, engaging, time, relevant)
        let sessions = [
            (
                "Morning_Keynote",
                MORNING_KEYNOTE,
                "I thought the speaker was informative, engaging, and relatable.",
                "The time allotted for the keynote speaker was appropriate.",
                "The topic covered was relevant and informational.",
            ),
            (
                "Fireside",
                FIRESIDE,
                "The speakers were informative, engaging, and relatable.",
                "The time allotted for the panel discussion was appropriate.",
                "The topics covered were relevant and informational.",
            ),
            (
                "Afternoon_Keynote",
                AFTERNOON_KEYNOTE,
                "The speaker was informative, engaging, and relatable.",
                "The time allotted for the keynote speaker was appropriate.",
                "The topic covered was relevant and informational.",
            ),
            (
                "Morning_Breakout",
                MORNING_BREAKOUT,
                "The speaker was informative, engaging, and relatable.",
                "The time allotted for the speaker was appropriate.",
                "The topic covered was relevant and informational.",
            ),
            (
                "Afternoon_Breakout",
                AFTERNOON_BREAKOUT,
                "The speaker was informative, engaging, and relatable.",
                "The time allotted for the speaker was appropriate.",
                "The topic covered was relevant and informational.",
            ),
        ];

        let metric = |name: String, column: String, scale| MetricDefinition {
            name,
            column,
            scale,
        };

        let mut metrics: Vec<MetricDefinition> = nps
            .iter()
            .map(|(name, column)| {
                metric(
                    name.to_string(),
                    column.to_string(),
                    ScaleKind::NumericPassthrough,
                )
            })
            .collect();

        metrics.extend(quality.iter().map(|(name, item)| {
            metric(
                name.to_string(),
                format!("{EVENT_RATING} [{item}]"),
                ScaleKind::QualityScale,
            )
        }));

        for (prefix, stem, engaging, time, relevant) in sessions {
            for (suffix, item) in [("Engaging", engaging), ("Time", time), ("Relevant", relevant)] {
                metrics.push(metric(
                    format!("{prefix}_{suffix}"),
                    format!("{stem} [{item}]"),
                    ScaleKind::AgreementScale,
                ));
            }
        }

        Self {
            title: "Staff Development Day 2025 Survey Results".to_string(),
            group_column: "Please indicate your department.".to_string(),
            timestamp_column: Some("Timestamp".to_string()),
            free_text_columns: vec![
                "Please provide any feedback as it relates to the schedule, content covered, or the overall experience.".to_string(),
                "What other content or sessions would you like to see covered in future Staff Development Day events?".to_string(),
            ],
            metrics,
            tally_columns: vec![
                TallyColumn {
                    name: "morning_breakout".to_string(),
                    column: "Please select which morning breakout session you attended:"
                        .to_string(),
                },
                TallyColumn {
                    name: "afternoon_breakout".to_string(),
                    column: "Please select which afternoon breakout session you attended:"
                        .to_string(),
                },
            ],
            scales: ScaleLexicon::default(),
            sentiment: SentimentLexicon::default(),
            themes: ThemeTaxonomy::default(),
        }
    }
}
