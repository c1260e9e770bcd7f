//! Lookup tables used to normalize answers and tag free text.
//!
//! Every table has a default matching the Staff Development Day survey, and
//! every table can be overridden from a schema file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text labels of the two five-point scales, each mapped to 1..=5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleLexicon {
    pub quality: BTreeMap<String, u8>,
    pub agreement: BTreeMap<String, u8>,
}

impl Default for ScaleLexicon {
    fn default() -> Self {
        let quality = [
            ("excellent", 5),
            ("very good", 4),
            ("good", 4),
            ("fair", 3),
            ("poor", 2),
            ("very poor", 1),
        ];
        let agreement = [
            ("strongly agree", 5),
            ("agree", 4),
            ("tend to agree", 4),
            ("neither", 3),
            ("neutral", 3),
            ("tend to disagree", 2),
            ("disagree", 2),
            ("strongly disagree", 1),
        ];

        Self {
            quality: owned(&quality),
            agreement: owned(&agreement),
        }
    }
}

impl ScaleLexicon {
    /// Returns a copy whose labels are trimmed and lowercased, so lookups only
    /// have to fold the answer side.
    pub fn case_folded(&self) -> Self {
        let fold = |table: &BTreeMap<String, u8>| {
            table
                .iter()
                .map(|(label, score)| (fold_label(label), *score))
                .collect()
        };
        Self {
            quality: fold(&self.quality),
            agreement: fold(&self.agreement),
        }
    }

    pub fn quality(&self, label: &str) -> Option<u8> {
        lookup(&self.quality, label)
    }

    pub fn agreement(&self, label: &str) -> Option<u8> {
        lookup(&self.agreement, label)
    }
}

/// Case- and padding-insensitive on both sides, so tables built in code
/// with mixed-case keys still match.
fn lookup(table: &BTreeMap<String, u8>, label: &str) -> Option<u8> {
    let folded = fold_label(label);
    table.get(&folded).copied().or_else(|| {
        table
            .iter()
            .find(|(key, _)| fold_label(key) == folded)
            .map(|(_, score)| *score)
    })
}

/// Keyword lists for polarity counting.
///
/// Entries match as substrings of a token, so `frustrat` covers
/// "frustrating" and "frustrated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub negation: Vec<String>,
    /// How many tokens after a negation word get their polarity flipped.
    pub negation_window: usize,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: strings(&[
                "great",
                "excellent",
                "fantastic",
                "loved",
                "appreciate",
                "helpful",
                "valuable",
                "enjoyed",
                "wonderful",
                "amazing",
                "best",
                "insightful",
            ]),
            negative: strings(&[
                "disappointed",
                "poor",
                "rushed",
                "boring",
                "irrelevant",
                "waste",
                "frustrat",
                "annoying",
                "confusing",
                "disjointed",
                "ignored",
                "refused",
            ]),
            negation: strings(&[
                "not", "no", "never", "nothing", "neither", "nobody", "nowhere", "n't", "barely",
                "hardly", "scarcely",
            ]),
            negation_window: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Closed list of feedback themes. A text matching none of `themes` is
/// filed under `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTaxonomy {
    pub themes: Vec<ThemeDefinition>,
    pub fallback: String,
}

impl ThemeTaxonomy {
    /// Theme names in reporting order, fallback last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes
            .iter()
            .map(|t| t.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
    }
}

impl Default for ThemeTaxonomy {
    fn default() -> Self {
        let theme = |name: &str, keywords: &[&str]| ThemeDefinition {
            name: name.to_string(),
            keywords: strings(keywords),
        };

        Self {
            themes: vec![
                theme(
                    "Session Timing & Duration",
                    &[
                        "time",
                        "timing",
                        "duration",
                        "long",
                        "short",
                        "rushed",
                        "downtime",
                        "pacing",
                        "schedule",
                        "transition",
                        "break",
                    ],
                ),
                theme(
                    "Speaker/Facilitator Quality",
                    &[
                        "speaker",
                        "facilitator",
                        "presenter",
                        "engaging",
                        "informative",
                        "disjointed",
                        "hard to follow",
                    ],
                ),
                theme(
                    "Content Relevance & Applicability",
                    &[
                        "relevant",
                        "practical",
                        "applicable",
                        "useful",
                        "content",
                        "topic",
                        "training",
                        "skill",
                    ],
                ),
                theme(
                    "Networking/Peer Interaction",
                    &["network", "colleague", "interact", "peer", "conversation", "connect"],
                ),
                theme(
                    "Venue & Logistics",
                    &[
                        "venue",
                        "room",
                        "location",
                        "food",
                        "lunch",
                        "breakfast",
                        "catering",
                        "setup",
                    ],
                ),
                theme(
                    "Organization & Flow",
                    &["organization", "flow", "organized", "structure", "coordination"],
                ),
                theme(
                    "Keynotes",
                    &["keynote", "katie", "dewulf", "stuart", "macdonald", "magic"],
                ),
                theme(
                    "Breakouts",
                    &[
                        "breakout", "session", "workshop", "claudia", "anna", "amy", "maureen",
                        "scott", "chris", "ashley", "josh", "matt",
                    ],
                ),
                theme("Lunch/Fireside", &["fireside", "ai", "panel", "lunch"]),
                theme(
                    "Suggestions/Requests",
                    &[
                        "future",
                        "would like",
                        "suggest",
                        "recommend",
                        "next year",
                        "more",
                        "advanced",
                        "201",
                        "301",
                        "deeper",
                    ],
                ),
            ],
            fallback: "Other".to_string(),
        }
    }
}

pub(crate) fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}

fn owned(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
