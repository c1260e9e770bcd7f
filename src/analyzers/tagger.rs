//! Keyword-based sentiment and theme tagging for free-text answers.
//!
//! This is a lookup heuristic, not a classifier. Keywords match as
//! substrings, so short entries can fire inside longer words ("no" inside
//! "nothing", "ai" inside "said"), and the only context considered is a
//! fixed window after a negation word. Tests pin these quirks down.

use crate::config::{SentimentLexicon, SurveySchema, ThemeTaxonomy};
use serde::Serialize;
use std::fmt;

const QUOTE_MAX_WORDS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        };
        f.write_str(label)
    }
}

/// Result of tagging one text. `themes` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextTags {
    pub sentiment: Sentiment,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSentiment {
    pub theme: String,
    pub sentiment: Sentiment,
}

/// Anything that can turn free text into a sentiment and a theme list.
///
/// The analyzer is generic over this; [`KeywordTagger`] is the stock
/// implementation.
pub trait TextTagger {
    fn tag(&self, text: &str) -> TextTags;
}

/// [`TextTagger`] driven by the schema's lexicon and theme keywords.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    positive: Vec<String>,
    negative: Vec<String>,
    negation: Vec<String>,
    negation_window: usize,
    themes: Vec<(String, Vec<String>)>,
    fallback: String,
}

impl KeywordTagger {
    pub fn new(lexicon: &SentimentLexicon, taxonomy: &ThemeTaxonomy) -> Self {
        let lower = |words: &[String]| -> Vec<String> {
            words.iter().map(|w| w.to_lowercase()).collect()
        };

        Self {
            positive: lower(&lexicon.positive),
            negative: lower(&lexicon.negative),
            negation: lower(&lexicon.negation),
            negation_window: lexicon.negation_window,
            themes: taxonomy
                .themes
                .iter()
                .map(|t| (t.name.clone(), lower(&t.keywords)))
                .collect(),
            fallback: taxonomy.fallback.clone(),
        }
    }

    pub fn from_schema(schema: &SurveySchema) -> Self {
        Self::new(&schema.sentiment, &schema.themes)
    }

    /// Counts lexicon hits per token. A hit inside a negation window counts
    /// for the opposite polarity. Ties are neutral.
    pub fn sentiment(&self, text: &str) -> Sentiment {
        let tokens = tokenize(text);

        let mut negated = vec![false; tokens.len()];
        for (i, token) in tokens.iter().enumerate() {
            if contains_any(token, &self.negation) {
                let end = (i + 1 + self.negation_window).min(tokens.len());
                for flag in &mut negated[(i + 1).min(end)..end] {
                    *flag = true;
                }
            }
        }

        let mut pos = 0usize;
        let mut neg = 0usize;

        for (token, &is_negated) in tokens.iter().zip(&negated) {
            if contains_any(token, &self.positive) {
                if is_negated {
                    neg += 1;
                } else {
                    pos += 1;
                }
            }

            if contains_any(token, &self.negative) {
                if is_negated {
                    pos += 1;
                } else {
                    neg += 1;
                }
            }
        }

        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }

    /// Every theme with at least one keyword inside the text, in taxonomy
    /// order, or just the fallback theme.
    pub fn themes(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        let mut matched: Vec<String> = self
            .themes
            .iter()
            .filter(|(_, keywords)| contains_any(&lowered, keywords))
            .map(|(name, _)| name.clone())
            .collect();

        if matched.is_empty() {
            matched.push(self.fallback.clone());
        }
        matched
    }
}

impl TextTagger for KeywordTagger {
    fn tag(&self, text: &str) -> TextTags {
        if text.trim().is_empty() {
            return TextTags {
                sentiment: Sentiment::Neutral,
                themes: vec![self.fallback.clone()],
            };
        }

        TextTags {
            sentiment: self.sentiment(text),
            themes: self.themes(text),
        }
    }
}

/// Tags plus the short quote for one text, as printed by the `tag` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagReport {
    pub sentiment: Sentiment,
    pub themes: Vec<String>,
    pub quote: String,
}

impl TagReport {
    pub fn new<T: TextTagger + ?Sized>(tagger: &T, text: &str) -> Self {
        let tags = tagger.tag(text);
        TagReport {
            sentiment: tags.sentiment,
            themes: tags.themes,
            quote: extract_quote(text),
        }
    }
}

/// Applies the text's overall sentiment to each of its themes.
pub fn theme_sentiments(tags: &TextTags) -> Vec<ThemeSentiment> {
    tags.themes
        .iter()
        .map(|theme| ThemeSentiment {
            theme: theme.clone(),
            sentiment: tags.sentiment,
        })
        .collect()
}

/// First sentence of `text`, cut to 25 words with a trailing `...`.
pub fn extract_quote(text: &str) -> String {
    extract_quote_with_limit(text, QUOTE_MAX_WORDS)
}

pub fn extract_quote_with_limit(text: &str, max_words: usize) -> String {
    let first = text
        .trim()
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();

    let words: Vec<&str> = first.split_whitespace().collect();
    if words.len() <= max_words {
        first.to_string()
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}

/// Lowercased runs of word characters (letters, digits, underscore).
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> KeywordTagger {
        KeywordTagger::new(&SentimentLexicon::default(), &ThemeTaxonomy::default())
    }

    #[test]
    fn test_plain_positive_and_negative() {
        let t = tagger();
        assert_eq!(t.sentiment("Loved the keynote"), Sentiment::Positive);
        assert_eq!(t.sentiment("The ending felt rushed"), Sentiment::Negative);
        assert_eq!(t.sentiment("We met in the hall"), Sentiment::Neutral);
    }

    #[test]
    fn test_negated_negative_counts_positive() {
        let t = tagger();
        assert_eq!(
            t.sentiment("The event was great, not disappointing"),
            Sentiment::Positive
        );
        assert_eq!(t.sentiment("It was not boring"), Sentiment::Positive);
    }

    #[test]
    fn test_negated_positive_counts_negative() {
        let t = tagger();
        assert_eq!(t.sentiment("The lunch was not great"), Sentiment::Negative);
    }

    #[test]
    fn test_negation_window_is_three_tokens() {
        let t = tagger();
        // "great" is the fourth token after "not", outside the window.
        assert_eq!(
            t.sentiment("not for me but great"),
            Sentiment::Positive
        );
        assert_eq!(t.sentiment("not for me great"), Sentiment::Negative);
    }

    #[test]
    fn test_negation_matches_inside_words() {
        let t = tagger();
        // "nothing" contains "no" and negates "boring".
        assert_eq!(t.sentiment("Nothing boring about it"), Sentiment::Positive);
    }

    #[test]
    fn test_tie_is_neutral() {
        let t = tagger();
        assert_eq!(t.sentiment("Great speaker, rushed ending"), Sentiment::Neutral);
        assert_eq!(t.sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_themes_are_not_exclusive() {
        let t = tagger();
        assert_eq!(
            t.themes("The keynote timing felt rushed"),
            vec![
                "Session Timing & Duration".to_string(),
                "Keynotes".to_string()
            ]
        );
    }

    #[test]
    fn test_multi_word_keyword() {
        let t = tagger();
        let themes = t.themes("Next year I would like deeper dives");
        assert_eq!(themes, vec!["Suggestions/Requests".to_string()]);
    }

    #[test]
    fn test_unmatched_text_is_other() {
        let t = tagger();
        assert_eq!(t.themes("Thanks everyone"), vec!["Other".to_string()]);
    }

    #[test]
    fn test_empty_text_tags() {
        let t = tagger();
        let tags = t.tag("   ");
        assert_eq!(tags.sentiment, Sentiment::Neutral);
        assert_eq!(tags.themes, vec!["Other".to_string()]);
    }

    #[test]
    fn test_theme_sentiments_share_overall_label() {
        let tags = tagger().tag("Loved the breakout session and the venue");
        let per_theme = theme_sentiments(&tags);
        assert_eq!(tags.sentiment, Sentiment::Positive);
        assert_eq!(per_theme.len(), tags.themes.len());
        assert!(per_theme.iter().all(|ts| ts.sentiment == Sentiment::Positive));
    }

    #[test]
    fn test_keynote_token_acts_as_negation() {
        // "keynote" contains "no", so "excellent" is read as negated.
        let t = tagger();
        assert_eq!(
            t.sentiment("Great keynote, excellent venue"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_tag_report_serializes_all_fields() {
        let report = TagReport::new(&tagger(), "The breakout timing felt rushed. Otherwise fine.");

        assert_eq!(report.sentiment, Sentiment::Negative);
        assert_eq!(report.quote, "The breakout timing felt rushed");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sentiment"], "Negative");
        assert_eq!(json["themes"][0], "Session Timing & Duration");
        assert_eq!(json["quote"], "The breakout timing felt rushed");
    }

    #[test]
    fn test_quote_takes_first_sentence() {
        assert_eq!(
            extract_quote("  Loved it! Lunch was cold. "),
            "Loved it"
        );
        assert_eq!(extract_quote(""), "");
        assert_eq!(extract_quote("   "), "");
    }

    #[test]
    fn test_quote_truncates_long_sentences() {
        let long = (1..=30).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let quote = extract_quote(&long);
        assert!(quote.ends_with("w25..."));
        assert_eq!(quote.split_whitespace().count(), 25);

        let exact = (1..=25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(extract_quote(&exact), exact);
    }
}
