use serde::Serialize;
use std::fmt;

/// Net Promoter classification of a 0–10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NpsBucket {
    Detractor,
    Passive,
    Promoter,
    Missing,
}

/// Three-band satisfaction classification of a 0–10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SatisfactionBucket {
    Low,
    Medium,
    High,
    Missing,
}

/// | Range      | Bucket    |
/// |------------|-----------|
/// | <= 6       | Detractor |
/// | > 6, < 9   | Passive   |
/// | >= 9       | Promoter  |
pub fn nps_bucket(score: Option<f64>) -> NpsBucket {
    match score {
        None => NpsBucket::Missing,
        Some(s) if s <= 6.0 => NpsBucket::Detractor,
        Some(s) if s < 9.0 => NpsBucket::Passive,
        Some(_) => NpsBucket::Promoter,
    }
}

/// | Range      | Bucket |
/// |------------|--------|
/// | < 5.0      | Low    |
/// | < 8.0      | Medium |
/// | >= 8.0     | High   |
pub fn satisfaction_bucket(score: Option<f64>) -> SatisfactionBucket {
    match score {
        None => SatisfactionBucket::Missing,
        Some(s) if s < 5.0 => SatisfactionBucket::Low,
        Some(s) if s < 8.0 => SatisfactionBucket::Medium,
        Some(_) => SatisfactionBucket::High,
    }
}

/// Top-2-Box: 8 or better on the 0–10 scale. Missing is never top box.
pub fn is_top2_box(score: Option<f64>) -> bool {
    score.is_some_and(|s| s >= 8.0)
}

impl fmt::Display for NpsBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NpsBucket::Detractor => "Detractor",
            NpsBucket::Passive => "Passive",
            NpsBucket::Promoter => "Promoter",
            NpsBucket::Missing => "Missing",
        };
        f.write_str(label)
    }
}

impl fmt::Display for SatisfactionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SatisfactionBucket::Low => "Low",
            SatisfactionBucket::Medium => "Medium",
            SatisfactionBucket::High => "High",
            SatisfactionBucket::Missing => "Missing",
        };
        f.write_str(label)
    }
}
