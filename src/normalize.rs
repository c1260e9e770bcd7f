//! Maps raw answers onto a common 0–10 scale.

use crate::config::{ScaleKind, ScaleLexicon};
use crate::response::RawAnswer;

/// Native numeric range of the five-point scales.
const FIVE_POINT: (f64, f64) = (1.0, 5.0);
/// Native numeric range of NPS-style questions.
const ELEVEN_POINT: (f64, f64) = (0.0, 10.0);

/// Normalizes one answer to 0–10, or `None` if it cannot be scored.
///
/// Numbers inside the scale's native range win over the label lookup. A
/// number outside that range is looked up as text, which for the built-in
/// lexicons always misses.
pub fn normalize(raw: &RawAnswer, kind: ScaleKind, lexicon: &ScaleLexicon) -> Option<f64> {
    match kind {
        ScaleKind::NumericPassthrough => match raw {
            RawAnswer::Number(n) if in_range(*n, ELEVEN_POINT) => Some(*n),
            _ => None,
        },
        ScaleKind::QualityScale => {
            five_point(raw, |label| lexicon.quality(label)).map(rescale_5_to_10)
        }
        ScaleKind::AgreementScale => {
            five_point(raw, |label| lexicon.agreement(label)).map(rescale_5_to_10)
        }
    }
}

/// Rescales a 1–5 score so that 1 → 0, 3 → 5 and 5 → 10.
pub fn rescale_5_to_10(value: f64) -> f64 {
    (value - 1.0) / 4.0 * 10.0
}

fn five_point(raw: &RawAnswer, lookup: impl Fn(&str) -> Option<u8>) -> Option<f64> {
    match raw {
        RawAnswer::Missing => None,
        RawAnswer::Number(n) if in_range(*n, FIVE_POINT) => Some(*n),
        RawAnswer::Number(n) => lookup(&n.to_string()).map(f64::from),
        RawAnswer::Text(label) => lookup(label).map(f64::from),
    }
}

fn in_range(n: f64, (lo, hi): (f64, f64)) -> bool {
    n.is_finite() && (lo..=hi).contains(&n)
}
