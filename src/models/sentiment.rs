//! Sentiment labels and the heuristic that maps free-form model output onto them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Why a review could not be given a real label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The model answered, but nothing in the answer looked like a label.
    ParseFailed,
    /// The endpoint could not be reached (or kept failing) after all retries.
    ApiFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseFailed => "Parse Failed",
            Self::ApiFailed => "API Failed",
        }
    }
}

/// Classification outcome for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Error(ErrorKind),
}

/// Accepted labels, in the order the substring fallback checks them.
pub const LABELS: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

impl Sentiment {
    /// Label name for the three real sentiments, `None` for errors.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Positive => Some("Positive"),
            Self::Negative => Some("Negative"),
            Self::Neutral => Some("Neutral"),
            Self::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(kind) => write!(f, "Error: {}", kind.as_str()),
            other => f.write_str(other.label().unwrap_or_default()),
        }
    }
}

/// Error returned when a stored sentiment column holds an unknown value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment value: {0}")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Negative" => Ok(Self::Negative),
            "Neutral" => Ok(Self::Neutral),
            "Error: Parse Failed" => Ok(Self::Error(ErrorKind::ParseFailed)),
            "Error: API Failed" => Ok(Self::Error(ErrorKind::ApiFailed)),
            other => Err(UnknownSentiment(other.to_string())),
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Map raw model output to a sentiment.
///
/// The text is trimmed and title-cased, then matched exactly against the three
/// labels. Failing that, the first label (in `LABELS` order) that appears as a
/// substring wins, so "not positive, it's negative" yields `Positive`.
/// Anything else, including an empty answer, is `Error(ParseFailed)`.
pub fn normalize_label(raw: &str) -> Sentiment {
    let answer = title_case(raw.trim());

    if let Some(exact) = LABELS.iter().find(|l| l.label() == Some(answer.as_str())) {
        return *exact;
    }

    LABELS
        .iter()
        .find(|l| l.label().is_some_and(|name| answer.contains(name)))
        .copied()
        .unwrap_or(Sentiment::Error(ErrorKind::ParseFailed))
}

/// Uppercase the first cased character of every word and lowercase the rest.
///
/// A word starts at any cased character that follows an uncased one, so
/// digits and punctuation act as separators ("3rd" becomes "3Rd", "it's"
/// becomes "It'S").
///
/// This approximates Python's `str.title` rather than reproducing it. Only
/// characters with the Unicode `Uppercase` or `Lowercase` property count as
/// cased, so titlecase letters (category Lt, such as `ǅ`) act as separators.
/// Word starts use the full uppercase mapping instead of the titlecase one,
/// so `ǆ` becomes `Ǆ` where Python would give `ǅ`. Neither difference affects
/// ASCII answers.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for c in text.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && prev_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}
