//! Score to color class mapping.

use serde::{Deserialize, Serialize};

/// Presentation color class for a section score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    #[serde(rename = "bg-green-500")]
    Excellent,
    #[serde(rename = "bg-green-300")]
    Good,
    #[serde(rename = "bg-yellow-400")]
    CanBeImproved,
    #[serde(rename = "bg-red-500")]
    Bad,
    #[serde(rename = "bg-gray-300")]
    Neutral,
}

impl ColorClass {
    /// Total over all integers: anything outside 2..=5 is neutral.
    pub fn for_score(score: i64) -> Self {
        match score {
            5 => Self::Excellent,
            4 => Self::Good,
            3 => Self::CanBeImproved,
            2 => Self::Bad,
            _ => Self::Neutral,
        }
    }

    /// CSS class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "bg-green-500",
            Self::Good => "bg-green-300",
            Self::CanBeImproved => "bg-yellow-400",
            Self::Bad => "bg-red-500",
            Self::Neutral => "bg-gray-300",
        }
    }
}

impl std::fmt::Display for ColorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
