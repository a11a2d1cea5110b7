use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::quiz::QuizStatus;

/// Preferred learning style, both globally and per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    ReadingWriting,
    Kinesthetic,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::ReadingWriting => "reading_writing",
            LearningStyle::Kinesthetic => "kinesthetic",
        }
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "reading_writing" => Ok(LearningStyle::ReadingWriting),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            other => Err(format!(
                "unknown learning style '{other}' (expected visual, auditory, reading_writing or kinesthetic)"
            )),
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quiz difficulty requested on generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!(
                "unknown difficulty '{other}' (expected beginner, intermediate or advanced)"
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Profile Components
// ============================================================================

/// Onboarding info. One row per student; its absence makes the profile
/// incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub preferred_learning_style: LearningStyle,
}

/// A student's personalization for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectPreference {
    pub subject: String,
    pub preferred_style: LearningStyle,
    /// Topic -> reason, e.g. {"Graphs": "enjoyed the visualizations"}.
    #[serde(default)]
    pub favorite_topics: BTreeMap<String, String>,
    #[serde(default)]
    pub weak_topics: BTreeMap<String, String>,
    #[serde(default)]
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningGoal {
    pub goal_text: String,
    pub subject: Option<String>,
    pub achieved: bool,
}

/// Compact quiz history entry embedded into prompts.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub subject: String,
    pub total_marks: u32,
    pub score: Option<f64>,
    pub status: QuizStatus,
}

/// One resource-access event with optional feedback.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLogEntry {
    pub topic: String,
    pub url: String,
    pub feedback: String,
    pub accessed_at: String,
}

/// The full per-student view handed to agents.
///
/// Assembled from stored rows on every request; never cached or persisted
/// as a single entity.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub email: String,
    pub info: StudentInfo,
    pub subjects: Vec<SubjectPreference>,
    pub goals: Vec<LearningGoal>,
    pub quizzes: Vec<QuizSummary>,
    pub resource_logs: Vec<ResourceLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_style_round_trip() {
        for style in [
            LearningStyle::Visual,
            LearningStyle::Auditory,
            LearningStyle::ReadingWriting,
            LearningStyle::Kinesthetic,
        ] {
            assert_eq!(style.as_str().parse::<LearningStyle>().unwrap(), style);
        }
        assert!("osmosis".parse::<LearningStyle>().is_err());
    }

    #[test]
    fn test_difficulty_round_trip() {
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!(Difficulty::Advanced.to_string(), "advanced");
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
