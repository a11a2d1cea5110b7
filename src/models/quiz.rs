use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of questions every generated quiz must contain.
pub const QUIZ_QUESTION_COUNT: usize = 10;

/// Option keys every question must carry, in order.
pub const OPTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Marks awarded per question.
pub const MARKS_PER_QUESTION: u32 = 1;

// ============================================================================
// Structured Output Types
// ============================================================================

/// One answer option, keyed by letter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizOption {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizQuestion {
    pub question_text: String,
    pub options: Vec<QuizOption>,
    /// Key of the correct option, e.g. "B".
    pub correct_option: String,
}

/// A generated quiz as returned by the quiz agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizGenerationResponse {
    pub questions: Vec<QuizQuestion>,
}

impl QuizGenerationResponse {
    /// Check the quiz shape invariant: exactly [`QUIZ_QUESTION_COUNT`]
    /// questions, each with exactly the four keys A..D and a correct
    /// option among them.
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.len() != QUIZ_QUESTION_COUNT {
            return Err(format!(
                "expected {} questions, got {}",
                QUIZ_QUESTION_COUNT,
                self.questions.len()
            ));
        }
        for (i, q) in self.questions.iter().enumerate() {
            let mut keys: Vec<&str> = q.options.iter().map(|o| o.key.as_str()).collect();
            keys.sort_unstable();
            if keys != OPTION_KEYS {
                return Err(format!(
                    "question {} must have exactly options A, B, C, D; got {:?}",
                    i + 1,
                    keys
                ));
            }
            if !OPTION_KEYS.contains(&q.correct_option.as_str()) {
                return Err(format!(
                    "question {} marks '{}' correct, which is not an option key",
                    i + 1,
                    q.correct_option
                ));
            }
        }
        Ok(())
    }
}

/// One answered question, both as sent to the evaluator and as it reports
/// back per-question correctness.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluatedQuestion {
    pub question_text: String,
    pub correct_option: String,
    pub student_answer: String,
    pub is_correct: bool,
}

/// Evaluation verdict as returned by the evaluator agent. Scoring is
/// model-determined; the crate only enforces the 0..=100 bound.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationResult {
    pub score: f64,
    pub feedback: String,
    pub evaluated_questions: Vec<EvaluatedQuestion>,
}

impl EvaluationResult {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(format!("score {} is outside 0..=100", self.score));
        }
        Ok(())
    }
}

// ============================================================================
// Stored Quiz Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Pending,
    Completed,
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Pending => "pending",
            QuizStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QuizStatus::Pending),
            "completed" => Some(QuizStatus::Completed),
            _ => None,
        }
    }
}

/// A persisted question row.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub question_text: String,
    /// Option key -> option text.
    pub options: BTreeMap<String, String>,
    pub correct_option: String,
    pub student_answer: Option<String>,
    pub is_correct: Option<bool>,
}

/// A persisted quiz with its questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuizRecord {
    pub id: i64,
    pub student: String,
    pub subject: String,
    pub total_marks: u32,
    pub score: Option<f64>,
    pub ai_feedback: String,
    pub status: QuizStatus,
    pub created_at: String,
    pub questions: Vec<QuestionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> QuizQuestion {
        QuizQuestion {
            question_text: "What is 2 + 2?".to_string(),
            options: OPTION_KEYS
                .iter()
                .map(|k| QuizOption {
                    key: k.to_string(),
                    value: format!("answer {k}"),
                })
                .collect(),
            correct_option: correct.to_string(),
        }
    }

    fn quiz_of(n: usize) -> QuizGenerationResponse {
        QuizGenerationResponse {
            questions: (0..n).map(|_| question("A")).collect(),
        }
    }

    #[test]
    fn test_validate_accepts_ten_well_formed_questions() {
        assert!(quiz_of(QUIZ_QUESTION_COUNT).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_question_count() {
        assert!(quiz_of(7).validate().is_err());
        assert!(quiz_of(11).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_option_key() {
        let mut quiz = quiz_of(QUIZ_QUESTION_COUNT);
        quiz.questions[3].options[2].key = "E".to_string();
        let err = quiz.validate().unwrap_err();
        assert!(err.contains("question 4"), "unexpected error: {err}");
    }

    #[test]
    fn test_validate_rejects_correct_option_outside_keys() {
        let mut quiz = quiz_of(QUIZ_QUESTION_COUNT);
        quiz.questions[0].correct_option = "E".to_string();
        assert!(quiz.validate().is_err());
    }

    #[test]
    fn test_evaluation_score_bounds() {
        let mut result = EvaluationResult {
            score: 100.0,
            feedback: "well done".to_string(),
            evaluated_questions: Vec::new(),
        };
        assert!(result.validate().is_ok());
        result.score = 100.5;
        assert!(result.validate().is_err());
        result.score = -1.0;
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(QuizStatus::parse("pending"), Some(QuizStatus::Pending));
        assert_eq!(QuizStatus::parse("completed"), Some(QuizStatus::Completed));
        assert_eq!(QuizStatus::parse("archived"), None);
        assert_eq!(QuizStatus::Completed.as_str(), "completed");
    }
}
