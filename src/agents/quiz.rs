use tracing::info;

use crate::completion::{ChatMessage, CompletionClient, request_structured};
use crate::error::{Error, Result};
use crate::models::{Difficulty, EvaluatedQuestion, EvaluationResult, QuizGenerationResponse};

use super::prompts::{EVALUATOR_SYSTEM, QUIZ_SYSTEM, evaluation_prompt, quiz_prompt};

/// Generate a ten-question multiple-choice quiz for a subject topic.
pub async fn generate_quiz(
    client: &dyn CompletionClient,
    subject: &str,
    topic: &str,
    level: Difficulty,
) -> Result<QuizGenerationResponse> {
    info!("Generating {level} quiz on '{topic}' ({subject})");
    let messages = [
        ChatMessage::system(QUIZ_SYSTEM),
        ChatMessage::user(quiz_prompt(subject, topic, level)),
    ];
    let quiz: QuizGenerationResponse = request_structured(client, &messages, "quiz").await?;
    quiz.validate().map_err(Error::SchemaValidation)?;
    Ok(quiz)
}

/// Ask the service to score an answered quiz and write feedback.
///
/// Per-question correctness is also computed locally before this call; the
/// model owns the score and the feedback text.
pub async fn evaluate_quiz(
    client: &dyn CompletionClient,
    attempt: &[EvaluatedQuestion],
) -> Result<EvaluationResult> {
    let messages = [
        ChatMessage::system(EVALUATOR_SYSTEM),
        ChatMessage::user(evaluation_prompt(attempt)),
    ];
    let result: EvaluationResult = request_structured(client, &messages, "evaluation").await?;
    result.validate().map_err(Error::SchemaValidation)?;
    Ok(result)
}
