//! Request flows: load rows, run one agent, persist the result.
//!
//! Each function returns a typed `Result`; the boundary is responsible for
//! flattening errors into its own surface.

use serde::Serialize;
use tracing::info;

use crate::agents;
use crate::completion::{ChatMessage, CompletionClient};
use crate::error::{Error, Result};
use crate::models::{
    Difficulty, EvaluatedQuestion, InteractionLog, PlanRecord, QuizRecord, QuizStatus,
};
use crate::store::Store;
use std::collections::BTreeMap;

/// Prior turns replayed into the assistant's context window.
pub const CHAT_CONTEXT_TURNS: usize = 5;

/// Generate a plan from the student's profile and persist it with its
/// weeks; returns the stored record.
pub async fn generate_and_store_plan(
    store: &Store,
    client: &dyn CompletionClient,
    email: &str,
) -> Result<PlanRecord> {
    let profile = store.load_profile(email)?;
    let plan = agents::generate_learning_plan(client, &profile).await?;
    store.insert_plan(email, &plan)?;
    store
        .latest_plan(email)?
        .ok_or_else(|| Error::PlanNotFound(email.to_string()))
}

/// The student's most recent plan.
pub fn latest_plan(store: &Store, email: &str) -> Result<PlanRecord> {
    store
        .latest_plan(email)?
        .ok_or_else(|| Error::PlanNotFound(email.to_string()))
}

/// Generate a quiz and persist it as pending; returns the stored record.
pub async fn generate_and_store_quiz(
    store: &Store,
    client: &dyn CompletionClient,
    email: &str,
    subject: &str,
    topic: &str,
    level: Difficulty,
) -> Result<QuizRecord> {
    store.ensure_student(email)?;
    let quiz = agents::generate_quiz(client, subject, topic, level).await?;
    let quiz_id = store.insert_quiz(email, subject, &quiz)?;
    store.quiz(quiz_id, email)
}

/// Final verdict of an evaluated quiz.
#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    pub quiz_id: i64,
    pub score: f64,
    pub feedback: String,
}

/// Grade submitted answers, record them, then let the evaluator agent
/// score the attempt and close the quiz out.
///
/// `answers` maps question id to the chosen option key; unanswered
/// questions are graded incorrect with an empty answer.
pub async fn evaluate_and_store_quiz(
    store: &Store,
    client: &dyn CompletionClient,
    email: &str,
    quiz_id: i64,
    answers: &BTreeMap<i64, String>,
) -> Result<QuizOutcome> {
    let quiz = store.quiz(quiz_id, email)?;
    if quiz.status == QuizStatus::Completed {
        return Err(Error::QuizAlreadyCompleted(quiz_id));
    }

    let mut rows = Vec::with_capacity(quiz.questions.len());
    let mut graded = Vec::with_capacity(quiz.questions.len());
    for question in &quiz.questions {
        let answer = answers.get(&question.id).cloned().unwrap_or_default();
        let is_correct = answer == question.correct_option;
        rows.push((question.id, answer.clone(), is_correct));
        graded.push(EvaluatedQuestion {
            question_text: question.question_text.clone(),
            correct_option: question.correct_option.clone(),
            student_answer: answer,
            is_correct,
        });
    }
    store.record_answers(quiz_id, &rows)?;

    let evaluation = agents::evaluate_quiz(client, &graded).await?;
    store.finalize_quiz(quiz_id, evaluation.score, &evaluation.feedback)?;
    info!("Quiz {} evaluated: score {}", quiz_id, evaluation.score);

    Ok(QuizOutcome {
        quiz_id,
        score: evaluation.score,
        feedback: evaluation.feedback,
    })
}

/// Suggest resources from the profile and current plan, storing them under
/// the student's first subject preference. Returns how many were created.
pub async fn generate_and_store_resources(
    store: &Store,
    client: &dyn CompletionClient,
    email: &str,
) -> Result<usize> {
    let profile = store.load_profile(email)?;
    let plan = store
        .latest_plan(email)?
        .ok_or_else(|| Error::PlanNotFound(email.to_string()))?;
    let subject = profile
        .subjects
        .first()
        .map(|s| s.subject.clone())
        .ok_or_else(|| Error::ProfileIncomplete("subject preference".to_string()))?;

    let response =
        agents::generate_resource_suggestions(client, &profile, &plan.as_schema()).await?;
    let ids = store.insert_resources(&subject, &response.suggestions)?;
    Ok(ids.len())
}

/// One chat turn: context assembly, tutor call (with tool dispatch), and
/// interaction logging.
pub async fn chat(
    store: &Store,
    client: &dyn CompletionClient,
    email: &str,
    message: &str,
) -> Result<String> {
    let profile = store.load_profile(email)?;
    let plan = store.latest_plan(email)?;
    let turns = store.recent_interactions(email, CHAT_CONTEXT_TURNS)?;
    let history = chat_history(&turns);

    let plan_schema = plan.as_ref().map(|p| p.as_schema());
    let response = agents::interact_with_student(
        client,
        store,
        &profile,
        plan_schema.as_ref(),
        &history,
        message,
    )
    .await?;

    store.append_interaction(email, message, &response)?;
    Ok(response)
}

/// Rebuild the bounded context window. Roles alternate user/assistant by
/// position across the returned turns, oldest first.
fn chat_history(turns: &[InteractionLog]) -> Vec<ChatMessage> {
    turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            if i % 2 == 0 {
                ChatMessage::user(&turn.user_message)
            } else {
                ChatMessage::assistant(&turn.agent_response)
            }
        })
        .collect()
}
