use tracing::info;

use crate::completion::{ChatMessage, CompletionClient, request_structured};
use crate::error::{Error, Result};
use crate::models::{LearningPlanSchema, StudentProfile};

use super::prompts::{PLANNER_SYSTEM, learning_plan_prompt};

/// Generate a weekly learning plan from the student's profile.
///
/// The reply is schema-validated and then checked against the week-number
/// invariant; resources are excluded by the prompt contract.
pub async fn generate_learning_plan(
    client: &dyn CompletionClient,
    profile: &StudentProfile,
) -> Result<LearningPlanSchema> {
    info!("Generating learning plan for {}", profile.email);
    let messages = [
        ChatMessage::system(PLANNER_SYSTEM),
        ChatMessage::user(learning_plan_prompt(profile)),
    ];
    let plan: LearningPlanSchema = request_structured(client, &messages, "learning_plan").await?;
    plan.validate().map_err(Error::SchemaValidation)?;
    Ok(plan)
}
