use tracing::info;

use crate::completion::{ChatMessage, CompletionClient, request_structured};
use crate::error::Result;
use crate::models::{LearningPlanSchema, ResourceResponse, StudentProfile};

use super::prompts::{RESOURCE_SYSTEM, resource_prompt};

/// Suggest learning resources matching the student's preferences and
/// current plan.
pub async fn generate_resource_suggestions(
    client: &dyn CompletionClient,
    profile: &StudentProfile,
    plan: &LearningPlanSchema,
) -> Result<ResourceResponse> {
    info!("Generating resource suggestions for {}", profile.email);
    let messages = [
        ChatMessage::system(RESOURCE_SYSTEM),
        ChatMessage::user(resource_prompt(profile, plan)),
    ];
    request_structured(client, &messages, "resources").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionReply, OutputSchema, ToolSpec};
    use crate::error::Error;
    use crate::models::{LearningStyle, StudentInfo};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct CannedClient {
        reply: Value,
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete_structured(
            &self,
            _messages: &[ChatMessage],
            _schema: &OutputSchema,
        ) -> Result<Value> {
            Ok(self.reply.clone())
        }

        async fn complete_with_tools(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolSpec],
        ) -> Result<CompletionReply> {
            unimplemented!("resource agent never declares tools")
        }
    }

    fn inputs() -> (StudentProfile, LearningPlanSchema) {
        let profile = StudentProfile {
            email: "a@b.com".to_string(),
            info: StudentInfo {
                full_name: "Ada".to_string(),
                age: 20,
                gender: "female".to_string(),
                preferred_learning_style: LearningStyle::Visual,
            },
            subjects: Vec::new(),
            goals: Vec::new(),
            quizzes: Vec::new(),
            resource_logs: Vec::new(),
        };
        let plan = LearningPlanSchema {
            student: "a@b.com".to_string(),
            plan_duration_weeks: 0,
            weekly_plan: Vec::new(),
        };
        (profile, plan)
    }

    #[tokio::test]
    async fn test_parses_suggestions() {
        let client = CannedClient {
            reply: json!({
                "suggestions": [{
                    "topic_name": "Graphs",
                    "type": "video",
                    "url": "https://example.com/graphs",
                    "description": "Visual introduction"
                }]
            }),
        };
        let (profile, plan) = inputs();
        let response = generate_resource_suggestions(&client, &profile, &plan)
            .await
            .unwrap();
        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].resource_type, "video");
    }

    #[tokio::test]
    async fn test_rejects_malformed_suggestions() {
        let client = CannedClient {
            reply: json!({"suggestions": [{"topic_name": "Graphs"}]}),
        };
        let (profile, plan) = inputs();
        let err = generate_resource_suggestions(&client, &profile, &plan)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }
}
