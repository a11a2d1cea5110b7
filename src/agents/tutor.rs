use tracing::info;

use crate::completion::{ChatMessage, CompletionClient, CompletionReply};
use crate::error::Result;
use crate::models::{LearningPlanSchema, StudentProfile};
use crate::store::Store;

use super::prompts::{TUTOR_SYSTEM, tutor_context_message};
use super::tools::{dispatch_tool_calls, update_learning_plan_tool};

/// One chat turn with the interactive assistant.
///
/// The conversation is the tutor system message, one message embedding
/// profile and current plan, the bounded prior turns (oldest first), and
/// the new user message. If the service selects the plan-update tool the
/// calls are dispatched and a fixed confirmation is returned; otherwise
/// the free-text reply comes back verbatim.
pub async fn interact_with_student(
    client: &dyn CompletionClient,
    store: &Store,
    profile: &StudentProfile,
    plan: Option<&LearningPlanSchema>,
    history: &[ChatMessage],
    user_message: &str,
) -> Result<String> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(ChatMessage::system(TUTOR_SYSTEM));
    messages.push(ChatMessage::user(tutor_context_message(profile, plan)));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(user_message));

    let tools = [update_learning_plan_tool()];
    match client.complete_with_tools(&messages, &tools).await? {
        CompletionReply::Text(text) => Ok(text),
        CompletionReply::ToolCalls(calls) => {
            info!("Assistant selected {} tool call(s)", calls.len());
            dispatch_tool_calls(store, &calls)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::tools::{PLAN_UPDATED_REPLY, UPDATE_LEARNING_PLAN};
    use crate::completion::{OutputSchema, ToolCall, ToolSpec};
    use crate::models::{LearningStyle, StudentInfo, WeekPlan};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Scripted client that records the conversation it was handed.
    struct ScriptedClient {
        reply: CompletionReply,
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete_structured(
            &self,
            _messages: &[ChatMessage],
            _schema: &OutputSchema,
        ) -> Result<Value> {
            unimplemented!("tutor never requests structured output")
        }

        async fn complete_with_tools(
            &self,
            messages: &[ChatMessage],
            tools: &[ToolSpec],
        ) -> Result<CompletionReply> {
            assert_eq!(tools.len(), 1);
            assert_eq!(tools[0].name, UPDATE_LEARNING_PLAN);
            *self.seen.lock().unwrap() = messages.to_vec();
            Ok(self.reply.clone())
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
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
        }
    }

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.register_student("a@b.com").unwrap();
        let plan = LearningPlanSchema {
            student: "a@b.com".to_string(),
            plan_duration_weeks: 1,
            weekly_plan: vec![WeekPlan {
                week: 1,
                focus_topics: vec!["Algebra".to_string()],
                recommended_resources: Vec::new(),
                practice_tasks: vec!["Drill".to_string()],
                ai_message: "Go".to_string(),
            }],
        };
        store.insert_plan("a@b.com", &plan).unwrap();
        store
    }

    #[tokio::test]
    async fn test_free_text_reply_passes_through() {
        let client = ScriptedClient {
            reply: CompletionReply::Text("Focus on algebra this week.".to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let store = seeded_store();
        let history = [
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello, how can I help?"),
        ];
        let reply = interact_with_student(
            &client,
            &store,
            &profile(),
            None,
            &history,
            "What should I focus on?",
        )
        .await
        .unwrap();
        assert_eq!(reply, "Focus on algebra this week.");

        // system + context + 2 history turns + new message
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[2].content, "hi");
        assert_eq!(seen[4].content, "What should I focus on?");
    }

    #[tokio::test]
    async fn test_tool_call_updates_plan_and_confirms() {
        let arguments = serde_json::json!({
            "student_email": "a@b.com",
            "updates": [{
                "week": 1,
                "focus_topics": ["Geometry"],
                "practice_tasks": ["Proofs"],
                "ai_message": "Switching it up"
            }]
        })
        .to_string();
        let client = ScriptedClient {
            reply: CompletionReply::ToolCalls(vec![ToolCall {
                name: UPDATE_LEARNING_PLAN.to_string(),
                arguments,
            }]),
            seen: Mutex::new(Vec::new()),
        };
        let store = seeded_store();
        let plan = store.latest_plan("a@b.com").unwrap().unwrap().as_schema();

        let reply = interact_with_student(
            &client,
            &store,
            &profile(),
            Some(&plan),
            &[],
            "Please swap week 1 to geometry",
        )
        .await
        .unwrap();
        assert_eq!(reply, PLAN_UPDATED_REPLY);

        let updated = store.latest_plan("a@b.com").unwrap().unwrap();
        assert_eq!(updated.weekly_plan[0].focus_topics, vec!["Geometry"]);
    }
}
