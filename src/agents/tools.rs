//! The declared tool surface of the interactive assistant and its
//! dispatcher.
//!
//! One tool exists: `update_learning_plan`. Dispatch is a closed match
//! over declared names; anything else the model invents is a typed error,
//! not a silent skip.

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::info;

use crate::completion::{ToolCall, ToolSpec};
use crate::error::{Error, Result};
use crate::models::UpdateLearningPlanRequest;
use crate::store::Store;

pub const UPDATE_LEARNING_PLAN: &str = "update_learning_plan";

/// Fixed confirmation returned after a successful plan update.
pub const PLAN_UPDATED_REPLY: &str = "Learning plan updated successfully.";

static UPDATE_TOOL_PARAMETERS: Lazy<Value> = Lazy::new(|| {
    let schema = schemars::schema_for!(UpdateLearningPlanRequest);
    serde_json::to_value(schema).expect("schema serialization cannot fail")
});

/// Declaration of the `update_learning_plan` tool.
pub fn update_learning_plan_tool() -> ToolSpec {
    ToolSpec {
        name: UPDATE_LEARNING_PLAN.to_string(),
        description: "Update the student's learning plan based on feedback".to_string(),
        parameters: UPDATE_TOOL_PARAMETERS.clone(),
    }
}

/// Apply every tool call the service emitted, then confirm.
pub fn dispatch_tool_calls(store: &Store, calls: &[ToolCall]) -> Result<String> {
    for call in calls {
        match call.name.as_str() {
            UPDATE_LEARNING_PLAN => {
                let request: UpdateLearningPlanRequest = serde_json::from_str(&call.arguments)
                    .map_err(|e| Error::ArgumentValidation(e.to_string()))?;
                apply_learning_plan_updates(store, &request)?;
            }
            other => return Err(Error::UnknownTool(other.to_string())),
        }
    }
    Ok(PLAN_UPDATED_REPLY.to_string())
}

/// Overwrite week fields on the student's most recent plan.
///
/// All referenced weeks must exist; a missing week aborts the whole update
/// with no partial writes.
pub fn apply_learning_plan_updates(store: &Store, request: &UpdateLearningPlanRequest) -> Result<()> {
    let plan = store
        .latest_plan(&request.student_email)?
        .ok_or_else(|| Error::PlanNotFound(request.student_email.clone()))?;
    info!(
        "Applying {} week update(s) to plan {} of {}",
        request.updates.len(),
        plan.id,
        request.student_email
    );
    store.update_plan_weeks(plan.id, &request.updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LearningPlanSchema, UpdateWeek, WeekPlan};

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.register_student("a@b.com").unwrap();
        let plan = LearningPlanSchema {
            student: "a@b.com".to_string(),
            plan_duration_weeks: 4,
            weekly_plan: (1..=4)
                .map(|n| WeekPlan {
                    week: n,
                    focus_topics: vec![format!("topic {n}")],
                    recommended_resources: Vec::new(),
                    practice_tasks: vec![format!("task {n}")],
                    ai_message: format!("message {n}"),
                })
                .collect(),
        };
        store.insert_plan("a@b.com", &plan).unwrap();
        store
    }

    fn update(week: u32) -> UpdateWeek {
        UpdateWeek {
            week,
            focus_topics: vec!["revised topic".to_string()],
            practice_tasks: vec!["revised task".to_string()],
            ai_message: "revised message".to_string(),
        }
    }

    #[test]
    fn test_tool_declaration_carries_request_schema() {
        let tool = update_learning_plan_tool();
        assert_eq!(tool.name, UPDATE_LEARNING_PLAN);
        let required = tool.parameters["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "student_email"));
        assert!(required.iter().any(|v| v == "updates"));
    }

    #[test]
    fn test_update_touches_only_referenced_week() {
        let store = seeded_store();
        let request = UpdateLearningPlanRequest {
            student_email: "a@b.com".to_string(),
            updates: vec![update(3)],
        };
        apply_learning_plan_updates(&store, &request).unwrap();

        let plan = store.latest_plan("a@b.com").unwrap().unwrap();
        assert_eq!(plan.weekly_plan[2].focus_topics, vec!["revised topic"]);
        assert_eq!(plan.weekly_plan[2].ai_message, "revised message");
        for untouched in [0usize, 1, 3] {
            let week = &plan.weekly_plan[untouched];
            assert_eq!(week.focus_topics, vec![format!("topic {}", week.week)]);
            assert_eq!(week.ai_message, format!("message {}", week.week));
        }
    }

    #[test]
    fn test_missing_week_aborts_without_partial_writes() {
        let store = seeded_store();
        let request = UpdateLearningPlanRequest {
            student_email: "a@b.com".to_string(),
            updates: vec![update(2), update(9)],
        };
        let err = apply_learning_plan_updates(&store, &request).unwrap_err();
        assert!(matches!(err, Error::WeekNotFound { week: 9 }));

        // week 2 must be untouched even though it preceded the bad update
        let plan = store.latest_plan("a@b.com").unwrap().unwrap();
        assert_eq!(plan.weekly_plan[1].focus_topics, vec!["topic 2"]);
    }

    #[test]
    fn test_dispatch_rejects_unknown_tool() {
        let store = seeded_store();
        let calls = [ToolCall {
            name: "drop_student".to_string(),
            arguments: "{}".to_string(),
        }];
        assert!(matches!(
            dispatch_tool_calls(&store, &calls),
            Err(Error::UnknownTool(_))
        ));
    }

    #[test]
    fn test_dispatch_rejects_malformed_arguments() {
        let store = seeded_store();
        let calls = [ToolCall {
            name: UPDATE_LEARNING_PLAN.to_string(),
            arguments: "{\"student_email\": 42}".to_string(),
        }];
        assert!(matches!(
            dispatch_tool_calls(&store, &calls),
            Err(Error::ArgumentValidation(_))
        ));
    }

    #[test]
    fn test_dispatch_without_plan_reports_plan_not_found() {
        let store = Store::open_in_memory().unwrap();
        store.register_student("new@b.com").unwrap();
        let calls = [ToolCall {
            name: UPDATE_LEARNING_PLAN.to_string(),
            arguments: serde_json::json!({
                "student_email": "new@b.com",
                "updates": []
            })
            .to_string(),
        }];
        assert!(matches!(
            dispatch_tool_calls(&store, &calls),
            Err(Error::PlanNotFound(_))
        ));
    }

    #[test]
    fn test_dispatch_confirms_successful_update() {
        let store = seeded_store();
        let calls = [ToolCall {
            name: UPDATE_LEARNING_PLAN.to_string(),
            arguments: serde_json::json!({
                "student_email": "a@b.com",
                "updates": [{
                    "week": 1,
                    "focus_topics": ["new"],
                    "practice_tasks": ["new"],
                    "ai_message": "new"
                }]
            })
            .to_string(),
        }];
        let reply = dispatch_tool_calls(&store, &calls).unwrap();
        assert_eq!(reply, PLAN_UPDATED_REPLY);
    }
}
