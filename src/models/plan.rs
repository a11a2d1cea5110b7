use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Structured Output Types
// ============================================================================

/// One week of a generated learning plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WeekPlan {
    pub week: u32,
    pub focus_topics: Vec<String>,
    /// Always empty for generated plans; the planner prompt excludes
    /// resources and a separate agent suggests them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_resources: Vec<String>,
    pub practice_tasks: Vec<String>,
    pub ai_message: String,
}

/// A weekly learning plan as returned by the planner agent.
///
/// Transient: validated on receipt, then its fields are copied into plan
/// and week rows. Never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LearningPlanSchema {
    /// Email of the student the plan was generated for.
    pub student: String,
    pub plan_duration_weeks: u32,
    pub weekly_plan: Vec<WeekPlan>,
}

impl LearningPlanSchema {
    /// Check the week-number invariant: exactly `1..=plan_duration_weeks`,
    /// no duplicates or gaps.
    pub fn validate(&self) -> Result<(), String> {
        if self.weekly_plan.len() != self.plan_duration_weeks as usize {
            return Err(format!(
                "plan declares {} weeks but contains {}",
                self.plan_duration_weeks,
                self.weekly_plan.len()
            ));
        }
        let mut weeks: Vec<u32> = self.weekly_plan.iter().map(|w| w.week).collect();
        weeks.sort_unstable();
        for (expected, found) in (1..=self.plan_duration_weeks).zip(weeks) {
            if expected != found {
                return Err(format!(
                    "week numbers must be 1..={} with no gaps; found week {}",
                    self.plan_duration_weeks, found
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Stored Plan Types
// ============================================================================

/// A persisted learning plan with its weeks, ordered by week number.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRecord {
    pub id: i64,
    pub student: String,
    pub plan_duration_weeks: u32,
    pub weekly_plan: Vec<WeekPlan>,
    pub created_at: String,
}

impl PlanRecord {
    /// Plan view embedded into prompts: the same shape the planner emits,
    /// without row ids.
    pub fn as_schema(&self) -> LearningPlanSchema {
        LearningPlanSchema {
            student: self.student.clone(),
            plan_duration_weeks: self.plan_duration_weeks,
            weekly_plan: self.weekly_plan.clone(),
        }
    }
}

// ============================================================================
// Plan Update Tool Types
// ============================================================================

/// Replacement fields for a single plan week.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateWeek {
    pub week: u32,
    pub focus_topics: Vec<String>,
    pub practice_tasks: Vec<String>,
    pub ai_message: String,
}

/// Argument schema of the `update_learning_plan` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateLearningPlanRequest {
    pub student_email: String,
    pub updates: Vec<UpdateWeek>,
}
