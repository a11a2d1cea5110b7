//! Agent functions: each composes a prompt builder with one completion
//! call and validates the structured result. The completion client is an
//! explicit parameter so callers (and tests) choose the implementation.

pub mod planner;
pub mod prompts;
pub mod quiz;
pub mod resources;
pub mod tools;
pub mod tutor;

pub use planner::generate_learning_plan;
pub use quiz::{evaluate_quiz, generate_quiz};
pub use resources::generate_resource_suggestions;
pub use tools::{
    PLAN_UPDATED_REPLY, UPDATE_LEARNING_PLAN, apply_learning_plan_updates, dispatch_tool_calls,
    update_learning_plan_tool,
};
pub use tutor::interact_with_student;
