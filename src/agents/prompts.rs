//! Prompt builders: fixed system strings plus user instructions embedding
//! serialized student data.
//!
//! Builders are pure and deterministic. Missing or empty profile
//! collections simply render as empty JSON values; no validation happens
//! here.

use serde::Serialize;

use crate::models::{Difficulty, EvaluatedQuestion, LearningPlanSchema, StudentProfile};

pub const PLANNER_SYSTEM: &str =
    "You are an educational planning assistant that returns structured JSON only.";
pub const QUIZ_SYSTEM: &str =
    "You are a quiz generator that returns structured questions only.";
pub const EVALUATOR_SYSTEM: &str = "You are an AI quiz evaluator.";
pub const RESOURCE_SYSTEM: &str =
    "You are an education assistant that returns structured JSON.";
pub const TUTOR_SYSTEM: &str =
    "You are an interactive learning assistant. Help the student improve their plan.";

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn json_pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Weekly-plan instruction. Resources are excluded by contract; a separate
/// agent suggests them.
pub fn learning_plan_prompt(profile: &StudentProfile) -> String {
    format!(
        r#"Generate a structured weekly learning plan using the following data:

- Email: {email}
- Info: {info}
- Subjects: {subjects}
- Goals: {goals}
- Quizzes: {quizzes}
- Resource Logs: {resource_logs}

Return only focus topics, practice tasks, and AI motivational messages per week.
Do NOT include any resources in the output.
Ensure the response matches the structured schema exactly.
"#,
        email = profile.email,
        info = json(&profile.info),
        subjects = json(&profile.subjects),
        goals = json(&profile.goals),
        quizzes = json(&profile.quizzes),
        resource_logs = json(&profile.resource_logs),
    )
}

pub fn quiz_prompt(subject: &str, topic: &str, level: Difficulty) -> String {
    format!(
        r#"Generate 10 multiple-choice questions on the topic '{topic}' from subject '{subject}' at '{level}' level.
Provide each question's options keyed "A" through "D".
Mark the correct option key only.
"#
    )
}

pub fn evaluation_prompt(attempt: &[EvaluatedQuestion]) -> String {
    format!(
        r#"Evaluate the following quiz attempt. For each question, check if the student's answer is correct.
Return total score out of 100, detailed feedback, and correctness per question.

{attempt}
"#,
        attempt = json_pretty(&attempt),
    )
}

pub fn resource_prompt(profile: &StudentProfile, plan: &LearningPlanSchema) -> String {
    format!(
        r#"Recommend high-quality learning resources for the student based on their preferences and the given learning plan.

Student Info: {profile}
Learning Plan: {plan}

Return only structured resources with title, type, URL, and a brief description.
"#,
        profile = json(profile),
        plan = json(plan),
    )
}

/// Context message opening a chat turn: the profile plus the current plan.
pub fn tutor_context_message(profile: &StudentProfile, plan: Option<&LearningPlanSchema>) -> String {
    let plan_text = match plan {
        Some(p) => json(p),
        None => "(no learning plan generated yet)".to_string(),
    };
    format!(
        "Student profile: {profile}\nLearning Plan: {plan_text}",
        profile = json(profile),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LearningStyle, StudentInfo, SubjectPreference, WeekPlan};
    use std::collections::BTreeMap;

    fn profile() -> StudentProfile {
        StudentProfile {
            email: "a@b.com".to_string(),
            info: StudentInfo {
                full_name: "Ada Lovelace".to_string(),
                age: 20,
                gender: "female".to_string(),
                preferred_learning_style: LearningStyle::Visual,
            },
            subjects: vec![SubjectPreference {
                subject: "Math".to_string(),
                preferred_style: LearningStyle::Visual,
                favorite_topics: BTreeMap::new(),
                weak_topics: BTreeMap::new(),
                goal: "pass exam".to_string(),
            }],
            goals: Vec::new(),
            quizzes: Vec::new(),
            resource_logs: Vec::new(),
        }
    }

    fn plan() -> LearningPlanSchema {
        LearningPlanSchema {
            student: "a@b.com".to_string(),
            plan_duration_weeks: 1,
            weekly_plan: vec![WeekPlan {
                week: 1,
                focus_topics: vec!["Algebra".to_string()],
                recommended_resources: Vec::new(),
                practice_tasks: vec!["Solve 10 equations".to_string()],
                ai_message: "You can do this".to_string(),
            }],
        }
    }

    #[test]
    fn test_learning_plan_prompt_is_deterministic() {
        let p = profile();
        assert_eq!(learning_plan_prompt(&p), learning_plan_prompt(&p));
    }

    #[test]
    fn test_learning_plan_prompt_excludes_resources() {
        let text = learning_plan_prompt(&profile());
        assert!(text.contains("Do NOT include any resources"));
        assert!(text.contains("a@b.com"));
        assert!(text.contains("Ada Lovelace"));
    }

    #[test]
    fn test_quiz_prompt_embeds_all_parameters() {
        let text = quiz_prompt("Math", "Linear Algebra", Difficulty::Intermediate);
        assert!(text.contains("'Linear Algebra'"));
        assert!(text.contains("'Math'"));
        assert!(text.contains("'intermediate' level"));
        assert!(text.contains("10 multiple-choice questions"));
    }

    #[test]
    fn test_evaluation_prompt_embeds_attempt() {
        let attempt = vec![EvaluatedQuestion {
            question_text: "What is 2 + 2?".to_string(),
            correct_option: "B".to_string(),
            student_answer: "B".to_string(),
            is_correct: true,
        }];
        let text = evaluation_prompt(&attempt);
        assert!(text.contains("score out of 100"));
        assert!(text.contains("What is 2 + 2?"));
        assert_eq!(text, evaluation_prompt(&attempt));
    }

    #[test]
    fn test_tutor_context_without_plan() {
        let text = tutor_context_message(&profile(), None);
        assert!(text.contains("no learning plan generated yet"));
    }

    #[test]
    fn test_tutor_context_with_plan() {
        let p = plan();
        let text = tutor_context_message(&profile(), Some(&p));
        assert!(text.contains("Algebra"));
        assert!(text.starts_with("Student profile: "));
    }

    #[test]
    fn test_resource_prompt_mentions_output_contract() {
        let text = resource_prompt(&profile(), &plan());
        assert!(text.contains("title, type, URL, and a brief description"));
    }
}
