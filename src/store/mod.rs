//! Embedded SQLite persistence.
//!
//! One mutex-guarded connection; multi-row writes (plan + weeks, week
//! updates, quiz + questions) run in a transaction so a failure never
//! leaves a half-written aggregate. Rows are never deleted here.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{
    InteractionLog, LearningGoal, LearningPlanSchema, LearningStyle, PlanRecord, QuestionRecord,
    QuizGenerationResponse, QuizRecord, QuizStatus, QuizSummary, ResourceItem, ResourceLogEntry,
    ResourceRecord, StudentInfo, StudentProfile, SubjectPreference, UpdateWeek, WeekPlan,
    MARKS_PER_QUESTION,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS student_info (
    student_id INTEGER PRIMARY KEY REFERENCES students(id),
    full_name TEXT NOT NULL,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL,
    preferred_learning_style TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS student_subjects (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    preferred_style TEXT NOT NULL,
    favorite_topics TEXT NOT NULL DEFAULT '{}',
    weak_topics TEXT NOT NULL DEFAULT '{}',
    goal TEXT NOT NULL DEFAULT '',
    UNIQUE (student_id, subject_id)
);

CREATE TABLE IF NOT EXISTS learning_goals (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    goal_text TEXT NOT NULL,
    subject_id INTEGER REFERENCES subjects(id),
    achieved INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS learning_plans (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    plan_duration_weeks INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS plan_weeks (
    id INTEGER PRIMARY KEY,
    plan_id INTEGER NOT NULL REFERENCES learning_plans(id),
    week INTEGER NOT NULL,
    focus_topics TEXT NOT NULL,
    practice_tasks TEXT NOT NULL,
    ai_message TEXT NOT NULL,
    UNIQUE (plan_id, week)
);

CREATE TABLE IF NOT EXISTS quizzes (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    total_marks INTEGER NOT NULL,
    score REAL,
    ai_feedback TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY,
    quiz_id INTEGER NOT NULL REFERENCES quizzes(id),
    question_text TEXT NOT NULL,
    options TEXT NOT NULL,
    correct_option TEXT NOT NULL,
    student_answer TEXT,
    is_correct INTEGER
);

CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY,
    topic_name TEXT NOT NULL,
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    url TEXT NOT NULL,
    type TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS resource_logs (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    resource_id INTEGER NOT NULL REFERENCES resources(id),
    accessed_at TEXT NOT NULL,
    feedback TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS interaction_logs (
    id INTEGER PRIMARY KEY,
    student_id INTEGER NOT NULL REFERENCES students(id),
    user_message TEXT NOT NULL,
    agent_response TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening store at {:?}", path);
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }

    // ========================================================================
    // Students and Profile
    // ========================================================================

    pub fn register_student(&self, email: &str) -> Result<i64> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO students (email, created_at) VALUES (?1, ?2)",
            params![email, now()],
        )?;
        info!("Registered student {}", email);
        Ok(conn.last_insert_rowid())
    }

    /// Existence check, used before spending a completion call on behalf
    /// of an unknown student.
    pub fn ensure_student(&self, email: &str) -> Result<()> {
        student_id(&self.lock(), email).map(|_| ())
    }

    pub fn upsert_info(&self, email: &str, student_info: &StudentInfo) -> Result<()> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        conn.execute(
            "INSERT INTO student_info (student_id, full_name, age, gender, preferred_learning_style)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (student_id) DO UPDATE SET
                 full_name = excluded.full_name,
                 age = excluded.age,
                 gender = excluded.gender,
                 preferred_learning_style = excluded.preferred_learning_style",
            params![
                sid,
                student_info.full_name,
                student_info.age,
                student_info.gender,
                student_info.preferred_learning_style.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn upsert_subject_preference(&self, email: &str, pref: &SubjectPreference) -> Result<()> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        let subject_id = get_or_create_subject(&conn, &pref.subject)?;
        conn.execute(
            "INSERT INTO student_subjects
                 (student_id, subject_id, preferred_style, favorite_topics, weak_topics, goal)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (student_id, subject_id) DO UPDATE SET
                 preferred_style = excluded.preferred_style,
                 favorite_topics = excluded.favorite_topics,
                 weak_topics = excluded.weak_topics,
                 goal = excluded.goal",
            params![
                sid,
                subject_id,
                pref.preferred_style.as_str(),
                to_json(&pref.favorite_topics)?,
                to_json(&pref.weak_topics)?,
                pref.goal,
            ],
        )?;
        Ok(())
    }

    pub fn add_goal(&self, email: &str, goal_text: &str, subject: Option<&str>) -> Result<()> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        let subject_id = match subject {
            Some(name) => Some(get_or_create_subject(&conn, name)?),
            None => None,
        };
        conn.execute(
            "INSERT INTO learning_goals (student_id, goal_text, subject_id, achieved, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![sid, goal_text, subject_id, now()],
        )?;
        Ok(())
    }

    /// Assemble the per-request student view from stored rows.
    pub fn load_profile(&self, email: &str) -> Result<StudentProfile> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;

        let info = conn
            .query_row(
                "SELECT full_name, age, gender, preferred_learning_style
                 FROM student_info WHERE student_id = ?1",
                params![sid],
                |row| {
                    Ok(StudentInfo {
                        full_name: row.get(0)?,
                        age: row.get(1)?,
                        gender: row.get(2)?,
                        preferred_learning_style: parse_style(row.get(3)?)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Error::ProfileIncomplete("student info".to_string()))?;

        let mut statement = conn.prepare(
            "SELECT s.name, ss.preferred_style, ss.favorite_topics, ss.weak_topics, ss.goal
             FROM student_subjects ss JOIN subjects s ON s.id = ss.subject_id
             WHERE ss.student_id = ?1 ORDER BY ss.id",
        )?;
        let subjects = statement
            .query_map(params![sid], |row| {
                Ok(SubjectPreference {
                    subject: row.get(0)?,
                    preferred_style: parse_style(row.get(1)?)?,
                    favorite_topics: parse_json(row.get(2)?)?,
                    weak_topics: parse_json(row.get(3)?)?,
                    goal: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut statement = conn.prepare(
            "SELECT g.goal_text, s.name, g.achieved
             FROM learning_goals g LEFT JOIN subjects s ON s.id = g.subject_id
             WHERE g.student_id = ?1 ORDER BY g.id",
        )?;
        let goals = statement
            .query_map(params![sid], |row| {
                Ok(LearningGoal {
                    goal_text: row.get(0)?,
                    subject: row.get(1)?,
                    achieved: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut statement = conn.prepare(
            "SELECT s.name, q.total_marks, q.score, q.status
             FROM quizzes q JOIN subjects s ON s.id = q.subject_id
             WHERE q.student_id = ?1 ORDER BY q.id",
        )?;
        let quizzes = statement
            .query_map(params![sid], |row| {
                Ok(QuizSummary {
                    subject: row.get(0)?,
                    total_marks: row.get(1)?,
                    score: row.get(2)?,
                    status: parse_status(row.get(3)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut statement = conn.prepare(
            "SELECT r.topic_name, r.url, l.feedback, l.accessed_at
             FROM resource_logs l JOIN resources r ON r.id = l.resource_id
             WHERE l.student_id = ?1 ORDER BY l.id",
        )?;
        let resource_logs = statement
            .query_map(params![sid], |row| {
                Ok(ResourceLogEntry {
                    topic: row.get(0)?,
                    url: row.get(1)?,
                    feedback: row.get(2)?,
                    accessed_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(StudentProfile {
            email: email.to_string(),
            info,
            subjects,
            goals,
            quizzes,
            resource_logs,
        })
    }

    // ========================================================================
    // Learning Plans
    // ========================================================================

    /// Persist a generated plan with its weeks in one transaction.
    pub fn insert_plan(&self, email: &str, plan: &LearningPlanSchema) -> Result<i64> {
        let mut conn = self.lock();
        let sid = student_id(&conn, email)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO learning_plans (student_id, plan_duration_weeks, created_at)
             VALUES (?1, ?2, ?3)",
            params![sid, plan.plan_duration_weeks, now()],
        )?;
        let plan_id = tx.last_insert_rowid();
        for week in &plan.weekly_plan {
            tx.execute(
                "INSERT INTO plan_weeks (plan_id, week, focus_topics, practice_tasks, ai_message)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    plan_id,
                    week.week,
                    to_json(&week.focus_topics)?,
                    to_json(&week.practice_tasks)?,
                    week.ai_message,
                ],
            )?;
        }
        tx.commit()?;
        info!("Stored plan {} for {}", plan_id, email);
        Ok(plan_id)
    }

    /// The student's most recently created plan, weeks ordered by number.
    pub fn latest_plan(&self, email: &str) -> Result<Option<PlanRecord>> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        let head = conn
            .query_row(
                "SELECT id, plan_duration_weeks, created_at FROM learning_plans
                 WHERE student_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![sid],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;
        let Some((plan_id, duration, created_at)) = head else {
            return Ok(None);
        };

        let mut statement = conn.prepare(
            "SELECT week, focus_topics, practice_tasks, ai_message
             FROM plan_weeks WHERE plan_id = ?1 ORDER BY week",
        )?;
        let weekly_plan = statement
            .query_map(params![plan_id], |row| {
                Ok(WeekPlan {
                    week: row.get(0)?,
                    focus_topics: parse_json(row.get(1)?)?,
                    recommended_resources: Vec::new(),
                    practice_tasks: parse_json(row.get(2)?)?,
                    ai_message: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(PlanRecord {
            id: plan_id,
            student: email.to_string(),
            plan_duration_weeks: duration,
            weekly_plan,
            created_at,
        }))
    }

    /// Overwrite fields of existing plan weeks, all-or-nothing.
    pub fn update_plan_weeks(&self, plan_id: i64, updates: &[UpdateWeek]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for update in updates {
            let affected = tx.execute(
                "UPDATE plan_weeks SET focus_topics = ?1, practice_tasks = ?2, ai_message = ?3
                 WHERE plan_id = ?4 AND week = ?5",
                params![
                    to_json(&update.focus_topics)?,
                    to_json(&update.practice_tasks)?,
                    update.ai_message,
                    plan_id,
                    update.week,
                ],
            )?;
            if affected == 0 {
                // dropping the transaction rolls back earlier updates
                return Err(Error::WeekNotFound { week: update.week });
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ========================================================================
    // Quizzes
    // ========================================================================

    /// Persist a generated quiz as pending, one mark per question.
    pub fn insert_quiz(
        &self,
        email: &str,
        subject: &str,
        quiz: &QuizGenerationResponse,
    ) -> Result<i64> {
        let mut conn = self.lock();
        let sid = student_id(&conn, email)?;
        let subject_id = get_or_create_subject(&conn, subject)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO quizzes (student_id, subject_id, total_marks, status, created_at)
             VALUES (?1, ?2, ?3, 'pending', ?4)",
            params![
                sid,
                subject_id,
                quiz.questions.len() as u32 * MARKS_PER_QUESTION,
                now(),
            ],
        )?;
        let quiz_id = tx.last_insert_rowid();
        for question in &quiz.questions {
            let options: BTreeMap<&str, &str> = question
                .options
                .iter()
                .map(|o| (o.key.as_str(), o.value.as_str()))
                .collect();
            tx.execute(
                "INSERT INTO questions (quiz_id, question_text, options, correct_option)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    quiz_id,
                    question.question_text,
                    to_json(&options)?,
                    question.correct_option,
                ],
            )?;
        }
        tx.commit()?;
        info!("Stored quiz {} for {}", quiz_id, email);
        Ok(quiz_id)
    }

    /// Load a quiz with its questions, scoped to the owning student.
    pub fn quiz(&self, quiz_id: i64, email: &str) -> Result<QuizRecord> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        let head = conn
            .query_row(
                "SELECT s.name, q.total_marks, q.score, q.ai_feedback, q.status, q.created_at
                 FROM quizzes q JOIN subjects s ON s.id = q.subject_id
                 WHERE q.id = ?1 AND q.student_id = ?2",
                params![quiz_id, sid],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, String>(3)?,
                        parse_status(row.get(4)?)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?
            .ok_or(Error::QuizNotFound(quiz_id))?;

        let mut statement = conn.prepare(
            "SELECT id, question_text, options, correct_option, student_answer, is_correct
             FROM questions WHERE quiz_id = ?1 ORDER BY id",
        )?;
        let questions = statement
            .query_map(params![quiz_id], |row| {
                Ok(QuestionRecord {
                    id: row.get(0)?,
                    question_text: row.get(1)?,
                    options: parse_json(row.get(2)?)?,
                    correct_option: row.get(3)?,
                    student_answer: row.get(4)?,
                    is_correct: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let (subject, total_marks, score, ai_feedback, status, created_at) = head;
        Ok(QuizRecord {
            id: quiz_id,
            student: email.to_string(),
            subject,
            total_marks,
            score,
            ai_feedback,
            status,
            created_at,
            questions,
        })
    }

    /// Record graded answers: (question id, submitted answer, correctness).
    pub fn record_answers(&self, quiz_id: i64, answers: &[(i64, String, bool)]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for (question_id, answer, is_correct) in answers {
            tx.execute(
                "UPDATE questions SET student_answer = ?1, is_correct = ?2
                 WHERE id = ?3 AND quiz_id = ?4",
                params![answer, is_correct, question_id, quiz_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Close out a pending quiz with the evaluation verdict.
    pub fn finalize_quiz(&self, quiz_id: i64, score: f64, feedback: &str) -> Result<()> {
        let conn = self.lock();
        let affected = conn.execute(
            "UPDATE quizzes SET score = ?1, ai_feedback = ?2, status = 'completed'
             WHERE id = ?3 AND status = 'pending'",
            params![score, feedback, quiz_id],
        )?;
        if affected == 0 {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM quizzes WHERE id = ?1",
                    params![quiz_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            return Err(if exists {
                Error::QuizAlreadyCompleted(quiz_id)
            } else {
                Error::QuizNotFound(quiz_id)
            });
        }
        Ok(())
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Store suggested resources as catalog rows under one subject.
    pub fn insert_resources(&self, subject: &str, items: &[ResourceItem]) -> Result<Vec<i64>> {
        let mut conn = self.lock();
        let subject_id = get_or_create_subject(&conn, subject)?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            tx.execute(
                "INSERT INTO resources (topic_name, subject_id, url, type, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    item.topic_name,
                    subject_id,
                    item.url,
                    item.resource_type,
                    item.description,
                ],
            )?;
            ids.push(tx.last_insert_rowid());
        }
        tx.commit()?;
        Ok(ids)
    }

    pub fn list_resources(&self) -> Result<Vec<ResourceRecord>> {
        let conn = self.lock();
        let mut statement = conn.prepare(
            "SELECT r.id, r.topic_name, s.name, r.url, r.type, r.description
             FROM resources r JOIN subjects s ON s.id = r.subject_id ORDER BY r.id",
        )?;
        let rows = statement
            .query_map([], |row| {
                Ok(ResourceRecord {
                    id: row.get(0)?,
                    topic_name: row.get(1)?,
                    subject: row.get(2)?,
                    url: row.get(3)?,
                    resource_type: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn log_resource_access(&self, email: &str, resource_id: i64, feedback: &str) -> Result<()> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        conn.execute(
            "INSERT INTO resource_logs (student_id, resource_id, accessed_at, feedback)
             VALUES (?1, ?2, ?3, ?4)",
            params![sid, resource_id, now(), feedback],
        )?;
        Ok(())
    }

    // ========================================================================
    // Interaction Log
    // ========================================================================

    pub fn append_interaction(
        &self,
        email: &str,
        user_message: &str,
        agent_response: &str,
    ) -> Result<()> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        conn.execute(
            "INSERT INTO interaction_logs (student_id, user_message, agent_response, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![sid, user_message, agent_response, now()],
        )?;
        Ok(())
    }

    /// The `limit` most recent turns, returned oldest first.
    pub fn recent_interactions(&self, email: &str, limit: usize) -> Result<Vec<InteractionLog>> {
        let conn = self.lock();
        let sid = student_id(&conn, email)?;
        let mut statement = conn.prepare(
            "SELECT user_message, agent_response, created_at FROM interaction_logs
             WHERE student_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let mut rows = statement
            .query_map(params![sid, limit as i64], |row| {
                Ok(InteractionLog {
                    user_message: row.get(0)?,
                    agent_response: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.reverse();
        Ok(rows)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn student_id(conn: &Connection, email: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM students WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| Error::StudentNotFound(email.to_string()))
}

fn get_or_create_subject(conn: &Connection, name: &str) -> Result<i64> {
    if let Some(id) = conn
        .query_row(
            "SELECT id FROM subjects WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?
    {
        return Ok(id);
    }
    conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Storage(rusqlite::Error::ToSqlConversionFailure(Box::new(e))))
}

fn parse_json<T: DeserializeOwned>(raw: String) -> rusqlite::Result<T> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_style(raw: String) -> rusqlite::Result<LearningStyle> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
    })
}

fn parse_status(raw: String) -> rusqlite::Result<QuizStatus> {
    QuizStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown quiz status '{raw}'").into(),
        )
    })
}
