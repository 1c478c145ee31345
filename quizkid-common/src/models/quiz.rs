// File: quizkid-common/src/models/quiz.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum QuizSubject {
    Math,
    Reading,
    Science,
    History,
    Art,
    General,
}

impl fmt::Display for QuizSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizSubject::Math => write!(f, "Math"),
            QuizSubject::Reading => write!(f, "Reading"),
            QuizSubject::Science => write!(f, "Science"),
            QuizSubject::History => write!(f, "History"),
            QuizSubject::Art => write!(f, "Art"),
            QuizSubject::General => write!(f, "General"),
        }
    }
}

impl FromStr for QuizSubject {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "math" => Ok(QuizSubject::Math),
            "reading" => Ok(QuizSubject::Reading),
            "science" => Ok(QuizSubject::Science),
            "history" => Ok(QuizSubject::History),
            "art" => Ok(QuizSubject::Art),
            "general" => Ok(QuizSubject::General),
            other => Err(Error::InvalidArgument(format!("Unknown quiz subject: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum QuizDifficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for QuizDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizDifficulty::Easy => write!(f, "Easy"),
            QuizDifficulty::Medium => write!(f, "Medium"),
            QuizDifficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for QuizDifficulty {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(QuizDifficulty::Easy),
            "medium" => Ok(QuizDifficulty::Medium),
            "hard" => Ok(QuizDifficulty::Hard),
            other => Err(Error::InvalidArgument(format!("Unknown difficulty: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Quiz {
    pub quiz_id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: QuizSubject,
    pub difficulty: QuizDifficulty,
    pub created_by: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        title: &str,
        description: &str,
        subject: QuizSubject,
        difficulty: QuizDifficulty,
        created_by: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            quiz_id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            subject,
            difficulty,
            created_by,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A multiple-choice question. `options` holds the choice texts in display
/// order; `correct_option` indexes into it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizQuestion {
    pub question_id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: i32,
    pub points: i32,
}

/// A single submitted answer: which option the kid picked for a question.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct QuizAnswer {
    pub question_id: Uuid,
    pub selected_option: i32,
}

/// Per-question grading detail. Points are recorded here even though the
/// aggregate score stays an unweighted correct-count.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionResult {
    pub question_id: Uuid,
    pub selected_option: Option<i32>,
    pub is_correct: bool,
    pub points_awarded: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizResult {
    pub result_id: Uuid,
    pub quiz_id: Uuid,
    pub kid_id: Uuid,
    /// Count of correctly answered questions.
    pub score: i32,
    pub total_questions: i32,
    pub accuracy_percent: f64,
    pub details: Vec<QuestionResult>,
    pub completed_at: DateTime<Utc>,
}
