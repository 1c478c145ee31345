use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::{ChatMessage, ModelProvider};

#[derive(Debug, Clone)]
pub struct GenerateQuizRequest {
    pub subject: String,
    pub difficulty: String,
    pub age: i32,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: i32,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<GeneratedQuestion>,
}

/// Generates a quiz with a single chat round trip and parses the model's
/// JSON reply.
pub struct QuizGenerator {
    provider: Arc<dyn ModelProvider>,
}

impl QuizGenerator {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, req: &GenerateQuizRequest) -> anyhow::Result<GeneratedQuiz> {
        let messages = vec![
            ChatMessage::system(
                "You write multiple-choice quizzes for children. \
                 Reply with JSON only, no prose and no markdown fences.",
            ),
            ChatMessage::user(&build_prompt(req)),
        ];

        debug!(
            "Requesting {} {} questions from provider '{}'",
            req.question_count,
            req.subject,
            self.provider.name()
        );
        let reply = self.provider.chat(messages).await?;
        let quiz = parse_generated(&reply)?;
        validate_generated(&quiz)?;
        Ok(quiz)
    }
}

fn build_prompt(req: &GenerateQuizRequest) -> String {
    format!(
        "Write a {difficulty} {subject} quiz for a {age}-year-old with exactly \
         {count} questions. Use this JSON shape:\n\
         {{\"title\": \"...\", \"description\": \"...\", \"questions\": \
         [{{\"prompt\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \
         \"correct_option\": 0, \"points\": 10}}]}}\n\
         Each question has 4 options and correct_option is the zero-based \
         index of the right one.",
        difficulty = req.difficulty,
        subject = req.subject,
        age = req.age,
        count = req.question_count,
    )
}

/// Parses the model reply, tolerating markdown code fences around the JSON.
fn parse_generated(reply: &str) -> anyhow::Result<GeneratedQuiz> {
    let trimmed = reply.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        rest.trim_start_matches('\n')
            .strip_suffix("```")
            .unwrap_or(rest)
            .trim()
    } else {
        trimmed
    };

    serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("Model reply was not a valid quiz: {}", e))
}

fn validate_generated(quiz: &GeneratedQuiz) -> anyhow::Result<()> {
    if quiz.title.trim().is_empty() {
        return Err(anyhow::anyhow!("Generated quiz has an empty title"));
    }
    if quiz.questions.is_empty() {
        return Err(anyhow::anyhow!("Generated quiz has no questions"));
    }
    for (i, q) in quiz.questions.iter().enumerate() {
        if q.options.len() < 2 {
            return Err(anyhow::anyhow!("Question {} has fewer than two options", i + 1));
        }
        if q.correct_option < 0 || q.correct_option as usize >= q.options.len() {
            return Err(anyhow::anyhow!(
                "Question {} has correct_option {} out of range",
                i + 1,
                q.correct_option
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_REPLY: &str = r#"{
        "title": "Animal Friends",
        "description": "Easy animal questions",
        "questions": [
            {"prompt": "How many legs does a spider have?",
             "options": ["6", "8", "4", "10"],
             "correct_option": 1,
             "points": 10}
        ]
    }"#;

    #[test]
    fn parses_plain_json() {
        let quiz = parse_generated(VALID_REPLY).unwrap();
        assert_eq!(quiz.title, "Animal Friends");
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_option, 1);
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{}\n```", VALID_REPLY);
        let quiz = parse_generated(&fenced).unwrap();
        assert_eq!(quiz.title, "Animal Friends");
    }

    #[test]
    fn rejects_prose_replies() {
        assert!(parse_generated("Sure! Here is your quiz...").is_err());
    }

    #[test]
    fn rejects_out_of_range_answers() {
        let quiz = GeneratedQuiz {
            title: "T".to_string(),
            description: String::new(),
            questions: vec![GeneratedQuestion {
                prompt: "?".to_string(),
                options: vec!["a".to_string(), "b".to_string()],
                correct_option: 5,
                points: 10,
            }],
        };
        assert!(validate_generated(&quiz).is_err());
    }

    #[test]
    fn rejects_empty_question_lists() {
        let quiz = GeneratedQuiz {
            title: "T".to_string(),
            description: String::new(),
            questions: vec![],
        };
        assert!(validate_generated(&quiz).is_err());
    }
}
