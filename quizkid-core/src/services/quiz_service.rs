// File: quizkid-core/src/services/quiz_service.rs

use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use tracing::{debug, info};
use quizkid_common::models::quiz::{
    QuestionResult, Quiz, QuizAnswer, QuizDifficulty, QuizQuestion, QuizResult, QuizSubject,
};
use quizkid_common::models::wallet::WalletSnapshot;
use quizkid_common::traits::repository_traits::{QuizRepository, QuizResultRepository};
use crate::Error;
use crate::services::reward_service::RewardService;

/// Quiz CRUD, grading and submission. Submissions are graded, persisted
/// and routed through the reward engine in one call.
pub struct QuizService {
    quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
    result_repo: Arc<dyn QuizResultRepository + Send + Sync>,
    reward_service: Arc<RewardService>,
}

impl QuizService {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
        result_repo: Arc<dyn QuizResultRepository + Send + Sync>,
        reward_service: Arc<RewardService>,
    ) -> Self {
        Self {
            quiz_repo,
            result_repo,
            reward_service,
        }
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    pub async fn create_quiz(
        &self,
        title: &str,
        description: &str,
        subject: QuizSubject,
        difficulty: QuizDifficulty,
        created_by: Option<Uuid>,
        questions: Vec<NewQuestion>,
    ) -> Result<Quiz, Error> {
        if title.trim().is_empty() {
            return Err(Error::InvalidArgument("Quiz title must not be empty".to_string()));
        }
        if questions.is_empty() {
            return Err(Error::InvalidArgument(
                "Quiz must have at least one question".to_string(),
            ));
        }

        let quiz = Quiz::new(title, description, subject, difficulty, created_by);
        let rows = build_questions(quiz.quiz_id, questions)?;

        self.quiz_repo.create_quiz(&quiz, &rows).await?;
        info!("Created quiz '{}' with {} questions", quiz.title, rows.len());
        Ok(quiz)
    }

    pub async fn get_quiz(&self, quiz_id: Uuid) -> Result<(Quiz, Vec<QuizQuestion>), Error> {
        let quiz = self
            .quiz_repo
            .get_quiz(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No quiz with id={}", quiz_id)))?;
        let questions = self.quiz_repo.get_questions(quiz_id).await?;
        Ok((quiz, questions))
    }

    pub async fn update_quiz_details(
        &self,
        quiz_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Quiz, Error> {
        if title.trim().is_empty() {
            return Err(Error::InvalidArgument("Quiz title must not be empty".to_string()));
        }
        let (mut quiz, _) = self.get_quiz(quiz_id).await?;
        quiz.title = title.to_string();
        quiz.description = description.to_string();
        quiz.updated_at = Utc::now();
        self.quiz_repo.update_quiz(&quiz).await?;
        Ok(quiz)
    }

    pub async fn set_published(&self, quiz_id: Uuid, published: bool) -> Result<Quiz, Error> {
        let (mut quiz, _) = self.get_quiz(quiz_id).await?;
        quiz.is_published = published;
        quiz.updated_at = Utc::now();
        self.quiz_repo.update_quiz(&quiz).await?;
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), Error> {
        self.quiz_repo.delete_quiz(quiz_id).await
    }

    pub async fn list_published(&self) -> Result<Vec<Quiz>, Error> {
        self.quiz_repo.list_published().await
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Grades a submission, stores the result and pays the quiz reward.
    pub async fn submit_quiz(
        &self,
        kid_id: Uuid,
        quiz_id: Uuid,
        answers: &[QuizAnswer],
    ) -> Result<(QuizResult, WalletSnapshot), Error> {
        let (quiz, questions) = self.get_quiz(quiz_id).await?;
        if !quiz.is_published {
            return Err(Error::BusinessRule(format!(
                "Quiz '{}' is not published",
                quiz.title
            )));
        }

        let graded = grade_submission(&questions, answers);
        let result = QuizResult {
            result_id: Uuid::new_v4(),
            quiz_id,
            kid_id,
            score: graded.score,
            total_questions: questions.len() as i32,
            accuracy_percent: graded.accuracy_percent,
            details: graded.details,
            completed_at: Utc::now(),
        };
        self.result_repo.insert_result(&result).await?;
        debug!(
            "Kid {} scored {}/{} on quiz '{}'",
            kid_id, result.score, result.total_questions, quiz.title
        );

        let snapshot = self
            .reward_service
            .award_quiz_completion(kid_id, quiz_id, result.accuracy_percent)
            .await?;

        Ok((result, snapshot))
    }

    pub async fn results_for_kid(&self, kid_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error> {
        self.result_repo.list_for_kid(kid_id, limit).await
    }
}

/// Question input for quiz creation, before ids are assigned.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: i32,
    pub points: i32,
}

fn build_questions(quiz_id: Uuid, inputs: Vec<NewQuestion>) -> Result<Vec<QuizQuestion>, Error> {
    let mut rows = Vec::with_capacity(inputs.len());
    for (i, q) in inputs.into_iter().enumerate() {
        if q.options.len() < 2 {
            return Err(Error::InvalidArgument(format!(
                "Question {} needs at least two options",
                i + 1
            )));
        }
        if q.correct_option < 0 || q.correct_option as usize >= q.options.len() {
            return Err(Error::InvalidArgument(format!(
                "Question {} has correct option {} out of range",
                i + 1,
                q.correct_option
            )));
        }
        rows.push(QuizQuestion {
            question_id: Uuid::new_v4(),
            quiz_id,
            position: i as i32,
            prompt: q.prompt,
            options: q.options,
            correct_option: q.correct_option,
            points: q.points,
        });
    }
    Ok(rows)
}

pub struct GradedSubmission {
    /// Count of correctly answered questions. Per-question points are kept
    /// in `details` but do not weight this aggregate.
    pub score: i32,
    pub accuracy_percent: f64,
    pub details: Vec<QuestionResult>,
}

/// Grades answers against the quiz's questions. A question with no
/// submitted answer is scored as incorrect; it is not an error.
pub fn grade_submission(questions: &[QuizQuestion], answers: &[QuizAnswer]) -> GradedSubmission {
    let mut correct = 0;
    let mut details = Vec::with_capacity(questions.len());

    for question in questions {
        let submitted = answers.iter().find(|a| a.question_id == question.question_id);
        let selected = submitted.map(|a| a.selected_option);
        let is_correct = selected == Some(question.correct_option);
        if is_correct {
            correct += 1;
        }
        details.push(QuestionResult {
            question_id: question.question_id,
            selected_option: selected,
            is_correct,
            points_awarded: if is_correct { question.points } else { 0 },
        });
    }

    let accuracy_percent = if questions.is_empty() {
        0.0
    } else {
        (correct as f64) * 100.0 / (questions.len() as f64)
    };

    GradedSubmission {
        score: correct,
        accuracy_percent,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: i32, points: i32) -> QuizQuestion {
        QuizQuestion {
            question_id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            position: 0,
            prompt: "2 + 2 = ?".to_string(),
            options: vec!["3".to_string(), "4".to_string(), "5".to_string()],
            correct_option: correct,
            points,
        }
    }

    #[test]
    fn grades_two_of_three_with_one_unanswered() {
        let q1 = question(1, 10);
        let q2 = question(0, 10);
        let q3 = question(2, 20);
        let answers = vec![
            QuizAnswer { question_id: q1.question_id, selected_option: 1 },
            QuizAnswer { question_id: q2.question_id, selected_option: 0 },
            // q3 left unanswered
        ];

        let graded = grade_submission(&[q1, q2, q3], &answers);
        assert_eq!(graded.score, 2);
        assert!((graded.accuracy_percent - 66.66666666666667).abs() < 1e-9);
        assert_eq!(graded.details.len(), 3);
        assert_eq!(graded.details[2].selected_option, None);
        assert!(!graded.details[2].is_correct);
        assert_eq!(graded.details[2].points_awarded, 0);
    }

    #[test]
    fn score_is_unweighted_despite_point_values() {
        let q1 = question(1, 100);
        let q2 = question(1, 1);
        let answers = vec![
            QuizAnswer { question_id: q1.question_id, selected_option: 1 },
            QuizAnswer { question_id: q2.question_id, selected_option: 1 },
        ];

        let graded = grade_submission(&[q1, q2], &answers);
        // Two correct answers count 2, whatever their point values; the
        // points only show up in the details.
        assert_eq!(graded.score, 2);
        assert_eq!(graded.details[0].points_awarded, 100);
        assert_eq!(graded.details[1].points_awarded, 1);
    }

    #[test]
    fn empty_quiz_grades_to_zero() {
        let graded = grade_submission(&[], &[]);
        assert_eq!(graded.score, 0);
        assert_eq!(graded.accuracy_percent, 0.0);
        assert!(graded.details.is_empty());
    }

    #[test]
    fn wrong_answers_score_zero() {
        let q = question(1, 10);
        let answers = vec![QuizAnswer { question_id: q.question_id, selected_option: 2 }];
        let graded = grade_submission(&[q], &answers);
        assert_eq!(graded.score, 0);
        assert_eq!(graded.accuracy_percent, 0.0);
    }
}
