// File: quizkid-core/src/services/quiz_gen_service.rs

use std::sync::Arc;
use uuid::Uuid;
use tracing::info;
use quizkid_ai::{GenerateQuizRequest, ModelProvider, QuizGenerator};
use quizkid_common::models::quiz::{Quiz, QuizDifficulty, QuizQuestion, QuizSubject};
use quizkid_common::traits::repository_traits::QuizRepository;
use crate::Error;

/// Generates a quiz with an LLM and stores it as an unpublished draft for
/// a guardian to review.
pub struct QuizGenService {
    generator: QuizGenerator,
    quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
}

impl QuizGenService {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        quiz_repo: Arc<dyn QuizRepository + Send + Sync>,
    ) -> Self {
        Self {
            generator: QuizGenerator::new(provider),
            quiz_repo,
        }
    }

    pub async fn generate_quiz(
        &self,
        subject: QuizSubject,
        difficulty: QuizDifficulty,
        age: i32,
        question_count: usize,
        requested_by: Option<Uuid>,
    ) -> Result<(Quiz, Vec<QuizQuestion>), Error> {
        if question_count == 0 || question_count > 25 {
            return Err(Error::InvalidArgument(format!(
                "question_count must be between 1 and 25, got {}",
                question_count
            )));
        }

        let generated = self
            .generator
            .generate(&GenerateQuizRequest {
                subject: subject.to_string(),
                difficulty: difficulty.to_string(),
                age,
                question_count,
            })
            .await?;

        let quiz = Quiz::new(
            &generated.title,
            &generated.description,
            subject,
            difficulty,
            requested_by,
        );
        let questions: Vec<QuizQuestion> = generated
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuizQuestion {
                question_id: Uuid::new_v4(),
                quiz_id: quiz.quiz_id,
                position: i as i32,
                prompt: q.prompt.clone(),
                options: q.options.clone(),
                correct_option: q.correct_option,
                points: q.points,
            })
            .collect();

        self.quiz_repo.create_quiz(&quiz, &questions).await?;
        info!(
            "Generated quiz '{}' ({} questions) as a draft",
            quiz.title,
            questions.len()
        );
        Ok((quiz, questions))
    }
}
