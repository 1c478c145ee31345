// File: quizkid-core/tests/quiz_service_tests.rs

use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use quizkid_common::models::kid::Kid;
use quizkid_common::models::quiz::{
    Quiz, QuizAnswer, QuizDifficulty, QuizQuestion, QuizResult, QuizSubject,
};
use quizkid_common::models::transaction::{ActivityType, WalletTransaction};
use quizkid_common::models::wallet::Wallet;
use quizkid_common::traits::repository_traits::{
    KidRepository, QuizRepository, QuizResultRepository, WalletRepository,
    WalletTransactionRepository,
};
use quizkid_core::services::quiz_service::{NewQuestion, QuizService};
use quizkid_core::services::reward_service::RewardService;
use quizkid_core::Error;

mock! {
    QuizRepo {}
    #[async_trait]
    impl QuizRepository for QuizRepo {
        async fn create_quiz(&self, quiz: &Quiz, questions: &[QuizQuestion]) -> Result<(), Error>;
        async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<Quiz>, Error>;
        async fn get_questions(&self, quiz_id: Uuid) -> Result<Vec<QuizQuestion>, Error>;
        async fn update_quiz(&self, quiz: &Quiz) -> Result<(), Error>;
        async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), Error>;
        async fn list_published(&self) -> Result<Vec<Quiz>, Error>;
    }
}

mock! {
    ResultRepo {}
    #[async_trait]
    impl QuizResultRepository for ResultRepo {
        async fn insert_result(&self, result: &QuizResult) -> Result<(), Error>;
        async fn get_result(&self, result_id: Uuid) -> Result<Option<QuizResult>, Error>;
        async fn list_for_kid(&self, kid_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error>;
        async fn list_for_quiz(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error>;
    }
}

mock! {
    WalletRepo {}
    #[async_trait]
    impl WalletRepository for WalletRepo {
        async fn create_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
        async fn get_wallet(&self, wallet_id: Uuid) -> Result<Option<Wallet>, Error>;
        async fn get_wallet_by_kid(&self, kid_id: Uuid) -> Result<Option<Wallet>, Error>;
        async fn update_wallet(&self, wallet: &Wallet) -> Result<(), Error>;
    }
}

mock! {
    LedgerRepo {}
    #[async_trait]
    impl WalletTransactionRepository for LedgerRepo {
        async fn insert_transaction(&self, tx: &WalletTransaction) -> Result<(), Error>;
        async fn list_for_wallet(
            &self,
            wallet_id: Uuid,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<WalletTransaction>, Error>;
        async fn list_for_wallet_by_activity(
            &self,
            wallet_id: Uuid,
            activity: ActivityType,
            limit: i64,
        ) -> Result<Vec<WalletTransaction>, Error>;
        async fn activity_exists_on(
            &self,
            wallet_id: Uuid,
            activity: ActivityType,
            date: NaiveDate,
        ) -> Result<bool, Error>;
        async fn count_for_wallet(&self, wallet_id: Uuid) -> Result<i64, Error>;
    }
}

mock! {
    KidRepo {}
    #[async_trait]
    impl KidRepository for KidRepo {
        async fn create_kid(&self, kid: &Kid) -> Result<(), Error>;
        async fn get_kid(&self, kid_id: Uuid) -> Result<Option<Kid>, Error>;
        async fn update_kid(&self, kid: &Kid) -> Result<(), Error>;
        async fn delete_kid(&self, kid_id: Uuid) -> Result<(), Error>;
        async fn list_active_kids(&self) -> Result<Vec<Kid>, Error>;
    }
}

fn published_quiz() -> (Quiz, Vec<QuizQuestion>) {
    let mut quiz = Quiz::new(
        "Space basics",
        "Planets and stars",
        QuizSubject::Science,
        QuizDifficulty::Easy,
        None,
    );
    quiz.is_published = true;

    let questions: Vec<QuizQuestion> = (0..3)
        .map(|i| QuizQuestion {
            question_id: Uuid::new_v4(),
            quiz_id: quiz.quiz_id,
            position: i,
            prompt: format!("Question {}", i + 1),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_option: 1,
            points: 10,
        })
        .collect();
    (quiz, questions)
}

fn reward_service(wallet: Wallet) -> Arc<RewardService> {
    let mut wallet_repo = MockWalletRepo::new();
    let w = wallet.clone();
    wallet_repo
        .expect_get_wallet_by_kid()
        .returning(move |_| Ok(Some(w.clone())));
    wallet_repo.expect_update_wallet().returning(|_| Ok(()));

    let mut ledger_repo = MockLedgerRepo::new();
    ledger_repo.expect_insert_transaction().returning(|_| Ok(()));

    Arc::new(RewardService::new(
        Arc::new(wallet_repo),
        Arc::new(ledger_repo),
        Arc::new(MockKidRepo::new()),
    ))
}

#[tokio::test]
async fn submission_grades_persists_and_rewards() -> Result<(), Error> {
    let kid_id = Uuid::new_v4();
    let (quiz, questions) = published_quiz();
    let quiz_id = quiz.quiz_id;

    let mut quiz_repo = MockQuizRepo::new();
    let q = quiz.clone();
    quiz_repo.expect_get_quiz().returning(move |_| Ok(Some(q.clone())));
    let qs = questions.clone();
    quiz_repo.expect_get_questions().returning(move |_| Ok(qs.clone()));

    let mut result_repo = MockResultRepo::new();
    result_repo
        .expect_insert_result()
        .withf(|r| r.score == 2 && r.total_questions == 3)
        .times(1)
        .returning(|_| Ok(()));

    let svc = QuizService::new(
        Arc::new(quiz_repo),
        Arc::new(result_repo),
        reward_service(Wallet::new(kid_id)),
    );

    // Two right answers, the third question left unanswered.
    let answers = vec![
        QuizAnswer { question_id: questions[0].question_id, selected_option: 1 },
        QuizAnswer { question_id: questions[1].question_id, selected_option: 1 },
    ];
    let (result, snapshot) = svc.submit_quiz(kid_id, quiz_id, &answers).await?;

    assert_eq!(result.score, 2);
    assert!((result.accuracy_percent - 66.67).abs() < 0.01);
    assert!(!result.details[2].is_correct);
    // 66.67% earns the 10-coin base with no accuracy bonus.
    assert_eq!(snapshot.coins, 10);
    Ok(())
}

#[tokio::test]
async fn perfect_submission_pays_the_perfect_score_bonus() -> Result<(), Error> {
    let kid_id = Uuid::new_v4();
    let (quiz, questions) = published_quiz();
    let quiz_id = quiz.quiz_id;

    let mut quiz_repo = MockQuizRepo::new();
    let q = quiz.clone();
    quiz_repo.expect_get_quiz().returning(move |_| Ok(Some(q.clone())));
    let qs = questions.clone();
    quiz_repo.expect_get_questions().returning(move |_| Ok(qs.clone()));

    let mut result_repo = MockResultRepo::new();
    result_repo.expect_insert_result().returning(|_| Ok(()));

    let svc = QuizService::new(
        Arc::new(quiz_repo),
        Arc::new(result_repo),
        reward_service(Wallet::new(kid_id)),
    );

    let answers: Vec<QuizAnswer> = questions
        .iter()
        .map(|q| QuizAnswer { question_id: q.question_id, selected_option: 1 })
        .collect();
    let (result, snapshot) = svc.submit_quiz(kid_id, quiz_id, &answers).await?;

    assert_eq!(result.score, 3);
    assert_eq!(result.accuracy_percent, 100.0);
    // Base 10 plus the 20-coin perfect-score bonus.
    assert_eq!(snapshot.coins, 30);
    Ok(())
}

#[tokio::test]
async fn unpublished_quizzes_cannot_be_submitted() {
    let kid_id = Uuid::new_v4();
    let (mut quiz, questions) = published_quiz();
    quiz.is_published = false;
    let quiz_id = quiz.quiz_id;

    let mut quiz_repo = MockQuizRepo::new();
    let q = quiz.clone();
    quiz_repo.expect_get_quiz().returning(move |_| Ok(Some(q.clone())));
    let qs = questions.clone();
    quiz_repo.expect_get_questions().returning(move |_| Ok(qs.clone()));

    let svc = QuizService::new(
        Arc::new(quiz_repo),
        Arc::new(MockResultRepo::new()),
        reward_service(Wallet::new(kid_id)),
    );

    let result = svc.submit_quiz(kid_id, quiz_id, &[]).await;
    assert!(matches!(result, Err(Error::BusinessRule(_))));
}

#[tokio::test]
async fn create_quiz_validates_question_shape() {
    let svc = QuizService::new(
        Arc::new(MockQuizRepo::new()),
        Arc::new(MockResultRepo::new()),
        reward_service(Wallet::new(Uuid::new_v4())),
    );

    // Out-of-range correct option.
    let result = svc
        .create_quiz(
            "Broken",
            "",
            QuizSubject::Math,
            QuizDifficulty::Easy,
            None,
            vec![NewQuestion {
                prompt: "1 + 1 = ?".to_string(),
                options: vec!["2".to_string(), "3".to_string()],
                correct_option: 7,
                points: 10,
            }],
        )
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));

    // No questions at all.
    let result = svc
        .create_quiz("Empty", "", QuizSubject::Math, QuizDifficulty::Easy, None, vec![])
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[tokio::test]
async fn missing_quiz_is_not_found() {
    let mut quiz_repo = MockQuizRepo::new();
    quiz_repo.expect_get_quiz().returning(|_| Ok(None));

    let svc = QuizService::new(
        Arc::new(quiz_repo),
        Arc::new(MockResultRepo::new()),
        reward_service(Wallet::new(Uuid::new_v4())),
    );

    let result = svc.submit_quiz(Uuid::new_v4(), Uuid::new_v4(), &[]).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}
