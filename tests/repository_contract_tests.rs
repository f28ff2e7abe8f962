mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{make_quiz, make_user, InMemoryQuizRepository, InMemoryQuizResultRepository, InMemoryUserRepository};
use tutor_server::{
    errors::AppError,
    models::domain::{AnswerDetail, QuizCategory, QuizDifficulty, QuizResult, UserRole},
    repositories::{QuizFilter, QuizRepository, QuizResultRepository, UserRepository},
};

fn make_result(quiz_id: &str, score: u32, minutes_ago: i64) -> QuizResult {
    QuizResult {
        id: Uuid::new_v4().to_string(),
        quiz_id: quiz_id.to_string(),
        student_id: "student-1".to_string(),
        student_name: "Kiran".to_string(),
        student_email: "kiran@example.com".to_string(),
        score,
        total_questions: 40,
        passed: score >= 28,
        answers: vec![AnswerDetail {
            question_index: 0,
            selected_answer: 0,
            is_correct: true,
        }],
        time_taken: 1200,
        completed_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn quiz_repository_crud_filters_and_error_paths() {
    let repo = InMemoryQuizRepository::new();

    let ielts = make_quiz("IELTS Reading", QuizCategory::IeltsPreparation, QuizDifficulty::Easy);
    let mut gre = make_quiz("GRE Words", QuizCategory::GreVocabulary, QuizDifficulty::Hard);
    gre.is_active = false;

    repo.create(ielts.clone()).await.expect("create ielts");
    repo.create(gre.clone()).await.expect("create gre");

    let duplicate = repo.create(ielts.clone()).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = repo.find_by_id(&ielts.id).await.expect("find should work");
    assert_eq!(found.map(|q| q.title), Some("IELTS Reading".to_string()));
    assert!(repo.find_by_id("missing").await.expect("find should work").is_none());

    let (page, total) = repo
        .list(&QuizFilter::default(), 0, 1)
        .await
        .expect("pagination should work");
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);

    let active = repo.find_all(&QuizFilter::active()).await.expect("filter should work");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, ielts.id);

    let hard = QuizFilter {
        difficulty: Some(QuizDifficulty::Hard),
        ..QuizFilter::default()
    };
    let (hard_page, hard_total) = repo.list(&hard, 0, 10).await.expect("filter should work");
    assert_eq!(hard_total, 1);
    assert_eq!(hard_page[0].id, gre.id);

    let mut renamed = ielts.clone();
    renamed.title = "IELTS Reading II".to_string();
    let updated = repo.update(renamed).await.expect("update should work");
    assert_eq!(updated.title, "IELTS Reading II");

    let missing_update = repo
        .update(make_quiz("Ghost", QuizCategory::SpokenEnglish, QuizDifficulty::Medium))
        .await;
    assert!(matches!(missing_update, Err(AppError::NotFound(_))));

    repo.delete(&gre.id).await.expect("delete should work");
    let missing_delete = repo.delete(&gre.id).await;
    assert!(matches!(missing_delete, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn result_repository_appends_orders_and_bulk_deletes() {
    let repo = InMemoryQuizResultRepository::new();

    repo.append(make_result("quiz-a", 30, 30)).await.expect("append");
    repo.append(make_result("quiz-a", 20, 5)).await.expect("append");
    repo.append(make_result("quiz-b", 35, 10)).await.expect("append");

    // Same student, same quiz: both attempts are kept.
    let for_a = repo.find_by_quiz("quiz-a").await.expect("query should work");
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].score, 20, "newest result comes first");

    let everything = repo.find_all().await.expect("query should work");
    let scores: Vec<u32> = everything.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![20, 35, 30]);

    let subset = repo
        .find_by_quizzes(&["quiz-b".to_string()])
        .await
        .expect("query should work");
    assert_eq!(subset.len(), 1);

    let removed = repo.delete_by_quiz("quiz-a").await.expect("delete should work");
    assert_eq!(removed, 2);
    assert!(repo.find_by_quiz("quiz-a").await.expect("query").is_empty());
    assert_eq!(repo.delete_by_quiz("quiz-a").await.expect("delete"), 0);
}

#[tokio::test]
async fn user_repository_crud_and_error_paths() {
    let repo = InMemoryUserRepository::new();

    let alice = make_user("Alice", "secret1", UserRole::User);
    repo.create(alice.clone()).await.expect("create alice");

    let duplicate = repo.create(make_user("Alice", "other1", UserRole::Admin)).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let by_email = repo
        .find_by_email("ALICE@example.com")
        .await
        .expect("find by email should work");
    assert!(by_email.is_some());

    let by_id = repo.find_by_id(&alice.id_hex()).await.expect("find by id should work");
    assert_eq!(by_id.map(|u| u.name), Some("Alice".to_string()));

    let mut moved = alice.clone();
    moved.address = "7 Harbour Lane".to_string();
    let updated = repo.update(moved).await.expect("update should work");
    assert_eq!(updated.address, "7 Harbour Lane");

    let missing = repo.update(make_user("Nobody", "secret1", UserRole::User)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
