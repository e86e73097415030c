//! Question lifecycle from creation to cascade delete.

use super::helpers::{PollServices, services};
use chrono::TimeDelta;
use pollsite::poll::{
    ports::{PollRepository, PollRepositoryError},
    services::{CreateQuestionRequest, PollServiceError, UpdateQuestionRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduled_question_appears_once_its_time_is_moved_back(services: PollServices) {
    let request = CreateQuestionRequest::new("Coming soon?")
        .published_at(services.now + TimeDelta::days(2));
    let created = services
        .admin
        .create_question(request)
        .await
        .expect("question creation should succeed");
    assert!(
        services
            .catalogue
            .latest_questions()
            .await
            .expect("listing")
            .is_empty()
    );

    services
        .admin
        .update_question(
            created.question.id(),
            UpdateQuestionRequest {
                text: None,
                publication_time: Some(services.now - TimeDelta::minutes(1)),
            },
        )
        .await
        .expect("reschedule");

    let rows = services.admin.changelist(None).await.expect("changelist");
    let row = rows.first().expect("one question");
    assert!(row.published_recently);
    let latest = services.catalogue.latest_questions().await.expect("listing");
    assert_eq!(latest.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_question_removes_choices_and_their_votes(services: PollServices) {
    let request = CreateQuestionRequest::new("Short-lived?")
        .published_at(services.now - TimeDelta::hours(3))
        .with_choices(["Yes".to_owned(), "No".to_owned()]);
    let created = services
        .admin
        .create_question(request)
        .await
        .expect("question creation should succeed");
    let question_id = created.question.id();
    let yes = created.choices.first().expect("two choices").id();
    services
        .catalogue
        .vote(question_id, Some(yes))
        .await
        .expect("vote");

    let deletion = services
        .admin
        .delete_question(question_id)
        .await
        .expect("delete");

    assert_eq!(deletion.removed_choices.len(), 2);
    for choice in &created.choices {
        let found = services
            .repository
            .find_choice(choice.id())
            .await
            .expect("lookup");
        assert!(found.is_none(), "choice {} survived", choice.id());
    }
    assert!(matches!(
        services.catalogue.vote(question_id, Some(yes)).await,
        Err(PollServiceError::QuestionNotFound(_))
    ));
    assert!(matches!(
        services.repository.record_vote(yes).await,
        Err(PollRepositoryError::ChoiceNotFound(_))
    ));
}
