//! Vote counting tests for the `PostgreSQL` repository.

use crate::postgres::helpers::{db_now, insert_choice, insert_question, test_repository};
use pollsite::poll::{
    domain::{ChoiceId, VoteCount},
    ports::{PollRepository, PollRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn record_vote_increments_the_stored_counter() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "Tabs or spaces?", db_now())
        .await
        .expect("insert");
    let choice = insert_choice(&repository, &question, "Tabs")
        .await
        .expect("insert choice");

    repository.record_vote(choice.id()).await.expect("vote");
    let updated = repository.record_vote(choice.id()).await.expect("vote");

    assert_eq!(updated.vote_count().value(), 2);
    assert_eq!(
        repository.find_choice(choice.id()).await.expect("lookup"),
        Some(updated)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn record_vote_on_missing_choice_is_not_found() {
    let repository = test_repository().expect("test database setup");
    let missing = ChoiceId::new();

    let result = repository.record_vote(missing).await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::ChoiceNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn record_vote_on_saturated_choice_overflows() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "Popular?", db_now())
        .await
        .expect("insert");
    let mut choice = insert_choice(&repository, &question, "Very")
        .await
        .expect("insert choice");
    choice.set_vote_count(VoteCount::new(u64::from(VoteCount::MAX)).expect("max is valid"));
    repository.update_choice(&choice).await.expect("update");

    let result = repository.record_vote(choice.id()).await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::VoteCountOverflow(id)) if id == choice.id()
    ));
}
