//! Question and choice persistence tests for the `PostgreSQL` repository.
//!
//! A failing statement aborts the surrounding test transaction, so error
//! cases are always the last statement of a test. Operations that open their
//! own transaction roll back to a savepoint instead and may be followed by
//! further queries.

use crate::postgres::helpers::{db_now, insert_choice, insert_question, test_repository};
use chrono::TimeDelta;
use pollsite::poll::{
    domain::{Choice, PersistedChoiceData, PollText, Question, QuestionId, VoteCount},
    ports::{PollRepository, PollRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn stored_question_round_trips() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "What's up?", db_now())
        .await
        .expect("insert question");

    let found = repository
        .find_question(question.id())
        .await
        .expect("lookup");

    assert_eq!(found, Some(question));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn list_published_orders_newest_first_and_skips_future() {
    let repository = test_repository().expect("test database setup");
    let now = db_now();
    let older = insert_question(&repository, "Older", now - TimeDelta::days(30))
        .await
        .expect("insert");
    let newer = insert_question(&repository, "Newer", now - TimeDelta::days(5))
        .await
        .expect("insert");
    let exact = insert_question(&repository, "Exactly now", now)
        .await
        .expect("insert");
    insert_question(&repository, "Future", now + TimeDelta::seconds(1))
        .await
        .expect("insert");

    let everything = repository
        .list_published(now, None)
        .await
        .expect("listing");
    let limited = repository
        .list_published(now, Some(2))
        .await
        .expect("listing");

    assert_eq!(everything, vec![exact.clone(), newer.clone(), older]);
    assert_eq!(limited, vec![exact, newer]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn search_is_case_insensitive_and_literal() {
    let repository = test_repository().expect("test database setup");
    let now = db_now();
    let discount = insert_question(&repository, "Is 100% enough?", now)
        .await
        .expect("insert");
    insert_question(&repository, "Is 1000 enough?", now)
        .await
        .expect("insert");

    let matches = repository
        .list_questions(Some("100%"))
        .await
        .expect("search");
    let upper = repository
        .list_questions(Some("IS 100%"))
        .await
        .expect("search");

    assert_eq!(matches, vec![discount.clone()]);
    assert_eq!(upper, vec![discount]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn choices_keep_creation_order_and_cascade_on_delete() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "Pick one", db_now())
        .await
        .expect("insert");
    let mut created = Vec::new();
    for label in ["Zebra", "Apple", "Mango"] {
        created.push(
            insert_choice(&repository, &question, label)
                .await
                .expect("insert choice"),
        );
    }

    let listed = repository
        .choices_for(question.id())
        .await
        .expect("choices");
    assert_eq!(listed, created);

    let deletion = repository
        .delete_question(question.id())
        .await
        .expect("delete");
    let mut removed = deletion.removed_choices;
    removed.sort();
    let mut expected: Vec<_> = created.iter().map(Choice::id).collect();
    expected.sort();
    assert_eq!(removed, expected);
    assert_eq!(
        repository
            .find_question(question.id())
            .await
            .expect("lookup"),
        None
    );
    assert!(
        repository
            .choices_for(question.id())
            .await
            .expect("choices")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn update_choice_changes_label_and_votes() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "Edit", db_now())
        .await
        .expect("insert");
    let mut choice = insert_choice(&repository, &question, "Before")
        .await
        .expect("insert choice");

    choice.relabel(PollText::new("After").expect("valid text"));
    repository.update_choice(&choice).await.expect("update");

    let found = repository
        .find_choice(choice.id())
        .await
        .expect("lookup")
        .expect("choice exists");
    assert_eq!(found.text().as_str(), "After");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn delete_missing_question_reports_not_found() {
    let repository = test_repository().expect("test database setup");
    let missing = QuestionId::new();

    let result = repository.delete_question(missing).await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::QuestionNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn choice_for_missing_question_is_rejected() {
    let repository = test_repository().expect("test database setup");
    let orphan_owner = QuestionId::new();
    let choice = Choice::new(orphan_owner, PollText::new("Nobody").expect("valid text"));

    let result = repository.store_choice(&choice).await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::QuestionNotFound(id)) if id == orphan_owner
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn duplicate_question_is_rejected() {
    let repository = test_repository().expect("test database setup");
    let question = insert_question(&repository, "Once", db_now())
        .await
        .expect("insert");

    let result = repository.store_question(&question).await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::DuplicateQuestion(id)) if id == question.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn question_with_choices_is_stored_in_slice_order() {
    let repository = test_repository().expect("test database setup");
    let question = Question::new(PollText::new("Breakfast?").expect("valid text"), db_now());
    let choices: Vec<Choice> = ["Toast", "Porridge", "Eggs"]
        .into_iter()
        .map(|label| Choice::new(question.id(), PollText::new(label).expect("valid text")))
        .collect();

    repository
        .store_question_with_choices(&question, &choices)
        .await
        .expect("store");

    assert_eq!(
        repository
            .find_question(question.id())
            .await
            .expect("lookup"),
        Some(question.clone())
    );
    assert_eq!(
        repository
            .choices_for(question.id())
            .await
            .expect("choices"),
        choices
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn question_with_failing_choice_leaves_nothing_behind() {
    let repository = test_repository().expect("test database setup");
    let owner = insert_question(&repository, "Existing", db_now())
        .await
        .expect("insert");
    let taken = insert_choice(&repository, &owner, "Taken")
        .await
        .expect("insert choice");
    let question = Question::new(PollText::new("Half-written?").expect("valid text"), db_now());
    let first = Choice::new(question.id(), PollText::new("A").expect("valid text"));
    let clash = Choice::from_persisted(PersistedChoiceData {
        id: taken.id(),
        question_id: question.id(),
        text: PollText::new("B").expect("valid text"),
        vote_count: VoteCount::ZERO,
    });

    let result = repository
        .store_question_with_choices(&question, &[first.clone(), clash])
        .await;

    assert!(matches!(
        result,
        Err(PollRepositoryError::DuplicateChoice(id)) if id == taken.id()
    ));
    assert_eq!(
        repository
            .find_question(question.id())
            .await
            .expect("lookup"),
        None
    );
    assert_eq!(repository.find_choice(first.id()).await.expect("lookup"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs POLLS_TEST_DATABASE_URL"]
async fn count_choices_groups_by_question() {
    let repository = test_repository().expect("test database setup");
    let now = db_now();
    let busy = insert_question(&repository, "Busy", now)
        .await
        .expect("insert");
    for label in ["A", "B", "C"] {
        insert_choice(&repository, &busy, label)
            .await
            .expect("insert choice");
    }
    let quiet = insert_question(&repository, "Quiet", now)
        .await
        .expect("insert");
    insert_choice(&repository, &quiet, "D")
        .await
        .expect("insert choice");
    let bare = insert_question(&repository, "Bare", now)
        .await
        .expect("insert");

    let counts = repository
        .count_choices(&[busy.id(), quiet.id(), bare.id()])
        .await
        .expect("counts");

    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get(&busy.id()), Some(&3));
    assert_eq!(counts.get(&quiet.id()), Some(&1));
    assert_eq!(counts.get(&bare.id()), None);
}
