//! Given steps for poll listing BDD scenarios.

use super::world::{PollWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use pollsite::poll::services::CreateQuestionRequest;
use rstest_bdd_macros::given;

fn days(count: u64) -> Result<TimeDelta, eyre::Report> {
    let whole_days = i64::try_from(count).wrap_err("day offset out of range")?;
    TimeDelta::try_days(whole_days).ok_or_else(|| eyre::eyre!("day offset out of range"))
}

fn create_question(
    world: &mut PollWorld,
    text: String,
    offset: TimeDelta,
) -> Result<(), eyre::Report> {
    let request = CreateQuestionRequest::new(text.clone()).published_at(world.now + offset);
    let created = run_async(world.admin.create_question(request))
        .wrap_err_with(|| format!("create question \"{text}\""))?;
    world.questions_by_text.insert(text, created.question.id());
    Ok(())
}

#[given("no questions exist")]
fn no_questions_exist(world: &mut PollWorld) {
    world.questions_by_text.clear();
}

#[given(r#"a question "{text}" published {count:u64} days ago"#)]
fn question_published_days_ago(
    world: &mut PollWorld,
    text: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let offset = days(count)?;
    create_question(world, text, -offset)
}

#[given(r#"a question "{text}" published in {count:u64} days"#)]
fn question_published_in_days(
    world: &mut PollWorld,
    text: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let offset = days(count)?;
    create_question(world, text, offset)
}
