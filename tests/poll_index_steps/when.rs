//! When steps for poll listing BDD scenarios.

use super::world::{PollWorld, run_async};
use rstest_bdd_macros::when;

#[when("the index is requested")]
fn request_index(world: &mut PollWorld) {
    world.last_index = Some(run_async(world.catalogue.latest_questions()));
}

#[when(r#"the detail of "{text}" is requested"#)]
fn request_detail(world: &mut PollWorld, text: String) -> Result<(), eyre::Report> {
    let id = world.question_id(&text)?;
    world.last_detail = Some(run_async(world.catalogue.question_detail(id)));
    Ok(())
}
