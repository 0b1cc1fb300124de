//! When steps for task progress BDD scenarios.

use super::world::{TaskProgressWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::services::AddProgressUpdateRequest;

/// Submits a progress update as `author` and records the outcome.
fn submit(
    world: &mut TaskProgressWorld,
    author: &str,
    request: AddProgressUpdateRequest,
) -> Result<(), eyre::Report> {
    let author_id = world.user(author)?.id();
    let task_id = world.task()?.task().id();
    let result = run_async(world.ledger.add_update(task_id, request, author_id));
    world.last_update = Some(result);
    Ok(())
}

#[when(r#""{author}" reports progress "{state}" with comment "{comment}""#)]
fn reports_progress(
    world: &mut TaskProgressWorld,
    author: String,
    state: String,
    comment: String,
) -> Result<(), eyre::Report> {
    let request = AddProgressUpdateRequest::new()
        .with_comment(comment)
        .with_progress_state(state);
    submit(world, &author, request)
}

#[when(r#""{author}" comments "{comment}" without a progress state"#)]
fn comments_only(
    world: &mut TaskProgressWorld,
    author: String,
    comment: String,
) -> Result<(), eyre::Report> {
    submit(world, &author, AddProgressUpdateRequest::new().with_comment(comment))
}

#[when(r#""{author}" submits an empty progress update"#)]
fn submits_empty(world: &mut TaskProgressWorld, author: String) -> Result<(), eyre::Report> {
    submit(world, &author, AddProgressUpdateRequest::new())
}
