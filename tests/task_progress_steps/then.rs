//! Then steps for task progress BDD scenarios.

use super::world::TaskProgressWorld;
use rstest_bdd_macros::then;
use taskboard::task::{
    domain::{ProgressState, TaskDomainError},
    services::TaskLedgerError,
};

/// Parses a progress-state token from a step argument.
fn parse_state(raw: &str) -> Result<ProgressState, eyre::Report> {
    ProgressState::try_from(raw)
        .map_err(|err| eyre::eyre!("invalid expected progress state in scenario: {err}"))
}

#[then(r#"the task progress state is "{state}""#)]
fn task_progress_state_is(world: &TaskProgressWorld, state: String) -> Result<(), eyre::Report> {
    let expected = parse_state(&state)?;
    let task = world.reload_task()?;
    let actual = task.task().progress_state();
    if actual != expected {
        return Err(eyre::eyre!("expected progress state {expected}, found {actual}"));
    }
    Ok(())
}

/// Checks the number of progress updates on the scenario task.
fn assert_update_count(world: &TaskProgressWorld, count: usize) -> Result<(), eyre::Report> {
    let task = world.reload_task()?;
    if task.updates.len() != count {
        return Err(eyre::eyre!(
            "expected {count} progress updates, found {}",
            task.updates.len()
        ));
    }
    Ok(())
}

#[then("the task has {count:usize} progress update")]
fn task_has_updates(world: &TaskProgressWorld, count: usize) -> Result<(), eyre::Report> {
    assert_update_count(world, count)
}

#[then("the task has no progress updates")]
fn task_has_no_updates(world: &TaskProgressWorld) -> Result<(), eyre::Report> {
    assert_update_count(world, 0)
}

#[then(r#"the latest update was written by "{author}""#)]
fn latest_update_author(world: &TaskProgressWorld, author: String) -> Result<(), eyre::Report> {
    let task = world.reload_task()?;
    let latest = task
        .updates
        .first()
        .ok_or_else(|| eyre::eyre!("task has no progress updates"))?;
    if latest.user_name != author {
        return Err(eyre::eyre!(
            "expected latest update by {author}, found {}",
            latest.user_name
        ));
    }
    Ok(())
}

#[then(r#"the latest update records progress state "{state}""#)]
fn latest_update_state(world: &TaskProgressWorld, state: String) -> Result<(), eyre::Report> {
    let expected = parse_state(&state)?;
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing progress update result"))?;
    let entry = result
        .as_ref()
        .map_err(|err| eyre::eyre!("progress update failed: {err}"))?;
    if entry.progress_state != expected {
        return Err(eyre::eyre!(
            "expected update state {expected}, found {}",
            entry.progress_state
        ));
    }
    Ok(())
}

#[then("the progress update is rejected as invalid")]
fn update_rejected(world: &TaskProgressWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing progress update result"))?;
    if !matches!(
        result,
        Err(TaskLedgerError::Domain(
            TaskDomainError::EmptyProgressUpdate | TaskDomainError::InvalidProgressState(_)
        ))
    ) {
        return Err(eyre::eyre!("expected a validation error, got {result:?}"));
    }
    Ok(())
}
