//! Given steps for task progress BDD scenarios.

use super::world::{TaskProgressWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::identity::services::CreateUserRequest;
use taskboard::task::services::CreateTaskRequest;

#[given(r#"a worker named "{name}""#)]
fn worker_named(world: &mut TaskProgressWorld, name: String) -> Result<(), eyre::Report> {
    let user = run_async(
        world
            .directory
            .create(CreateUserRequest::new(name.clone(), "trabajador")),
    )
    .wrap_err("create worker for progress scenario")?;
    world.users.insert(name, user);
    Ok(())
}

#[given(r#"a task titled "{title}" assigned to "{assignee}""#)]
fn task_assigned_to(
    world: &mut TaskProgressWorld,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let assignee_id = world.user(&assignee)?.id();
    let request = CreateTaskRequest::new(title).with_assignee(assignee_id);
    let task = run_async(world.ledger.create(request, assignee_id))
        .wrap_err("create task for progress scenario")?;
    world.task = Some(task);
    Ok(())
}
