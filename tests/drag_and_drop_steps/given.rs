//! Given steps for board drag and drop BDD scenarios.

use super::world::{BoardWorld, column};
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskboard::board::{
    domain::{Progress, Task, TaskDetails},
    ports::GatewayError,
};

#[given(r#"a task "{label}" in column "{status}" at position {position:i64}"#)]
fn task_on_board(
    world: &mut BoardWorld,
    label: String,
    status: String,
    position: i64,
) -> Result<(), eyre::Report> {
    let task = Task::new(world.project, TaskDetails::new(label.clone())?, &DefaultClock)
        .with_status(column(&status)?)
        .with_order_index(position);
    place(world, label, task)
}

#[given(
    r#"a task "{label}" in column "{status}" at position {position:i64} with progress {value:u8}"#
)]
fn partly_done_task_on_board(
    world: &mut BoardWorld,
    label: String,
    status: String,
    position: i64,
    value: u8,
) -> Result<(), eyre::Report> {
    let task = Task::new(world.project, TaskDetails::new(label.clone())?, &DefaultClock)
        .with_status(column(&status)?)
        .with_order_index(position)
        .with_progress(Progress::new(value)?);
    place(world, label, task)
}

fn place(world: &mut BoardWorld, label: String, task: Task) -> Result<(), eyre::Report> {
    world.gateway.seed([task.clone()])?;
    world
        .controller
        .store()
        .write(|store| store.insert(task.clone()))?;
    world.labels.insert(label, task.id());
    Ok(())
}

#[given("the remote store is unreachable")]
fn remote_store_unreachable(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world.gateway.set_failure(Some(GatewayError::transport(
        std::io::Error::other("simulated network error"),
    )))?;
    Ok(())
}
