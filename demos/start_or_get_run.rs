//! Starts (or resumes) a run, works through the queue, and closes the run.
//!
//! Reads the tenant, secret, and worker account from `ANYMATE_TENANT`, `ANYMATE_SECRET`,
//! `ANYMATE_USERNAME`, and `ANYMATE_PASSWORD`, and the process key from the first argument.
//! Set `ANYMATE_API_URL` and `ANYMATE_AUTH_URL` to talk to an on-premises installation.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
use serde::Deserialize;
// self
use anymate_client::{
	api::{FinishRun, TaskAction},
	auth::Credentials,
	config::ClientConfig,
	session::ReqwestSession,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QueuedTask {
	task_id: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let process_key =
		env::args().nth(1).ok_or_else(|| eyre!("Usage: start_or_get_run <process-key>"))?;
	let credentials = Credentials::password(
		env::var("ANYMATE_TENANT")?,
		env::var("ANYMATE_SECRET")?,
		env::var("ANYMATE_USERNAME")?,
		env::var("ANYMATE_PASSWORD")?,
	);
	let config = match (env::var("ANYMATE_API_URL"), env::var("ANYMATE_AUTH_URL")) {
		(Ok(api), Ok(auth)) => ClientConfig::on_premises(&api, &auth)?,
		_ => ClientConfig::cloud(),
	};
	let session = ReqwestSession::new(credentials, config)?;

	if !session.ok_to_run(&process_key).await?.gate_open {
		println!("Process {process_key} is not allowed to run right now.");

		return Ok(());
	}

	let run = session.start_or_get_run(&process_key).await?;

	println!("Working in run {}.", run.run_id);

	while let Some(task) = session.take_next::<QueuedTask>(&process_key).await? {
		let action = TaskAction::new(task.task_id, "Processed by demo worker.");

		session.solved(&action).await?;

		println!("Solved task {}.", task.task_id);
	}

	let closed = session.finish_run(&FinishRun::new(run.run_id)).await?;

	println!("Run {} closed: {}.", run.run_id, closed.succeeded);
	println!(
		"Token exchanges: {}, dispatches: {}.",
		session.metrics.exchanges(),
		session.metrics.dispatches()
	);

	Ok(())
}
