//! Catalog of the Anymate remote operations, expressed over the one generic call path.
//!
//! Each [`Operation`] knows its HTTP method and its path below the tenant's `/api` root. The
//! typed helpers on [`Session`] pair an operation with a payload model and a response model;
//! the generic variants accept any `Serialize` payload or `DeserializeOwned` response for
//! callers that carry their own shapes.

pub mod models;

pub use models::*;

// self
use crate::{
	_prelude::*,
	http::{SessionHttpClient, TransportErrorMapper},
	session::{Method, Session},
};

/// One remote operation together with the process key it applies to, when it takes one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation<'a> {
	/// Starts a run for the process or returns the one in progress.
	StartOrGetRun(&'a str),
	/// Asks whether the process may run now.
	OkToRun(&'a str),
	/// Fetches the process rules (also known as variables).
	GetRules(&'a str),
	/// Takes the next queued task of the process.
	TakeNext(&'a str),
	/// Creates one task.
	CreateTask(&'a str),
	/// Creates a batch of tasks.
	CreateTasks(&'a str),
	/// Creates one task and takes it immediately.
	CreateAndTakeTask(&'a str),
	/// Updates the fields of an existing task.
	UpdateTask,
	/// Closes a run.
	FinishRun,
	/// Reports that a whole process failed.
	Failure,
	/// Moves a task to the error state.
	Error,
	/// Puts a task back in the queue.
	Retry,
	/// Hands a task over to manual processing.
	Manual,
	/// Marks a task as solved.
	Solved,
}
impl Operation<'_> {
	/// Returns the operation name as it appears in the URL.
	pub const fn name(&self) -> &'static str {
		match self {
			Operation::StartOrGetRun(_) => "StartOrGetRun",
			Operation::OkToRun(_) => "OkToRun",
			Operation::GetRules(_) => "GetRules",
			Operation::TakeNext(_) => "TakeNext",
			Operation::CreateTask(_) => "CreateTask",
			Operation::CreateTasks(_) => "CreateTasks",
			Operation::CreateAndTakeTask(_) => "CreateAndTakeTask",
			Operation::UpdateTask => "UpdateTask",
			Operation::FinishRun => "FinishRun",
			Operation::Failure => "Failure",
			Operation::Error => "Error",
			Operation::Retry => "Retry",
			Operation::Manual => "Manual",
			Operation::Solved => "Solved",
		}
	}

	/// Returns the process key carried by keyed operations.
	pub const fn process_key(&self) -> Option<&str> {
		match *self {
			Operation::StartOrGetRun(key)
			| Operation::OkToRun(key)
			| Operation::GetRules(key)
			| Operation::TakeNext(key)
			| Operation::CreateTask(key)
			| Operation::CreateTasks(key)
			| Operation::CreateAndTakeTask(key) => Some(key),
			_ => None,
		}
	}

	/// Read operations use `GET`; everything else posts a JSON payload.
	pub fn method(&self) -> Method {
		match self {
			Operation::StartOrGetRun(_)
			| Operation::OkToRun(_)
			| Operation::GetRules(_)
			| Operation::TakeNext(_) => Method::GET,
			_ => Method::POST,
		}
	}

	/// Returns the path below `/api`, e.g. `/TakeNext/proc1` or `/Failure/`.
	pub fn path(&self) -> String {
		match self.process_key() {
			Some(key) => format!("/{}/{}", self.name(), key.trim()),
			None => format!("/{}/", self.name()),
		}
	}
}
impl Display for Operation<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.path())
	}
}

impl<C, M> Session<C, M>
where
	C: ?Sized + SessionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Invokes `operation` with an optional JSON payload and decodes the response into `R`.
	pub async fn invoke<P, R>(&self, operation: Operation<'_>, payload: Option<&P>) -> Result<R>
	where
		P: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.call(operation.method(), &operation.path(), payload).await
	}

	/// Invokes a payload-less read operation.
	pub async fn fetch<R>(&self, operation: Operation<'_>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.invoke::<(), R>(operation, None).await
	}

	/// Starts a run for `process_key` or returns the one in progress.
	pub async fn start_or_get_run(&self, process_key: &str) -> Result<RunResponse> {
		self.fetch(Operation::StartOrGetRun(process_key)).await
	}

	/// Asks whether `process_key` may run now.
	pub async fn ok_to_run(&self, process_key: &str) -> Result<OkToRun> {
		self.fetch(Operation::OkToRun(process_key)).await
	}

	/// Fetches the rules of `process_key` into a caller-defined shape.
	pub async fn get_rules<R>(&self, process_key: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.fetch(Operation::GetRules(process_key)).await
	}

	/// Older name of [`Session::get_rules`]; both read `/GetRules/{process_key}`.
	pub async fn get_variables<R>(&self, process_key: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.get_rules(process_key).await
	}

	/// Takes the next task of `process_key`; the server answers `null` when the queue is empty.
	pub async fn take_next<R>(&self, process_key: &str) -> Result<Option<R>>
	where
		R: DeserializeOwned,
	{
		self.fetch(Operation::TakeNext(process_key)).await
	}

	/// Creates one task from a caller-defined payload.
	pub async fn create_task<T>(&self, process_key: &str, task: &T) -> Result<CreateTaskResponse>
	where
		T: ?Sized + Serialize,
	{
		self.invoke(Operation::CreateTask(process_key), Some(task)).await
	}

	/// Creates a batch of tasks in one call.
	pub async fn create_tasks<T>(
		&self,
		process_key: &str,
		tasks: &[T],
	) -> Result<CreateTasksResponse>
	where
		T: Serialize,
	{
		self.invoke(Operation::CreateTasks(process_key), Some(tasks)).await
	}

	/// Creates one task and takes it, returning the taken task.
	pub async fn create_and_take_task<T, R>(&self, process_key: &str, task: &T) -> Result<R>
	where
		T: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.invoke(Operation::CreateAndTakeTask(process_key), Some(task)).await
	}

	/// Updates an existing task; the payload must carry its `TaskId`.
	pub async fn update_task<T>(&self, update: &T) -> Result<ApiResponse>
	where
		T: ?Sized + Serialize,
	{
		self.invoke(Operation::UpdateTask, Some(update)).await
	}

	/// Closes a run.
	pub async fn finish_run(&self, finish: &FinishRun) -> Result<ApiResponse> {
		self.invoke(Operation::FinishRun, Some(finish)).await
	}

	/// Reports that a whole process failed.
	pub async fn failure(&self, failure: &ProcessFailure) -> Result<ApiResponse> {
		self.invoke(Operation::Failure, Some(failure)).await
	}

	/// Moves a task to the error state.
	pub async fn error(&self, action: &TaskAction) -> Result<ApiResponse> {
		self.invoke(Operation::Error, Some(action)).await
	}

	/// Puts a task back in the queue, optionally deferred.
	pub async fn retry(&self, action: &RetryTaskAction) -> Result<ApiResponse> {
		self.invoke(Operation::Retry, Some(action)).await
	}

	/// Hands a task over to manual processing.
	pub async fn manual(&self, action: &TaskAction) -> Result<ApiResponse> {
		self.invoke(Operation::Manual, Some(action)).await
	}

	/// Marks a task as solved.
	pub async fn solved(&self, action: &TaskAction) -> Result<ApiResponse> {
		self.invoke(Operation::Solved, Some(action)).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keyed_operations_are_reads_or_creations() {
		assert_eq!(Operation::StartOrGetRun("proc1").path(), "/StartOrGetRun/proc1");
		assert_eq!(Operation::StartOrGetRun("proc1").method(), Method::GET);
		assert_eq!(Operation::TakeNext(" proc1 ").path(), "/TakeNext/proc1");
		assert_eq!(Operation::CreateTasks("proc1").method(), Method::POST);
		assert_eq!(Operation::CreateAndTakeTask("p").process_key(), Some("p"));
	}

	#[test]
	fn transitions_post_to_trailing_slash_paths() {
		for (operation, path) in [
			(Operation::UpdateTask, "/UpdateTask/"),
			(Operation::FinishRun, "/FinishRun/"),
			(Operation::Failure, "/Failure/"),
			(Operation::Error, "/Error/"),
			(Operation::Retry, "/Retry/"),
			(Operation::Manual, "/Manual/"),
			(Operation::Solved, "/Solved/"),
		] {
			assert_eq!(operation.path(), path);
			assert_eq!(operation.method(), Method::POST);
			assert_eq!(operation.process_key(), None);
		}

		assert_eq!(Operation::Failure.to_string(), "/Failure/");
	}
}
