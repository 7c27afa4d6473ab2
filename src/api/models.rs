//! Wire models of the Anymate API.
//!
//! The service speaks PascalCase JSON. Response models default every field and keep unknown
//! ones in `extra`, so newer server versions do not break decoding.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Generic acknowledgement returned by state-transition operations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ApiResponse {
	/// Whether the server accepted the operation.
	pub succeeded: bool,
	/// Human-readable detail supplied by the server.
	pub message: Option<String>,
	/// Fields this crate does not model.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Answer of `StartOrGetRun`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RunResponse {
	/// Identifier of the started or resumed run.
	pub run_id: i64,
	/// Fields this crate does not model.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Answer of `OkToRun`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OkToRun {
	/// Whether the process is allowed to run now.
	pub gate_open: bool,
	/// Human-readable detail supplied by the server.
	pub message: Option<String>,
	/// Fields this crate does not model.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Answer of `CreateTask`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateTaskResponse {
	/// Whether the task was created.
	pub succeeded: bool,
	/// Human-readable detail supplied by the server.
	pub message: Option<String>,
	/// Identifier of the new task.
	pub task_id: i64,
	/// Fields this crate does not model.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Answer of `CreateTasks`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CreateTasksResponse {
	/// Whether the batch was created.
	pub succeeded: bool,
	/// Human-readable detail supplied by the server.
	pub message: Option<String>,
	/// Identifiers of the new tasks, in submission order.
	pub task_ids: Vec<i64>,
	/// Fields this crate does not model.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Payload of the `Error`, `Manual`, and `Solved` transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskAction {
	/// Task being transitioned.
	pub task_id: i64,
	/// Why the task is being transitioned.
	pub reason: String,
	/// Note attached to the task.
	#[serde(default)]
	pub comment: String,
	/// Replaces the seconds-saved figure recorded for the task.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_seconds_saved: Option<i32>,
	/// Replaces the entries figure recorded for the task.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_entries: Option<i32>,
}
impl TaskAction {
	/// Creates an action for `task_id` with the given reason.
	pub fn new(task_id: i64, reason: impl Into<String>) -> Self {
		Self { task_id, reason: reason.into(), ..Default::default() }
	}

	/// Attaches a note to the task.
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = comment.into();

		self
	}

	/// Overrides the reported seconds saved and entries.
	pub fn with_overwrites(mut self, seconds_saved: Option<i32>, entries: Option<i32>) -> Self {
		self.overwrite_seconds_saved = seconds_saved;
		self.overwrite_entries = entries;

		self
	}
}

/// Payload of the `Retry` transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetryTaskAction {
	/// Task being retried.
	pub task_id: i64,
	/// Why the task is retried.
	pub reason: String,
	/// Note attached to the task.
	#[serde(default)]
	pub comment: String,
	/// When the task becomes eligible again; immediately when absent.
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub activation_date: Option<OffsetDateTime>,
	/// Replaces the seconds-saved figure recorded for the task.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_seconds_saved: Option<i32>,
	/// Replaces the entries figure recorded for the task.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_entries: Option<i32>,
}
impl RetryTaskAction {
	/// Creates a retry for `task_id` with the given reason.
	pub fn new(task_id: i64, reason: impl Into<String>) -> Self {
		Self { task_id, reason: reason.into(), ..Default::default() }
	}

	/// Attaches a note to the task.
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = comment.into();

		self
	}

	/// Defers the retry until `activation_date`.
	pub fn with_activation_date(mut self, activation_date: OffsetDateTime) -> Self {
		self.activation_date = Some(activation_date);

		self
	}
}

/// Payload of `FinishRun`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinishRun {
	/// Run being closed.
	pub run_id: i64,
	/// Replaces the seconds-saved figure recorded for the run.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_seconds_saved: Option<i32>,
	/// Replaces the entries figure recorded for the run.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub overwrite_entries: Option<i32>,
}
impl FinishRun {
	/// Closes `run_id` with the server-computed figures.
	pub fn new(run_id: i64) -> Self {
		Self { run_id, ..Default::default() }
	}
}

/// Payload of `Failure`, reporting that a whole process failed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessFailure {
	/// Process that failed.
	pub process_key: String,
	/// Failure description.
	pub message: String,
}
impl ProcessFailure {
	/// Reports `message` against `process_key`.
	pub fn new(process_key: impl Into<String>, message: impl Into<String>) -> Self {
		Self { process_key: process_key.into(), message: message.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn task_actions_serialize_pascal_case_without_empty_overrides() {
		let action = TaskAction::new(42, "Timed out").with_comment("checked");

		assert_eq!(
			serde_json::to_value(&action).expect("Action should serialize."),
			serde_json::json!({ "TaskId": 42, "Reason": "Timed out", "Comment": "checked" })
		);

		let retry = RetryTaskAction::new(7, "Busy").with_activation_date(
			OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("Valid timestamp."),
		);
		let value = serde_json::to_value(&retry).expect("Retry should serialize.");

		assert_eq!(value["ActivationDate"], "2023-11-14T22:13:20Z");
		assert!(value.get("OverwriteEntries").is_none());
	}

	#[test]
	fn responses_tolerate_missing_and_unknown_fields() {
		let response: CreateTasksResponse = serde_json::from_value(serde_json::json!({
			"Succeeded": true,
			"TaskIds": [1, 2],
			"Batch": "b-1"
		}))
		.expect("Response should decode.");

		assert!(response.succeeded);
		assert_eq!(response.task_ids, vec![1, 2]);
		assert_eq!(response.message, None);
		assert_eq!(response.extra["Batch"], "b-1");

		let run: RunResponse = serde_json::from_str("{}").expect("Empty object should decode.");

		assert_eq!(run.run_id, 0);
	}
}
