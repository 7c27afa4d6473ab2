// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token exchanges and API dispatches.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	exchanges: AtomicU64,
	exchange_failures: AtomicU64,
	dispatches: AtomicU64,
	dispatch_failures: AtomicU64,
}
impl SessionMetrics {
	/// Returns the number of grant exchanges sent to the token endpoint.
	pub fn exchanges(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Returns the number of grant exchanges that failed.
	pub fn exchange_failures(&self) -> u64 {
		self.exchange_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of dispatches attempted, including those that never reached the API.
	pub fn dispatches(&self) -> u64 {
		self.dispatches.load(Ordering::Relaxed)
	}

	/// Returns the number of dispatches that failed.
	pub fn dispatch_failures(&self) -> u64 {
		self.dispatch_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_exchange(&self) {
		self.exchanges.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_exchange_failure(&self) {
		self.exchange_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_dispatch(&self) {
		self.dispatches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_dispatch_failure(&self) {
		self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
	}
}
