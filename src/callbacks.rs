//! Callback traits for diff delivery and scan events
//!
//! The session issues no file transfers itself; it publishes diff results
//! through these callbacks and a collaborating transport reacts (fetch for
//! `Missing`, offer for `Additional`).

use crate::error::SyncError;
use crate::manifest::DiffResult;
use crate::session::ScanStats;

// Type aliases to keep the builder signatures readable
type DiffFn = dyn Fn(&DiffResult) + Send + Sync;
type ScanFn = dyn Fn(&ScanStats) + Send + Sync;
type ErrorFn = dyn Fn(&SyncError) + Send + Sync;

/// Event handler for one sync session
pub trait SyncCallbacks: Send + Sync {
	/// Called with the classification produced by each reconcile
	fn on_diff(&self, _diff: &DiffResult) {}

	/// Called when a rescan commits its manifest
	fn on_scan_complete(&self, _stats: &ScanStats) {}

	/// Called on non-fatal errors (e.g. a failed watcher-triggered rescan)
	fn on_error(&self, _error: &SyncError) {}
}

/// Default callback implementation that does nothing
pub struct NoCallbacks;

impl SyncCallbacks for NoCallbacks {}

/// Builder for callbacks using function closures
pub struct CallbackBuilder {
	diff: Option<Box<DiffFn>>,
	scan: Option<Box<ScanFn>>,
	error: Option<Box<ErrorFn>>,
}

impl CallbackBuilder {
	pub fn new() -> Self {
		CallbackBuilder { diff: None, scan: None, error: None }
	}

	/// Set diff callback
	pub fn on_diff<F>(mut self, callback: F) -> Self
	where
		F: Fn(&DiffResult) + Send + Sync + 'static,
	{
		self.diff = Some(Box::new(callback));
		self
	}

	/// Set scan completion callback
	pub fn on_scan_complete<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ScanStats) + Send + Sync + 'static,
	{
		self.scan = Some(Box::new(callback));
		self
	}

	/// Set error callback
	pub fn on_error<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncError) + Send + Sync + 'static,
	{
		self.error = Some(Box::new(callback));
		self
	}

	/// Build the callbacks handler
	pub fn build(self) -> Box<dyn SyncCallbacks> {
		Box::new(CompositeCallbacks { diff: self.diff, scan: self.scan, error: self.error })
	}
}

impl Default for CallbackBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Internal composite callbacks implementation
struct CompositeCallbacks {
	diff: Option<Box<DiffFn>>,
	scan: Option<Box<ScanFn>>,
	error: Option<Box<ErrorFn>>,
}

impl SyncCallbacks for CompositeCallbacks {
	fn on_diff(&self, diff: &DiffResult) {
		if let Some(ref callback) = self.diff {
			callback(diff);
		}
	}

	fn on_scan_complete(&self, stats: &ScanStats) {
		if let Some(ref callback) = self.scan {
			callback(stats);
		}
	}

	fn on_error(&self, error: &SyncError) {
		if let Some(ref callback) = self.error {
			callback(error);
		}
	}
}

// vim: ts=4
