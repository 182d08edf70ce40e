//! One-shot timeouts tied to the lifetime of the view that started them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use leptos::prelude::*;
use log::warn;

/// Handles a view is still waiting on. Once closed, newly tracked handles
/// are handed straight back so the caller cancels them.
#[derive(Debug)]
pub struct Pending<H> {
	inner: Arc<Mutex<(bool, Vec<H>)>>,
}

impl<H> Clone for Pending<H> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<H> Default for Pending<H> {
	fn default() -> Self {
		Self {
			inner: Arc::new(Mutex::new((false, Vec::new()))),
		}
	}
}

impl<H> Pending<H> {
	/// Remember `handle`; returns it back when the owner already closed.
	pub fn track(&self, handle: H) -> Option<H> {
		match self.inner.lock() {
			Ok(mut guard) if !guard.0 => {
				guard.1.push(handle);
				None
			}
			_ => Some(handle),
		}
	}

	/// Close and return everything still tracked.
	pub fn close(&self) -> Vec<H> {
		match self.inner.lock() {
			Ok(mut guard) => {
				guard.0 = true;
				std::mem::take(&mut guard.1)
			}
			Err(_) => Vec::new(),
		}
	}
}

/// Timeouts owned by the current component; all are cleared when it unmounts.
/// Create it while the component body runs so the cleanup is registered.
#[derive(Clone, Copy, Debug)]
pub struct ViewTimers(StoredValue<Pending<TimeoutHandle>>);

impl ViewTimers {
	pub fn new() -> Self {
		let pending: Pending<TimeoutHandle> = Pending::default();
		let on_unmount = pending.clone();
		on_cleanup(move || {
			for handle in on_unmount.close() {
				handle.clear();
			}
		});
		Self(StoredValue::new(pending))
	}

	/// Run `cb` after `delay` unless the view is gone by then.
	pub fn after(&self, cb: impl FnOnce() + 'static, delay: Duration) {
		let handle = match set_timeout_with_handle(cb, delay) {
			Ok(handle) => handle,
			Err(e) => {
				warn!("could not schedule timeout: {e:?}");
				return;
			}
		};
		let late = self
			.0
			.try_with_value(|pending| pending.track(handle))
			.unwrap_or(Some(handle));
		if let Some(late) = late {
			late.clear();
		}
	}
}

impl Default for ViewTimers {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn close_returns_every_tracked_handle() {
		let pending = Pending::default();
		assert_eq!(pending.track(1), None);
		assert_eq!(pending.clone().track(2), None);

		assert_eq!(pending.close(), vec![1, 2]);
		assert!(pending.close().is_empty());
		assert_eq!(pending.track(3), Some(3));
	}

	#[test]
	fn handles_after_close_come_back() {
		let pending = Pending::default();
		pending.close();
		assert_eq!(pending.track(7), Some(7));
		assert!(pending.close().is_empty());
	}
}
