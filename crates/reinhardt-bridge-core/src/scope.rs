//! Request scope for the server-side store.
//!
//! Each request renders inside one scope, and every [`Bridge::set`] in that
//! render writes into the scope's [`BridgeStore`]. The store lives in a Tokio
//! task-local, so it follows the render future across worker threads and
//! concurrent requests never see each other's values.
//!
//! [`Bridge::set`]: crate::Bridge::set

use crate::error::{BridgeError, Result};
use crate::store::BridgeStore;
use std::cell::RefCell;
use std::future::Future;

tokio::task_local! {
	/// Store for the request currently being rendered.
	static BRIDGE_STORE: RefCell<BridgeStore>;
}

/// Runs `f` inside a fresh request scope.
///
/// Returns the future's output together with everything bridges stored while
/// it ran. When a scope is already active the future joins it instead, so
/// the request keeps a single store; the inner call then returns an empty
/// store and the values surface from the outermost scope.
pub async fn with_bridge_scope<F, T>(f: F) -> (T, BridgeStore)
where
	F: Future<Output = T>,
{
	if in_scope() {
		return (f.await, BridgeStore::new());
	}

	BRIDGE_STORE
		.scope(RefCell::new(BridgeStore::new()), async move {
			let output = f.await;
			let store = BRIDGE_STORE.with(|store| store.take());
			(output, store)
		})
		.await
}

/// Synchronous counterpart of [`with_bridge_scope`] for blocking render passes.
pub fn with_bridge_scope_sync<F, T>(f: F) -> (T, BridgeStore)
where
	F: FnOnce() -> T,
{
	if in_scope() {
		return (f(), BridgeStore::new());
	}

	BRIDGE_STORE.sync_scope(RefCell::new(BridgeStore::new()), || {
		let output = f();
		let store = BRIDGE_STORE.with(|store| store.take());
		(output, store)
	})
}

/// Gives `f` mutable access to the current request's store.
///
/// # Errors
///
/// Returns [`BridgeError::NoScope`] outside of a request scope.
pub fn with_store<R>(f: impl FnOnce(&mut BridgeStore) -> R) -> Result<R> {
	BRIDGE_STORE
		.try_with(|store| f(&mut store.borrow_mut()))
		.map_err(|_| BridgeError::NoScope)
}

/// Checks whether the current task runs inside a request scope.
pub fn in_scope() -> bool {
	BRIDGE_STORE.try_with(|_| ()).is_ok()
}
