//! Shared Tokio runtime helper for integration tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Ensures a Tokio runtime is initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or if the slot
/// behaves unexpectedly.
pub fn ensure_runtime(runtime: &Slot<SharedRuntime>) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))
}

/// Ensures a Wiremock server is running in `server`.
pub fn ensure_server(runtime: &SharedRuntime, server: &Slot<MockServer>) {
    if server.with_ref(|_| ()).is_none() {
        server.set(runtime.block_on(MockServer::start()));
    }
}

/// Mounts `mock` on the server held in `server`.
///
/// # Errors
///
/// Returns an error when the server has not been started.
pub fn mount(
    runtime: &SharedRuntime,
    server: &Slot<MockServer>,
    mock: wiremock::Mock,
) -> Result<(), io::Error> {
    server
        .with_ref(|running| runtime.block_on(mock.mount(running)))
        .ok_or_else(|| io::Error::other("mock server not initialised"))
}
