//! Resolution operations with explicit preconditions.

use async_trait::async_trait;
use tracing::debug;

use rns_core::error::Result;
use rns_core::types::QueryState;

/// A read that runs only once its prerequisites are present.
///
/// `prepare` is the precondition: it checks the input and the active
/// network and returns everything the read needs, or `None` when the read
/// must not be dispatched. `run` only ever sees prepared input.
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    /// Raw caller input (typically user text).
    type Input: Clone + Send + Sync + 'static;
    /// Validated input bound to a network.
    type Prepared: Send + 'static;
    /// Result of the read.
    type Output: Clone + Send + Sync + 'static;

    /// Evaluates the precondition; `None` means disabled.
    fn prepare(&self, input: &Self::Input) -> Option<Self::Prepared>;

    /// Performs the read.
    async fn run(&self, prepared: Self::Prepared) -> Result<Self::Output>;

    /// Prepares and runs once, reporting `{data, is_loading, error}`.
    async fn read(&self, input: &Self::Input) -> QueryState<Self::Output> {
        match self.prepare(input) {
            Some(prepared) => QueryState::from_result(self.run(prepared).await),
            None => {
                debug!("Precondition not met, read disabled");
                QueryState::disabled()
            }
        }
    }
}
