//! Launch sequencing.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::bus::{BusProvider, FixtureBusProvider};
use crate::dispatch::DispatchConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the daemon with the production collaborators until a termination
/// signal arrives.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &FixtureBusProvider,
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
///
/// The listener stops accepting before the event loop drains, so every
/// accepted request still receives its response.
pub fn run_daemon_with<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    provider: &P,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError>
where
    P: BusProvider + ?Sized,
{
    let daemon = bootstrap_with(loader, reporter, provider)?;
    let config = daemon.config();
    info!(
        target: PROCESS_TARGET,
        listen = %config.listen(),
        "starting listener"
    );

    let listener = SocketListener::bind(config.listen())?;
    let handler = Arc::new(DispatchConnectionHandler::new(
        daemon.context().clone(),
        daemon.event_loop().handle(),
        config.response_timeout(),
    ));
    let listener_handle = listener.start(handler)?;
    daemon.reporter().serving(listener_handle.endpoint());

    let waited = shutdown.wait();
    listener_handle.shutdown();
    let joined = listener_handle.join();
    daemon.shutdown();
    waited?;
    joined?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
