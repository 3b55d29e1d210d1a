//! End-to-end launch: bootstrap, serve one request, shut down.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use busgate_config::SocketEndpoint;
use rstest::rstest;
use serde_json::Value;

use super::support::{FailingConfigLoader, HealthEvent, RecordingHealthReporter, TestConfigLoader};
use crate::bus::FixtureBusProvider;
use crate::process::{LaunchError, ShutdownError, ShutdownSignal, run_daemon_with};

/// Sends one request to the served endpoint, then lets shutdown proceed.
struct RequestThenStop {
    reporter: Arc<RecordingHealthReporter>,
    response: Mutex<Option<Value>>,
}

impl RequestThenStop {
    fn port(&self) -> u16 {
        let served = self.reporter.events().into_iter().find_map(|event| match event {
            HealthEvent::Serving(endpoint) => Some(endpoint),
            _ => None,
        });
        let endpoint: SocketEndpoint = served
            .expect("daemon reported its endpoint")
            .parse()
            .expect("endpoint parses");
        match endpoint {
            SocketEndpoint::Tcp { port, .. } => port,
            SocketEndpoint::Unix { .. } => panic!("expected a TCP endpoint"),
        }
    }
}

impl ShutdownSignal for RequestThenStop {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut stream = TcpStream::connect(("127.0.0.1", self.port())).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set read timeout");
        stream
            .write_all(b"{\"method\":\"GET\",\"path\":\"/redfish/v1/Chassis/1/Thermal\"}\n")
            .expect("write request");

        let mut line = String::new();
        BufReader::new(stream)
            .read_line(&mut line)
            .expect("read response");
        *self.response.lock().expect("response lock") =
            Some(serde_json::from_str(&line).expect("response is JSON"));
        Ok(())
    }
}

#[rstest]
fn serves_until_shutdown_then_stops() {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let shutdown = RequestThenStop {
        reporter: Arc::clone(&reporter),
        response: Mutex::new(None),
    };

    run_daemon_with(
        &TestConfigLoader::new(),
        reporter.clone(),
        &FixtureBusProvider,
        &shutdown,
    )
    .expect("daemon runs");

    let response = shutdown
        .response
        .lock()
        .expect("response lock")
        .take()
        .expect("request received a response");
    assert_eq!(response["status"], 200);
    assert_eq!(response["body"]["Temperatures"][0]["Name"], "cpu0_temp");

    let events = reporter.events();
    assert_eq!(events.first(), Some(&HealthEvent::BootstrapStarting));
    assert_eq!(events.last(), Some(&HealthEvent::Stopped));
}

#[rstest]
fn configuration_failures_abort_launch() {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let shutdown = RequestThenStop {
        reporter: Arc::clone(&reporter),
        response: Mutex::new(None),
    };

    let result = run_daemon_with(
        &FailingConfigLoader,
        reporter.clone(),
        &FixtureBusProvider,
        &shutdown,
    );

    assert!(matches!(result, Err(LaunchError::Bootstrap { .. })));
    assert!(
        !reporter
            .events()
            .iter()
            .any(|event| matches!(event, HealthEvent::Serving(_)))
    );
}
