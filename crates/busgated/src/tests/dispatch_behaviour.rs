//! Behavioural tests for JSONL resource dispatch over a live listener.

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use busgate_config::{DiscoveryMode, SocketEndpoint};
use camino::Utf8Path;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

use super::support::{DEMO_FIXTURE, ManualBus};
use crate::bus::{DynBus, EventLoop, FixtureBus};
use crate::dispatch::DispatchConnectionHandler;
use crate::resources::ServiceContext;
use crate::transport::{ListenerHandle, SocketListener};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);
const SILENT_BUS_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Default)]
struct DispatchWorld {
    event_loop: Option<EventLoop>,
    listener: Option<ListenerHandle>,
    response: Option<Value>,
}

impl DispatchWorld {
    fn serve_demo_bus(&mut self, mode: DiscoveryMode) {
        let event_loop = EventLoop::start().expect("start event loop");
        let bus = FixtureBus::load(Utf8Path::new(DEMO_FIXTURE), event_loop.handle())
            .expect("load demo fixture");
        self.serve(event_loop, Arc::new(bus), mode, RESPONSE_TIMEOUT);
    }

    fn serve_silent_bus(&mut self) {
        let event_loop = EventLoop::start().expect("start event loop");
        let bus = Arc::new(ManualBus::default());
        self.serve(
            event_loop,
            bus,
            DiscoveryMode::DirectoryPrefixed,
            SILENT_BUS_TIMEOUT,
        );
    }

    fn serve(&mut self, event_loop: EventLoop, bus: DynBus, mode: DiscoveryMode, timeout: Duration) {
        let context = ServiceContext::new(bus, mode);
        let handler = Arc::new(DispatchConnectionHandler::new(
            context,
            event_loop.handle(),
            timeout,
        ));
        let listener = SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0))
            .expect("bind listener");
        self.listener = Some(listener.start(handler).expect("start listener"));
        self.event_loop = Some(event_loop);
    }

    fn port(&self) -> u16 {
        match self.listener.as_ref().map(ListenerHandle::endpoint) {
            Some(SocketEndpoint::Tcp { port, .. }) => *port,
            other => panic!("expected a TCP listener, found {other:?}"),
        }
    }

    fn send_line(&mut self, line: &str) {
        let mut stream = TcpStream::connect(("127.0.0.1", self.port())).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set read timeout");
        stream.write_all(line.as_bytes()).expect("write request");
        stream.write_all(b"\n").expect("write newline");
        stream.flush().expect("flush");

        let mut reader = BufReader::new(stream);
        let mut response = String::new();
        reader.read_line(&mut response).expect("read response");
        self.response = Some(serde_json::from_str(&response).expect("response is JSON"));
    }

    fn response(&self) -> &Value {
        self.response.as_ref().expect("a response was received")
    }

    fn body_field(&self, pointer: &str) -> Option<&Value> {
        self.response().pointer(&format!("/body/{pointer}"))
    }
}

impl Drop for DispatchWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.shutdown();
            let _ = handle.join();
        }
        if let Some(event_loop) = self.event_loop.take() {
            event_loop.shutdown();
        }
    }
}

#[fixture]
fn world() -> RefCell<DispatchWorld> {
    RefCell::new(DispatchWorld::default())
}

#[given("a busgate daemon serving the demo bus")]
fn given_demo_daemon(world: &RefCell<DispatchWorld>) {
    world
        .borrow_mut()
        .serve_demo_bus(DiscoveryMode::DirectoryPrefixed);
}

#[given("a busgate daemon serving the demo bus with index-filtered discovery")]
fn given_index_filtered_daemon(world: &RefCell<DispatchWorld>) {
    world.borrow_mut().serve_demo_bus(DiscoveryMode::IndexFiltered);
}

#[given("a busgate daemon whose bus never answers")]
fn given_silent_daemon(world: &RefCell<DispatchWorld>) {
    world.borrow_mut().serve_silent_bus();
}

#[when("the client sends a {method} request for \"{path}\"")]
fn when_request(world: &RefCell<DispatchWorld>, method: String, path: String) {
    let request = serde_json::json!({"method": method, "path": path});
    world.borrow_mut().send_line(&request.to_string());
}

#[when("the client sends the raw line \"{line}\"")]
fn when_raw_line(world: &RefCell<DispatchWorld>, line: String) {
    world.borrow_mut().send_line(&line);
}

#[then("the response status is {status}")]
fn then_status(world: &RefCell<DispatchWorld>, status: u64) {
    let world = world.borrow();
    assert_eq!(
        world.response().get("status").and_then(Value::as_u64),
        Some(status),
        "response: {}",
        world.response()
    );
}

#[then("the response field \"{field}\" is \"{expected}\"")]
fn then_field(world: &RefCell<DispatchWorld>, field: String, expected: String) {
    let world = world.borrow();
    assert_eq!(
        world.body_field(&field).and_then(Value::as_str),
        Some(expected.as_str()),
        "response: {}",
        world.response()
    );
}

#[then("the response field \"{field}\" is the number {expected}")]
fn then_number(world: &RefCell<DispatchWorld>, field: String, expected: i64) {
    let world = world.borrow();
    assert_eq!(
        world.body_field(&field).and_then(Value::as_i64),
        Some(expected),
        "response: {}",
        world.response()
    );
}

#[then("the response field \"{field}\" is false")]
fn then_false(world: &RefCell<DispatchWorld>, field: String) {
    let world = world.borrow();
    assert_eq!(
        world.body_field(&field).and_then(Value::as_bool),
        Some(false),
        "response: {}",
        world.response()
    );
}

#[then("the response lists {count} entries under \"{collection}\"")]
fn then_entries(world: &RefCell<DispatchWorld>, count: usize, collection: String) {
    let world = world.borrow();
    let entries = world
        .body_field(&collection)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    assert_eq!(entries, count, "response: {}", world.response());
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 0)]
fn thermal_readings(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 1)]
fn power_readings(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 2)]
fn index_filtered_unknown_chassis(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 3)]
fn computer_system(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 4)]
fn manager_firmware(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 5)]
fn simple_storage(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 6)]
fn unknown_path(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 7)]
fn write_method(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 8)]
fn malformed_line(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 9)]
fn silent_bus_times_out(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 10)]
fn simple_storage_collection(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 11)]
fn log_entries(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 12)]
fn log_entry(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 13)]
fn clear_log(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}

#[scenario(path = "tests/features/resource_dispatch.feature", index = 14)]
fn network_protocol(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}
