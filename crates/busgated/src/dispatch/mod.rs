//! JSONL request dispatch.
//!
//! A client sends one request line and receives one response line:
//!
//! ```json
//! {"method":"GET","path":"/redfish/v1/Chassis/1/Thermal","body":null}
//! ```
//!
//! ```json
//! {"status":200,"body":{"@odata.id":"/redfish/v1/Chassis/1/Thermal","Fans":[...]}}
//! ```
//!
//! The request is routed to a resource handler, which runs on the event
//! loop. The connection thread waits for the handler's scope to finalise,
//! bounded by the configured response timeout.

mod errors;
mod handler;
mod request;
mod response;
mod router;
mod sink;

pub use self::errors::DispatchError;
pub use self::handler::{DispatchConnectionHandler, MAX_REQUEST_BYTES};
pub use self::request::ResourceRequest;
pub use self::response::ResponseWriter;
pub use self::router::{ResourceRouter, RouteMatch};
pub use self::sink::ChannelSink;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
