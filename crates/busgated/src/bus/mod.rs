//! Asynchronous access to the property bus.
//!
//! The bus is a directory of independently owned services, each exposing
//! typed properties on hierarchically named objects. Every call is issued
//! through [`PropertyBus::invoke`], which returns immediately; the reply
//! arrives later through a [`Completion`] that runs on the daemon's
//! [`EventLoop`].

mod call;
mod completion;
mod event_loop;
mod fixture;
pub mod names;
mod provider;
mod reply;
mod value;

use std::sync::Arc;

pub use self::call::{BusArg, BusCall};
pub use self::completion::{BusResult, Completion};
pub use self::event_loop::{EventLoop, LoopClosedError, LoopHandle};
pub use self::fixture::{BusSnapshot, FixtureBus, FixtureError, ServiceSnapshot};
pub use self::provider::{BusProvider, BusStartupError, FixtureBusProvider};
pub use self::reply::{BusError, BusReply};
pub use self::value::{InterfaceMap, ManagedObject, PropertyMap, PropertyValue, SubTreeEntry};

pub(crate) const BUS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bus");

/// Non-blocking call primitive to the property bus.
///
/// Implementations must eventually finish `done` exactly once, either with a
/// reply or with a [`BusError`], and must never run it before `invoke`
/// returns to its caller.
pub trait PropertyBus: Send + Sync {
    /// Issues `call` and arranges for `done` to receive its outcome.
    fn invoke(&self, call: BusCall, done: Completion);
}

/// Shared handle to a bus implementation.
pub type DynBus = Arc<dyn PropertyBus>;

impl<T> PropertyBus for Arc<T>
where
    T: PropertyBus + ?Sized,
{
    fn invoke(&self, call: BusCall, done: Completion) {
        (**self).invoke(call, done);
    }
}
