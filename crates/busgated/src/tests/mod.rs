//! Test suites for the busgate daemon.

mod dispatch_behaviour;
mod log_services;
mod process;
mod scope;
mod static_resources;
mod support;
