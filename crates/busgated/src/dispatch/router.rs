//! Path template routing.
//!
//! Templates are slash-separated literals with `{}` placeholders; each
//! placeholder captures one non-empty path segment. Empty segments are
//! ignored on both sides, so trailing and doubled slashes resolve like the
//! canonical path. Reads answer `GET` and `HEAD`; actions answer `POST`.

use tracing::debug;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::ResourceRequest;
use crate::resources::{self, ResourceHandler};

const PLACEHOLDER: &str = "{}";

/// Successful routing result.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub template: &'static str,
    pub handler: ResourceHandler,
    /// Captured placeholder segments, in template order.
    pub params: Vec<String>,
    /// `HEAD` requests keep the status but drop the body.
    pub head: bool,
}

/// Methods a route answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    Read,
    Action,
}

impl RouteKind {
    /// Kind addressed by `method`, plus whether the body is dropped.
    fn for_method(method: &str) -> Option<(Self, bool)> {
        if method.eq_ignore_ascii_case("GET") {
            Some((Self::Read, false))
        } else if method.eq_ignore_ascii_case("HEAD") {
            Some((Self::Read, true))
        } else if method.eq_ignore_ascii_case("POST") {
            Some((Self::Action, false))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
struct Route {
    template: &'static str,
    segments: Vec<&'static str>,
    kind: RouteKind,
    handler: ResourceHandler,
}

impl Route {
    fn new(template: &'static str, kind: RouteKind, handler: ResourceHandler) -> Self {
        Self {
            template,
            segments: segments(template).collect(),
            kind,
            handler,
        }
    }

    fn capture(&self, path: &str) -> Option<Vec<String>> {
        let mut params = Vec::new();
        let mut candidate = segments(path);
        for expected in &self.segments {
            let actual = candidate.next()?;
            if *expected == PLACEHOLDER {
                params.push(actual.to_owned());
            } else if *expected != actual {
                return None;
            }
        }
        candidate.next().is_none().then_some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Maps request paths to resource handlers.
#[derive(Debug, Clone, Default)]
pub struct ResourceRouter {
    routes: Vec<Route>,
}

impl ResourceRouter {
    /// Router without routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router serving every resource this daemon implements.
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::new()
            .with_route("/redfish/v1", resources::service_root)
            .with_route("/redfish/v1/Chassis", resources::chassis_collection)
            .with_route("/redfish/v1/Chassis/{}/Thermal", resources::thermal)
            .with_route("/redfish/v1/Chassis/{}/Power", resources::power)
            .with_route("/redfish/v1/Systems", resources::systems_collection)
            .with_route("/redfish/v1/Systems/{}", resources::computer_system)
            .with_route(
                "/redfish/v1/Systems/{}/SimpleStorage",
                resources::simple_storage_collection,
            )
            .with_route(
                "/redfish/v1/Systems/{}/SimpleStorage/{}",
                resources::simple_storage,
            )
            .with_route(
                "/redfish/v1/Systems/{}/Processors",
                resources::processor_collection,
            )
            .with_route(
                "/redfish/v1/Systems/{}/EthernetInterfaces",
                resources::system_ethernet_interfaces,
            )
            .with_route(
                "/redfish/v1/Systems/{}/LogServices",
                resources::log_service_collection,
            )
            .with_route(
                "/redfish/v1/Systems/{}/LogServices/{}",
                resources::log_service,
            )
            .with_route(
                "/redfish/v1/Systems/{}/LogServices/{}/Entries",
                resources::log_entry_collection,
            )
            .with_route(
                "/redfish/v1/Systems/{}/LogServices/{}/Entries/{}",
                resources::log_entry,
            )
            .with_action(
                "/redfish/v1/Systems/{}/LogServices/{}/Actions/LogService.Reset",
                resources::clear_log,
            )
            .with_route("/redfish/v1/Managers", resources::manager_collection)
            .with_route("/redfish/v1/Managers/{}", resources::manager)
            .with_route(
                "/redfish/v1/Managers/{}/NetworkProtocol",
                resources::network_protocol,
            )
            .with_route(
                "/redfish/v1/Managers/{}/EthernetInterfaces",
                resources::manager_ethernet_interfaces,
            )
    }

    /// Adds a read route (`GET`, `HEAD`); earlier routes win when templates
    /// overlap.
    #[must_use]
    pub fn with_route(mut self, template: &'static str, handler: ResourceHandler) -> Self {
        self.routes.push(Route::new(template, RouteKind::Read, handler));
        self
    }

    /// Adds an action route answering `POST`.
    #[must_use]
    pub fn with_action(mut self, template: &'static str, handler: ResourceHandler) -> Self {
        self.routes.push(Route::new(template, RouteKind::Action, handler));
        self
    }

    /// Resolves `request` to a handler.
    ///
    /// Unknown paths fail with 404; known paths that no route serves for
    /// the request's method fail with 405.
    pub fn route(&self, request: &ResourceRequest) -> Result<RouteMatch, DispatchError> {
        let path = request.path();
        let method = request.method();
        let wanted = RouteKind::for_method(method);

        let mut path_known = false;
        let mut matched = None;
        for route in &self.routes {
            let Some(params) = route.capture(path) else {
                continue;
            };
            path_known = true;
            if let Some((_, head)) = wanted.filter(|(kind, _)| *kind == route.kind) {
                matched = Some((route, params, head));
                break;
            }
        }

        let Some((route, params, head)) = matched else {
            if path_known {
                return Err(DispatchError::method_not_allowed(method, path));
            }
            debug!(target: DISPATCH_TARGET, path, "no route");
            return Err(DispatchError::not_found(path));
        };

        debug!(
            target: DISPATCH_TARGET,
            template = route.template,
            ?params,
            "routed request"
        );
        Ok(RouteMatch {
            template: route.template,
            handler: route.handler,
            params,
            head,
        })
    }
}
