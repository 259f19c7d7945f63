//! Route registration and lookup.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::{debug, info};

use crate::binding::{self, BoundParameters, ParamSpec};
use crate::dispatch::{HandlerError, HandlerFn, HandlerFuture, HandlerResult};
use crate::parser::Method;
use crate::routing::error::{ResolveError, RouteError};
use crate::routing::template::{PathTemplate, PathVariables};
use crate::server::StatusCode;

/// A registered endpoint.
pub struct Route {
    /// The HTTP method to match.
    pub method: Method,
    /// The path template to match.
    pub template: PathTemplate,
    /// Parameters bound before the handler runs, in declaration order.
    pub params: Vec<ParamSpec>,
    /// Status used when the handler returns a bare entity.
    pub success_status: StatusCode,
    /// The handler function.
    pub handler: HandlerFn,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.template.pattern())
            .field("params", &self.params)
            .field("success_status", &self.success_status)
            .finish_non_exhaustive()
    }
}

/// A route selected for a request, with its variable bindings.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub variables: PathVariables,
}

/// Collects routes during startup.
///
/// Nothing can be looked up until [`seal`](RouteTableBuilder::seal) turns the
/// builder into a [`RouteTable`].
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method to match
    /// * `pattern` - The path pattern, e.g. `students/{id}`
    /// * `params` - The parameters the handler expects
    /// * `success_status` - Status for bare entity results
    /// * `handler` - The async handler function
    ///
    /// # Errors
    ///
    /// [`RouteError::MalformedTemplate`] if the pattern does not parse,
    /// [`RouteError::InvalidParameters`] if the parameter list does not fit
    /// the template, and [`RouteError::DuplicateRoute`] if a route with the
    /// same method and template shape already exists.
    pub fn register<F, Fut>(
        &mut self,
        method: Method,
        pattern: &str,
        params: Vec<ParamSpec>,
        success_status: StatusCode,
        handler: F,
    ) -> Result<&mut Self, RouteError>
    where
        F: Fn(BoundParameters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResult, HandlerError>> + Send + 'static,
    {
        let template = PathTemplate::parse(pattern)?;

        binding::validate(&params, &template).map_err(|reason| RouteError::InvalidParameters {
            method,
            pattern: pattern.to_string(),
            reason,
        })?;

        if self
            .routes
            .iter()
            .any(|route| route.method == method && route.template.same_shape(&template))
        {
            return Err(RouteError::DuplicateRoute {
                method,
                pattern: pattern.to_string(),
            });
        }

        let handler: HandlerFn = Arc::new(move |params: BoundParameters| -> HandlerFuture {
            Box::pin(handler(params))
        });

        debug!("Registered route {method} {pattern}");
        self.routes.push(Route {
            method,
            template,
            params,
            success_status,
            handler,
        });

        Ok(self)
    }

    /// Number of routes registered so far.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the table. No route can be added afterwards.
    pub fn seal(self) -> RouteTable {
        info!("Route table sealed with {} routes", self.routes.len());
        RouteTable { routes: self.routes }
    }
}

/// The immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for a request.
    ///
    /// Among routes of `method` whose template matches `path`, the one with
    /// the most literal segments wins; on a tie the earliest registration
    /// wins. When nothing matches under `method` but the path matches under
    /// other methods, the lookup fails with
    /// [`ResolveError::MethodNotAllowed`] listing them.
    pub fn resolve(&self, method: Method, path: &str) -> Result<RouteMatch<'_>, ResolveError> {
        let mut best: Option<RouteMatch<'_>> = None;
        for route in self.routes.iter().filter(|route| route.method == method) {
            let Some(variables) = route.template.matches(path) else {
                continue;
            };
            let more_specific = best.as_ref().map_or(true, |current| {
                route.template.literal_count() > current.route.template.literal_count()
            });
            if more_specific {
                best = Some(RouteMatch { route, variables });
            }
        }

        if let Some(found) = best {
            return Ok(found);
        }

        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            Err(ResolveError::RouteNotFound {
                method,
                path: path.to_string(),
            })
        } else {
            Err(ResolveError::MethodNotAllowed {
                method,
                path: path.to_string(),
                allowed,
            })
        }
    }

    /// Methods with at least one route matching `path`, in [`Method::ALL`] order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|method| {
                self.routes
                    .iter()
                    .any(|route| route.method == *method && route.template.matches(path).is_some())
            })
            .collect()
    }
}
