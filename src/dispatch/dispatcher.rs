//! The match-bind-invoke-respond pipeline.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::binding;
use crate::dispatch::builder;
use crate::dispatch::error::DispatchError;
use crate::dispatch::request::IncomingRequest;
use crate::dispatch::result::HandlerResult;
use crate::routing::{Route, RouteTable};
use crate::server::HttpResponse;

/// Routes requests through a sealed [`RouteTable`].
///
/// Cloning is cheap: clones share the same table. The table is never written
/// after sealing, so any number of workers can call [`handle`](Self::handle)
/// concurrently.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Handle one request.
    ///
    /// Never fails: a request that cannot be routed, bound or served gets an
    /// error response (404, 405, 400 or 500) with an [`ErrorBody`](crate::dispatch::ErrorBody).
    pub async fn handle(&self, request: IncomingRequest) -> HttpResponse {
        let method = request.method;
        let path = request.path.clone();

        match self.dispatch(request).await {
            Ok(response) => {
                debug!("{method} {path} -> {}", response.status);
                response
            }
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    error!("{method} {path} -> {status}: {e}");
                } else {
                    warn!("{method} {path} -> {status}: {e}");
                }
                e.into_response()
            }
        }
    }

    /// Run the four phases, stopping at the first failure.
    pub async fn dispatch(&self, request: IncomingRequest) -> Result<HttpResponse, DispatchError> {
        let matched = self.table.resolve(request.method, &request.path)?;
        let route = matched.route;
        debug!(
            "{} {} matched {}",
            request.method,
            request.path,
            route.template.pattern()
        );

        let params = binding::bind(&route.params, &request, &matched.variables)?;
        let result = Self::invoke(route, params).await?;
        builder::build(result, route.success_status)
    }

    // The handler is called and polled on its own task, so a panic surfaces
    // as a JoinError instead of unwinding through the dispatcher.
    async fn invoke(route: &Route, params: binding::BoundParameters) -> Result<HandlerResult, DispatchError> {
        let pattern = route.template.pattern();
        let handler = Arc::clone(&route.handler);
        match tokio::spawn(async move { handler(params).await }).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                warn!("Handler for {} {pattern} failed: {e}", route.method);
                Err(DispatchError::HandlerFailure(e.to_string()))
            }
            Err(e) => {
                error!("Handler for {} {pattern} did not complete: {e}", route.method);
                Err(DispatchError::HandlerFailure(e.to_string()))
            }
        }
    }
}
