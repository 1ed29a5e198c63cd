use std::time::Instant;

use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use tracing::{error, info, warn};

#[derive(Default)]
pub struct Tracing;

pub struct TracingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let start = Instant::now();

        match self.inner.call(req).await {
            Ok(response) => {
                let response = response.into_response();
                let status = response.status().as_u16();
                let latency_ms = start.elapsed().as_millis();
                match status {
                    500.. => error!(%method, path, status, latency_ms, "request completed"),
                    400..=499 => warn!(%method, path, status, latency_ms, "request completed"),
                    _ => info!(%method, path, status, latency_ms, "request completed"),
                }
                Ok(response)
            }
            Err(error) => {
                warn!(%method, path, error = %error, "request failed");
                Err(error)
            }
        }
    }
}
