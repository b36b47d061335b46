//! Tracing subscriber setup and per-request access logging.

use std::time::Instant;

use actix_service::Service;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};
use uuid::Uuid;

use crate::config::{LogFormat, LoggingConfig};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. `log` records
/// from the toolbox are bridged into tracing. The returned guard must be
/// held for the life of the process when file output is enabled.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match config.format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
    });

    let guard = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sitekit.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(guard)
}

/// Access log middleware body for `App::wrap_fn`.
///
/// Tags each request with a fresh id, echoed in `x-request-id`.
pub fn log_request<S, B>(
    req: ServiceRequest,
    srv: &S,
) -> impl Future<Output = Result<ServiceResponse<B>, actix_web::Error>> + use<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.path().to_string();
    let started = Instant::now();
    let fut = srv.call(req);

    async move {
        let mut res = fut.await?;
        let status = res.status().as_u16();
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if res.status().is_server_error() {
            tracing::error!(%request_id, %method, %path, status, latency_ms, "request failed");
        } else {
            tracing::info!(%request_id, %method, %path, status, latency_ms, "request");
        }
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            res.headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        Ok(res)
    }
}
