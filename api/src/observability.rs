use anyhow::Result;
use prometheus::Registry;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::metrics;

/// Prefix applied to every exported metric name
pub const METRICS_PREFIX: &str = "workout";

/// Log line format, picked with `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Fresh registry with every service metric registered under `prefix`
pub fn metrics_registry(prefix: &str) -> prometheus::Result<Registry> {
    let registry = Registry::new_custom(Some(prefix.into()), None)?;
    metrics::register_all(&registry)?;
    Ok(registry)
}

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    /// Install the global tracing subscriber and build the metrics registry
    pub fn init() -> Result<Self> {
        let registry = metrics_registry(METRICS_PREFIX)?;
        metrics::PROCESS_START_TIME.set(chrono::Utc::now().timestamp());

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "workout_api=debug,tower_http=debug".into());

        let format = LogFormat::from_env();
        let subscriber = tracing_subscriber::registry().with(env_filter);
        match format {
            LogFormat::Json => subscriber.with(fmt::layer().with_target(true).json()).try_init()?,
            LogFormat::Pretty => subscriber.with(fmt::layer()).try_init()?,
        }

        tracing::info!(?format, "Observability stack initialized (Prometheus + tracing)");
        Ok(Self { registry })
    }
}
