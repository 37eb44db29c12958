//! Structured logging for the service.
use std::fmt;

use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Composes a bunyan JSON subscriber. `RUST_LOG` wins over `env_filter`.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync + 'static
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs the subscriber globally and routes `log` records through it.
/// Must be called only once.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<(), String> {
    LogTracer::init().map_err(|err| err.to_string())?;
    set_global_default(subscriber).map_err(|err| err.to_string())?;
    Ok(())
}

/// Email address that masks the local part when logged.
#[derive(Debug, Clone)]
pub struct SanitizedEmail(String);

impl SanitizedEmail {
    pub fn new(email: impl AsRef<str>) -> Self {
        Self(Self::sanitize(email.as_ref()))
    }

    fn sanitize(email: &str) -> String {
        match email.rsplit_once('@') {
            Some((local, domain)) => {
                let length = local.chars().count();
                let masked_local = if length <= 2 {
                    "*".repeat(length)
                } else {
                    let first: String = local.chars().take(1).collect();
                    format!("{}***", first)
                };
                format!("{}@{}", masked_local, domain)
            }
            None => "***@***".to_string(),
        }
    }
}

impl fmt::Display for SanitizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username that only shows its first and last character when logged.
#[derive(Debug, Clone)]
pub struct SanitizedUsername(String);

impl SanitizedUsername {
    pub fn new(username: impl AsRef<str>) -> Self {
        Self(Self::sanitize(username.as_ref()))
    }

    fn sanitize(username: &str) -> String {
        let chars: Vec<char> = username.chars().collect();
        match chars.as_slice() {
            [] => String::new(),
            [_] | [_, _] => "*".repeat(chars.len()),
            [first, _, _] | [first, _, _, _] => format!("{}***", first),
            [first, .., last] => format!("{}***{}", first, last),
        }
    }
}

impl fmt::Display for SanitizedUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
