use std::path::Path;

use config::ConfigError;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Runtime environment for the service.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Server {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub api_port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub debug_port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Telemetry {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub server: Server,
    pub telemetry: Telemetry,
}

impl Configuration {
    /// Reads `configuration/base.yaml` and the environment file from the
    /// current directory, then applies `<KEY>_` prefixed overrides.
    pub fn parse(key: &str) -> Result<Configuration, ConfigError> {
        let base_path = std::env::current_dir()
            .map_err(|err| ConfigError::Message(format!("no current directory: {}", err)))?;
        Self::parse_from(key, &base_path.join("configuration"))
    }

    pub fn parse_from(key: &str, configuration_directory: &Path) -> Result<Configuration, ConfigError> {
        let key = key.to_uppercase();

        // Detect the runtime environment, if none is provided use local.
        let environment: Environment = std::env::var(&key)
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;
        let environment_filename = format!("{}.yaml", environment.as_str());

        let conf = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            // Add in settings from environment variables (with a prefix of key and '__' as separator)
            // E.g. `<key>_SERVER__API_PORT=5001 would set `Configuration.server.api_port`
            .add_source(
                config::Environment::with_prefix(&key)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        conf.try_deserialize::<Configuration>()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn environment_names_are_case_insensitive() {
        assert_eq!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        );
        assert_eq!(Environment::try_from("local".to_string()), Ok(Environment::Local));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn it_reads_the_shipped_configuration() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration");
        // A key nobody sets, so the local environment and no overrides apply.
        let conf = Configuration::parse_from("svc_configuration_test", &directory)
            .expect("Should be able to parse configuration");

        assert_eq!(conf.server.host, "127.0.0.1");
        assert_eq!(conf.server.api_port, 3000);
        assert_eq!(conf.server.debug_port, 4000);
        assert_eq!(conf.telemetry.level, "debug");
    }

    #[test]
    fn missing_files_are_reported() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("no-such-directory");
        assert!(Configuration::parse_from("svc_configuration_test", &directory).is_err());
    }
}
