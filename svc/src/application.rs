use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::header,
    web::{self, Data},
    App, HttpServer,
};
use futures::future;
use libsvc::domain::account::service::AccountService;
use std::{fmt::Display, net::TcpListener, sync::Arc};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::Configuration,
    rest::{self, api::not_found, debug_handlers},
    store::Store,
};

pub struct Application {
    api_port: u16,
    debug_port: u16,
    api_server: Server,
    debug_server: Server,
}

#[derive(Debug)]
pub enum ApplicationError {
    IoError(std::io::Error),
    ConfigError(config::ConfigError),
    TelemetryError(String),
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::IoError(err) => write!(f, "{}", err),
            ApplicationError::ConfigError(err) => write!(f, "{}", err),
            ApplicationError::TelemetryError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApplicationError {}

impl From<std::io::Error> for ApplicationError {
    fn from(value: std::io::Error) -> Self {
        ApplicationError::IoError(value)
    }
}

impl From<config::ConfigError> for ApplicationError {
    fn from(value: config::ConfigError) -> Self {
        ApplicationError::ConfigError(value)
    }
}

impl Application {
    /// Binds both listeners. A port of 0 picks a free one.
    pub async fn build(configuration: Configuration) -> Result<Self, ApplicationError> {
        let api_address = format_address(&configuration.server.host, configuration.server.api_port);
        let api_listener = TcpListener::bind(api_address)?;
        let api_port = api_listener.local_addr()?.port();
        let api_server = run_api_server(api_listener, prepare_store())?;

        let debug_address =
            format_address(&configuration.server.host, configuration.server.debug_port);
        let debug_listener = TcpListener::bind(debug_address)?;
        let debug_port = debug_listener.local_addr()?.port();
        let debug_server = run_debug_server(debug_listener)?;

        Ok(Self {
            api_port,
            debug_port,
            api_server,
            debug_server,
        })
    }

    pub fn api_port(&self) -> u16 {
        self.api_port
    }

    pub fn debug_port(&self) -> u16 {
        self.debug_port
    }

    pub async fn serve(self) -> Result<(), ApplicationError> {
        future::try_join(self.api_server, self.debug_server).await?;
        Ok(())
    }
}

fn format_address(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

fn run_api_server(listener: TcpListener, store: Store) -> Result<Server, ApplicationError> {
    let store = Data::new(store);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .send_wildcard()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT]);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(store.clone())
            .service(rest::api())
            .default_service(web::to(not_found))
    })
    .listen(listener)?
    .run();
    Ok(server)
}

fn run_debug_server(listener: TcpListener) -> Result<Server, ApplicationError> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(debug_handlers::api())
            .default_service(web::to(not_found))
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub fn prepare_store() -> Store {
    Store::new(Arc::new(AccountService::new()))
}
