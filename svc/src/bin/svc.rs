use svc::{
    application::{Application, ApplicationError},
    configuration::Configuration,
    telemetry,
};

#[actix_web::main]
async fn main() -> Result<(), ApplicationError> {
    let configuration = Configuration::parse("svc")?;

    let subscriber = telemetry::get_subscriber(
        "svc".into(),
        configuration.telemetry.level.clone(),
        std::io::stdout,
    );
    telemetry::init_subscriber(subscriber).map_err(ApplicationError::TelemetryError)?;

    let application = Application::build(configuration).await?;
    tracing::info!(
        api_port = application.api_port(),
        debug_port = application.debug_port(),
        "Serving"
    );
    application.serve().await
}
