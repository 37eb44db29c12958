use actix_web::{web, Scope};

pub mod account_handlers;
pub mod api;
pub mod debug_handlers;

pub fn api() -> Scope {
    web::scope("/api")
        .app_data(api::json_config())
        .service(account_handlers::scope())
}
