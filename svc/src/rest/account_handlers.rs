use actix_web::{
    post,
    web::{self, Data, Json},
    HttpResponse, Scope,
};
use libsvc::domain::account::RegistrationRequest;

use crate::{
    rest::api::ApiError,
    store::Store,
    telemetry::{SanitizedEmail, SanitizedUsername},
};

/// Registers a new account. The body is parsed and validated before the
/// account logic runs; a valid request is answered with an empty 201.
#[post("/register")]
#[tracing::instrument(name = "register_account", skip(store, request), fields(username, email))]
pub async fn post_register(
    store: Data<Store>,
    request: Json<RegistrationRequest>,
) -> Result<HttpResponse, ApiError> {
    let registration = request.validate().map_err(|violations| {
        tracing::warn!(violations = violations.len(), "Rejected registration request");
        ApiError::from(violations)
    })?;

    let span = tracing::Span::current();
    span.record(
        "username",
        tracing::field::display(SanitizedUsername::new(registration.username())),
    );
    span.record(
        "email",
        tracing::field::display(SanitizedEmail::new(registration.email())),
    );

    store.account_logic.register(registration)?;

    tracing::info!("Registered account");
    Ok(HttpResponse::Created().finish())
}

pub fn scope() -> Scope {
    web::scope("/account").service(post_register)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use actix_web::{
        http::{header::ContentType, StatusCode},
        test, App,
    };
    use libsvc::domain::account::{
        logic::{AccountLogic, AccountLogicError},
        service::AccountService,
        Registration,
    };
    use serde_json::{json, Value};

    use crate::rest;

    use super::*;

    const ENDPOINT: &str = "/api/account/register";

    struct FailingLogic;

    impl AccountLogic for FailingLogic {
        fn register(&self, _registration: Registration) -> Result<(), AccountLogicError> {
            Err("storage unavailable".into())
        }
    }

    macro_rules! app {
        ($logic:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(Store::new(Arc::new($logic))))
                    .service(rest::api()),
            )
            .await
        };
    }

    fn valid_body() -> Value {
        json!({
            "firstName": "Ann",
            "lastName": "Lee",
            "username": "annlee",
            "email": "ann.lee@example.com",
            "password": "Str0ngPass!",
        })
    }

    async fn register(body: Value) -> (StatusCode, Value) {
        let app = app!(AccountService::new());
        let req = test::TestRequest::post()
            .uri(ENDPOINT)
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Should be a JSON body")
        };
        (status, body)
    }

    fn has_violation(body: &Value, field: &str, rule: &str) -> bool {
        body["violations"]
            .as_array()
            .map(|violations| {
                violations
                    .iter()
                    .any(|v| v["field"] == field && v["rule"] == rule)
            })
            .unwrap_or(false)
    }

    #[actix_web::test]
    async fn it_registers_a_valid_request_with_an_empty_created_response() {
        let app = app!(AccountService::new());
        let req = test::TestRequest::post()
            .uri(ENDPOINT)
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test::read_body(resp).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn blank_fields_are_rejected() {
        for field in ["firstName", "lastName", "username", "email", "password"] {
            for blank in [json!(""), json!("   "), Value::Null] {
                let mut body = valid_body();
                body[field] = blank;
                let (status, body) = register(body).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{}", field);
                assert_eq!(body["error"], "validation failed");
                assert!(has_violation(&body, field, "required"), "{}", field);
            }
        }
    }

    #[actix_web::test]
    async fn missing_fields_are_rejected() {
        let mut body = valid_body();
        body.as_object_mut()
            .expect("Should be an object")
            .remove("username");
        let (status, body) = register(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(has_violation(&body, "username", "required"));
    }

    #[actix_web::test]
    async fn length_boundaries_are_inclusive() {
        let cases = [
            ("firstName", "x".repeat(50), true),
            ("firstName", "x".repeat(51), false),
            ("lastName", "x".repeat(1), true),
            ("lastName", "x".repeat(51), false),
            ("username", "x".repeat(50), true),
            ("username", "x".repeat(51), false),
            ("password", "x".repeat(8), true),
            ("password", "x".repeat(7), false),
            ("password", "x".repeat(100), true),
            ("password", "x".repeat(101), false),
            ("email", "a@b.c".to_string(), true),
            ("email", "a@bc".to_string(), false),
        ];

        for (field, value, accepted) in cases {
            let mut body = valid_body();
            body[field] = json!(value);
            let (status, body) = register(body).await;
            if accepted {
                assert_eq!(status, StatusCode::CREATED, "{} of {}", field, value.len());
            } else {
                assert_eq!(status, StatusCode::BAD_REQUEST, "{} of {}", field, value.len());
                assert!(
                    has_violation(&body, field, "too_short") || has_violation(&body, field, "too_long"),
                    "{} of {}",
                    field,
                    value.len()
                );
            }
        }
    }

    #[actix_web::test]
    async fn length_violations_carry_their_limit() {
        let mut body = valid_body();
        body["password"] = json!("short");
        let (status, body) = register(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["violations"],
            json!([{"field": "password", "rule": "too_short", "limit": 8}])
        );
    }

    #[actix_web::test]
    async fn malformed_emails_are_rejected() {
        for email in ["ann.lee.example.com", "ann@@example.com", "ann lee@example.com"] {
            let mut body = valid_body();
            body["email"] = json!(email);
            let (status, body) = register(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", email);
            assert!(has_violation(&body, "email", "not_an_email"), "{}", email);
        }
    }

    #[actix_web::test]
    async fn every_violation_is_reported() {
        let (status, body) = register(json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let violations = body["violations"].as_array().expect("Should list violations");
        assert_eq!(violations.len(), 5);
    }

    #[actix_web::test]
    async fn a_missing_body_is_a_bad_request() {
        let app = app!(AccountService::new());
        let req = test::TestRequest::post().uri(ENDPOINT).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(ENDPOINT)
            .insert_header(ContentType::json())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn an_unparseable_body_is_a_bad_request() {
        let app = app!(AccountService::new());
        for payload in [
            "not json",
            "{\"firstName\": ",
            "{\"firstName\": 5}",
            "null",
            "[\"Ann\", \"Lee\", \"annlee\", \"ann.lee@example.com\", \"Str0ngPass!\"]",
            "[]",
        ] {
            let req = test::TestRequest::post()
                .uri(ENDPOINT)
                .insert_header(ContentType::json())
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"]
                .as_str()
                .expect("Should have an error message")
                .starts_with("invalid JSON payload"));
        }
    }

    #[actix_web::test]
    async fn logic_failures_are_server_errors() {
        let app = app!(FailingLogic);
        let req = test::TestRequest::post()
            .uri(ENDPOINT)
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "storage unavailable"}));
    }

    #[actix_web::test]
    async fn other_methods_are_not_routed() {
        let app = app!(AccountService::new());
        let req = test::TestRequest::get().uri(ENDPOINT).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
