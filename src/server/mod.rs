//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::BcryptPasswordHasher;
use crate::domain::token::TokenService;
use crate::domain::{AuthService, VoteLedger};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, users, votes};
use crate::middleware::Trace;
use crate::outbound::memory::{InMemoryItemStore, InMemoryUserRepository};
use crate::outbound::notifier::ChannelNotifier;

/// Wire the domain services over in-memory adapters.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let user_repo = Arc::new(InMemoryUserRepository::default());
    let items = Arc::new(InMemoryItemStore::default());
    let tokens = Arc::new(TokenService::new(
        &config.access_secret,
        config.access_ttl,
        &config.refresh_secret,
        config.refresh_ttl,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::new(BcryptPasswordHasher::default()),
        Arc::new(ChannelNotifier::default()),
        Arc::clone(&tokens),
    ));
    let ledger = Arc::new(VoteLedger::new(Arc::clone(&items)));
    HttpState::new(auth_service, ledger, user_repo, tokens, config.cookies)
}

/// Assemble the application: trace middleware, API scopes, and (in debug
/// builds) Swagger UI.
pub fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(
            web::scope("/auth")
                .service(auth::signup)
                .service(auth::login)
                .service(auth::refresh),
        )
        .service(
            web::scope("/users")
                .service(users::me)
                .service(users::update_me),
        )
        .service(
            web::scope("/items")
                .service(votes::cast_vote)
                .service(votes::remove_item),
        );

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from the resolved configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(bind_addr)?
        .run();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::harness;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn the_assembled_app_serves_the_auth_scope() {
        let h = harness();
        let app =
            actix_test::init_service(build_app(web::Data::new(h.state.clone()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "password": "correcthorse"
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn error_responses_carry_the_trace_header() {
        let h = harness();
        let app =
            actix_test::init_service(build_app(web::Data::new(h.state.clone()))).await;

        let req = actix_test::TestRequest::get().uri("/users/me").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let header = res
            .headers()
            .get("trace-id")
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("traceId").and_then(Value::as_str),
            Some(header.as_str())
        );
    }
}
