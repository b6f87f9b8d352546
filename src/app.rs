//! Service wiring and the actix-web application factory.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use crate::auth::{AuthService, PasswordHasher, TokenSigner};
use crate::config::Config;
use crate::routes::{self, health};
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;
use crate::users::UserService;

/// The services handlers depend on, constructed once and shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub users: web::Data<UserService>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: &Config) -> Self {
        let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl());
        Self {
            auth: web::Data::new(AuthService::new(
                Arc::clone(&users),
                signer,
                PasswordHasher::new(config.bcrypt_cost),
            )),
            tasks: web::Data::new(TaskService::new(tasks)),
            users: web::Data::new(UserService::new(users)),
        }
    }

    /// Registers the services as app data.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.users.clone());
    }
}

/// Builds the application: CORS, request logging, `/health`, and the API under `/api`.
///
/// With `cors_origin` set only that origin may call the API from a browser;
/// otherwise any origin is allowed.
pub fn build_app(
    services: AppServices,
    cors_origin: Option<&str>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = match cors_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        None => Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
    };

    App::new()
        .configure(|cfg| services.register(cfg))
        .wrap(cors)
        .wrap(Logger::default())
        .service(health::health)
        .service(web::scope("/api").configure(routes::config))
}
