use crate::core::jwt_auth::JwtVerifier;
use crate::core::AppConfig;
use crate::db::{AccessRepository, DeadlineRepository, MySqlAccessRepository};
use crate::routes::{authr_routes, ServiceName};
use crate::services::AccessService;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{dev::Server, web::Data, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct AuthrWebServer {
    port: u16,
    server: Server,
}

impl AuthrWebServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.authr_server_config.host, configuration.authr_server_config.port
        );

        let repository = Arc::new(DeadlineRepository::new(
            MySqlAccessRepository::new(configuration.mysql.pool()),
            configuration.mysql.query_timeout(),
        ));

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            repository,
            JwtVerifier::new(&configuration.jwt_auth_config),
            configuration.authr_server_config.name,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    repository: Arc<dyn AccessRepository>,
    jwt_verifier: JwtVerifier,
    service_name: String,
) -> Result<Server, anyhow::Error> {
    let access_service = Data::new(AccessService::new(repository));
    let jwt_verifier = Data::new(jwt_verifier);
    let service_name = Data::new(ServiceName(service_name));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(TracingLogger::default())
            .configure(authr_routes)
            .app_data(access_service.clone())
            .app_data(jwt_verifier.clone())
            .app_data(service_name.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
