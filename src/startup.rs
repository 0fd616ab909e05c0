use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::dispatcher::Dispatcher;
use crate::email_client::EmailClient;
use crate::routes::{health_check, json_error_handler, send_emails, upload_excel, UploadLimit};

/// Recipient lists can get long, the actix default of 32kB is too tight
const JSON_PAYLOAD_LIMIT: usize = 1024 * 1024;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let email_settings = &configuration.email_client;
        let sender = email_settings.sender().map_err(anyhow::Error::msg)?;
        let email_client = EmailClient::new(
            email_settings.base_url.clone(),
            sender,
            email_settings.sender_name.clone(),
            email_settings.timeout(),
        )?;
        let dispatcher = Dispatcher::new(
            email_client,
            email_settings.authorization_token.clone(),
            email_settings.send_interval(),
        );
        if !dispatcher.is_configured() {
            tracing::warn!("No provider API key configured, /send-emails will answer with a 500");
        }

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        // Port 0 asks the OS for a random one, read back the port actually bound
        let port = listener.local_addr()?.port();
        tracing::info!(%address, port, "Listening");

        let server = run(listener, dispatcher, configuration.application.max_upload_bytes)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns once the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    dispatcher: Dispatcher,
    max_upload_bytes: usize,
) -> Result<Server, std::io::Error> {
    // using web::Data to wrap the dispatcher in smart pointer(Arc)
    // so every worker shares the same reqwest connection pool
    let dispatcher = web::Data::new(dispatcher);
    let upload_limit = web::Data::new(UploadLimit(max_upload_bytes));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_PAYLOAD_LIMIT)
                    .error_handler(json_error_handler),
            )
            .route("/health", web::get().to(health_check))
            .route("/send-emails", web::post().to(send_emails))
            .route("/upload-excel", web::post().to(upload_excel))
            .app_data(dispatcher.clone())
            .app_data(upload_limit.clone())
    })
    .listen(listener)?
    .run();
    // No .await here
    Ok(server)
}
