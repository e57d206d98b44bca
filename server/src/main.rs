//! dripsend HTTP server.
//!
//! Paced bulk email over a personal SMTP account, with a delay-queue
//! callback endpoint for remote batches.

mod config;

use config::ServerConfig;
use dripsend_core::providers::{QstashClient, SmtpMailer};
use dripsend_web::{AppState, SignatureVerifier, router};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "dripsend_server=info,dripsend_web=info,dripsend_core=info,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dripsend server");

    let config = ServerConfig::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        smtp_relay = %config.smtp_relay,
        smtp_port = config.smtp_port,
        qstash_url = %config.qstash_url,
        base_url = config.base_url.as_deref().unwrap_or("<unset>"),
        secure_cookies = config.secure_cookies,
        "Configuration loaded"
    );

    let mailer = SmtpMailer::new(config.smtp_relay, config.smtp_port);
    let queue = QstashClient::new(config.qstash_url, config.qstash_token);
    let verifier = SignatureVerifier::new(config.signing_key_current, config.signing_key_next);

    let state = Arc::new(AppState::new(
        mailer,
        queue,
        config.site_password,
        config.base_url,
        config.secure_cookies,
        verifier,
    ));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(address = %config.bind_addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
