// Framework bootstrap for the OTP server runtime.

use crate::domain::ports::SmsGateway;
use crate::frameworks::config::OtpServerConfig;
use crate::interface_adapters::clients::{ConsoleSmsGateway, Fast2SmsClient};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: OtpServerConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config)?;
    let app = app(state);

    tracing::info!(%address, dev_mode = config.dev_mode, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();
    let config = OtpServerConfig::from_env();

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    tracing::info!("health check: http://localhost:{}/api/health", config.port);
    run(listener, config).await
}

fn build_state(config: &OtpServerConfig) -> Result<AppState> {
    let gateway: Arc<dyn SmsGateway> = if config.dev_mode {
        tracing::warn!("development mode: otp codes are logged and returned to callers");
        Arc::new(ConsoleSmsGateway)
    } else {
        let api_key = config.fast2sms_api_key.clone().unwrap_or_else(|| {
            tracing::warn!("FAST2SMS_API_KEY is not set; the gateway will reject every send");
            String::new()
        });
        let client = Fast2SmsClient::new(config.fast2sms_url.clone(), api_key, config.sms_timeout)
            .map_err(|e| std::io::Error::other(format!("failed to initialize sms client: {e}")))?;
        tracing::debug!(
            fast2sms_url = %config.fast2sms_url,
            sms_timeout_ms = config.sms_timeout.as_millis(),
            "sms client configured"
        );
        Arc::new(client)
    };

    Ok(AppState::new(
        gateway,
        config.otp_ttl.as_millis() as u64,
        config.dev_mode,
    ))
}
