use actix_web::{web, App, HttpServer};
use alipay_gateway::channels::{ChannelRegistry, PaymentChannel};
use alipay_gateway::config::Config;
use anyhow::Context;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing; JSON lines in production
    let json_logs = config.app.env == "production";
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("alipay_gateway={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting Alipay gateway service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Resolve the payment channel once; an unknown channel aborts startup
    let registry = ChannelRegistry::with_builtin_channels();
    let channel_config = config.channel_config()?;
    let channel: Arc<dyn PaymentChannel> = registry
        .client(&channel_config)
        .with_context(|| {
            format!(
                "Payment channel '{}' could not be initialized (registered: {})",
                channel_config.channel,
                registry.names().join(", ")
            )
        })?;

    tracing::info!(channel = channel.name(), "Payment channel ready");

    let bind_address = config.server.bind_address();
    let channel_data = web::Data::from(channel);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(channel_data.clone())
            .configure(alipay_gateway::configure_app)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
