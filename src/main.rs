use poster_relay::{logger, server, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_loaded = dotenv::dotenv().is_ok();

    if let Err(e) = logger::init_with_config(logger::LoggerConfig::from_env()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    if config.krea.api_token.is_none() {
        log::error!("❌ KREA_API_TOKEN is not set; generation requests will fail with missing_api_token");
    }

    let (host, port) = config.bind_address();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);

    server::run(config).await
}
