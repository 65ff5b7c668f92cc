pub mod errors;
pub mod handlers;

pub use errors::ApiError;
pub use handlers::{configure, AppState};

use crate::{
    config::Config,
    error::Result,
    relay::{GenerationRelay, ImageProxy, PollPolicy},
    upstream::{HttpImageFetcher, KreaClient},
};
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;

/// Wires the live upstream clients into the handler state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let provider = KreaClient::new(config.krea.clone())?;
    let fetcher = HttpImageFetcher::new(config.proxy.clone(), config.krea.request_timeout())?;

    Ok(AppState::new(
        GenerationRelay::new(Arc::new(provider), PollPolicy::from(&config.poll)),
        ImageProxy::new(Arc::new(fetcher), config.proxy.clone()),
    ))
}

pub async fn run(config: Config) -> io::Result<()> {
    let state = build_state(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let state = web::Data::new(state);
    let body_limit = config.body_limit;

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(body_limit))
            .app_data(handlers::query_config())
            .wrap(handlers::cors_headers())
            .wrap(middleware::Logger::new("%r %s %b bytes %T s"))
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_without_token() {
        let state = build_state(&Config::new()).unwrap();
        assert_eq!(state.relay.policy().max_attempts, 50);
    }
}
