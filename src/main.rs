use std::io;
use std::sync::Arc;
use techeventannouncer::announcer::Announcer;
use techeventannouncer::config::env_loader::load_config;
use techeventannouncer::http::HttpClient;
use techeventannouncer::logging::setup_logging;
use techeventannouncer::throttle::TokioClock;
use techeventannouncer::trigger::server::serve;
use tracing::error;

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = load_config();
    let loki = setup_logging(config.loki_url.as_deref()).await;

    let http = match HttpClient::new(&config.http) {
        Ok(http) => Arc::new(http),
        Err(err) => {
            error!("Failed building HTTP client: {}", err);
            return Err(io::Error::other(err));
        }
    };

    let announcer = Arc::new(Announcer::from_config(
        &config,
        http.clone(),
        http,
        Arc::new(TokioClock),
    ));

    let result = serve(config.bind_address, announcer).await;

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }

    result
}
