#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use custody_calendar::{CalendarConfig, TableCache, TableSource, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("CUSTODY_CALENDAR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let source = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CUSTODY_CALENDAR_SOURCE").ok())
        .map(|s| TableSource::parse(&s))
        .ok_or("usage: http <path|url> (or set CUSTODY_CALENDAR_SOURCE)")?;

    let config = CalendarConfig::from_env()?;
    let cache = Arc::new(TableCache::new(config));

    // Fail fast on a bad source instead of on the first request.
    let warm = {
        let cache = cache.clone();
        let source = source.clone();
        tokio::task::spawn_blocking(move || cache.get_or_load(&source).map(|t| t.height())).await??
    };
    tracing::info!(%source, rows = warm, "calendar ready");

    println!("custody-calendar dashboard listening on http://{addr}");
    http_api::serve(addr, http_api::AppState::new(cache, source)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
