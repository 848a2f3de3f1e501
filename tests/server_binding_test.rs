use anyhow::Result;
use bugfixer::server::pool::{bind, WorkerPool};
use bugfixer::{router, FixEngine, GeminiClient, HttpSettings, ServerConfig};
use std::sync::Arc;

fn start_pool(workers: usize, threads: usize) -> Result<WorkerPool> {
    let config = ServerConfig::default();
    let settings = HttpSettings::from(&config);
    let listener = bind("127.0.0.1", 0)?;
    let pool = WorkerPool::start(listener, workers, threads, |_| {
        let client = GeminiClient::new(&config)?;
        Ok(router(Arc::new(FixEngine::new(client)), &settings))
    })?;
    Ok(pool)
}

#[test]
fn test_default_pool_serves_preflight_over_tcp() -> Result<()> {
    let config = ServerConfig::default();
    let pool = start_pool(config.workers(), config.threads())?;
    assert_eq!(pool.worker_count(), 1);
    assert_eq!(pool.threads_per_worker(), 8);

    let url = format!("http://{}/api/fix", pool.local_addr());
    let client_rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (status, allow_origin, body) = client_rt.block_on(async {
        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, &url)
            .send()
            .await?;
        let status = response.status();
        let allow_origin = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body: serde_json::Value = response.json().await?;
        Ok::<_, reqwest::Error>((status, allow_origin, body))
    })?;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(allow_origin.as_deref(), Some("*"));
    assert_eq!(body, serde_json::json!({"success": true}));

    pool.shutdown()?;
    Ok(())
}

#[test]
fn test_shutdown_stops_accepting_connections() -> Result<()> {
    let pool = start_pool(2, 2)?;
    let addr = pool.local_addr();
    assert_eq!(pool.worker_count(), 2);

    pool.shutdown()?;

    assert!(std::net::TcpStream::connect(addr).is_err());
    Ok(())
}

#[test]
fn test_port_in_use_is_a_startup_error() -> Result<()> {
    let taken = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = taken.local_addr()?.port();

    assert!(bind("127.0.0.1", port).is_err());
    Ok(())
}
