//! Worker pool: one listening socket shared by isolated tokio runtimes.
//!
//! Each worker is an OS thread that owns a multi-thread runtime with a fixed
//! number of executor threads. Workers accept from clones of the same
//! listener, so the kernel spreads connections between them.

use crate::config::ServerConfig;
use crate::utils::error::{FixerError, Result};
use axum::Router;
use std::future::Future;
use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};

pub fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

pub fn build_runtime(worker: usize, threads: usize) -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .thread_name(format!("bugfixer-w{}", worker))
        .enable_all()
        .build()?;
    Ok(runtime)
}

/// Reports a worker id when its thread finishes, including by panic.
struct ExitNotice {
    id: usize,
    exits: mpsc::UnboundedSender<usize>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.exits.send(self.id);
    }
}

fn spawn_worker<T>(
    id: usize,
    runtime: Runtime,
    exits: mpsc::UnboundedSender<usize>,
    task: T,
) -> Result<JoinHandle<Result<()>>>
where
    T: Future<Output = Result<()>> + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name(format!("bugfixer-worker-{}", id))
        .spawn(move || {
            let _notice = ExitNotice { id, exits };
            runtime.block_on(task)
        })?;
    Ok(handle)
}

pub struct WorkerPool {
    workers: Vec<JoinHandle<Result<()>>>,
    shutdown: watch::Sender<bool>,
    exited: mpsc::UnboundedReceiver<usize>,
    local_addr: SocketAddr,
    threads: usize,
}

impl WorkerPool {
    /// Starts `workers` runtimes serving `listener`. `make_app` is called once
    /// per worker so no connection state is shared across runtimes.
    pub fn start<F>(listener: TcpListener, workers: usize, threads: usize, make_app: F) -> Result<Self>
    where
        F: Fn(usize) -> Result<Router>,
    {
        let local_addr = listener.local_addr()?;
        let (shutdown, _) = watch::channel(false);
        let (exits, exited) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let listener = listener.try_clone()?;
            let app = make_app(id)?;
            let runtime = build_runtime(id, threads)?;
            let mut stop = shutdown.subscribe();

            let task = async move {
                let listener = tokio::net::TcpListener::from_std(listener)?;
                tracing::info!("Worker {} started with {} threads", id, threads);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = stop.wait_for(|stopping| *stopping).await;
                    })
                    .await?;
                tracing::info!("Worker {} stopped", id);
                Ok(())
            };
            handles.push(spawn_worker(id, runtime, exits.clone(), task)?);
        }

        Ok(Self {
            workers: handles,
            shutdown,
            exited,
            local_addr,
            threads,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn threads_per_worker(&self) -> usize {
        self.threads
    }

    /// Waits for `signal` or for any worker to finish on its own, whichever
    /// comes first. Returns the id of a worker that exited early.
    pub async fn wait_until<S>(&mut self, signal: S) -> Option<usize>
    where
        S: Future<Output = ()>,
    {
        tokio::select! {
            _ = signal => None,
            Some(id) = self.exited.recv() => Some(id),
        }
    }

    /// Signals every worker to stop accepting and waits for in-flight
    /// requests to drain. Returns the first worker error, if any.
    pub fn shutdown(self) -> Result<()> {
        self.shutdown.send_replace(true);

        let mut first_error = None;
        for handle in self.workers {
            let outcome = handle.join().unwrap_or_else(|_| {
                Err(FixerError::IoError(std::io::Error::other(
                    "worker thread panicked",
                )))
            });
            if let Err(e) = outcome {
                tracing::error!("Worker exited with error: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Binds, serves until SIGINT or SIGTERM, then drains. A worker that stops
/// on its own takes the whole pool down with it.
pub fn run<F>(config: &ServerConfig, make_app: F) -> Result<()>
where
    F: Fn(usize) -> Result<Router>,
{
    let listener = bind(config.host(), config.port())?;
    tracing::info!(
        "Listening on {} ({} workers x {} threads, timeout: {})",
        listener.local_addr()?,
        config.workers(),
        config.threads(),
        config
            .request_timeout()
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "none".to_string())
    );

    let mut pool = WorkerPool::start(listener, config.workers(), config.threads(), make_app)?;

    let signals = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match signals.block_on(pool.wait_until(shutdown_signal())) {
        None => {
            tracing::info!("Shutdown signal received, draining workers");
            pool.shutdown()
        }
        Some(id) => {
            tracing::error!("Worker {} exited unexpectedly, stopping the pool", id);
            pool.shutdown()?;
            Err(FixerError::IoError(std::io::Error::other(format!(
                "worker {} exited unexpectedly",
                id
            ))))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
