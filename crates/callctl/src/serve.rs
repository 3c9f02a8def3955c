// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `callctl serve` command implementation.
//!
//! Builds the stores and the event handler, then replays JSON-lines bus
//! traffic from a file or stdin through the dispatch pipeline until the
//! input is exhausted or a shutdown signal arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use callctl_bus::{Classifier, FeedStats, MemoryQueue, Pipeline, Processor, feed_lines};
use callctl_config::CallctlConfig;
use callctl_core::CallctlError;
use callctl_handler::{Collaborators, EventHandler};
use callctl_prometheus::EventMetrics;
use callctl_storage::{BridgeStore, ChannelStore};

use crate::workflows::{
    LoggingCallHandler, LoggingConfbridgeHandler, LoggingRecordingHandler, LoggingRequestHandler,
};

/// How often ended channels are checked against the retention window.
const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Command-line options for `serve`.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    /// JSON-lines input. Reads stdin when absent.
    pub input: Option<PathBuf>,
    /// Print the Prometheus exposition on exit.
    pub dump_metrics: bool,
}

/// State left behind by a finished run.
#[derive(Debug)]
pub struct ServeReport {
    pub feed: FeedStats,
    pub channels: usize,
    pub bridges: usize,
    /// Rendered exposition, present when metrics are enabled.
    pub metrics: Option<String>,
}

/// Runs the `serve` command.
pub async fn run_serve(config: CallctlConfig, options: ServeOptions) -> Result<(), CallctlError> {
    init_tracing(&config.service.log_level);
    info!(service = %config.service.name, queue = %config.queue.name, "starting callctl");

    let cancel = callctl_bus::install_signal_handler();
    let report = serve(&config, options.input.as_deref(), cancel).await?;

    info!(
        published = report.feed.published,
        discarded = report.feed.discarded,
        malformed = report.feed.malformed,
        channels = report.channels,
        bridges = report.bridges,
        "callctl stopped"
    );

    if options.dump_metrics {
        match report.metrics {
            Some(rendered) => print!("{rendered}"),
            None => warn!("metrics are disabled, nothing to dump"),
        }
    }
    Ok(())
}

/// Wires the pipeline and drives it with `input` until it drains or
/// `cancel` fires.
pub async fn serve(
    config: &CallctlConfig,
    input: Option<&Path>,
    cancel: CancellationToken,
) -> Result<ServeReport, CallctlError> {
    let requests = Arc::new(LoggingRequestHandler);
    let channels = Arc::new(ChannelStore::new(requests.clone()));
    let bridges = Arc::new(BridgeStore::new());
    let calls = Arc::new(LoggingCallHandler);
    let confbridges = Arc::new(LoggingConfbridgeHandler);

    let handler = Arc::new(EventHandler::new(Collaborators {
        channels: channels.clone(),
        bridges: bridges.clone(),
        calls: calls.clone(),
        confbridges: confbridges.clone(),
        recordings: Arc::new(LoggingRecordingHandler),
        requests,
    }));

    let metrics = if config.metrics.enabled {
        let metrics = EventMetrics::new()
            .map_err(|e| CallctlError::Internal(format!("cannot build metrics registry: {e}")))?;
        Some(Arc::new(metrics))
    } else {
        None
    };
    let mut processor = Processor::new(
        Classifier::new(config.queue.publishers.clone()),
        handler,
        calls,
        confbridges,
    );
    if let Some(metrics) = &metrics {
        processor = processor.with_metrics(metrics.clone());
    }

    let queue = Arc::new(MemoryQueue::new());
    let pipeline = Arc::new(Pipeline::new(queue.clone(), config.queue.clone(), processor));
    // Bind before feeding so no early message is discarded.
    pipeline.start().await?;

    let sweep_cancel = cancel.child_token();
    let sweeper = match config.service.channel_retention_secs {
        0 => None,
        secs => Some(spawn_retention_sweep(
            channels.clone(),
            Duration::from_secs(secs),
            RETENTION_SWEEP_INTERVAL,
            sweep_cancel.clone(),
        )),
    };

    let runner = tokio::spawn({
        let pipeline = pipeline.clone();
        let cancel = cancel.clone();
        async move { pipeline.run(cancel).await }
    });

    let fed = tokio::select! {
        fed = feed(input, &queue) => fed,
        _ = cancel.cancelled() => Ok(FeedStats::default()),
    };
    queue.close().await;

    let ran = runner
        .await
        .map_err(|e| CallctlError::Internal(format!("pipeline task failed: {e}")))?;
    if let Err(e) = &ran {
        error!(error = %e, "pipeline stopped with an error");
    }
    sweep_cancel.cancel();
    if let Some(sweeper) = sweeper {
        let _ = sweeper.await;
    }
    let feed = fed?;
    ran?;

    Ok(ServeReport {
        feed,
        channels: channels.len(),
        bridges: bridges.len(),
        metrics: metrics.map(|m| m.render()),
    })
}

/// Periodically drops channels that ended more than `retention` ago.
fn spawn_retention_sweep(
    channels: Arc<ChannelStore>,
    retention: Duration,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let purged = channels.purge_expired(retention);
                    if purged > 0 {
                        debug!(purged, remaining = channels.len(), "channel retention sweep");
                    }
                }
            }
        }
    })
}

async fn feed(input: Option<&Path>, queue: &MemoryQueue) -> Result<FeedStats, CallctlError> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                CallctlError::Config(format!("cannot open input {}: {e}", path.display()))
            })?;
            info!(input = %path.display(), "replaying input file");
            Box::new(BufReader::new(file))
        }
        None => {
            info!("replaying stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };
    feed_lines(reader, queue).await
}

const CRATE_TARGETS: [&str; 8] = [
    "callctl",
    "callctl_ari",
    "callctl_bus",
    "callctl_config",
    "callctl_handler",
    "callctl_prometheus",
    "callctl_storage",
    "callctl_core",
];

/// `log_level` for every callctl crate, `warn` for everything else.
fn default_directives(log_level: &str) -> String {
    let mut directives: Vec<String> = CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
