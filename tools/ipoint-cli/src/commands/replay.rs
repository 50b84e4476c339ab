//! Replay a recorded landmark stream through the tracking pipeline.
//!
//! A reader task parses frames and hands them to a single pipeline worker
//! over a bounded channel. In realtime mode frames are paced by their
//! timestamps and dropped when the worker falls behind, as a live camera
//! feed would be.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, error::TrySendError};

use ipoint_common::clock::SessionClock;
use ipoint_common::config::AppConfig;
use ipoint_common::settings::SharedSettings;
use ipoint_model::stream::{parse_frame_line, LandmarkFrame, PointerStreamHeader};
use ipoint_tracking_core::pipeline::{PipelineStats, TrackingPipeline};
use ipoint_tracking_core::sink::JsonlPointerWriter;

pub struct ReplayOptions {
    pub frames: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub output: Option<PathBuf>,
    pub one_eye: bool,
    pub blink_threshold: Option<f32>,
    pub realtime: bool,
    pub queue: usize,
}

#[derive(Debug, Default)]
struct ReaderStats {
    read: u64,
    dropped: u64,
}

#[derive(Debug)]
struct WorkerSummary {
    stats: PipelineStats,
    visible: u64,
}

pub async fn run(config: &AppConfig, options: ReplayOptions) -> anyhow::Result<()> {
    let screen = super::screen_size(config, options.width, options.height)?;

    let mut tracking = config.tracking;
    if options.one_eye {
        tracking.use_one_eye = true;
    }
    if let Some(threshold) = options.blink_threshold {
        tracking.blink_threshold = threshold;
    }
    let settings = SharedSettings::new(tracking).context("Invalid tracking settings")?;

    let clock = SessionClock::start();
    let mut pipeline = TrackingPipeline::new(settings, screen)?;
    if let Some(ref path) = options.output {
        let header = PointerStreamHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: clock.epoch_wall().to_string(),
            screen_width: screen.width,
            screen_height: screen.height,
        };
        let writer = JsonlPointerWriter::create(path, &header)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        pipeline.add_sink(Box::new(writer));
    }

    let file = tokio::fs::File::open(&options.frames)
        .await
        .with_context(|| format!("Failed to open {}", options.frames.display()))?;

    tracing::info!(
        frames = %options.frames.display(),
        width = screen.width,
        height = screen.height,
        realtime = options.realtime,
        "Starting replay"
    );

    let (tx, rx) = mpsc::channel(options.queue.max(1));
    let worker = tokio::spawn(run_worker(pipeline, rx));
    let reader = read_frames(file, tx, options.realtime).await;

    let summary = worker.await.context("Pipeline worker panicked")??;
    let reader = reader?;

    println!("Replay complete:");
    println!("  Frames read: {}", reader.read);
    println!("  Frames dropped: {}", reader.dropped);
    println!("  Frames processed: {}", summary.stats.frames);
    println!("  Visible frames: {}", summary.visible);
    println!("  Clicks: {}", summary.stats.clicks);
    if summary.stats.sink_errors > 0 {
        println!("  Sink errors: {}", summary.stats.sink_errors);
    }
    if let Some(ref path) = options.output {
        println!("  Output: {}", path.display());
    }
    println!("  Elapsed: {:.1}ms", SessionClock::ns_to_ms(clock.elapsed_ns()));

    Ok(())
}

async fn read_frames(
    file: tokio::fs::File,
    tx: mpsc::Sender<LandmarkFrame>,
    realtime: bool,
) -> anyhow::Result<ReaderStats> {
    let mut stats = ReaderStats::default();
    let mut lines = BufReader::new(file).lines();
    let mut line_no = 0usize;
    let mut pacing: Option<(tokio::time::Instant, u64)> = None;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let Some(parsed) = parse_frame_line(&line) else {
            continue;
        };
        let frame = parsed.with_context(|| format!("Invalid frame on line {line_no}"))?;
        stats.read += 1;

        if !realtime {
            if tx.send(frame).await.is_err() {
                break;
            }
            continue;
        }

        let (start, first_ns) =
            *pacing.get_or_insert_with(|| (tokio::time::Instant::now(), frame.timestamp_ns));
        let offset = Duration::from_nanos(frame.timestamp_ns.saturating_sub(first_ns));
        tokio::time::sleep_until(start + offset).await;

        match tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                stats.dropped += 1;
                tracing::debug!(t = frame.timestamp_ns, "Worker busy, frame dropped");
            }
            Err(TrySendError::Closed(_)) => break,
        }
    }

    Ok(stats)
}

async fn run_worker(
    mut pipeline: TrackingPipeline,
    mut rx: mpsc::Receiver<LandmarkFrame>,
) -> anyhow::Result<WorkerSummary> {
    let mut visible = 0u64;
    while let Some(frame) = rx.recv().await {
        let output = pipeline.process_frame(&frame.landmarks, frame.timestamp_ns)?;
        if output.cursor.is_visible() {
            visible += 1;
        }
    }

    let stats = pipeline.finish()?;
    Ok(WorkerSummary { stats, visible })
}
