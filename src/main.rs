//! MotionPlay - Runner
//!
//! Reads landmark frames as JSON lines (file or stdin) and drives the
//! motion pipeline on a single lane.
//!
//! ```text
//! motionplay run [frames.jsonl]             recognize and trigger actions
//! motionplay record <label> [frames.jsonl]  record a labeled gesture
//! motionplay export <out.jsonl>             merge recordings for training
//! motionplay profiles                       list profiles
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use motionplay_core::constants::{APP_NAME, APP_VERSION};
use motionplay_core::logic::recording::{export, worker, RecordingEvent, RecordingStore};
use motionplay_core::{
    Clock, Frame, FrameOutcome, LoggingInjector, ManualClock, MotionConfig, MotionContext,
    MotionError, MotionResult, PipelineMode, SystemClock,
};

/// Frames buffered between the reader and the processing lane
const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Recording timers are checked at least this often without frames
const TICK_INTERVAL_MS: u64 = 50;

enum Command {
    Run { input: Option<PathBuf> },
    Record { label: String, input: Option<PathBuf> },
    Export { output: PathBuf },
    Profiles,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(usage) => {
            eprintln!("{}", usage);
            std::process::exit(2);
        }
    };

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    if let Err(e) = execute(command).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let usage = "usage: motionplay <run [frames.jsonl] | record <label> [frames.jsonl] | export <out.jsonl> | profiles>";
    let arg = |i: usize| args.get(i).map(PathBuf::from);

    match args.first().map(String::as_str) {
        Some("run") | None => Ok(Command::Run { input: arg(1) }),
        Some("record") => {
            let label = args.get(1).cloned().ok_or_else(|| usage.to_string())?;
            Ok(Command::Record { label, input: arg(2) })
        }
        Some("export") => {
            let output = arg(1).ok_or_else(|| usage.to_string())?;
            Ok(Command::Export { output })
        }
        Some("profiles") => Ok(Command::Profiles),
        Some(_) => Err(usage.to_string()),
    }
}

/// Defaults → `MOTIONPLAY_CONFIG` file → `MOTIONPLAY_*` overrides
fn load_config() -> MotionResult<MotionConfig> {
    let config = match env::var("MOTIONPLAY_CONFIG") {
        Ok(path) => MotionConfig::load(Path::new(&path))?,
        Err(_) => MotionConfig::default(),
    }
    .apply_env();

    config.validate()?;
    Ok(config)
}

async fn execute(command: Command) -> MotionResult<()> {
    let config = load_config()?;

    match command {
        Command::Run { input } => run(config, input).await,
        Command::Record { label, input } => record(config, label, input).await,
        Command::Export { output } => {
            let store = RecordingStore::new(config.paths.recordings_dir());
            let count = export::to_jsonl(&store, &output)?;
            println!("{} recordings → {}", count, output.display());
            Ok(())
        }
        Command::Profiles => {
            let store = motionplay_core::logic::action::ProfileStore::new(config.paths.profiles_dir());
            for name in store.list()? {
                let marker = if name == config.paths.active_profile { "*" } else { " " };
                println!("{} {}", marker, name);
            }
            Ok(())
        }
    }
}

// ============================================================================
// FRAME SOURCE
// ============================================================================

/// Frame timestamps drive time when replaying a file; live input uses
/// the system clock
enum TimeSource {
    Replay(Arc<ManualClock>),
    Live(Arc<SystemClock>),
}

impl TimeSource {
    fn for_input(input: &Option<PathBuf>) -> Self {
        match input {
            Some(_) => TimeSource::Replay(Arc::new(ManualClock::new(0))),
            None => TimeSource::Live(Arc::new(SystemClock::new())),
        }
    }

    fn clock(&self) -> Arc<dyn Clock> {
        match self {
            TimeSource::Replay(c) => c.clone(),
            TimeSource::Live(c) => c.clone(),
        }
    }

    fn observe(&self, frame: &Frame) {
        if let TimeSource::Replay(c) = self {
            c.set(frame.timestamp_ms);
        }
    }
}

/// Producer task: JSON lines → frames, in order
fn spawn_reader(input: Option<PathBuf>) -> mpsc::Receiver<Frame> {
    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &input {
            Some(path) => match tokio::fs::File::open(path).await {
                Ok(file) => Box::new(BufReader::new(file)),
                Err(e) => {
                    log::error!("Cannot open {:?}: {}", path, e);
                    return;
                }
            },
            None => Box::new(BufReader::new(tokio::io::stdin())),
        };

        let mut lines = reader.lines();
        let mut line_no = 0usize;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::error!("Frame input error: {}", e);
                    break;
                }
            };
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Frame>(&line) {
                Ok(frame) => {
                    if tx.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("Skipping line {}: {}", line_no, e),
            }
        }
        log::debug!("Frame reader finished after {} lines", line_no);
    });

    rx
}

// ============================================================================
// COMMANDS
// ============================================================================

async fn run(config: MotionConfig, input: Option<PathBuf>) -> MotionResult<()> {
    let time = TimeSource::for_input(&input);
    let mut ctx = MotionContext::init(config, Arc::new(LoggingInjector), time.clock())?;

    if let Err(e) = ctx.watch_profile() {
        log::warn!("Profile hot-reload disabled: {}", e);
    }

    let mut frames = spawn_reader(input);
    while let Some(frame) = frames.recv().await {
        time.observe(&frame);
        handle_result(ctx.pipeline_mut().process_frame(frame));
    }

    let status = ctx.shutdown();
    log::info!(
        "Done: {} evaluations, {} candidates, avg {}µs",
        status.engine.evaluations,
        status.engine.candidates,
        status.engine.avg_latency_us
    );
    Ok(())
}

async fn record(config: MotionConfig, label: String, input: Option<PathBuf>) -> MotionResult<()> {
    let time = TimeSource::for_input(&input);
    let (persistence, saver) = worker::spawn(RecordingStore::new(config.paths.recordings_dir()));
    let mut ctx = MotionContext::init(config, Arc::new(LoggingInjector), time.clock())?
        .with_persistence(persistence);

    let mut frames = spawn_reader(input);
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    let mut started = false;
    let mut failure: Option<MotionError> = None;

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                time.observe(&frame);
                // windows are scheduled from the first frame's time
                if !started {
                    report_recording(&[ctx.pipeline_mut().start_recording(&label)?]);
                    started = true;
                }
                failure = failure.or(handle_result(ctx.pipeline_mut().process_frame(frame)));
            }
            _ = ticker.tick() => {
                let events = ctx.pipeline_mut().tick();
                report_recording(&events);
                failure = failure.or(take_failure(events));
            }
        }

        if started && ctx.pipeline().mode() == PipelineMode::Recognition {
            break;
        }
    }

    if ctx.pipeline().mode() == PipelineMode::Recording {
        log::warn!("Input ended before the recording finished");
        // repetitions captured so far are still saved
        let events = vec![ctx.pipeline_mut().cancel_recording()?];
        report_recording(&events);
        failure = failure.or(take_failure(events));
    }
    ctx.shutdown();

    let saved = saver.await.map_err(|e| {
        MotionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })?;
    for s in &saved {
        println!("{} ({} sequences, sha256 {})", s.path.display(), s.num_sequences, s.checksum);
    }

    match failure {
        _ if !started => Err(MotionError::EmptyInputSequence),
        Some(e) if saved.is_empty() => Err(e),
        _ => Ok(()),
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Log a frame's outcome; returns the session failure, if the frame ended one
fn handle_result(result: MotionResult<FrameOutcome>) -> Option<MotionError> {
    match result {
        Ok(outcome) => {
            if let Some(trigger) = &outcome.trigger {
                log::info!("Trigger '{}' at {}ms", trigger.label, trigger.timestamp_ms);
            }
            report_recording(&outcome.recording_events);
            take_failure(outcome.recording_events)
        }
        Err(e) if e.is_frame_local() => {
            log::debug!("Frame dropped: {}", e);
            None
        }
        Err(e) => {
            log::warn!("Frame processing error: {}", e);
            None
        }
    }
}

fn take_failure(events: Vec<RecordingEvent>) -> Option<MotionError> {
    events.into_iter().find_map(|e| match e {
        RecordingEvent::Failed(err) => Some(err),
        _ => None,
    })
}

fn report_recording(events: &[RecordingEvent]) {
    for event in events {
        match event {
            RecordingEvent::CountdownStarted { repetition } => {
                log::info!("Repetition {}: get ready", repetition + 1)
            }
            RecordingEvent::CaptureStarted { repetition } => {
                log::info!("Repetition {}: capturing", repetition + 1)
            }
            RecordingEvent::RepetitionSaved { repetition, captured_frames } => {
                log::info!("Repetition {}: {} frames", repetition + 1, captured_frames)
            }
            RecordingEvent::Completed(r) => {
                log::info!("Recorded '{}' ({} sequences)", r.gesture_name, r.num_sequences)
            }
            // failures are logged by the session
            RecordingEvent::RepetitionFailed { .. } | RecordingEvent::Failed(_) => {}
        }
    }
}
