//! gesture-keys CLI
//!
//! Drive synthetic key input from recorded hand landmarks, or serve the
//! browser front end.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use gesture_keys::{
    config::Config,
    core::{
        status_line, CooperativeRepeater, FrameDriver, KeyStateMachine, RepeatScheduler,
        ThreadRepeater, TouchClassifier,
    },
    input::{CountingSink, FanoutSink, LogSink, SharedSink, TextTarget},
    landmarks::ReplayProvider,
    overlay::RasterSurface,
    stats::create_shared_stats,
    video::{SyntheticCamera, VideoSource},
    CAMERA_ALERT, VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gesture-keys")]
#[command(version = VERSION)]
#[command(about = "Map finger-to-thumb pinches to synthetic key input", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimerMode {
    /// One background thread per held key
    Thread,
    /// Timers pumped from the frame loop
    Cooperative,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the frame loop against a recorded landmark stream
    Run {
        /// JSON Lines recording of provider detections
        #[arg(long)]
        replay: PathBuf,

        /// Restart the recording when it ends
        #[arg(long = "loop")]
        looping: bool,

        /// How repeat timers are scheduled
        #[arg(long, value_enum, default_value = "thread")]
        timers: TimerMode,

        /// Stop after this many ticks
        #[arg(long)]
        frames: Option<u64>,

        /// Display ticks per video frame
        #[arg(long, default_value = "2")]
        ticks_per_frame: u32,

        /// Override the configured touch threshold
        #[arg(long)]
        threshold: Option<f32>,

        /// Write the last overlay to this PPM file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Serve the static front end
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Directory of static assets
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },

    /// Show the finger-to-key mapping
    Keymap,

    /// Show configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            replay,
            looping,
            timers,
            frames,
            ticks_per_frame,
            threshold,
            snapshot,
        } => cmd_run(RunArgs {
            replay,
            looping,
            timers,
            frames,
            ticks_per_frame,
            threshold,
            snapshot,
        }),
        Commands::Serve { port, public_dir } => cmd_serve(port, public_dir),
        Commands::Keymap => cmd_keymap(),
        Commands::Config { init } => cmd_config(init),
    }
}

struct RunArgs {
    replay: PathBuf,
    looping: bool,
    timers: TimerMode,
    frames: Option<u64>,
    ticks_per_frame: u32,
    threshold: Option<f32>,
    snapshot: Option<PathBuf>,
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load config, using defaults: {e}");
            Config::default()
        }
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_config();
    if let Some(threshold) = args.threshold {
        config.touch_threshold = threshold;
    }
    config.validate()?;

    println!("gesture-keys v{VERSION}");
    println!();

    // Model-load failures propagate; there is no retry.
    let provider = ReplayProvider::from_path(&args.replay, config.provider.clone())
        .with_context(|| format!("loading {}", args.replay.display()))?
        .looping(args.looping);

    let mut camera = SyntheticCamera::new(config.video.fps).repeat_frames(args.ticks_per_frame);
    if let Err(e) = camera.open(config.video.width, config.video.height) {
        tracing::error!("Error accessing the camera: {e}");
        eprintln!("{CAMERA_ALERT}");
        return Ok(());
    }

    let stats = create_shared_stats();
    let text = Arc::new(TextTarget::new());
    let sink: SharedSink = Arc::new(CountingSink::new(
        FanoutSink::new().with(text.clone()).with(Arc::new(LogSink)),
        stats.clone(),
    ));

    println!("Key map:");
    for (finger, key) in config.key_map.iter() {
        println!("  {:<13} -> {}", finger.name(), key);
    }
    println!("  Touch threshold: {}", config.touch_threshold);
    println!("  Repeat interval: {}ms", config.repeat_interval.as_millis());
    println!("  Timers: {:?}", args.timers);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl+C handler")?;

    let tick_period = config.video.tick_period(args.ticks_per_frame)?;
    let surface = RasterSurface::new(config.video.width, config.video.height);
    let classifier = TouchClassifier::new(config.touch_threshold);
    let loop_args = LoopArgs {
        running: &running,
        frames: args.frames,
        tick_period,
        snapshot: args.snapshot.as_deref(),
    };

    match args.timers {
        TimerMode::Thread => {
            let machine = KeyStateMachine::with_interval(
                sink,
                ThreadRepeater::new(),
                config.repeat_interval,
            );
            let driver = FrameDriver::new(
                provider,
                surface,
                classifier,
                config.key_map.clone(),
                machine,
                stats.clone(),
            );
            frame_loop(driver, &mut camera, loop_args, |_| {})?;
        }
        TimerMode::Cooperative => {
            let repeater = CooperativeRepeater::new();
            let pump = repeater.clone();
            let machine =
                KeyStateMachine::with_interval(sink, repeater, config.repeat_interval);
            let driver = FrameDriver::new(
                provider,
                surface,
                classifier,
                config.key_map.clone(),
                machine,
                stats.clone(),
            );
            frame_loop(driver, &mut camera, loop_args, |elapsed| {
                pump.advance(elapsed);
            })?;
        }
    }

    println!();
    println!("Typed: {:?}", text.value());
    println!();
    println!("{}", stats.summary());
    Ok(())
}

struct LoopArgs<'a> {
    running: &'a AtomicBool,
    frames: Option<u64>,
    tick_period: Duration,
    snapshot: Option<&'a std::path::Path>,
}

/// Tick until stopped, the frame limit is hit, or the recording has played out.
fn frame_loop<R: RepeatScheduler>(
    mut driver: FrameDriver<ReplayProvider, RasterSurface, R>,
    camera: &mut SyntheticCamera,
    args: LoopArgs<'_>,
    mut pump_timers: impl FnMut(Duration),
) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut last_tick = start;
    let mut ticks = 0u64;

    while args.running.load(Ordering::SeqCst) {
        if args.frames.is_some_and(|limit| ticks >= limit) {
            break;
        }
        let Some(frame) = camera.next_frame() else {
            break;
        };

        let now = Instant::now();
        pump_timers(now - last_tick);
        last_tick = now;

        let outcome = driver.tick(&frame, start.elapsed().as_secs_f64() * 1000.0);
        ticks += 1;
        if !outcome.pressed.is_empty() || !outcome.released.is_empty() {
            println!("[{:>6.2}s] {}", frame.current_time, status_line(&outcome.held));
        }

        if driver.provider().is_finished() && outcome.held.is_empty() {
            break;
        }
        thread::sleep(args.tick_period);
    }

    let released = driver.release_all();
    if !released.is_empty() {
        tracing::info!(count = released.len(), "released held keys on shutdown");
    }

    if let Some(path) = args.snapshot {
        driver
            .surface()
            .write_ppm(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        println!("Wrote overlay snapshot to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "server")]
fn cmd_serve(port: Option<u16>, public_dir: Option<PathBuf>) -> anyhow::Result<()> {
    use gesture_keys::server::{run, ServerConfig};

    let config = load_config();
    let mut server_config = ServerConfig::from(&config.server);
    if let Some(port) = port {
        server_config.port = port;
    }
    if let Some(dir) = public_dir {
        server_config.public_dir = dir;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (_addr, shutdown_tx) = run(server_config).await?;
        tokio::signal::ctrl_c().await?;
        let _ = shutdown_tx.send(());
        // Let graceful shutdown finish in-flight requests.
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<(), anyhow::Error>(())
    })
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_port: Option<u16>, _public_dir: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::bail!("the static server requires the `server` feature")
}

fn cmd_keymap() -> anyhow::Result<()> {
    let config = load_config();
    println!("Finger         Key  Code");
    println!("-------------  ---  ----");
    for (finger, key) in config.key_map.iter() {
        println!("{:<13}  {:<3}  {}", finger.name(), key, key.code());
    }
    Ok(())
}

fn cmd_config(init: bool) -> anyhow::Result<()> {
    if init {
        let path = Config::default().save()?;
        println!("Wrote default configuration to {path:?}");
        return Ok(());
    }

    let config = load_config();
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
