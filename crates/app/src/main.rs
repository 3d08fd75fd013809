use std::path::{Path, PathBuf};

use calloop::EventLoop;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tween_core::{animate, generate, throttle, AnimationHandle, AppConfig, Closer, LoopSource, Shape};

fn main() -> tween_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Curve {
            shape,
            from,
            to,
            steps,
            json,
        } => run_curve(shape, from, to, steps, json),
        Commands::Throttle {
            ms,
            duration,
            easing,
            playback,
        } => {
            let mut config = load_config(playback.config.as_deref())?;
            config.interval.ms = ms.or(config.interval.ms);
            config.interval.duration = duration.or(config.interval.duration);
            if let Some(easing) = easing {
                config.interval.easing = easing;
            }
            play(&config, playback.cancel_after, |source, callback| {
                throttle(source, callback, &config.interval)
            })
        }
        Commands::Animate {
            frames,
            ease,
            fps,
            playback,
        } => {
            let mut config = load_config(playback.config.as_deref())?;
            config.frame.frames = frames.or(config.frame.frames);
            config.refresh_rate = fps.or(config.refresh_rate);
            if let Some(ease) = ease {
                config.frame.ease = ease;
            }
            play(&config, playback.cancel_after, |source, callback| {
                animate(source, callback, &config.frame)
            })
        }
    }
}

fn run_curve(shape: Shape, from: f64, to: f64, steps: f64, json: bool) -> tween_core::Result<()> {
    let values: Vec<f64> = generate(shape, (from, to), steps).collect();
    tracing::info!(%shape, from, to, samples = values.len(), "sampled curve");

    if json {
        println!("{}", serde_json::to_string(&values)?);
    } else {
        for (index, value) in values.iter().enumerate() {
            println!("{index}\t{value:.6}");
        }
    }
    Ok(())
}

/// Runs a single animation on a fresh event loop until its handle reports
/// that the timer or frame registration was released.
fn play<F>(config: &AppConfig, cancel_after: Option<u64>, start: F) -> tween_core::Result<()>
where
    F: FnOnce(&LoopSource<'static, ()>, Box<dyn FnMut(f64, &Closer)>) -> AnimationHandle,
{
    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new()?;
    let source = LoopSource::with_frame_period(event_loop.handle(), config.frame_period());

    let handle = start(&source, printer(cancel_after));
    while !handle.is_finished() {
        event_loop.dispatch(None, &mut ())?;
    }
    tracing::info!(cancelled = handle.is_cancelled(), "animation finished");
    Ok(())
}

fn printer(cancel_after: Option<u64>) -> Box<dyn FnMut(f64, &Closer)> {
    let mut delivered = 0u64;
    Box::new(move |value: f64, close: &Closer| {
        delivered += 1;
        println!("{value:.6}");
        if cancel_after.is_some_and(|limit| delivered >= limit) {
            tracing::info!(delivered, "closing animation early");
            close.close();
        }
    })
}

fn load_config(path: Option<&Path>) -> tween_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Sample and play back smoothstep easing curves", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct Playback {
    /// JSON configuration file; command line flags take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Close the animation from its callback after this many values.
    #[arg(long)]
    cancel_after: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every sample of a curve.
    Curve {
        /// One of `in`, `out` or `in-out`; anything else means `in-out`.
        #[arg(short, long, default_value = "in-out")]
        shape: Shape,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        to: f64,
        #[arg(long, default_value_t = 100.0)]
        steps: f64,
        /// Emit a JSON array instead of one sample per line.
        #[arg(long)]
        json: bool,
    },
    /// Play a curve on a fixed wall-clock interval.
    Throttle {
        /// Tick period in milliseconds.
        #[arg(long)]
        ms: Option<f64>,
        /// Total animation time in milliseconds.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        easing: Option<Shape>,
        #[command(flatten)]
        playback: Playback,
    },
    /// Play a curve once per frame.
    Animate {
        #[arg(long)]
        frames: Option<f64>,
        #[arg(long)]
        ease: Option<Shape>,
        /// Refresh rate used to pace frames, in Hz.
        #[arg(long)]
        fps: Option<f64>,
        #[command(flatten)]
        playback: Playback,
    },
}
