use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollseq", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at one scroll offset as a PNG.
    Frame(FrameArgs),
    /// Render every distinct frame over a scroll range into a directory of PNGs.
    Scrub(ScrubArgs),
    /// Print the file path of every frame in the sequence.
    Paths(PathsArgs),
}

#[derive(Parser, Debug)]
struct SurfaceArgs {
    /// Sequence config JSON.
    #[arg(long = "config")]
    config: PathBuf,

    /// Override the surface width from the config.
    #[arg(long)]
    width: Option<u32>,

    /// Override the surface height from the config.
    #[arg(long)]
    height: Option<u32>,

    /// Seconds to wait for every frame to finish loading.
    #[arg(long, default_value_t = 120)]
    load_timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Scroll offset in pixels from the top of the scroll region.
    #[arg(long, allow_negative_numbers = true)]
    scroll: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// First scroll offset in pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    from: f64,

    /// Last scroll offset in pixels; defaults to the end of the scroll region.
    #[arg(long, allow_negative_numbers = true)]
    to: Option<f64>,

    /// Scroll step in pixels between samples.
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct PathsArgs {
    /// Sequence config JSON.
    #[arg(long = "config")]
    config: PathBuf,

    /// Only print paths whose file is missing.
    #[arg(long)]
    missing: bool,
}

const MAX_SCRUB_SAMPLES: u64 = 1_000_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Paths(args) => cmd_paths(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<scrollseq::SequenceConfig> {
    scrollseq::SequenceConfig::from_json_path(path)
        .with_context(|| format!("load sequence config '{}'", path.display()))
}

fn start_session(args: &SurfaceArgs) -> anyhow::Result<scrollseq::ScrollSession> {
    let mut config = read_config(&args.config)?;
    if let Some(w) = args.width {
        config.viewport.width = w;
    }
    if let Some(h) = args.height {
        config.viewport.height = h;
    }

    let (mut session, mut queue) = scrollseq::ScrollSession::start(&config)?;
    queue.close();
    session
        .run_until_settled(
            queue.receiver(),
            Duration::from_secs(args.load_timeout_secs),
        )
        .context("preload frames")?;

    let store = session.store();
    if store.failed_count() > 0 {
        eprintln!(
            "warning: {} of {} frames failed to load and will be skipped",
            store.failed_count(),
            store.count().get()
        );
    }
    Ok(session)
}

fn write_png(path: &Path, mut frame: scrollseq::FrameRGBA) -> anyhow::Result<()> {
    frame.unpremultiply();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = start_session(&args.surface)?;
    let outcome = session.dispatch(scrollseq::ScrollEvent::ScrolledTo(args.scroll))?;
    tracing::debug!(?outcome, "scrolled");

    let frame = session.current_frame();
    if !session.store().is_ready(frame) {
        eprintln!("warning: frame {frame} is not available; output shows no frame");
    }
    write_png(&args.out, session.frame_rgba())?;
    eprintln!("wrote {} (frame {frame})", args.out.display());
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if !args.step.is_finite() || args.step <= 0.0 {
        anyhow::bail!("--step must be finite and > 0");
    }
    let mut session = start_session(&args.surface)?;
    let to = args.to.unwrap_or_else(|| session.scroll_distance());
    if !args.from.is_finite() || !to.is_finite() {
        anyhow::bail!("--from and --to must be finite");
    }

    let distance = (to - args.from).abs();
    let samples = (distance / args.step).ceil();
    if samples > MAX_SCRUB_SAMPLES as f64 {
        anyhow::bail!(
            "scrub from {} to {to} in steps of {} needs more than {MAX_SCRUB_SAMPLES} samples",
            args.from,
            args.step
        );
    }
    let samples = samples as u64;
    let direction = if to < args.from { -1.0 } else { 1.0 };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0u64;
    for k in 0..=samples {
        let offset = if k == samples {
            to
        } else {
            args.from + direction * k as f64 * args.step
        };
        let outcome = session.dispatch(scrollseq::ScrollEvent::ScrolledTo(offset))?;
        if !outcome.is_redraw() {
            continue;
        }
        let frame = session.current_frame();
        let path = args.out_dir.join(format!("frame_{:04}.png", frame.number()));
        write_png(&path, session.frame_rgba())?;
        written += 1;
    }

    eprintln!("wrote {written} frame(s) to {}", args.out_dir.display());
    Ok(())
}

fn cmd_paths(args: PathsArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config)?;
    for index in config.count.indices() {
        let path = scrollseq::frame_path(&config.frames, index);
        if args.missing && path.is_file() {
            continue;
        }
        println!("{}", path.display());
    }
    Ok(())
}
