use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use svgif::{
    AnimationDescriptor, Document, ExportOptions, ExportStage, Exporter, FrameDescriptor,
    FrameRenderer, QualityPreset, ResvgSurface,
};

#[derive(Parser, Debug)]
#[command(name = "svgif", version, about = "Export animated SVG to GIF")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export an animated SVG as a looping GIF.
    Export(ExportArgs),
    /// Print extracted animations and the frame plan as JSON.
    Inspect(InspectArgs),
    /// Render a single instant as a PNG.
    Frame(FrameArgs),
}

/// Options shared by every subcommand that resolves a timeline.
#[derive(Args, Debug)]
struct TimelineArgs {
    /// JSON file with export options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<f64>,

    /// Timeline length in seconds.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    timeline: TimelineArgs,

    /// Quality preset: high, medium, low or animation.
    #[arg(long, value_parser = parse_preset)]
    preset: Option<QualityPreset>,

    /// NeuQuant sampling factor (1 best, 30 fastest).
    #[arg(long)]
    quality: Option<i32>,

    /// Quantization worker threads (0 quantizes inline).
    #[arg(long)]
    workers: Option<usize>,

    /// Dithering kernel: floyd-steinberg, false-floyd-steinberg, stucki, atkinson or none.
    #[arg(long)]
    dither: Option<String>,

    /// Extra plays after the first (loops forever when omitted).
    #[arg(long)]
    repeat: Option<u16>,

    /// Print progress to stderr.
    #[arg(long, default_value_t = false)]
    progress: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    timeline: TimelineArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input SVG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline position in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    timeline: TimelineArgs,
}

#[derive(serde::Serialize)]
struct Inspection<'a> {
    width: u32,
    height: u32,
    duration: f64,
    frame_rate: f64,
    frame_delay_ms: u32,
    animations: &'a [AnimationDescriptor],
    frames: Vec<FrameDescriptor>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn parse_preset(raw: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(raw).ok_or_else(|| format!("unknown preset '{raw}'"))
}

fn read_svg(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read svg '{}'", path.display()))
}

fn load_options(args: &TimelineArgs) -> anyhow::Result<ExportOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            serde_json::from_str::<ExportOptions>(&raw)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => ExportOptions::default(),
    };
    opts.width = args.width.or(opts.width);
    opts.height = args.height.or(opts.height);
    opts.frame_rate = args.fps.or(opts.frame_rate);
    opts.duration = args.duration.or(opts.duration);
    Ok(opts)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let svg = read_svg(&args.in_path)?;
    let mut opts = load_options(&args.timeline)?;
    opts.quality_preset = args.preset.or(opts.quality_preset);
    opts.quality = args.quality.or(opts.quality);
    opts.workers = args.workers.or(opts.workers);
    opts.dither = args.dither.or(opts.dither);
    opts.repeat = args.repeat.or(opts.repeat);

    let show = args.progress;
    let out = Exporter::new(opts)
        .on_progress(move |p| {
            if !show {
                return;
            }
            match p.stage {
                ExportStage::Rendering { index, total } => {
                    eprintln!("[{:>3.0}%] frame {}/{}", p.progress * 100.0, index + 1, total);
                }
                stage => eprintln!("[{:>3.0}%] {stage:?}", p.progress * 100.0),
            }
        })
        .run(&svg)?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} frames, {:.2}s, {} bytes)",
        args.out.display(),
        out.width,
        out.height,
        out.frame_count,
        out.duration,
        out.bytes.len()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let svg = read_svg(&args.in_path)?;
    let opts = load_options(&args.timeline)?;
    let doc = Document::parse(&svg)?;
    let animations = svgif::extract::extract_document(&doc);
    let resolved = opts.resolve(&doc, &animations)?;
    let frames = resolved.timeline(&animations);

    let report = Inspection {
        width: resolved.encode.width,
        height: resolved.encode.height,
        duration: resolved.duration,
        frame_rate: resolved.frame_rate,
        frame_delay_ms: resolved.encode.frame_delay_ms,
        animations: &animations,
        frames,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.time.is_finite() && args.time >= 0.0,
        "--time must be a non-negative number of seconds"
    );
    let svg = read_svg(&args.in_path)?;
    let opts = load_options(&args.timeline)?;
    let doc = Document::parse(&svg)?;
    let animations = svgif::extract::extract_document(&doc);
    let resolved = opts.resolve(&doc, &animations)?;
    let (width, height) = (resolved.encode.width, resolved.encode.height);

    let mut renderer = FrameRenderer::new(&doc, &animations, ResvgSurface::new(), width, height);
    let frame = renderer.render_frame(args.time)?;

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
