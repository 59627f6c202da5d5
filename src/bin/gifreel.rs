use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gifreel", version)]
struct Cli {
    /// Log verbosity filter (e.g. `debug`, `gifreel=trace`).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print container metadata as JSON.
    Info(InfoArgs),
    /// Print the playback timeline as JSON.
    Timeline(TimelineArgs),
    /// Decode a single frame to a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input GIF.
    path: PathBuf,

    /// Load options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Input GIF.
    path: PathBuf,

    /// Load options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Loop forever regardless of the GIF's loop count.
    #[arg(long, default_value_t = false)]
    loop_forever: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input GIF.
    path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(serde::Serialize)]
struct InfoReport {
    frame_count: usize,
    loop_count: gifreel::LoopCount,
    reported_size: Option<gifreel::PixelSize>,
    actual_size: gifreel::PixelSize,
    frame_delays: Vec<f64>,
    all_frame_delays_same: bool,
    average_frame_delay: f64,
}

#[derive(serde::Serialize)]
struct TimelineReport {
    frame_count: usize,
    duration_secs: f64,
    key_times: Vec<f64>,
    repeat: gifreel::Repeat,
    repeat_count: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("parse --log filter")?)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<gifreel::LoadOpts> {
    let Some(path) = path else {
        return Ok(gifreel::LoadOpts::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let opts: gifreel::LoadOpts = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config JSON '{}'", path.display()))?;
    Ok(opts)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.config.as_deref())?;
    let mut reader = gifreel::Reader::with_codec(
        gifreel::GifCodec::new(opts.codec),
        gifreel::ImageSource::from_path(&args.path),
        opts.reader,
    )?;

    let report = InfoReport {
        frame_count: reader.frame_count(),
        loop_count: reader.loop_count(),
        reported_size: reader.reported_size(),
        actual_size: reader.actual_size(),
        frame_delays: reader.frame_delays().to_vec(),
        all_frame_delays_same: reader.are_all_frame_delays_the_same(),
        average_frame_delay: reader.average_frame_delay(),
    };
    print_json(&report)
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let mut opts = read_opts(args.config.as_deref())?;
    opts.loop_forever |= args.loop_forever;

    let loaded = gifreel::spawn_load(gifreel::ImageSource::from_path(&args.path), opts).wait()?;
    let timeline = loaded.timeline.with_context(|| {
        format!(
            "'{}' has {} frame(s); a timeline needs at least 2",
            args.path.display(),
            loaded.frame_count
        )
    })?;

    let report = TimelineReport {
        frame_count: timeline.frame_count(),
        duration_secs: timeline.duration_secs(),
        key_times: timeline.key_times().to_vec(),
        repeat: timeline.repeat(),
        repeat_count: timeline.repeat_count(),
    };
    print_json(&report)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut reader = gifreel::Reader::open(gifreel::ImageSource::from_path(&args.path))?;
    let frame = reader.try_frame(args.index)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.rgba8,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
