use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "follow-reel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated milestone table as JSON.
    Milestones(MilestonesArgs),
    /// Print the state of a single frame as JSON.
    Frame(FrameArgs),
    /// Evaluate a frame range and write one JSON state per line.
    Dump(DumpArgs),
    /// Evaluate every frame and print a SHA-256 digest of the serialized states.
    Digest(DigestArgs),
}

/// Video configuration, from a JSON file and/or individual overrides.
#[derive(Args, Debug)]
struct ReelArgs {
    /// Config JSON (`followerCount`, `theme`, `followers`, `width`, `height`, `fps`,
    /// `durationInFrames`). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Follower count.
    #[arg(long, allow_negative_numbers = true)]
    count: Option<f64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Integer frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Duration in frames.
    #[arg(long)]
    duration: Option<u64>,

    /// light, dim or lights-out.
    #[arg(long)]
    theme: Option<follow_reel::Theme>,

    /// Followers as a JSON array of `{"name", "image"?, "verified"?}`.
    #[arg(long)]
    followers: Option<String>,

    /// Shuffle the followers once, up front, with this seed.
    #[arg(long)]
    shuffle_seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ThreadingArgs {
    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Evaluate each distinct frame only once within a chunk.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

impl ThreadingArgs {
    fn to_threading(&self) -> follow_reel::EvalThreading {
        follow_reel::EvalThreading {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
            static_frame_elision: self.static_frame_elision,
        }
    }
}

#[derive(Parser, Debug)]
struct MilestonesArgs {
    #[command(flatten)]
    reel: ReelArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    reel: ReelArgs,

    /// Frame index; any integer, including negative ones.
    #[arg(long, allow_negative_numbers = true)]
    frame: i64,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    #[command(flatten)]
    reel: ReelArgs,

    #[command(flatten)]
    threading: ThreadingArgs,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the video duration.
    #[arg(long)]
    end: Option<u64>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DigestArgs {
    #[command(flatten)]
    reel: ReelArgs,

    #[command(flatten)]
    threading: ThreadingArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Milestones(args) => cmd_milestones(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Digest(args) => cmd_digest(args),
    }
}

fn load_config(args: &ReelArgs) -> anyhow::Result<follow_reel::ReelConfig> {
    let mut cfg = match &args.config {
        Some(path) => follow_reel::ReelConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => follow_reel::ReelConfig::default(),
    };

    if let Some(count) = args.count {
        cfg.follower_count = count;
    }
    if let Some(width) = args.width {
        cfg.width = width;
    }
    if let Some(height) = args.height {
        cfg.height = height;
    }
    if let Some(fps) = args.fps {
        cfg.fps = follow_reel::Fps::new(fps, 1)?;
    }
    if let Some(duration) = args.duration {
        cfg.duration_in_frames = duration;
    }
    if let Some(theme) = args.theme {
        cfg.theme = theme;
    }
    if let Some(json) = &args.followers {
        let followers: Vec<follow_reel::Entity> =
            serde_json::from_str(json).context("parse --followers JSON")?;
        cfg.followers = Some(followers);
    }
    if let Some(seed) = args.shuffle_seed {
        cfg = cfg.with_shuffled_followers(seed);
    }

    cfg.validate()?;
    Ok(cfg)
}

fn load_plan(args: &ReelArgs) -> anyhow::Result<follow_reel::ReelPlan> {
    let cfg = load_config(args)?;
    Ok(follow_reel::ReelPlan::new(&cfg)?)
}

fn cmd_milestones(args: MilestonesArgs) -> anyhow::Result<()> {
    let plan = load_plan(&args.reel)?;
    let json = serde_json::to_string_pretty(plan.milestones()).context("serialize milestones")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let plan = load_plan(&args.reel)?;
    let state = plan.evaluate_frame(args.frame);
    let json = serde_json::to_string_pretty(&state).context("serialize frame state")?;
    println!("{json}");
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let plan = load_plan(&args.reel)?;
    let end = args.end.unwrap_or(plan.duration_frames());
    let range = follow_reel::FrameRange::new(
        follow_reel::FrameIndex(args.start),
        follow_reel::FrameIndex(end),
    )?;
    let threading = args.threading.to_threading();

    let stats = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let file =
                File::create(path).with_context(|| format!("create '{}'", path.display()))?;
            let mut sink = follow_reel::JsonLinesSink::new(BufWriter::new(file));
            let stats = follow_reel::stream_frames(&plan, range, &threading, &mut sink)?;
            eprintln!("wrote {}", path.display());
            stats
        }
        None => {
            let mut sink = follow_reel::JsonLinesSink::new(BufWriter::new(std::io::stdout()));
            follow_reel::stream_frames(&plan, range, &threading, &mut sink)?
        }
    };

    eprintln!(
        "frames: {} total, {} evaluated, {} elided",
        stats.frames_total, stats.frames_evaluated, stats.frames_elided
    );
    Ok(())
}

/// Collects every state as one compact JSON line for hashing.
#[derive(Default)]
struct DigestSink {
    bytes: Vec<u8>,
}

impl follow_reel::StateSink for DigestSink {
    fn begin(&mut self, _cfg: follow_reel::SinkConfig) -> follow_reel::ReelResult<()> {
        self.bytes.clear();
        Ok(())
    }

    fn push_state(
        &mut self,
        _idx: follow_reel::FrameIndex,
        state: &follow_reel::TimelineState,
    ) -> follow_reel::ReelResult<()> {
        serde_json::to_writer(&mut self.bytes, state)?;
        self.bytes.write_all(b"\n")?;
        Ok(())
    }

    fn end(&mut self) -> follow_reel::ReelResult<()> {
        Ok(())
    }
}

fn cmd_digest(args: DigestArgs) -> anyhow::Result<()> {
    let plan = load_plan(&args.reel)?;
    let range = follow_reel::FrameRange::new(
        follow_reel::FrameIndex(0),
        follow_reel::FrameIndex(plan.duration_frames()),
    )?;
    let mut sink = DigestSink::default();
    let stats =
        follow_reel::stream_frames(&plan, range, &args.threading.to_threading(), &mut sink)?;

    println!("{}", sha256_hex(&sink.bytes));
    eprintln!("frames: {}", stats.frames_total);
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
