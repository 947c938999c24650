use std::{
    io::{BufWriter, Write as _},
    path::PathBuf,
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "restyle", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a style script and print every commit as a JSON line.
    Play(PlayArgs),
    /// Parse and validate a style script.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input style script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Stop after this many frames.
    #[arg(long, default_value_t = 600)]
    max_frames: u64,

    /// Commit minimal diffs instead of static subsets.
    #[arg(long)]
    deterministic: bool,

    /// Pack `#rrggbb` colors into integers before committing.
    #[arg(long)]
    normalize_colors: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input style script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
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
        Command::Play(args) => cmd_play(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut script = restyle::StyleScript::load(&args.in_path)
        .with_context(|| format!("load script '{}'", args.in_path.display()))?;
    if args.deterministic {
        script.opts.strategy = restyle::StrategyKind::Deterministic;
    }
    if args.normalize_colors {
        script.opts.normalize_colors = true;
    }

    let sink = Rc::new(restyle::InMemoryCommitSink::new());
    let opts = restyle::PlaybackOpts {
        max_frames: args.max_frames,
        ..restyle::PlaybackOpts::default()
    };
    let stats = restyle::play(&script, &opts, sink.clone()).context("play script")?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for commit in sink.take() {
        let line = serde_json::json!({
            "targets": commit.targets,
            "props": commit.props,
        });
        serde_json::to_writer(&mut out, &line).context("write commit")?;
        out.write_all(b"\n").context("write commit")?;
    }
    out.flush().context("flush stdout")?;

    eprintln!(
        "{} frames, {} commits{}",
        stats.frames,
        stats.commits,
        if stats.settled { "" } else { " (not settled)" }
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let script = restyle::StyleScript::load(&args.in_path)
        .with_context(|| format!("load script '{}'", args.in_path.display()))?;
    println!(
        "ok: {} properties ({} animated) at {} fps",
        script.properties.len(),
        script.animated_count(),
        script.frames_per_second
    );
    Ok(())
}
