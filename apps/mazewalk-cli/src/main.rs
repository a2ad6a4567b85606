use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use mazewalk_input::Key;
use mazewalk_maze::MazeGenerator;
use mazewalk_motion::MotionEvent;
use mazewalk_scene::{Scene, SceneConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mazewalk-cli", about = "Headless driver for the maze walk demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate a maze and print it
    Maze {
        #[arg(long, default_value = "10")]
        width: usize,
        #[arg(long, default_value = "10")]
        height: usize,
        #[arg(long, default_value = "0")]
        start_x: usize,
        #[arg(long, default_value = "0")]
        start_y: usize,
        /// RNG seed; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum, default_value = "ascii")]
        format: Format,
    },
    /// Generate many seeded mazes and check each one is perfect
    Verify {
        #[arg(long, default_value = "20")]
        width: usize,
        #[arg(long, default_value = "20")]
        height: usize,
        /// Number of seeds to try, starting at 0
        #[arg(long, default_value = "100")]
        seeds: u64,
    },
    /// Run the scene headlessly with a scripted key sequence
    Walk {
        /// Number of frames to simulate
        #[arg(long, default_value = "300")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Key edges as KEY(+|-)@SECONDS, comma separated, e.g. "w+@0,a+@1,a-@1.5,w-@3"
        #[arg(long, default_value = "w+@0,w-@2")]
        script: String,
        /// Overrides the maze seed from the config
        #[arg(short, long)]
        seed: Option<u64>,
        /// Start from the furnished-room preset instead of the plain maze
        #[arg(long)]
        experiment: bool,
    },
}

/// One scripted key edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct KeyEdge {
    at: f32,
    key: Key,
    pressed: bool,
}

fn parse_script(script: &str) -> Result<Vec<KeyEdge>> {
    let mut edges = Vec::new();
    for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (head, at) = token
            .split_once('@')
            .with_context(|| format!("missing '@' in script entry '{token}'"))?;
        let at: f32 = at
            .trim()
            .parse()
            .with_context(|| format!("bad time in script entry '{token}'"))?;
        let head = head.trim();
        let pressed = match head.chars().last() {
            Some('+') => true,
            Some('-') => false,
            _ => bail!("script entry '{token}' must end its key with + or -"),
        };
        let key = Key::parse(&head[..head.len() - 1])
            .with_context(|| format!("bad key in script entry '{token}'"))?;
        if !(at.is_finite() && at >= 0.0) {
            bail!("script entry '{token}' has a negative or non-finite time");
        }
        edges.push(KeyEdge { at, key, pressed });
    }
    edges.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(edges)
}

/// Passages every perfect maze of this area has; rejects empty or overflowing areas.
fn passages_per_maze(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|rooms| rooms.checked_sub(1))
        .with_context(|| format!("maze area {width}x{height} must be positive and fit in memory"))
}

fn load_config(path: Option<&PathBuf>, experiment: bool) -> Result<SceneConfig> {
    match path {
        Some(_) if experiment => bail!("--experiment and --config are mutually exclusive"),
        Some(p) => SceneConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None if experiment => Ok(SceneConfig::experiment()),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mazewalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", mazewalk_common::crate_info());
            println!("maze: {}", mazewalk_maze::crate_info());
            println!("motion: {}", mazewalk_motion::crate_info());
            println!("input: {}", mazewalk_input::crate_info());
            println!("scene: {}", mazewalk_scene::crate_info());
        }
        Commands::Maze {
            width,
            height,
            start_x,
            start_y,
            seed,
            format,
        } => {
            let mut generator = match seed {
                Some(s) => MazeGenerator::seeded(s),
                None => MazeGenerator::from_entropy(),
            };
            let grid = generator.generate(width, height, start_x, start_y)?;
            match format {
                Format::Ascii => print!("{grid}"),
                Format::Json => println!("{}", serde_json::to_string(&grid)?),
            }
        }
        Commands::Verify {
            width,
            height,
            seeds,
        } => {
            let passages = passages_per_maze(width, height)?;
            println!("Verifying {seeds} mazes of {width}x{height}");
            let mut failures = 0u64;
            for seed in 0..seeds {
                let grid = MazeGenerator::seeded(seed).generate(width, height, 0, 0)?;
                if !grid.is_perfect() {
                    tracing::error!(seed, "maze is not perfect");
                    failures += 1;
                }
            }
            if failures > 0 {
                bail!("{failures} of {seeds} mazes failed the perfect-maze check");
            }
            println!("All {seeds} mazes OK ({passages} passages each)");
        }
        Commands::Walk {
            frames,
            dt,
            script,
            seed,
            experiment,
        } => {
            if !(dt.is_finite() && dt > 0.0) {
                bail!("--dt must be a positive number of seconds");
            }
            let edges = parse_script(&script)?;
            let mut config = load_config(cli.config.as_ref(), experiment)?;
            if seed.is_some() {
                config.maze.seed = seed;
            }
            let mut scene = Scene::build(config)?;
            println!("{}", scene.summary());

            let mut pending = edges.iter().peekable();
            let mut rejected = 0usize;
            for frame in 0..frames {
                let now = frame as f32 * dt;
                while let Some(edge) = pending.next_if(|e| e.at <= now) {
                    let action = scene.handle_key(edge.key, edge.pressed);
                    tracing::debug!(?action, at = edge.at, "scripted key");
                }
                scene.update(dt);
                for event in scene.controller_mut().drain_events() {
                    match event {
                        MotionEvent::PhaseChanged { from, to } => {
                            println!("[{now:7.3}s] {from:?} -> {to:?}");
                        }
                        MotionEvent::MoveRejected { .. } => rejected += 1,
                        MotionEvent::Teleported { to } => {
                            println!("[{now:7.3}s] teleported to {:?}", to.position);
                        }
                    }
                }
            }

            println!("{}", scene.summary());
            println!(
                "Rejected moves: {rejected}, avg frame: {:?}",
                scene.frame_timer().average()
            );
        }
    }

    Ok(())
}
