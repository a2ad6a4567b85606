use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for mazewalk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in order
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Run the maze generation bench
    Bench,
    /// Verify a batch of mazes and script a short walk through the CLI
    Demo {
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Doc => doc()?,
        Commands::Bench => cargo("bench", &["bench", "-p", "mazewalk-maze"])?,
        Commands::Demo { seed } => demo(seed)?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `label` when it exits non-zero.
fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {label} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

/// Run the CLI through cargo with the given arguments.
fn run_cli(args: &[&str]) -> Result<()> {
    let mut full = vec!["run", "-q", "-p", "mazewalk-cli", "--"];
    full.extend_from_slice(args);
    cargo("run", &full)
}

fn demo(seed: u64) -> Result<()> {
    let seed = seed.to_string();
    run_cli(&["verify", "--seeds", "50"])?;
    run_cli(&["maze", "--width", "8", "--height", "6", "--seed", &seed])?;
    run_cli(&["walk", "--seed", &seed, "--script", "w+@0,a+@0.5,a-@0.9,w-@3"])
}
