use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for kmdct")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    /// fmt followed by clippy
    Analyze,
    Bench,
    /// Run the batch round-trip demo with logging enabled
    Demo,
}

fn run(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn {:?}", cmd))?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd, status);
    }
    Ok(())
}

#[cfg(not(test))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run(build_command(&cfg)),
        Commands::Test => run(test_command(&cfg)),
        Commands::Clippy => run(clippy_command()),
        Commands::Fmt => run(fmt_command()),
        Commands::Analyze => {
            run(fmt_command())?;
            run(clippy_command())
        }
        Commands::Bench => run(bench_command(&cfg)),
        Commands::Demo => run(demo_command()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_demo_command() {
        let cli = Cli::parse_from(["xtask", "demo"]);
        assert!(matches!(cli.command, Commands::Demo));
    }

    #[test]
    fn run_reports_failure() {
        assert!(run(Command::new("false")).is_err());
    }
}
