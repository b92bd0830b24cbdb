use std::env;
use std::process::Command;

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let nproc = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let extra = env::var("KMDCT_FEATURES").unwrap_or_default();
    compute_config(nproc, &extra)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig { features }
}

fn cargo_with_features(args: &[&str], cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(args);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo_with_features(&["build"], cfg)
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    cargo_with_features(&["test"], cfg)
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    // the bench crate only forwards `parallel`
    let forwarded = BuildConfig {
        features: cfg
            .features
            .iter()
            .filter(|f| f.as_str() == "parallel")
            .cloned()
            .collect(),
    };
    cargo_with_features(&["bench", "--manifest-path", "kmdct-bench/Cargo.toml"], &forwarded)
}

pub fn demo_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--release",
        "--example",
        "batch_roundtrip",
        "--features",
        "verbose-logging",
    ]);
    cmd
}
