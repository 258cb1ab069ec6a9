use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for nes-shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy and the full test suite
    Ci,
    /// Run tests, optionally limited to one area of the crate
    Test {
        #[arg(long, value_enum)]
        only: Option<Suite>,
    },
    /// Run the criterion benchmarks
    Bench,
    /// Run the headless shell demo
    Demo {
        /// Optional ROM file handed to the demo core
        rom_path: Option<String>,
        /// Log level passed through RUST_LOG
        #[arg(short = 'l', long, default_value = "info")]
        log_level: String,
        #[arg(long)]
        release: bool,
    },
}

/// Test selections; each pairs a library module with its integration suite
#[derive(Clone, Copy, ValueEnum)]
enum Suite {
    Compositor,
    Overlay,
    Areas,
    Shell,
}

impl Suite {
    fn targets(self) -> (&'static str, &'static str) {
        match self {
            Suite::Compositor => ("compositor", "compositor_tests"),
            Suite::Overlay => ("overlay", "compositor_tests"),
            Suite::Areas => ("areas", "surface_tests"),
            Suite::Shell => ("shell", "shell_tests"),
        }
    }
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Ci => run_ci(),
        Commands::Test { only } => run_test(only),
        Commands::Bench => cargo(&["bench"]),
        Commands::Demo {
            rom_path,
            log_level,
            release,
        } => run_demo(rom_path.as_deref(), &log_level, release),
    }
}

fn run_ci() -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());
    let start = Instant::now();

    let steps: [(&str, &[&str]); 3] = [
        ("Format Check", &["fmt", "--all", "--", "--check"]),
        (
            "Clippy",
            &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        ),
        ("Test", &["test", "--workspace"]),
    ];

    for (name, args) in steps {
        println!("{} {}", "→".blue(), name);
        if let Err(e) = cargo(args) {
            println!("{} {} failed", "✗".red().bold(), name);
            return Err(e);
        }
    }

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
    Ok(())
}

fn run_test(only: Option<Suite>) -> Result<()> {
    let Some(suite) = only else {
        return cargo(&["test"]);
    };

    let (module, integration) = suite.targets();
    println!("{} Running {} tests", "→".blue(), module.bold());
    cargo(&["test", "--lib", module])?;
    cargo(&["test", "--test", integration])?;
    println!("{} {} tests passed", "✓".green(), module);
    Ok(())
}

fn run_demo(rom_path: Option<&str>, log_level: &str, release: bool) -> Result<()> {
    println!("{}", "=== Shell Demo ===".bold().blue());

    let mut args = vec!["run", "--bin", "nes-shell"];
    if release {
        args.push("--release");
    }
    if let Some(rom_path) = rom_path {
        if !Path::new(rom_path).exists() {
            anyhow::bail!("ROM file not found: {}", rom_path);
        }
        println!("{} ROM file: {}", "✓".green(), rom_path.cyan());
        args.extend(["--", rom_path]);
    }
    println!("{} Log level: {}\n", "→".blue(), log_level.bold());

    let mut cmd = Command::new("cargo");
    cmd.args(&args).env("RUST_LOG", log_level);
    execute(&mut cmd)
}

fn cargo(args: &[&str]) -> Result<()> {
    execute(Command::new("cargo").args(args))
}

fn execute(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }
    Ok(())
}
