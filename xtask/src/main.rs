use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

mod config;
mod manifest;

use config::ConfigFile;
use manifest::Manifest;

const CONFIG_PATH: &str = "extension/extension.toml";
const CRATE_NAME: &str = "hello-world-extension";
const STATIC_DIR: &str = "extension/static";
const ICONS_DIR: &str = "extension/assets/icons";
const DIST_DIR: &str = "dist";
const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Hello World extension task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the unpacked extension into dist/
    Build {
        /// Optimized build
        #[arg(short, long)]
        release: bool,
    },

    /// Render manifest.json from extension.toml
    Manifest {
        /// Output directory
        #[arg(short, long, default_value = DIST_DIR)]
        out: String,
    },

    /// Run all Rust tests
    Test,

    /// Run clippy linter
    Clippy,

    /// Remove dist/
    Clean,

    /// Start Chrome with dist/ loaded as an unpacked extension
    Browser {
        /// Chrome executable
        #[arg(long, env = "CHROME_BIN", default_value = "google-chrome")]
        chrome: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { release } => build(release),
        Commands::Manifest { out } => write_manifest(Path::new(&out)),
        Commands::Test => test(),
        Commands::Clippy => clippy(),
        Commands::Clean => clean(),
        Commands::Browser { chrome } => browser(&chrome),
    }
}

fn load_config() -> Result<ConfigFile> {
    let config = ConfigFile::load(CONFIG_PATH)?;
    config.validate()?;
    Ok(config.with_available_icons(Path::new(ICONS_DIR)))
}

fn build(release: bool) -> Result<()> {
    let config = load_config()?;
    let dist = Path::new(DIST_DIR);

    clean()?;

    println!("🔨 Building pages (wasm-pack)...");
    let profile_flag = if release { "--release" } else { "--dev" };
    run_cmd(
        "wasm-pack",
        &[
            "build",
            "extension",
            "--target",
            "web",
            "--out-dir",
            "../dist/pkg",
            "--no-typescript",
            profile_flag,
        ],
    )?;

    println!("🔨 Building background worker...");
    let mut cargo_args = vec![
        "build",
        "--package",
        CRATE_NAME,
        "--bin",
        "background",
        "--no-default-features",
        "--target",
        WASM_TARGET,
    ];
    if release {
        cargo_args.push("--release");
    }
    run_cmd("cargo", &cargo_args)?;

    let profile_dir = if release { "release" } else { "debug" };
    let background_wasm = format!("target/{}/{}/background.wasm", WASM_TARGET, profile_dir);
    run_cmd(
        "wasm-bindgen",
        &[
            "--target",
            "no-modules",
            "--no-typescript",
            "--out-dir",
            "dist/background_pkg",
            background_wasm.as_str(),
        ],
    )?;

    println!("📁 Copying static files...");
    copy_dir(Path::new(STATIC_DIR), dist)?;

    if let Some(icons) = &config.icons {
        copy_dir(Path::new(ICONS_DIR), &dist.join(&icons.directory))?;
    }

    write_manifest_with(&config, dist)?;

    println!("\n✅ Extension built in {}/", DIST_DIR);
    Ok(())
}

fn write_manifest(out: &Path) -> Result<()> {
    let config = load_config()?;
    write_manifest_with(&config, out)
}

fn write_manifest_with(config: &ConfigFile, out: &Path) -> Result<()> {
    Manifest::from_config(config).write(out)?;
    println!("  ✅ Created {}", out.join("manifest.json").display());
    Ok(())
}

fn test() -> Result<()> {
    println!("🧪 Running extension tests (without UI)...");
    run_cmd(
        "cargo",
        &["test", "--package", CRATE_NAME, "--no-default-features"],
    )?;

    println!("\n🧪 Running xtask tests...");
    run_cmd("cargo", &["test", "--package", "xtask"])?;
    Ok(())
}

fn clippy() -> Result<()> {
    println!("🔍 Running clippy on workspace (warnings as errors)...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    Ok(())
}

fn clean() -> Result<()> {
    let dist = Path::new(DIST_DIR);
    if dist.exists() {
        println!("🧹 Removing {}/...", DIST_DIR);
        fs::remove_dir_all(dist).context("Failed to remove dist directory")?;
    }
    Ok(())
}

fn browser(chrome: &str) -> Result<()> {
    let config = load_config()?;
    let dist = Path::new(DIST_DIR);
    if !dist.join("manifest.json").exists() {
        anyhow::bail!("{}/manifest.json not found, run `cargo xtask build` first", DIST_DIR);
    }

    let extension_path = fs::canonicalize(dist).context("Failed to resolve dist path")?;
    let extension_path = extension_path.display().to_string();

    println!("🚀 Starting Chrome with extension loaded...");
    println!("  Extension path: {}", extension_path);
    println!(
        "  Popup URL:  chrome-extension://<extension-id>/{}",
        config.pages.popup
    );
    println!(
        "  Config URL: chrome-extension://<extension-id>/{}",
        config.pages.options
    );
    println!("  Press Ctrl+C to stop the browser.");

    let disable_others = format!("--disable-extensions-except={}", extension_path);
    let load = format!("--load-extension={}", extension_path);
    run_cmd(
        chrome,
        &[
            disable_others.as_str(),
            load.as_str(),
            "--user-data-dir=target/chrome-profile",
            "--no-first-run",
        ],
    )
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

// Helper functions
fn run_cmd(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run: {} {}", program, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", program, args.join(" "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_dir_is_recursive() {
        let root = std::env::temp_dir().join(format!("xtask-copy-{}", std::process::id()));
        let src = root.join("src");
        let dst = root.join("dst");
        fs::create_dir_all(src.join("popup")).unwrap();
        fs::write(src.join("popup/popup.html"), "<html></html>").unwrap();

        copy_dir(&src, &dst).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("popup/popup.html")).unwrap(),
            "<html></html>"
        );
        fs::remove_dir_all(&root).unwrap();
    }
}
