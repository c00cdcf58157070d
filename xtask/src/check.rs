//! Workspace-wide quality checks.
//!
//! Every check is a function from the shell to a `Result`; `check` reports
//! them all, `ci` additionally exits non-zero on the first failing run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use xshell::{Shell, cmd};

/// Library crates held to the Layer 0 and safety standards.
const LIBRARY_CRATES: &[&str] = &[
    "terrain-types",
    "terrain-repair",
    "terrain-feasibility",
    "terrain-mesh",
    "terrain-course",
    "terrain",
];

type Check = fn(&Shell) -> Result<()>;

const CHECKS: &[(&str, Check)] = &[
    ("Formatting", run_fmt_check),
    ("Clippy", run_clippy),
    ("Tests", run_tests),
    ("Documentation", run_doc_check),
    ("Safety", run_safety_scan),
    ("Layer 0", run_layer0_check),
];

/// Run all checks. Outside CI mode failures are reported but don't fail.
pub fn run(ci_mode: bool) -> Result<()> {
    let sh = Shell::new()?;

    println!();
    println!("{}", "Terrain Quality Check".bold());
    println!("{}", "=====================".bold());
    println!();

    let mut all_passed = true;
    for (name, check) in CHECKS {
        println!("{}", format!("Running {name}...").dimmed());
        let result = check(&sh);
        report_result(name, &result);
        all_passed &= result.is_ok();
    }

    println!();

    if all_passed {
        println!("{}", "✓ All checks passed!".green().bold());
        Ok(())
    } else if ci_mode {
        println!("{}", "✗ Some checks failed.".red().bold());
        std::process::exit(1);
    } else {
        println!("{}", "⚠ Some checks failed. Fix before committing.".yellow());
        Ok(())
    }
}

/// Run full CI suite
pub fn run_ci() -> Result<()> {
    let sh = Shell::new()?;

    println!();
    println!("{}", "Terrain CI Suite".bold());
    println!("{}", "================".bold());
    println!();

    let total = CHECKS.len();
    let mut failures = Vec::new();
    for (step, (name, check)) in CHECKS.iter().enumerate() {
        println!("{}", format!("Step {}/{total}: {name}...", step + 1).cyan());
        match check(&sh) {
            Ok(()) => println!("  {} {name} OK", "✓".green()),
            Err(e) => {
                println!("  {} {name} failed", "✗".red());
                failures.push(format!("{name}: {e:#}"));
            }
        }
    }

    println!();

    if failures.is_empty() {
        println!("{}", "═══════════════════════════════════════".green());
        println!("{}", "  ✓ CI PASSED - Ready to push".green().bold());
        println!("{}", "═══════════════════════════════════════".green());
        Ok(())
    } else {
        println!("{}", "═══════════════════════════════════════".red());
        println!("{}", "  ✗ CI FAILED".red().bold());
        println!("{}", "═══════════════════════════════════════".red());
        println!();
        println!("Failures:");
        for f in &failures {
            println!("  - {}", f.red());
        }
        std::process::exit(1);
    }
}

fn report_result(name: &str, result: &Result<()>) {
    match result {
        Ok(()) => println!("  {} {}", "✓".green(), name),
        Err(e) => println!("  {} {} - {:#}", "✗".red(), name, e),
    }
}

fn run_fmt_check(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo fmt --all -- --check")
        .run()
        .context("Formatting check failed")?;
    Ok(())
}

fn run_clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --workspace --all-targets --all-features -- -D warnings")
        .run()
        .context("Clippy check failed")?;
    Ok(())
}

fn run_tests(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo test --workspace --all-features")
        .run()
        .context("Tests failed")?;
    Ok(())
}

fn run_doc_check(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo doc --workspace --no-deps --all-features")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run()
        .context("Documentation build failed")?;
    Ok(())
}

/// Counts `.unwrap()` / `.expect(` in library sources, ignoring comments and
/// everything from a file's `#[cfg(test)]` module on.
fn run_safety_scan(sh: &Shell) -> Result<()> {
    let root = sh.current_dir().join("terrain");
    let mut files = Vec::new();
    for name in LIBRARY_CRATES {
        collect_sources(&root.join(name).join("src"), &mut files)?;
    }

    let mut violations = Vec::new();
    for file in &files {
        let source = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        for (number, line) in source.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            if line.contains(".unwrap()") || line.contains(".expect(") {
                violations.push(format!("{}:{}", file.display(), number + 1));
            }
        }
    }

    if !violations.is_empty() {
        for v in &violations {
            println!("    {}", v.dimmed());
        }
        bail!("Found {} unwrap/expect calls in library code", violations.len());
    }
    Ok(())
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Fails if any library crate pulls in bevy.
fn run_layer0_check(sh: &Shell) -> Result<()> {
    for name in LIBRARY_CRATES {
        let tree = cmd!(sh, "cargo tree -p {name} -e normal --prefix none")
            .read()
            .with_context(|| format!("cargo tree failed for {name}"))?;
        if tree.lines().any(|line| line.starts_with("bevy")) {
            bail!("{name} depends on bevy");
        }
    }
    Ok(())
}
