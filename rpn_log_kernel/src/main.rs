/// Postfix log — Fixture Harness
///
/// Loads display fixtures, rebuilds each log, and compares the rendered
/// output and canonical hash against the recorded expectations.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rpn_log_kernel::fixtures::load_fixtures;

#[derive(Debug, Parser)]
#[command(name = "rpn-log-harness", about = "Check postfix log display fixtures")]
struct Args {
    /// Fixture file; searched in the usual locations when omitted.
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

const DEFAULT_FIXTURE_PATHS: [&str; 3] = [
    "tests/golden/fixtures.json",
    "rpn_log_kernel/tests/golden/fixtures.json",
    "../rpn_log_kernel/tests/golden/fixtures.json",
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let path = match args.fixtures {
        Some(p) => p,
        None => match DEFAULT_FIXTURE_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            Some(p) => p.to_path_buf(),
            None => {
                tracing::error!("no fixture file found; pass --fixtures <path>");
                std::process::exit(2);
            }
        },
    };

    let fixtures = match load_fixtures(&path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to load {}: {}", path.display(), e);
            std::process::exit(2);
        }
    };
    tracing::info!("Loaded {} fixtures from: {}", fixtures.len(), path.display());

    let mut total = 0;
    let mut passed = 0;

    for fixture in &fixtures {
        total += 1;
        let outcome = match fixture.check() {
            Ok(o) => o,
            Err(e) => {
                println!("[FAIL] {}: {}", fixture.name, e);
                continue;
            }
        };

        if outcome.passed() {
            passed += 1;
            println!(
                "[PASS] {}: entries={}, hash={}",
                outcome.name,
                fixture.entries.len(),
                outcome.hash
            );
            continue;
        }

        println!("[FAIL] {}:", outcome.name);
        if !outcome.output_match {
            println!("  Output mismatch:");
            println!("    got:      {:?}", outcome.rendered);
            println!("    expected: {:?}", fixture.expected_output);
        }
        if !outcome.hash_match {
            println!(
                "  Hash mismatch: got={} expected={}",
                outcome.hash,
                fixture.expected_hash.as_deref().unwrap_or("")
            );
        }
        if !outcome.deterministic {
            println!("  Two displays of the same log differed");
        }
    }

    println!("\n===========================================");
    println!("Results: {}/{} passed", passed, total);
    if passed == total {
        println!("[OK] All display fixtures PASSED.");
    } else {
        println!("[FAIL] Some fixtures failed.");
        std::process::exit(1);
    }
}
