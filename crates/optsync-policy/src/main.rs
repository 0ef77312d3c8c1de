//! optsync-policy
//!
//! Usage: `optsync-policy <settings.xml> [overrides.yaml]`
//! - Prints the policy decision for every section of an existing file.
//! - Prints a freshly seeded document when the file does not exist yet.

use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use optsync_core::error::{OptSyncError, Result};
use optsync_core::SettingsDocument;
use optsync_policy::policy::seed_document;
use optsync_policy::{config, PolicyEngine, PolicySets, SectionDecision};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(settings_path) = args.first() else {
        eprintln!("usage: optsync-policy <settings.xml> [overrides.yaml]");
        return ExitCode::from(2);
    };

    match run(settings_path, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", e.code().as_str());
            ExitCode::FAILURE
        }
    }
}

fn run(settings_path: &str, overrides_path: Option<&str>) -> Result<()> {
    let engine = match overrides_path {
        Some(path) => {
            let overrides = config::load_from_file(path)?;
            tracing::info!(%path, "policy overrides loaded");
            PolicyEngine::new(PolicySets::builtin().with_overrides(&overrides))
        }
        None => PolicyEngine::builtin(),
    };

    if !Path::new(settings_path).exists() {
        tracing::info!(path = %settings_path, "settings file missing, seeding defaults");
        println!("{}", seed_document(&engine)?.to_xml_string()?);
        return Ok(());
    }

    let xml = std::fs::read_to_string(settings_path)
        .map_err(|e| OptSyncError::Internal(format!("read settings failed: {e}")))?;
    let doc = SettingsDocument::parse(&xml)?;

    for report in engine.evaluate(&doc)? {
        match report.decision {
            SectionDecision::Blocked => println!("BLOCK {}", report.section),
            SectionDecision::Allowed { skipped } if skipped.is_empty() => {
                println!("ALLOW {}", report.section)
            }
            SectionDecision::Allowed { skipped } => {
                println!("ALLOW {} (skip: {})", report.section, skipped.join(", "))
            }
        }
    }
    Ok(())
}
