// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// provmark — Provenance marking for documents and PDFs.
//
// Entry point. Initialises logging, loads configuration, and dispatches to
// single-file, batch, regenerate or verify mode. Failures are printed in plain
// language and turn into a non-zero exit status.

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use provmark_core::ProtectConfig;
use provmark_core::error::ProvmarkError;
use provmark_core::human_errors::humanize_error;
use provmark_protect::{
    ProtectContext, protect_batch, protect_single, regenerate_manifest, verify_output,
};
use provmark_security::manifest::{EntryStatus, manifest_path};

use args::{Args, Mode};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<ExitCode> {
    let mode = args.mode();
    if mode == Mode::Help {
        Args::command().print_help().context("failed to print help")?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &args.config {
        Some(path) => ProtectConfig::load(path)?,
        None => ProtectConfig::default(),
    };
    let ctx = ProtectContext::new(config);
    tracing::debug!(pdf = ctx.pdf().name(), "provmark starting");

    match mode {
        Mode::Help => Ok(ExitCode::SUCCESS),

        Mode::Single { input, output } => {
            let manifest = protect_single(&input, &output, &ctx)?;
            for doc in &manifest.documents {
                println!("Protected: {}", doc.protected_file());
            }
            println!("Manifest:  {}", manifest_path(&output).display());
            Ok(ExitCode::SUCCESS)
        }

        Mode::Batch { input, output } => {
            let (outcome, manifest) = protect_batch(&input, &output, args.pdf, &ctx)?;
            println!("Processed: {}", outcome.processed);
            println!("Skipped:   {}", outcome.skipped);
            match manifest {
                Some(_) => println!("Manifest:  {}", manifest_path(&output).display()),
                None => println!("No files protected; manifest not written."),
            }
            Ok(ExitCode::SUCCESS)
        }

        Mode::Regenerate(dir) => {
            let manifest = regenerate_manifest(&dir, &ctx)?;
            println!("Documents: {}", manifest.len());
            println!("Manifest:  {}", manifest_path(&dir).display());
            Ok(ExitCode::SUCCESS)
        }

        Mode::Verify(dir) => {
            let report = verify_output(&dir)?;
            for (file, status) in &report.entries {
                let label = match status {
                    EntryStatus::Intact => "ok",
                    EntryStatus::Modified { .. } => "MODIFIED",
                    EntryStatus::Missing => "MISSING",
                    EntryStatus::Unreadable { .. } => "UNREADABLE",
                    EntryStatus::Skipped => "skipped",
                };
                println!("{label:<9}{file}");
            }
            println!(
                "{} intact, {} modified, {} missing, {} unreadable, {} skipped",
                report.intact(),
                report.modified(),
                report.missing(),
                report.unreadable(),
                report.skipped()
            );
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Print a domain error in plain language, anything else as its chain.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ProvmarkError>() {
        Some(domain) => {
            let human = humanize_error(domain);
            eprintln!("error: {}", human.message);
            eprintln!("  hint: {}", human.suggestion);
            eprintln!("  scope: {}", human.scope.describe());
        }
        None => eprintln!("error: {err:#}"),
    }
}
