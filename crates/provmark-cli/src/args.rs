// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "provmark",
    version,
    about = "Embed provenance headers and footers in documents and record their hashes in a manifest"
)]
pub struct Args {
    /// File or directory to protect
    pub input: Option<PathBuf>,

    /// Output directory (default: <input parent>/protected)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Protect every supported file in INPUT (a directory)
    #[arg(short, long)]
    pub batch: bool,

    /// Regenerate manifest.json from the protected files on disk
    #[arg(short, long)]
    pub manifest: bool,

    /// Include PDF files in batch mode
    #[arg(short, long)]
    pub pdf: bool,

    /// Check the files listed in INPUT/manifest.json against their hashes
    #[arg(long)]
    pub verify: bool,

    /// JSON configuration file (organization details, generator)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Help,
    Verify(PathBuf),
    Regenerate(PathBuf),
    Batch { input: PathBuf, output: PathBuf },
    Single { input: PathBuf, output: PathBuf },
}

impl Args {
    /// Resolve flags into a single mode. `--verify` wins over `--manifest`,
    /// which wins over protection.
    pub fn mode(&self) -> Mode {
        let input = self.input.as_deref();
        if self.verify {
            return match input {
                Some(dir) => Mode::Verify(dir.to_path_buf()),
                None => match &self.output {
                    Some(out) => Mode::Verify(out.clone()),
                    None => Mode::Help,
                },
            };
        }
        if self.manifest {
            return match (input, &self.output) {
                (Some(dir), _) if dir.is_dir() => Mode::Regenerate(dir.to_path_buf()),
                (_, Some(out)) => Mode::Regenerate(out.clone()),
                (Some(file), None) => Mode::Regenerate(default_output(file)),
                (None, None) => Mode::Help,
            };
        }
        let Some(input) = input else {
            return Mode::Help;
        };
        let output = self.output.clone().unwrap_or_else(|| default_output(input));
        if self.batch {
            Mode::Batch {
                input: input.to_path_buf(),
                output,
            }
        } else {
            Mode::Single {
                input: input.to_path_buf(),
                output,
            }
        }
    }
}

fn default_output(input: &Path) -> PathBuf {
    provmark_core::types::default_output_dir(input)
}
