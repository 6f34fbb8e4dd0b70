// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `reconstruct` binary's command-line surface. Three subcommands mirror
//! the driver's entry points: `invert` runs a full Fresnel inversion,
//! `forward` runs a closed-form diffraction model standalone, and `plan`
//! prints an [`crate::planner::InversionPlan`] without running the
//! transform, for diagnosing range/resolution errors up front.
//!
//! This module owns the only `fern` logger configuration in the crate; every
//! other module only ever calls `log::{debug, trace, warn}` and never
//! touches the logging backend, the same split `mwa_hyperdrive` draws
//! between its `src/cli` binary wiring and the rest of the library.

mod forward;
mod invert;
mod plan;

pub use forward::ForwardArgs;
pub use invert::InvertArgs;
pub use plan::PlanArgs;

use clap::Parser;
use thiserror::Error;

use crate::RsrInvertError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Reconstruction(#[from] RsrInvertError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to decode JSON from {file}: {err}")]
    JsonDecode { file: String, err: String },
    #[error("failed to encode JSON: {0}")]
    JsonEncode(serde_json::Error),
    #[error("failed to decode TOML from {file}: {err}")]
    TomlDecode { file: String, err: String },
    #[error("unrecognised input file extension on {0}; expected .json or .toml")]
    UnrecognisedExtension(String),
    #[error("{0}")]
    Logging(#[from] fern::InitError),
    #[error("{0}")]
    MissingArgument(String),
}

#[derive(Parser, Debug)]
#[clap(name = "reconstruct", author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// The verbosity of the program. Repeat for more detail: `-v` for info,
    /// `-vv` for debug, `-vvv` for trace. The default is warnings only.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the Fresnel inversion over a calibrated profile and write a
    /// reconstructed profile table.
    Invert(InvertArgs),
    /// Run a closed-form diffraction forward model standalone.
    Forward(ForwardArgs),
    /// Print the per-sample window half-widths and index spans an inversion
    /// would use, without running the transform.
    Plan(PlanArgs),
}

impl Cli {
    pub fn run() -> Result<(), CliError> {
        let cli = Cli::parse();
        setup_logging(cli.verbosity)?;
        match cli.command {
            Command::Invert(args) => args.run(),
            Command::Forward(args) => args.run(),
            Command::Plan(args) => args.run(),
        }
    }
}

fn setup_logging(verbosity: u8) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let colors = fern::colors::ColoredLevelConfig::new()
        .error(fern::colors::Color::Red)
        .warn(fern::colors::Color::Yellow)
        .info(fern::colors::Color::Green)
        .debug(fern::colors::Color::Blue)
        .trace(fern::colors::Color::Magenta);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

/// Read either a `.json` or `.toml` file, dispatching on extension. Shared
/// by all three subcommands since `ReconstructionOptions` (and fixture
/// profiles) may be supplied in either form.
fn read_structured<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("json") => serde_json::from_str(&contents).map_err(|e| CliError::JsonDecode {
            file: path.display().to_string(),
            err: e.to_string(),
        }),
        Some("toml") => toml::from_str(&contents).map_err(|e| CliError::TomlDecode {
            file: path.display().to_string(),
            err: e.to_string(),
        }),
        _ => Err(CliError::UnrecognisedExtension(path.display().to_string())),
    }
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<(), CliError> {
    let contents = serde_json::to_string_pretty(value).map_err(CliError::JsonEncode)?;
    std::fs::write(path, contents)?;
    Ok(())
}
