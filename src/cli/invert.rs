// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `reconstruct invert`: run the Fresnel inversion engine over a calibrated
//! profile fixture and write the resulting [`ReconstructedProfile`] table.
//!
//! Reading raw receiver files and reconstructing SPICE geometry are out of
//! scope (spec section 1); this subcommand only ever consumes an
//! already-calibrated `CalibratedProfile` fixture (JSON) plus a
//! `ReconstructionOptions` (JSON or TOML), exactly the two structured values
//! the core is documented to accept.

use std::path::PathBuf;

use clap::Args;
use log::info;

use super::{read_structured, write_json, CliError};
use crate::data::{CalibratedProfile, RadialRange, ReconstructionOptions};
use crate::driver;
use crate::scalar::Precision;

#[derive(Args, Debug)]
pub struct InvertArgs {
    /// Path to the calibrated profile fixture (JSON).
    profile: PathBuf,

    /// Path to a `ReconstructionOptions` file (JSON or TOML). If omitted,
    /// the engine's defaults are used, overridden by any of the flags below.
    #[clap(long)]
    options: Option<PathBuf>,

    /// Path to write the reconstructed profile table (JSON).
    #[clap(short, long)]
    output: PathBuf,

    /// Override `ReconstructionOptions::res_km`.
    #[clap(long)]
    res_km: Option<f64>,

    /// Override the low end of `ReconstructionOptions::range`. Must be given
    /// together with `--range-hi-km`. Defaults to covering the whole profile
    /// when neither is given and `--options` didn't already set one.
    #[clap(long)]
    range_lo_km: Option<f64>,

    /// Override the high end of `ReconstructionOptions::range`. Must be
    /// given together with `--range-lo-km`.
    #[clap(long)]
    range_hi_km: Option<f64>,

    /// Override `ReconstructionOptions::normalize`.
    #[clap(long)]
    normalize: Option<bool>,

    /// Override `ReconstructionOptions::run_forward`.
    #[clap(long)]
    run_forward: Option<bool>,

    /// Suppress the progress bar (useful for piping output or CI logs).
    #[clap(long)]
    no_progress: bool,
}

impl InvertArgs {
    pub fn run(self) -> Result<(), CliError> {
        let profile: CalibratedProfile = read_structured(&self.profile)?;
        let has_options_file = self.options.is_some();
        let mut options: ReconstructionOptions = match &self.options {
            Some(path) => read_structured(path)?,
            None => ReconstructionOptions::default(),
        };
        if !has_options_file && self.range_lo_km.is_none() {
            // `ReconstructionOptions::default()`'s range is a narrow
            // placeholder; with no options file and no explicit override,
            // invert the whole profile.
            if let (Some(&first), Some(&last)) =
                (profile.rho_km.first(), profile.rho_km.last())
            {
                options.range = RadialRange { lo_km: first, hi_km: last };
            }
        }
        if let Some(res_km) = self.res_km {
            options.res_km = res_km;
        }
        match (self.range_lo_km, self.range_hi_km) {
            (Some(lo_km), Some(hi_km)) => options.range = RadialRange { lo_km, hi_km },
            (None, None) => {}
            _ => {
                return Err(CliError::MissingArgument(
                    "--range-lo-km and --range-hi-km must be given together".to_string(),
                ))
            }
        }
        if let Some(normalize) = self.normalize {
            options.normalize = normalize;
        }
        if let Some(run_forward) = self.run_forward {
            options.run_forward = run_forward;
        }

        info!(
            "inverting {} samples, strategy {:?}, resolution {} km",
            profile.len(),
            options.strategy,
            options.res_km
        );

        let bar = if self.no_progress {
            None
        } else {
            Some(indicatif::ProgressBar::new(profile.len() as u64))
        };
        let mut callback = bar.as_ref().map(|bar| {
            let cb: Box<dyn FnMut(usize, usize) + Send> = Box::new(move |done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            });
            cb
        });

        let reconstructed = match options.precision {
            Precision::F32 => driver::run::<f32>(&profile, &options, callback.as_deref_mut()),
            Precision::F64 => driver::run::<f64>(&profile, &options, callback.as_deref_mut()),
        }
        .map_err(crate::RsrInvertError::from)?;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        write_json(&self.output, &reconstructed)?;
        info!(
            "wrote {} reconstructed samples to {}",
            reconstructed.rho_km.len(),
            self.output.display()
        );
        Ok(())
    }
}
