// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `reconstruct plan`: build and print an [`InversionPlan`] without running
//! the transform, so range/resolution errors (spec section 8, end-to-end
//! scenarios 4 and 5) can be diagnosed before a full inversion.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use super::{read_structured, write_json, CliError};
use crate::data::{CalibratedProfile, ReconstructionOptions};
use crate::planner::InversionPlan;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the calibrated profile fixture (JSON).
    profile: PathBuf,

    /// Path to a `ReconstructionOptions` file (JSON or TOML).
    #[clap(long)]
    options: Option<PathBuf>,

    /// Override `ReconstructionOptions::res_km`.
    #[clap(long)]
    res_km: Option<f64>,

    /// Path to write the plan (JSON). If omitted, a summary is printed to
    /// stdout instead.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct PlanSummary {
    half_width_km: Vec<f64>,
    n_half_span: Vec<usize>,
    in_range: Vec<bool>,
}

impl PlanArgs {
    pub fn run(self) -> Result<(), CliError> {
        let profile: CalibratedProfile = read_structured(&self.profile)?;
        let mut options: ReconstructionOptions = match &self.options {
            Some(path) => read_structured(path)?,
            None => ReconstructionOptions::default(),
        };
        if let Some(res_km) = self.res_km {
            options.res_km = res_km;
        }

        let plan = InversionPlan::build(&profile, &options)
            .map_err(crate::RsrInvertError::from)?;

        let n_out_of_range = plan.in_range.iter().filter(|&&ok| !ok).count();
        if let Some(path) = &self.output {
            write_json(
                path,
                &PlanSummary {
                    half_width_km: plan.half_width_km,
                    n_half_span: plan.n_half_span,
                    in_range: plan.in_range,
                },
            )?;
        } else {
            println!("samples: {}", profile.len());
            println!("out of range: {n_out_of_range}");
            let max_span = plan.n_half_span.iter().copied().max().unwrap_or(0);
            println!("max half-span (samples): {max_span}");
            if let (Some(&first), Some(&last)) =
                (plan.half_width_km.first(), plan.half_width_km.last())
            {
                println!("half-width at first/last sample: {first:.6} km / {last:.6} km");
            }
        }
        Ok(())
    }
}
