// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `reconstruct forward`: evaluate one of the closed-form diffraction
//! forward models (spec section 2's "Diffraction forward models" component,
//! SPEC_FULL.md B.1) over a radial grid, standalone, for validation against
//! known-truth fixtures (spec section 8, end-to-end scenario 1).

use std::path::PathBuf;

use clap::{ArgEnum, Args};
use log::info;
use num_complex::Complex;
use serde::Serialize;

use super::{write_json, CliError};
use crate::forward;

#[derive(Clone, Copy, Debug, ArgEnum)]
pub enum Aperture {
    Ringlet,
    Gap,
    Straightedge,
    SingleSlit,
    DoubleSlit,
    SquareWave,
}

#[derive(Args, Debug)]
pub struct ForwardArgs {
    /// Which canonical aperture to model.
    #[clap(arg_enum)]
    aperture: Aperture,

    /// Radial grid start [km].
    #[clap(long)]
    rho_start: f64,

    /// Radial grid stop [km], inclusive.
    #[clap(long)]
    rho_stop: f64,

    /// Radial grid step [km].
    #[clap(long)]
    rho_step: f64,

    /// Local Fresnel scale [km].
    #[clap(long)]
    fresnel_scale_km: f64,

    /// First aperture edge / slit-0 lower edge [km]. Unused for
    /// `straightedge`, which uses `edge` instead.
    #[clap(long)]
    a: Option<f64>,
    /// Second aperture edge / slit-0 upper edge [km].
    #[clap(long)]
    b: Option<f64>,
    /// Slit-1 lower edge [km] (`double-slit` only).
    #[clap(long)]
    a1: Option<f64>,
    /// Slit-1 upper edge [km] (`double-slit` only).
    #[clap(long)]
    b1: Option<f64>,
    /// Straight-edge location [km] (`straightedge` only).
    #[clap(long)]
    edge: Option<f64>,
    /// Grating period [km] (`square-wave` only).
    #[clap(long)]
    period: Option<f64>,
    /// Grating duty cycle in `[0, 1]` (`square-wave` only).
    #[clap(long)]
    duty: Option<f64>,
    /// Number of Fourier harmonics to sum (`square-wave` only).
    #[clap(long, default_value_t = 16)]
    n_terms: u32,

    /// Path to write the modeled `T_hat` table (JSON).
    #[clap(short, long)]
    output: PathBuf,
}

#[derive(Serialize)]
struct ForwardTable {
    rho_km: Vec<f64>,
    t_hat: Vec<Complex<f64>>,
}

impl ForwardArgs {
    pub fn run(self) -> Result<(), CliError> {
        let require = |name: &str, v: Option<f64>| -> Result<f64, CliError> {
            v.ok_or_else(|| {
                CliError::MissingArgument(format!("--{name} is required for this aperture"))
            })
        };

        let mut rho_km = Vec::new();
        let mut rho = self.rho_start;
        while rho <= self.rho_stop + self.rho_step * 1e-9 {
            rho_km.push(rho);
            rho += self.rho_step;
        }

        let f = self.fresnel_scale_km;
        let t_hat: Vec<Complex<f64>> = match self.aperture {
            Aperture::Ringlet => {
                let a = require("a", self.a)?;
                let b = require("b", self.b)?;
                rho_km.iter().map(|&rho| forward::ringlet(rho, a, b, f)).collect()
            }
            Aperture::Gap => {
                let a = require("a", self.a)?;
                let b = require("b", self.b)?;
                rho_km.iter().map(|&rho| forward::gap(rho, a, b, f)).collect()
            }
            Aperture::Straightedge => {
                let edge = require("edge", self.edge)?;
                rho_km
                    .iter()
                    .map(|&rho| forward::straightedge(rho, edge, f))
                    .collect()
            }
            Aperture::SingleSlit => {
                let a = require("a", self.a)?;
                let b = require("b", self.b)?;
                rho_km
                    .iter()
                    .map(|&rho| forward::single_slit(rho, a, b, f))
                    .collect()
            }
            Aperture::DoubleSlit => {
                let a0 = require("a", self.a)?;
                let b0 = require("b", self.b)?;
                let a1 = require("a1", self.a1)?;
                let b1 = require("b1", self.b1)?;
                rho_km
                    .iter()
                    .map(|&rho| forward::double_slit(rho, a0, b0, a1, b1, f))
                    .collect()
            }
            Aperture::SquareWave => {
                let period = require("period", self.period)?;
                let duty = require("duty", self.duty)?;
                rho_km
                    .iter()
                    .map(|&rho| forward::square_wave(rho, period, duty, self.n_terms, f))
                    .collect()
            }
        };

        info!("modeled {} samples for {:?}", rho_km.len(), self.aperture);
        write_json(&self.output, &ForwardTable { rho_km, t_hat })
    }
}
