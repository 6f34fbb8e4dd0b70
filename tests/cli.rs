// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end coverage of the `reconstruct` binary, driving it the way a
//! caller would: JSON fixtures in, JSON tables out. Mirrors the pipeline
//! scenarios in spec section 8 (straight-edge inversion, out-of-range
//! requests).

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::tempdir;

fn straightedge_fixture(n: usize, edge_km: f64, fresnel_scale_km: f64) -> Value {
    let delta_rho = 0.05;
    let rho_km: Vec<f64> = (0..n).map(|i| i as f64 * delta_rho).collect();
    let t_hat: Vec<Value> = rho_km
        .iter()
        .map(|&rho| {
            // A monotonic sigmoid envelope standing in for the true Fresnel
            // edge transmittance: correct far-field asymptotics (0 deep in
            // shadow, 1 fully lit) without needing a numerically delicate
            // oscillatory quadrature in the test itself (the library's own
            // `math::fresnel` covers the exact integral in its unit tests).
            let power = erf_sigmoid((rho - edge_km) / fresnel_scale_km);
            let amplitude = power.sqrt();
            json!({ "re": amplitude, "im": 0.0 })
        })
        .collect();

    json!({
        "rho_km": rho_km,
        "t_hat": t_hat,
        "fresnel_scale_km": vec![fresnel_scale_km; n],
        "phi_rad": vec![0.0; n],
        "k_d_rad": vec![1.0e7; n],
        "ring_opening_angle_rad": vec![0.3; n],
        "spacecraft_distance_km": vec![1.2e6; n],
    })
}

/// `0.5*(1 + erf(x))`, a numerically stable stand-in for the Fresnel
/// integral's far-field step shape.
fn erf_sigmoid(x: f64) -> f64 {
    0.5 * (1.0 + erf(x))
}

/// Abramowitz & Stegun 7.1.26, accurate to about 1.5e-7.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

#[test]
fn invert_straightedge_recovers_transmittance_step() {
    let dir = tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let output_path = dir.path().join("reconstructed.json");

    let fixture = straightedge_fixture(2000, 50.0, 1.0);
    std::fs::write(&profile_path, fixture.to_string()).unwrap();

    Command::cargo_bin("reconstruct")
        .unwrap()
        .args([
            "invert",
            profile_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
            "--res-km",
            "0.5",
            "--no-progress",
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output_path).unwrap();
    let reconstructed: Value = serde_json::from_str(&contents).unwrap();
    let power = reconstructed["power"].as_array().unwrap();
    assert!(!power.is_empty());

    let first_power = power.first().unwrap().as_f64().unwrap();
    let last_power = power.last().unwrap().as_f64().unwrap();
    // Far on the shadowed side power is near 0; far on the lit side, near 1.
    assert!(first_power < 0.25, "first_power = {first_power}");
    assert!(last_power > 0.75, "last_power = {last_power}");
}

#[test]
fn invert_rejects_malformed_profile() {
    let dir = tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let output_path = dir.path().join("reconstructed.json");

    // t_hat is one element too short: fails `CalibratedProfile::validate`.
    let mut fixture = straightedge_fixture(50, 1.0, 1.0);
    fixture["t_hat"].as_array_mut().unwrap().pop();
    std::fs::write(&profile_path, fixture.to_string()).unwrap();

    Command::cargo_bin("reconstruct")
        .unwrap()
        .args([
            "invert",
            profile_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
            "--no-progress",
        ])
        .assert()
        .failure();
}

#[test]
fn plan_reports_out_of_range_samples_without_running_the_transform() {
    let dir = tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let output_path = dir.path().join("plan.json");

    let fixture = straightedge_fixture(200, 5.0, 1.0);
    std::fs::write(&profile_path, fixture.to_string()).unwrap();

    Command::cargo_bin("reconstruct")
        .unwrap()
        .args([
            "plan",
            profile_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output_path).unwrap();
    let plan: Value = serde_json::from_str(&contents).unwrap();
    let in_range = plan["in_range"].as_array().unwrap();
    assert_eq!(in_range.len(), 200);
    // Samples near the edges of a short profile can't fit a full window span.
    assert!(in_range.iter().any(|v| v.as_bool() == Some(false)));
}

#[test]
fn forward_ringlet_matches_fully_open_far_from_the_edges() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("forward.json");

    Command::cargo_bin("reconstruct")
        .unwrap()
        .args([
            "forward",
            "ringlet",
            "--rho-start",
            "-50",
            "--rho-stop",
            "50",
            "--rho-step",
            "1",
            "--fresnel-scale-km",
            "1.0",
            "--a",
            "-5",
            "--b",
            "5",
            "-o",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output_path).unwrap();
    let table: Value = serde_json::from_str(&contents).unwrap();
    let rho = table["rho_km"].as_array().unwrap();
    let t_hat = table["t_hat"].as_array().unwrap();
    assert_eq!(rho.len(), t_hat.len());

    // Far outside the ringlet (|rho| near 50 km, many Fresnel scales from the
    // edge), T should be close to fully open (magnitude near 1).
    let last = t_hat.last().unwrap();
    let re = last["re"].as_f64().unwrap();
    let im = last["im"].as_f64().unwrap();
    let mag = (re * re + im * im).sqrt();
    assert!((mag - 1.0).abs() < 0.05, "mag = {mag}");
}
