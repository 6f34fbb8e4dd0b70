// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thin entry point: all argument parsing, logging setup, and subcommand
//! dispatch live in `rsr_invert::Cli`, the same split `mwa_hyperdrive` draws
//! between its binary and its library.

fn main() {
    if let Err(e) = rsr_invert::Cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
