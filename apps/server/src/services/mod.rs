// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clients for the external predictor backends.

pub mod detector;
pub mod diffusion;
pub mod model;

pub use detector::{DetectorClient, DetectorOutput};
pub use diffusion::DiffusionClient;
pub use model::ModelClient;
