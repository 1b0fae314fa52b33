// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the furniture pipeline
///
/// Everything downstream of reply decoding degrades instead of failing:
/// malformed baselines, bad coordinates, and invalid boxes are recovered with
/// defaults and reported through [`crate::merge::MergeDiagnostics`].
#[derive(Error, Debug)]
pub enum Error {
    /// The model reply could not be decoded as JSON by any strategy.
    #[error("could not parse model reply as JSON: {0}")]
    ReplyParse(String),
}
