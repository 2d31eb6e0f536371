// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Library error type. Every variant except `Parcel` and
/// `FailedPrecondition` is a construction-time validation failure; once a
/// value builds, using it cannot produce one of these.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The device address string is not in the canonical
    /// `"01:02:03:AB:CD:EF"` form (uppercase hex, colon separated).
    #[error("invalid device address {0:?}")]
    InvalidAddress(String),

    /// An optional field was set without the base field it qualifies,
    /// e.g. a service data mask without service data.
    #[error("{field} requires {requires} to be set")]
    RequiresCompanion {
        field: &'static str,
        requires: &'static str,
    },

    /// A bit mask must be exactly as long as the bytes it masks.
    #[error("size mismatch between {0} and its mask")]
    MaskLengthMismatch(&'static str),

    /// Manufacturer ids are assigned 16-bit company identifiers; the wire
    /// format carries -1 for "unset" and rejects other negatives.
    #[error("invalid manufacturer id {0}")]
    InvalidManufacturerId(i32),

    /// Advertising data types are assigned numbers in 0x01..=0xFF.
    #[error("invalid advertising data type {0}")]
    InvalidAdvertisingDataType(i32),

    /// An IRK on the wire must be exactly 16 octets.
    #[error("invalid irk length {0}, expected 16 octets")]
    InvalidIrkLength(usize),

    /// An IRK can only resolve a public or random static address.
    #[error("irk requires a public or random static device address")]
    IrkRequiresStaticAddress,

    /// Mutually exclusive advertising parameters were combined; the
    /// message names the offending pair.
    #[error("invalid advertising parameters: {0}")]
    InvalidCombination(&'static str),

    /// Directed advertising with no peer to direct at.
    #[error("directed advertising requires a peer address")]
    MissingPeerAddress,

    #[error("advertising interval {0} out of range")]
    InvalidInterval(i32),

    #[error("advertising tx power {0} out of range")]
    InvalidTxPower(i32),

    #[error("advertise timeout {0} ms exceeds the 180000 ms limit")]
    InvalidTimeout(i32),

    #[error("advertisement payload is {len} bytes, limit is {max}")]
    DataTooLarge { len: usize, max: usize },

    #[error("measurement duration {0} out of range")]
    InvalidDuration(i64),

    /// The operation needs state the caller has not set up, e.g. polling
    /// a scanner that was never started.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error(transparent)]
    Parcel(#[from] parcel::ParcelError),
}
