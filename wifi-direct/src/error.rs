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

/// Construction-time validation failures for the P2P config surface.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid mac address {0:?}")]
    InvalidMacAddress(String),

    #[error("network name must be non-empty")]
    EmptyNetworkName,

    #[error("network name exceeds {max} bytes", max = config_limits::MAX_SSID_BYTES)]
    NetworkNameTooLong(usize),

    #[error("network name must start with the prefix DIRECT-xy")]
    InvalidNetworkNamePrefix,

    #[error("passphrase length {0} outside the 8..=63 range")]
    PassphraseLength(usize),

    #[error("passphrase must be ascii")]
    PassphraseNotAscii,

    #[error("network name and passphrase must be both set or both empty")]
    PartialCredentials,

    #[error("peer address must be set if network name and passphrase are not set")]
    MissingIdentity,

    #[error("preferred frequency and band are mutually exclusive")]
    BandFrequencyConflict,

    #[error("unknown group operating band {0}")]
    InvalidBand(i32),

    #[error("unknown ip provisioning mode {0}")]
    InvalidIpProvisioningMode(i32),

    #[error("invalid wfd device type {0}")]
    InvalidWfdDeviceType(i32),

    #[error(transparent)]
    Parcel(#[from] parcel::ParcelError),
}

pub(crate) mod config_limits {
    /// Maximum number of bytes allowed for an SSID.
    pub const MAX_SSID_BYTES: usize = 32;
    pub const PASSPHRASE_MIN_LEN: usize = 8;
    pub const PASSPHRASE_MAX_LEN: usize = 63;
}
