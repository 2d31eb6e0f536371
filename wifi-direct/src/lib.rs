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

//! Wi-Fi Direct (P2P) connection configuration surface types.

mod config;
mod error;
mod wfd_info;

pub use config::{
    GroupOperatingBand, IpProvisioningMode, MacAddress, WifiP2pConfig, WifiP2pConfigBuilder,
};
pub use error::Error;
pub use wfd_info::{WfdDeviceType, WifiP2pWfdInfo};

/// Total byte budget for vendor-specific information elements attached
/// to discovery frames. Part of the over-the-wire contract with the
/// supplicant layer.
pub const MAX_VENDOR_ELEMENTS_LEN_BYTES: usize = 512;
