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

//! BLE scan filtering and advertising surface types.
//!
//! The centerpiece is [`ScanFilter`]: a validated, immutable set of
//! criteria evaluated against incoming [`ScanResult`]s. Around it sit
//! the advertising-side value objects ([`AdvertiseData`],
//! [`AdvertiseSettings`], [`AdvertisingSetParameters`],
//! [`DistanceMeasurementParams`]) and the [`api`] seam through which a
//! platform scanning backend feeds results in.

pub mod api;

mod address;
mod advertise;
mod distance;
mod error;
mod scan_filter;
mod scan_record;
mod transport_block;
pub mod uuids;

pub use address::{AddressType, BleAddress};
pub use advertise::{
    AdvertiseData, AdvertiseDataBuilder, AdvertiseMode, AdvertiseSettings,
    AdvertiseSettingsBuilder, AdvertiseTxPower, AdvertisingSetParameters,
    AdvertisingSetParametersBuilder, OwnAddressType, Phy, LIMITED_ADVERTISING_MAX_MILLIS,
    MAX_EXTENDED_ADVERTISE_DATA_BYTES, MAX_LEGACY_ADVERTISE_DATA_BYTES,
};
pub use distance::{
    DistanceMeasurementParams, DistanceMeasurementParamsBuilder, MeasurementMethod,
    ReportFrequency, DEFAULT_DURATION_SECONDS,
};
pub use error::Error;
pub use scan_filter::{ScanFilter, ScanFilterBuilder};
pub use scan_record::{data_types, ScanRecord, ScanResult};
pub use transport_block::{TdsMatch, TransportBlockFilter};
