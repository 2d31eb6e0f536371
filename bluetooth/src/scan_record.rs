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

//! Parsed projection of one received advertisement.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::address::BleAddress;
use crate::uuids;

/// Advertising data type assigned numbers, Bluetooth Assigned Numbers,
/// Section 2.3.
pub mod data_types {
    pub const FLAGS: u8 = 0x01;
    pub const INCOMPLETE_LIST_16_BIT_SERVICE_UUIDS: u8 = 0x02;
    pub const COMPLETE_LIST_16_BIT_SERVICE_UUIDS: u8 = 0x03;
    pub const INCOMPLETE_LIST_32_BIT_SERVICE_UUIDS: u8 = 0x04;
    pub const COMPLETE_LIST_32_BIT_SERVICE_UUIDS: u8 = 0x05;
    pub const INCOMPLETE_LIST_128_BIT_SERVICE_UUIDS: u8 = 0x06;
    pub const COMPLETE_LIST_128_BIT_SERVICE_UUIDS: u8 = 0x07;
    pub const SHORTENED_LOCAL_NAME: u8 = 0x08;
    pub const COMPLETE_LOCAL_NAME: u8 = 0x09;
    pub const TX_POWER_LEVEL: u8 = 0x0A;
    pub const LIST_16_BIT_SERVICE_SOLICITATION_UUIDS: u8 = 0x14;
    pub const LIST_128_BIT_SERVICE_SOLICITATION_UUIDS: u8 = 0x15;
    pub const SERVICE_DATA_16_BIT_UUID: u8 = 0x16;
    pub const LIST_32_BIT_SERVICE_SOLICITATION_UUIDS: u8 = 0x1F;
    pub const SERVICE_DATA_32_BIT_UUID: u8 = 0x20;
    pub const SERVICE_DATA_128_BIT_UUID: u8 = 0x21;
    pub const TRANSPORT_DISCOVERY_DATA: u8 = 0x26;
    pub const MANUFACTURER_SPECIFIC_DATA: u8 = 0xFF;
}

use data_types::*;

/// Read-only view of the data sections carried by one advertisement.
/// Built by [`ScanRecord::parse`]; filters query it, nothing mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRecord {
    flags: u8,
    device_name: Option<String>,
    tx_power_level: Option<i8>,
    service_uuids: Vec<Uuid>,
    solicitation_uuids: Vec<Uuid>,
    service_data: HashMap<Uuid, Vec<u8>>,
    manufacturer_data: HashMap<u16, Vec<u8>>,
    adv_data: HashMap<u8, Vec<u8>>,
}

impl ScanRecord {
    /// Parse a raw advertisement payload: a run of
    /// `[len, type, payload...]` sections. A malformed tail (zero length
    /// or a section overrunning the buffer) ends parsing; everything
    /// already extracted is kept, so a damaged advertisement degrades to
    /// a partial record instead of an error.
    pub fn parse(bytes: &[u8]) -> ScanRecord {
        let mut record = ScanRecord::default();
        let mut pos = 0;
        while pos < bytes.len() {
            let len = bytes[pos] as usize;
            if len == 0 {
                break;
            }
            if pos + len >= bytes.len() {
                debug!(
                    offset = pos,
                    "truncated advertising data section, keeping partial record"
                );
                break;
            }
            let ad_type = bytes[pos + 1];
            let payload = &bytes[pos + 2..pos + 1 + len];
            record.absorb(ad_type, payload);
            pos += len + 1;
        }
        record
    }

    fn absorb(&mut self, ad_type: u8, payload: &[u8]) {
        match ad_type {
            FLAGS => {
                if let Some(&flags) = payload.first() {
                    self.flags = flags;
                }
            }
            COMPLETE_LOCAL_NAME => {
                self.device_name = Some(String::from_utf8_lossy(payload).into_owned());
            }
            SHORTENED_LOCAL_NAME => {
                // A complete name wins over the shortened form.
                if self.device_name.is_none() {
                    self.device_name = Some(String::from_utf8_lossy(payload).into_owned());
                }
            }
            TX_POWER_LEVEL => {
                if let Some(&level) = payload.first() {
                    self.tx_power_level = Some(level as i8);
                }
            }
            INCOMPLETE_LIST_16_BIT_SERVICE_UUIDS | COMPLETE_LIST_16_BIT_SERVICE_UUIDS => {
                self.absorb_uuid_list(payload, 2, false)
            }
            INCOMPLETE_LIST_32_BIT_SERVICE_UUIDS | COMPLETE_LIST_32_BIT_SERVICE_UUIDS => {
                self.absorb_uuid_list(payload, 4, false)
            }
            INCOMPLETE_LIST_128_BIT_SERVICE_UUIDS | COMPLETE_LIST_128_BIT_SERVICE_UUIDS => {
                self.absorb_uuid_list(payload, 16, false)
            }
            LIST_16_BIT_SERVICE_SOLICITATION_UUIDS => self.absorb_uuid_list(payload, 2, true),
            LIST_32_BIT_SERVICE_SOLICITATION_UUIDS => self.absorb_uuid_list(payload, 4, true),
            LIST_128_BIT_SERVICE_SOLICITATION_UUIDS => self.absorb_uuid_list(payload, 16, true),
            SERVICE_DATA_16_BIT_UUID => self.absorb_service_data(payload, 2),
            SERVICE_DATA_32_BIT_UUID => self.absorb_service_data(payload, 4),
            SERVICE_DATA_128_BIT_UUID => self.absorb_service_data(payload, 16),
            MANUFACTURER_SPECIFIC_DATA => {
                if payload.len() >= 2 {
                    // Company identifier is little endian on the air.
                    let id = u16::from_le_bytes([payload[0], payload[1]]);
                    self.manufacturer_data.insert(id, payload[2..].to_vec());
                }
            }
            _ => {}
        }
        self.adv_data.insert(ad_type, payload.to_vec());
    }

    fn absorb_uuid_list(&mut self, payload: &[u8], width: usize, solicitation: bool) {
        let dest = if solicitation {
            &mut self.solicitation_uuids
        } else {
            &mut self.service_uuids
        };
        dest.extend(payload.chunks_exact(width).filter_map(uuids::from_le_slice));
    }

    fn absorb_service_data(&mut self, payload: &[u8], uuid_width: usize) {
        if payload.len() < uuid_width {
            return;
        }
        if let Some(uuid) = uuids::from_le_slice(&payload[..uuid_width]) {
            self.service_data
                .insert(uuid, payload[uuid_width..].to_vec());
        }
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn tx_power_level(&self) -> Option<i8> {
        self.tx_power_level
    }

    pub fn service_uuids(&self) -> &[Uuid] {
        &self.service_uuids
    }

    pub fn solicitation_uuids(&self) -> &[Uuid] {
        &self.solicitation_uuids
    }

    pub fn service_data(&self, uuid: &Uuid) -> Option<&[u8]> {
        self.service_data.get(uuid).map(Vec::as_slice)
    }

    pub fn manufacturer_data(&self, manufacturer_id: u16) -> Option<&[u8]> {
        self.manufacturer_data.get(&manufacturer_id).map(Vec::as_slice)
    }

    /// Raw payload of the last section seen for the given advertising
    /// data type, the form the advertising-data-type filter matches over.
    pub fn advertising_data(&self, ad_type: u8) -> Option<&[u8]> {
        self.adv_data.get(&ad_type).map(Vec::as_slice)
    }
}

/// One discovered advertisement as delivered to filters: the resolved
/// sender address (when the controller could resolve one), signal
/// strength, and the parsed record (when a payload was present).
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    address: Option<BleAddress>,
    rssi: Option<i16>,
    record: Option<ScanRecord>,
}

impl ScanResult {
    pub fn new(address: Option<BleAddress>, rssi: Option<i16>, record: Option<ScanRecord>) -> Self {
        ScanResult {
            address,
            rssi,
            record,
        }
    }

    pub fn address(&self) -> Option<BleAddress> {
        self.address
    }

    pub fn rssi(&self) -> Option<i16> {
        self.rssi
    }

    pub fn record(&self) -> Option<&ScanRecord> {
        self.record.as_ref()
    }
}
