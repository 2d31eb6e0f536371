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

//! Transmit-side advertising configuration: payload assembly and the
//! parameter objects handed to the advertising subsystem.

use std::collections::HashMap;

use parcel::{Parcel, ParcelReader};
use uuid::Uuid;

use crate::address::BleAddress;
use crate::scan_record::data_types::*;
use crate::uuids::{self, ShortForm};
use crate::Error;

/// Payload budget of a legacy advertising PDU.
pub const MAX_LEGACY_ADVERTISE_DATA_BYTES: usize = 31;
/// Payload budget of an extended advertising PDU.
pub const MAX_EXTENDED_ADVERTISE_DATA_BYTES: usize = 254;
/// Longest advertise timeout accepted by the controller contract.
pub const LIMITED_ADVERTISING_MAX_MILLIS: i32 = 180_000;

// Advertising interval bounds in 0.625 ms units.
const INTERVAL_MIN: i32 = 160; // 100 ms
const INTERVAL_MAX: i32 = 0xFF_FFFF; // 10485.759375 sec

const TX_POWER_MIN: i32 = -127;
const TX_POWER_MAX: i32 = 1;

/// Content of an outgoing advertisement. The dual of
/// [`ScanRecord`](crate::ScanRecord): what this serializes, `parse`
/// projects back out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvertiseData {
    service_uuids: Vec<Uuid>,
    solicitation_uuids: Vec<Uuid>,
    service_data: HashMap<Uuid, Vec<u8>>,
    manufacturer_data: HashMap<u16, Vec<u8>>,
    include_tx_power_level: bool,
    include_device_name: bool,
}

impl AdvertiseData {
    pub fn builder() -> AdvertiseDataBuilder {
        AdvertiseDataBuilder::default()
    }

    pub fn service_uuids(&self) -> &[Uuid] {
        &self.service_uuids
    }

    pub fn solicitation_uuids(&self) -> &[Uuid] {
        &self.solicitation_uuids
    }

    pub fn service_data(&self) -> &HashMap<Uuid, Vec<u8>> {
        &self.service_data
    }

    pub fn manufacturer_data(&self) -> &HashMap<u16, Vec<u8>> {
        &self.manufacturer_data
    }

    pub fn include_tx_power_level(&self) -> bool {
        self.include_tx_power_level
    }

    pub fn include_device_name(&self) -> bool {
        self.include_device_name
    }

    /// Serialize to raw advertising data sections. UUID lists are packed
    /// in their shortest form, grouped by width for transmission
    /// efficiency. The device name and TX power level live outside this
    /// object and are supplied by the advertiser.
    pub fn to_bytes(&self, device_name: Option<&str>, tx_power_level: Option<i8>) -> Vec<u8> {
        let mut out = Vec::new();

        append_uuid_lists(
            &mut out,
            &self.service_uuids,
            [
                COMPLETE_LIST_16_BIT_SERVICE_UUIDS,
                COMPLETE_LIST_32_BIT_SERVICE_UUIDS,
                COMPLETE_LIST_128_BIT_SERVICE_UUIDS,
            ],
        );
        append_uuid_lists(
            &mut out,
            &self.solicitation_uuids,
            [
                LIST_16_BIT_SERVICE_SOLICITATION_UUIDS,
                LIST_32_BIT_SERVICE_SOLICITATION_UUIDS,
                LIST_128_BIT_SERVICE_SOLICITATION_UUIDS,
            ],
        );

        let mut service_data: Vec<_> = self.service_data.iter().collect();
        service_data.sort();
        for (uuid, data) in service_data {
            let (ad_type, mut section) = match uuids::short_form(uuid) {
                ShortForm::U16(short) => {
                    (SERVICE_DATA_16_BIT_UUID, short.to_le_bytes().to_vec())
                }
                ShortForm::U32(short) => {
                    (SERVICE_DATA_32_BIT_UUID, short.to_le_bytes().to_vec())
                }
                ShortForm::Full(full) => {
                    let le: Vec<u8> = full.into_bytes().iter().rev().copied().collect();
                    (SERVICE_DATA_128_BIT_UUID, le)
                }
            };
            section.extend_from_slice(data);
            append_section(&mut out, ad_type, &section);
        }

        let mut manufacturer_data: Vec<_> = self.manufacturer_data.iter().collect();
        manufacturer_data.sort();
        for (id, data) in manufacturer_data {
            let mut section = id.to_le_bytes().to_vec();
            section.extend_from_slice(data);
            append_section(&mut out, MANUFACTURER_SPECIFIC_DATA, &section);
        }

        if self.include_device_name {
            if let Some(name) = device_name {
                append_section(&mut out, COMPLETE_LOCAL_NAME, name.as_bytes());
            }
        }
        if self.include_tx_power_level {
            if let Some(level) = tx_power_level {
                append_section(&mut out, TX_POWER_LEVEL, &[level as u8]);
            }
        }

        out
    }

    /// Over-the-air size of the serialized payload.
    pub fn total_bytes(&self, device_name: Option<&str>, tx_power_level: Option<i8>) -> usize {
        self.to_bytes(device_name, tx_power_level).len()
    }

    /// Enforce the legacy 31-byte budget for the assembled payload.
    pub fn check_legacy_fit(
        &self,
        device_name: Option<&str>,
        tx_power_level: Option<i8>,
    ) -> Result<(), Error> {
        let len = self.total_bytes(device_name, tx_power_level);
        if len > MAX_LEGACY_ADVERTISE_DATA_BYTES {
            return Err(Error::DataTooLarge {
                len,
                max: MAX_LEGACY_ADVERTISE_DATA_BYTES,
            });
        }
        Ok(())
    }
}

fn append_section(dest: &mut Vec<u8>, ad_type: u8, payload: &[u8]) {
    let len = payload.len().min(MAX_EXTENDED_ADVERTISE_DATA_BYTES);
    dest.push((len + 1) as u8);
    dest.push(ad_type);
    dest.extend_from_slice(&payload[..len]);
}

fn append_uuid_lists(dest: &mut Vec<u8>, list: &[Uuid], ad_types: [u8; 3]) {
    let mut packed16 = Vec::new();
    let mut packed32 = Vec::new();
    let mut packed128 = Vec::new();
    for uuid in list {
        match uuids::short_form(uuid) {
            ShortForm::U16(short) => packed16.extend_from_slice(&short.to_le_bytes()),
            ShortForm::U32(short) => packed32.extend_from_slice(&short.to_le_bytes()),
            ShortForm::Full(full) => {
                packed128.extend(full.into_bytes().iter().rev());
            }
        }
    }
    for (ad_type, packed) in ad_types.into_iter().zip([packed16, packed32, packed128]) {
        if !packed.is_empty() {
            append_section(dest, ad_type, &packed);
        }
    }
}

/// Builder for [`AdvertiseData`]. All content is optional, so building
/// cannot fail; size limits are checked against the assembled payload by
/// [`AdvertiseData::check_legacy_fit`] where they apply.
#[derive(Debug, Default, Clone)]
pub struct AdvertiseDataBuilder {
    data: AdvertiseData,
}

impl AdvertiseDataBuilder {
    pub fn add_service_uuid(mut self, uuid: Uuid) -> Self {
        self.data.service_uuids.push(uuid);
        self
    }

    pub fn add_solicitation_uuid(mut self, uuid: Uuid) -> Self {
        self.data.solicitation_uuids.push(uuid);
        self
    }

    pub fn add_service_data(mut self, uuid: Uuid, data: impl Into<Vec<u8>>) -> Self {
        self.data.service_data.insert(uuid, data.into());
        self
    }

    pub fn add_manufacturer_data(mut self, id: u16, data: impl Into<Vec<u8>>) -> Self {
        self.data.manufacturer_data.insert(id, data.into());
        self
    }

    pub fn include_tx_power_level(mut self, include: bool) -> Self {
        self.data.include_tx_power_level = include;
        self
    }

    pub fn include_device_name(mut self, include: bool) -> Self {
        self.data.include_device_name = include;
        self
    }

    pub fn build(self) -> AdvertiseData {
        self.data
    }
}

/// Advertise duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvertiseMode {
    #[default]
    LowPower,
    Balanced,
    LowLatency,
}

/// Coarse TX power buckets for legacy advertising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvertiseTxPower {
    UltraLow,
    Low,
    #[default]
    Medium,
    High,
}

/// Legacy advertising settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertiseSettings {
    mode: AdvertiseMode,
    tx_power: AdvertiseTxPower,
    connectable: bool,
    discoverable: bool,
    timeout_millis: i32,
}

impl AdvertiseSettings {
    pub fn builder() -> AdvertiseSettingsBuilder {
        AdvertiseSettingsBuilder::default()
    }

    pub fn mode(&self) -> AdvertiseMode {
        self.mode
    }

    pub fn tx_power(&self) -> AdvertiseTxPower {
        self.tx_power
    }

    pub fn connectable(&self) -> bool {
        self.connectable
    }

    pub fn discoverable(&self) -> bool {
        self.discoverable
    }

    /// 0 means advertise until stopped.
    pub fn timeout_millis(&self) -> i32 {
        self.timeout_millis
    }
}

#[derive(Debug, Clone)]
pub struct AdvertiseSettingsBuilder {
    mode: AdvertiseMode,
    tx_power: AdvertiseTxPower,
    connectable: bool,
    discoverable: bool,
    timeout_millis: i32,
}

impl Default for AdvertiseSettingsBuilder {
    fn default() -> Self {
        AdvertiseSettingsBuilder {
            mode: AdvertiseMode::default(),
            tx_power: AdvertiseTxPower::default(),
            connectable: true,
            discoverable: true,
            timeout_millis: 0,
        }
    }
}

impl AdvertiseSettingsBuilder {
    pub fn mode(mut self, mode: AdvertiseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tx_power(mut self, tx_power: AdvertiseTxPower) -> Self {
        self.tx_power = tx_power;
        self
    }

    pub fn connectable(mut self, connectable: bool) -> Self {
        self.connectable = connectable;
        self
    }

    pub fn discoverable(mut self, discoverable: bool) -> Self {
        self.discoverable = discoverable;
        self
    }

    pub fn timeout_millis(mut self, timeout_millis: i32) -> Self {
        self.timeout_millis = timeout_millis;
        self
    }

    pub fn build(self) -> Result<AdvertiseSettings, Error> {
        if !(0..=LIMITED_ADVERTISING_MAX_MILLIS).contains(&self.timeout_millis) {
            return Err(Error::InvalidTimeout(self.timeout_millis));
        }
        Ok(AdvertiseSettings {
            mode: self.mode,
            tx_power: self.tx_power,
            connectable: self.connectable,
            discoverable: self.discoverable,
            timeout_millis: self.timeout_millis,
        })
    }
}

/// Advertising PHY. Coded PHY is only valid on extended advertising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phy {
    #[default]
    Le1M,
    Le2M,
    LeCoded,
}

/// Whose address goes in the advertisement header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnAddressType {
    /// Let the stack pick.
    #[default]
    Default,
    Public,
    Random,
}

/// Parameters of one extended advertising set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisingSetParameters {
    legacy_mode: bool,
    anonymous: bool,
    connectable: bool,
    scannable: bool,
    include_tx_power: bool,
    directed: bool,
    high_duty_cycle: bool,
    peer_address: Option<BleAddress>,
    primary_phy: Phy,
    secondary_phy: Phy,
    interval: i32,
    tx_power_level: i32,
    own_address_type: OwnAddressType,
}

impl AdvertisingSetParameters {
    pub fn builder() -> AdvertisingSetParametersBuilder {
        AdvertisingSetParametersBuilder::default()
    }

    pub fn legacy_mode(&self) -> bool {
        self.legacy_mode
    }

    pub fn anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn connectable(&self) -> bool {
        self.connectable
    }

    pub fn scannable(&self) -> bool {
        self.scannable
    }

    pub fn include_tx_power(&self) -> bool {
        self.include_tx_power
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn high_duty_cycle(&self) -> bool {
        self.high_duty_cycle
    }

    pub fn peer_address(&self) -> Option<BleAddress> {
        self.peer_address
    }

    pub fn primary_phy(&self) -> Phy {
        self.primary_phy
    }

    pub fn secondary_phy(&self) -> Phy {
        self.secondary_phy
    }

    /// In 0.625 ms units.
    pub fn interval(&self) -> i32 {
        self.interval
    }

    /// In dBm.
    pub fn tx_power_level(&self) -> i32 {
        self.tx_power_level
    }

    pub fn own_address_type(&self) -> OwnAddressType {
        self.own_address_type
    }
}

#[derive(Debug, Clone)]
pub struct AdvertisingSetParametersBuilder {
    legacy_mode: bool,
    anonymous: bool,
    connectable: bool,
    scannable: bool,
    include_tx_power: bool,
    directed: bool,
    high_duty_cycle: bool,
    peer_address: Option<BleAddress>,
    primary_phy: Phy,
    secondary_phy: Phy,
    interval: i32,
    tx_power_level: i32,
    own_address_type: OwnAddressType,
}

impl Default for AdvertisingSetParametersBuilder {
    fn default() -> Self {
        AdvertisingSetParametersBuilder {
            legacy_mode: false,
            anonymous: false,
            connectable: false,
            scannable: false,
            include_tx_power: false,
            directed: false,
            high_duty_cycle: false,
            peer_address: None,
            primary_phy: Phy::default(),
            secondary_phy: Phy::default(),
            interval: INTERVAL_MIN,
            tx_power_level: -7,
            own_address_type: OwnAddressType::default(),
        }
    }
}

impl AdvertisingSetParametersBuilder {
    pub fn legacy_mode(mut self, legacy: bool) -> Self {
        self.legacy_mode = legacy;
        self
    }

    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    pub fn connectable(mut self, connectable: bool) -> Self {
        self.connectable = connectable;
        self
    }

    pub fn scannable(mut self, scannable: bool) -> Self {
        self.scannable = scannable;
        self
    }

    pub fn include_tx_power(mut self, include: bool) -> Self {
        self.include_tx_power = include;
        self
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn high_duty_cycle(mut self, high_duty_cycle: bool) -> Self {
        self.high_duty_cycle = high_duty_cycle;
        self
    }

    pub fn peer_address(mut self, address: BleAddress) -> Self {
        self.peer_address = Some(address);
        self
    }

    pub fn primary_phy(mut self, phy: Phy) -> Self {
        self.primary_phy = phy;
        self
    }

    pub fn secondary_phy(mut self, phy: Phy) -> Self {
        self.secondary_phy = phy;
        self
    }

    pub fn interval(mut self, interval: i32) -> Self {
        self.interval = interval;
        self
    }

    pub fn tx_power_level(mut self, dbm: i32) -> Self {
        self.tx_power_level = dbm;
        self
    }

    pub fn own_address_type(mut self, own_address_type: OwnAddressType) -> Self {
        self.own_address_type = own_address_type;
        self
    }

    pub fn build(self) -> Result<AdvertisingSetParameters, Error> {
        if self.legacy_mode {
            if self.anonymous {
                return Err(Error::InvalidCombination(
                    "legacy advertisement can't be anonymous",
                ));
            }
            if self.include_tx_power {
                return Err(Error::InvalidCombination(
                    "legacy advertisement can't include tx power in the header",
                ));
            }
            if self.directed && (!self.connectable || self.scannable) {
                return Err(Error::InvalidCombination(
                    "directed legacy advertisement must be connectable and non-scannable",
                ));
            }
        } else {
            if self.connectable && self.scannable {
                return Err(Error::InvalidCombination(
                    "extended advertisement can't be both connectable and scannable",
                ));
            }
            if self.anonymous && self.connectable {
                return Err(Error::InvalidCombination(
                    "extended advertisement can't be anonymous and connectable",
                ));
            }
            if self.high_duty_cycle {
                return Err(Error::InvalidCombination(
                    "high duty cycle directed advertising is legacy only",
                ));
            }
        }
        if self.directed && self.peer_address.is_none() {
            return Err(Error::MissingPeerAddress);
        }
        if !(INTERVAL_MIN..=INTERVAL_MAX).contains(&self.interval) {
            return Err(Error::InvalidInterval(self.interval));
        }
        if !(TX_POWER_MIN..=TX_POWER_MAX).contains(&self.tx_power_level) {
            return Err(Error::InvalidTxPower(self.tx_power_level));
        }
        Ok(AdvertisingSetParameters {
            legacy_mode: self.legacy_mode,
            anonymous: self.anonymous,
            connectable: self.connectable,
            scannable: self.scannable,
            include_tx_power: self.include_tx_power,
            directed: self.directed,
            high_duty_cycle: self.high_duty_cycle,
            peer_address: self.peer_address,
            primary_phy: self.primary_phy,
            secondary_phy: self.secondary_phy,
            interval: self.interval,
            tx_power_level: self.tx_power_level,
            own_address_type: self.own_address_type,
        })
    }
}

impl AdvertiseSettings {
    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_i32(self.mode as i32);
        parcel.write_i32(self.tx_power as i32);
        parcel.write_i32(self.connectable as i32);
        parcel.write_i32(self.discoverable as i32);
        parcel.write_i32(self.timeout_millis);
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let mode = match reader.read_i32()? {
            0 => AdvertiseMode::LowPower,
            1 => AdvertiseMode::Balanced,
            2 => AdvertiseMode::LowLatency,
            _ => return Err(Error::InvalidCombination("unknown advertise mode")),
        };
        let tx_power = match reader.read_i32()? {
            0 => AdvertiseTxPower::UltraLow,
            1 => AdvertiseTxPower::Low,
            2 => AdvertiseTxPower::Medium,
            3 => AdvertiseTxPower::High,
            _ => return Err(Error::InvalidCombination("unknown advertise tx power")),
        };
        let connectable = reader.read_presence()?;
        let discoverable = reader.read_presence()?;
        let timeout_millis = reader.read_i32()?;
        AdvertiseSettings::builder()
            .mode(mode)
            .tx_power(tx_power)
            .connectable(connectable)
            .discoverable(discoverable)
            .timeout_millis(timeout_millis)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_record::ScanRecord;
    use crate::uuids::from_u16;
    use uuid::uuid;

    #[test]
    fn advertise_data_round_trips_through_scan_record() {
        let custom = uuid!("f81d4fae-7dec-11d0-a765-00a0c91e6bf6");
        let data = AdvertiseData::builder()
            .add_service_uuid(from_u16(0x180D))
            .add_service_uuid(custom)
            .add_solicitation_uuid(from_u16(0x180F))
            .add_service_data(from_u16(0x180D), [0x01, 0x02])
            .add_manufacturer_data(0x00E0, [0xBE, 0xEF])
            .include_device_name(true)
            .include_tx_power_level(true)
            .build();

        let bytes = data.to_bytes(Some("beacon"), Some(-8));
        let record = ScanRecord::parse(&bytes);

        assert!(record.service_uuids().contains(&from_u16(0x180D)));
        assert!(record.service_uuids().contains(&custom));
        assert_eq!(record.solicitation_uuids(), [from_u16(0x180F)]);
        assert_eq!(record.service_data(&from_u16(0x180D)), Some(&[0x01, 0x02][..]));
        assert_eq!(record.manufacturer_data(0x00E0), Some(&[0xBE, 0xEF][..]));
        assert_eq!(record.device_name(), Some("beacon"));
        assert_eq!(record.tx_power_level(), Some(-8));
    }

    #[test]
    fn legacy_budget_is_enforced() {
        let small = AdvertiseData::builder()
            .add_service_data(from_u16(0x180D), vec![0u8; 4])
            .build();
        assert!(small.check_legacy_fit(None, None).is_ok());

        let large = AdvertiseData::builder()
            .add_service_data(from_u16(0x180D), vec![0u8; 40])
            .build();
        assert!(matches!(
            large.check_legacy_fit(None, None),
            Err(Error::DataTooLarge { max: MAX_LEGACY_ADVERTISE_DATA_BYTES, .. })
        ));
    }

    #[test]
    fn total_bytes_counts_section_overhead() {
        let data = AdvertiseData::builder()
            .add_service_data(from_u16(0x180D), [0x01, 0x02])
            .build();
        // len + type + 2-byte uuid + 2 payload bytes
        assert_eq!(data.total_bytes(None, None), 6);
    }

    #[test]
    fn settings_timeout_bounds() {
        let settings = AdvertiseSettings::builder()
            .timeout_millis(LIMITED_ADVERTISING_MAX_MILLIS)
            .build()
            .unwrap();
        assert_eq!(settings.timeout_millis(), LIMITED_ADVERTISING_MAX_MILLIS);

        assert_eq!(
            AdvertiseSettings::builder()
                .timeout_millis(LIMITED_ADVERTISING_MAX_MILLIS + 1)
                .build(),
            Err(Error::InvalidTimeout(LIMITED_ADVERTISING_MAX_MILLIS + 1))
        );
        assert!(AdvertiseSettings::builder().timeout_millis(-1).build().is_err());
    }

    #[test]
    fn settings_parcel_round_trip() {
        let settings = AdvertiseSettings::builder()
            .mode(AdvertiseMode::LowLatency)
            .tx_power(AdvertiseTxPower::High)
            .connectable(false)
            .timeout_millis(5_000)
            .build()
            .unwrap();
        let mut parcel = Parcel::new();
        settings.write_to_parcel(&mut parcel);
        let mut reader = ParcelReader::new(parcel.as_bytes());
        let decoded = AdvertiseSettings::read_from_parcel(&mut reader).unwrap();
        reader.finish().unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn legacy_set_cannot_be_anonymous() {
        assert_eq!(
            AdvertisingSetParameters::builder()
                .legacy_mode(true)
                .anonymous(true)
                .build(),
            Err(Error::InvalidCombination(
                "legacy advertisement can't be anonymous"
            ))
        );
    }

    #[test]
    fn legacy_set_cannot_include_tx_power_header() {
        assert!(AdvertisingSetParameters::builder()
            .legacy_mode(true)
            .include_tx_power(true)
            .build()
            .is_err());
    }

    #[test]
    fn directed_legacy_must_be_connectable_non_scannable() {
        assert!(AdvertisingSetParameters::builder()
            .legacy_mode(true)
            .directed(true)
            .scannable(true)
            .connectable(true)
            .peer_address("01:02:03:AB:CD:EF".parse().unwrap())
            .build()
            .is_err());

        assert!(AdvertisingSetParameters::builder()
            .legacy_mode(true)
            .directed(true)
            .connectable(true)
            .peer_address("01:02:03:AB:CD:EF".parse().unwrap())
            .build()
            .is_ok());
    }

    #[test]
    fn extended_set_flag_conflicts() {
        assert!(AdvertisingSetParameters::builder()
            .connectable(true)
            .scannable(true)
            .build()
            .is_err());
        assert!(AdvertisingSetParameters::builder()
            .anonymous(true)
            .connectable(true)
            .build()
            .is_err());
        assert!(AdvertisingSetParameters::builder()
            .high_duty_cycle(true)
            .build()
            .is_err());
    }

    #[test]
    fn directed_requires_peer_address() {
        assert_eq!(
            AdvertisingSetParameters::builder()
                .legacy_mode(true)
                .directed(true)
                .connectable(true)
                .build(),
            Err(Error::MissingPeerAddress)
        );
    }

    #[test]
    fn interval_and_tx_power_ranges() {
        assert_eq!(
            AdvertisingSetParameters::builder().interval(100).build(),
            Err(Error::InvalidInterval(100))
        );
        assert_eq!(
            AdvertisingSetParameters::builder().tx_power_level(2).build(),
            Err(Error::InvalidTxPower(2))
        );
        assert!(AdvertisingSetParameters::builder()
            .interval(INTERVAL_MIN)
            .tx_power_level(1)
            .build()
            .is_ok());
    }
}
