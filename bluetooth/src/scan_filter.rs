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

//! Criteria for selecting advertisements of interest from a scan.
//!
//! A [`ScanFilter`] is a conjunction of optional per-field criteria; an
//! unset field constrains nothing. Filters are built once through
//! [`ScanFilterBuilder`], which enforces every structural invariant, so
//! matching itself is total and never fails.

use parcel::{Parcel, ParcelReader};
use uuid::Uuid;

use crate::address::{AddressType, BleAddress};
use crate::scan_record::ScanResult;
use crate::transport_block::TransportBlockFilter;
use crate::uuids;
use crate::Error;

/// Wire sentinel for "no manufacturer filter".
const MANUFACTURER_ID_UNSET: i32 = -1;
/// Wire sentinel for "no advertising-data-type filter".
const DATA_TYPE_NONE: i32 = 0;

const IRK_LEN: usize = 16;

/// Immutable, validated scan filter. Cheap to clone, safe to share
/// across scanning threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanFilter {
    device_name: Option<String>,
    device_address: Option<BleAddress>,
    irk: Option<[u8; IRK_LEN]>,
    service_uuid: Option<Uuid>,
    service_uuid_mask: Option<Uuid>,
    service_solicitation_uuid: Option<Uuid>,
    service_solicitation_uuid_mask: Option<Uuid>,
    service_data_uuid: Option<Uuid>,
    service_data: Option<Vec<u8>>,
    service_data_mask: Option<Vec<u8>>,
    manufacturer_id: Option<u16>,
    manufacturer_data: Option<Vec<u8>>,
    manufacturer_data_mask: Option<Vec<u8>>,
    advertising_data_type: Option<u8>,
    advertising_data: Option<Vec<u8>>,
    advertising_data_mask: Option<Vec<u8>>,
    transport_block_filter: Option<TransportBlockFilter>,
}

impl ScanFilter {
    /// The filter with no criteria; matches every addressable result.
    pub const EMPTY: ScanFilter = ScanFilter {
        device_name: None,
        device_address: None,
        irk: None,
        service_uuid: None,
        service_uuid_mask: None,
        service_solicitation_uuid: None,
        service_solicitation_uuid_mask: None,
        service_data_uuid: None,
        service_data: None,
        service_data_mask: None,
        manufacturer_id: None,
        manufacturer_data: None,
        manufacturer_data_mask: None,
        advertising_data_type: None,
        advertising_data: None,
        advertising_data_mask: None,
        transport_block_filter: None,
    };

    pub fn builder() -> ScanFilterBuilder {
        ScanFilterBuilder::default()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn device_address(&self) -> Option<BleAddress> {
        self.device_address
    }

    pub fn irk(&self) -> Option<&[u8; IRK_LEN]> {
        self.irk.as_ref()
    }

    pub fn service_uuid(&self) -> Option<Uuid> {
        self.service_uuid
    }

    pub fn service_uuid_mask(&self) -> Option<Uuid> {
        self.service_uuid_mask
    }

    pub fn service_solicitation_uuid(&self) -> Option<Uuid> {
        self.service_solicitation_uuid
    }

    pub fn service_solicitation_uuid_mask(&self) -> Option<Uuid> {
        self.service_solicitation_uuid_mask
    }

    pub fn service_data_uuid(&self) -> Option<Uuid> {
        self.service_data_uuid
    }

    pub fn service_data(&self) -> Option<&[u8]> {
        self.service_data.as_deref()
    }

    pub fn service_data_mask(&self) -> Option<&[u8]> {
        self.service_data_mask.as_deref()
    }

    pub fn manufacturer_id(&self) -> Option<u16> {
        self.manufacturer_id
    }

    pub fn manufacturer_data(&self) -> Option<&[u8]> {
        self.manufacturer_data.as_deref()
    }

    pub fn manufacturer_data_mask(&self) -> Option<&[u8]> {
        self.manufacturer_data_mask.as_deref()
    }

    pub fn advertising_data_type(&self) -> Option<u8> {
        self.advertising_data_type
    }

    pub fn advertising_data(&self) -> Option<&[u8]> {
        self.advertising_data.as_deref()
    }

    pub fn advertising_data_mask(&self) -> Option<&[u8]> {
        self.advertising_data_mask.as_deref()
    }

    pub fn transport_block_filter(&self) -> Option<&TransportBlockFilter> {
        self.transport_block_filter.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        *self == ScanFilter::EMPTY
    }

    /// Whether any criterion looks inside the advertisement payload, as
    /// opposed to the sender address.
    fn has_record_criteria(&self) -> bool {
        self.device_name.is_some()
            || self.service_uuid.is_some()
            || self.service_solicitation_uuid.is_some()
            || self.service_data_uuid.is_some()
            || self.manufacturer_data.is_some()
            || self.advertising_data_type.is_some()
            || self.transport_block_filter.is_some()
    }

    /// Evaluate this filter against one scan result. Every configured
    /// criterion must hold; unset criteria hold trivially.
    pub fn matches(&self, result: &ScanResult) -> bool {
        if let Some(address) = self.device_address {
            match result.address() {
                Some(actual) if actual == address => {}
                _ => return false,
            }
        }

        let record = match result.record() {
            Some(record) => record,
            // No payload was parsed; only content-free filters can pass.
            None => return !self.has_record_criteria(),
        };

        if let Some(name) = &self.device_name {
            if record.device_name() != Some(name.as_str()) {
                return false;
            }
        }

        if let Some(uuid) = self.service_uuid {
            if !matches_service_uuids(uuid, self.service_uuid_mask, record.service_uuids()) {
                return false;
            }
        }

        if let Some(uuid) = self.service_solicitation_uuid {
            if !matches_service_uuids(
                uuid,
                self.service_solicitation_uuid_mask,
                record.solicitation_uuids(),
            ) {
                return false;
            }
        }

        if let Some(uuid) = &self.service_data_uuid {
            let pattern = self.service_data.as_deref().unwrap_or(&[]);
            if !matches_partial_data(
                pattern,
                self.service_data_mask.as_deref(),
                record.service_data(uuid),
            ) {
                return false;
            }
        }

        if let (Some(id), Some(pattern)) = (self.manufacturer_id, &self.manufacturer_data) {
            if !matches_partial_data(
                pattern,
                self.manufacturer_data_mask.as_deref(),
                record.manufacturer_data(id),
            ) {
                return false;
            }
        }

        if let Some(ad_type) = self.advertising_data_type {
            let pattern = self.advertising_data.as_deref().unwrap_or(&[]);
            if !matches_partial_data(
                pattern,
                self.advertising_data_mask.as_deref(),
                record.advertising_data(ad_type),
            ) {
                return false;
            }
        }

        if let Some(block_filter) = &self.transport_block_filter {
            if !block_filter.matches(record) {
                return false;
            }
        }

        true
    }

    /// Serialize in the fixed field order of the wire contract. Optional
    /// fields carry an i32 presence flag; the manufacturer id and
    /// advertising data type are always written, with -1 and 0 standing
    /// in for "unset".
    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_presence(self.device_name.is_some());
        if let Some(name) = &self.device_name {
            parcel.write_string(name);
        }

        parcel.write_presence(self.device_address.is_some());
        if let Some(address) = &self.device_address {
            parcel.write_string(&address.to_string());
        }

        parcel.write_presence(self.service_uuid.is_some());
        if let Some(uuid) = &self.service_uuid {
            parcel.write_uuid(uuid);
            parcel.write_presence(self.service_uuid_mask.is_some());
            if let Some(mask) = &self.service_uuid_mask {
                parcel.write_uuid(mask);
            }
        }

        parcel.write_presence(self.service_solicitation_uuid.is_some());
        if let Some(uuid) = &self.service_solicitation_uuid {
            parcel.write_uuid(uuid);
            parcel.write_presence(self.service_solicitation_uuid_mask.is_some());
            if let Some(mask) = &self.service_solicitation_uuid_mask {
                parcel.write_uuid(mask);
            }
        }

        parcel.write_presence(self.service_data_uuid.is_some());
        if let Some(uuid) = &self.service_data_uuid {
            parcel.write_uuid(uuid);
            parcel.write_presence(self.service_data.is_some());
            if let Some(data) = &self.service_data {
                parcel.write_byte_array(data);
                parcel.write_presence(self.service_data_mask.is_some());
                if let Some(mask) = &self.service_data_mask {
                    parcel.write_byte_array(mask);
                }
            }
        }

        parcel.write_i32(
            self.manufacturer_id
                .map_or(MANUFACTURER_ID_UNSET, |id| id as i32),
        );
        parcel.write_presence(self.manufacturer_data.is_some());
        if let Some(data) = &self.manufacturer_data {
            parcel.write_byte_array(data);
            parcel.write_presence(self.manufacturer_data_mask.is_some());
            if let Some(mask) = &self.manufacturer_data_mask {
                parcel.write_byte_array(mask);
            }
        }

        // Address type and IRK travel only alongside an address.
        if let Some(address) = &self.device_address {
            parcel.write_i32(address.address_type().to_wire());
            parcel.write_presence(self.irk.is_some());
            if let Some(irk) = &self.irk {
                parcel.write_blob(irk);
            }
        }

        parcel.write_i32(
            self.advertising_data_type
                .map_or(DATA_TYPE_NONE, |ad_type| ad_type as i32),
        );
        parcel.write_presence(self.advertising_data.is_some());
        if let Some(data) = &self.advertising_data {
            parcel.write_byte_array(data);
            parcel.write_presence(self.advertising_data_mask.is_some());
            if let Some(mask) = &self.advertising_data_mask {
                parcel.write_byte_array(mask);
            }
        }

        parcel.write_presence(self.transport_block_filter.is_some());
        if let Some(block_filter) = &self.transport_block_filter {
            block_filter.write_to_parcel(parcel);
        }
    }

    /// Deserialize, funnelling everything back through the builder so
    /// the construction invariants hold for decoded filters too.
    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<ScanFilter, Error> {
        let mut builder = ScanFilter::builder();

        if reader.read_presence()? {
            builder = builder.device_name(reader.read_string()?);
        }

        let address_string = if reader.read_presence()? {
            Some(reader.read_string()?)
        } else {
            None
        };

        if reader.read_presence()? {
            builder = builder.service_uuid(reader.read_uuid()?);
            if reader.read_presence()? {
                builder = builder.service_uuid_mask(reader.read_uuid()?);
            }
        }

        if reader.read_presence()? {
            builder = builder.service_solicitation_uuid(reader.read_uuid()?);
            if reader.read_presence()? {
                builder = builder.service_solicitation_uuid_mask(reader.read_uuid()?);
            }
        }

        if reader.read_presence()? {
            builder = builder.service_data_uuid(reader.read_uuid()?);
            if reader.read_presence()? {
                builder = builder.service_data(reader.read_byte_array()?);
                if reader.read_presence()? {
                    builder = builder.service_data_mask(reader.read_byte_array()?);
                }
            }
        }

        let manufacturer_id = reader.read_i32()?;
        if reader.read_presence()? {
            if !(0..=u16::MAX as i32).contains(&manufacturer_id) {
                return Err(Error::InvalidManufacturerId(manufacturer_id));
            }
            builder = builder.manufacturer_data(manufacturer_id as u16, reader.read_byte_array()?);
            if reader.read_presence()? {
                builder = builder.manufacturer_data_mask(reader.read_byte_array()?);
            }
        }

        if let Some(address_string) = address_string {
            let address_type = AddressType::from_wire(reader.read_i32()?)?;
            let address = BleAddress::parse(&address_string, address_type)?;
            builder = builder.device_address(address);
            if reader.read_presence()? {
                let irk = reader.read_blob(IRK_LEN)?;
                builder = builder.irk(irk.try_into().expect("blob length is fixed"));
            }
        }

        let advertising_data_type = reader.read_i32()?;
        if !(0..=0xFF).contains(&advertising_data_type) {
            return Err(Error::InvalidAdvertisingDataType(advertising_data_type));
        }
        if advertising_data_type != DATA_TYPE_NONE {
            builder = builder.advertising_data_type(advertising_data_type as u8);
        }
        if reader.read_presence()? {
            builder = builder.advertising_data(reader.read_byte_array()?);
            if reader.read_presence()? {
                builder = builder.advertising_data_mask(reader.read_byte_array()?);
            }
        }

        if reader.read_presence()? {
            builder = builder.transport_block_filter(TransportBlockFilter::read_from_parcel(reader)?);
        }

        builder.build()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut parcel = Parcel::new();
        self.write_to_parcel(&mut parcel);
        parcel.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<ScanFilter, Error> {
        let mut reader = ParcelReader::new(bytes);
        let filter = ScanFilter::read_from_parcel(&mut reader)?;
        reader.finish()?;
        Ok(filter)
    }
}

/// True when any candidate UUID agrees with the pattern on every bit the
/// mask keeps. A `None` mask keeps all 128 bits.
fn matches_service_uuids(pattern: Uuid, mask: Option<Uuid>, candidates: &[Uuid]) -> bool {
    candidates
        .iter()
        .any(|&candidate| uuids::masked_equals(candidate, pattern, mask))
}

/// Masked prefix match of `pattern` against `actual`. Bytes of `actual`
/// beyond the pattern length are ignored; `actual` missing or shorter
/// than the pattern never matches.
pub(crate) fn matches_partial_data(
    pattern: &[u8],
    mask: Option<&[u8]>,
    actual: Option<&[u8]>,
) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    if actual.len() < pattern.len() {
        return false;
    }
    match mask {
        None => actual[..pattern.len()] == *pattern,
        Some(mask) => pattern
            .iter()
            .zip(actual)
            .zip(mask)
            .all(|((&want, &got), &bit)| bit & got == bit & want),
    }
}

/// Accumulates criteria for a [`ScanFilter`]. Setters only record state;
/// [`build`](ScanFilterBuilder::build) is the validation gate and
/// rejects the whole construction on the first inconsistency.
#[derive(Debug, Default, Clone)]
pub struct ScanFilterBuilder {
    device_name: Option<String>,
    device_address: Option<BleAddress>,
    irk: Option<[u8; IRK_LEN]>,
    service_uuid: Option<Uuid>,
    service_uuid_mask: Option<Uuid>,
    service_solicitation_uuid: Option<Uuid>,
    service_solicitation_uuid_mask: Option<Uuid>,
    service_data_uuid: Option<Uuid>,
    service_data: Option<Vec<u8>>,
    service_data_mask: Option<Vec<u8>>,
    manufacturer_id: Option<u16>,
    manufacturer_data: Option<Vec<u8>>,
    manufacturer_data_mask: Option<Vec<u8>>,
    advertising_data_type: Option<u8>,
    advertising_data: Option<Vec<u8>>,
    advertising_data_mask: Option<Vec<u8>>,
    transport_block_filter: Option<TransportBlockFilter>,
}

impl ScanFilterBuilder {
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn device_address(mut self, address: BleAddress) -> Self {
        self.device_address = Some(address);
        self
    }

    /// Identity Resolving Key, little endian. Only valid together with a
    /// public or random static device address.
    pub fn irk(mut self, irk: [u8; IRK_LEN]) -> Self {
        self.irk = Some(irk);
        self
    }

    pub fn service_uuid(mut self, uuid: Uuid) -> Self {
        self.service_uuid = Some(uuid);
        self
    }

    /// Bit mask for the service UUID: set a bit to 1 to require a match
    /// at that position, 0 to ignore it.
    pub fn service_uuid_mask(mut self, mask: Uuid) -> Self {
        self.service_uuid_mask = Some(mask);
        self
    }

    pub fn service_solicitation_uuid(mut self, uuid: Uuid) -> Self {
        self.service_solicitation_uuid = Some(uuid);
        self
    }

    pub fn service_solicitation_uuid_mask(mut self, mask: Uuid) -> Self {
        self.service_solicitation_uuid_mask = Some(mask);
        self
    }

    pub fn service_data_uuid(mut self, uuid: Uuid) -> Self {
        self.service_data_uuid = Some(uuid);
        self
    }

    pub fn service_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.service_data = Some(data.into());
        self
    }

    pub fn service_data_mask(mut self, mask: impl Into<Vec<u8>>) -> Self {
        self.service_data_mask = Some(mask.into());
        self
    }

    pub fn manufacturer_data(mut self, manufacturer_id: u16, data: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_id = Some(manufacturer_id);
        self.manufacturer_data = Some(data.into());
        self
    }

    pub fn manufacturer_data_mask(mut self, mask: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_data_mask = Some(mask.into());
        self
    }

    /// Filter on the presence of an advertising data type; combine with
    /// [`advertising_data`](Self::advertising_data) to also constrain
    /// the section content.
    pub fn advertising_data_type(mut self, ad_type: u8) -> Self {
        self.advertising_data_type = Some(ad_type);
        self
    }

    pub fn advertising_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.advertising_data = Some(data.into());
        self
    }

    pub fn advertising_data_mask(mut self, mask: impl Into<Vec<u8>>) -> Self {
        self.advertising_data_mask = Some(mask.into());
        self
    }

    pub fn transport_block_filter(mut self, filter: TransportBlockFilter) -> Self {
        self.transport_block_filter = Some(filter);
        self
    }

    /// Validate the accumulated criteria and freeze them into a filter.
    pub fn build(self) -> Result<ScanFilter, Error> {
        if self.irk.is_some() {
            match self.device_address {
                None => {
                    return Err(Error::RequiresCompanion {
                        field: "irk",
                        requires: "device address",
                    })
                }
                Some(address) => {
                    if address.address_type() == AddressType::Random && !address.is_random_static()
                    {
                        return Err(Error::IrkRequiresStaticAddress);
                    }
                }
            }
        }

        if self.service_uuid_mask.is_some() && self.service_uuid.is_none() {
            return Err(Error::RequiresCompanion {
                field: "service uuid mask",
                requires: "service uuid",
            });
        }

        if self.service_solicitation_uuid_mask.is_some()
            && self.service_solicitation_uuid.is_none()
        {
            return Err(Error::RequiresCompanion {
                field: "service solicitation uuid mask",
                requires: "service solicitation uuid",
            });
        }

        if self.service_data.is_some() && self.service_data_uuid.is_none() {
            return Err(Error::RequiresCompanion {
                field: "service data",
                requires: "service data uuid",
            });
        }
        check_mask(
            "service data",
            self.service_data.as_deref(),
            self.service_data_mask.as_deref(),
        )?;

        check_mask(
            "manufacturer data",
            self.manufacturer_data.as_deref(),
            self.manufacturer_data_mask.as_deref(),
        )?;

        if self.advertising_data_type == Some(0) {
            return Err(Error::InvalidAdvertisingDataType(0));
        }
        if self.advertising_data.is_some() && self.advertising_data_type.is_none() {
            return Err(Error::RequiresCompanion {
                field: "advertising data",
                requires: "advertising data type",
            });
        }
        check_mask(
            "advertising data",
            self.advertising_data.as_deref(),
            self.advertising_data_mask.as_deref(),
        )?;

        Ok(ScanFilter {
            device_name: self.device_name,
            device_address: self.device_address,
            irk: self.irk,
            service_uuid: self.service_uuid,
            service_uuid_mask: self.service_uuid_mask,
            service_solicitation_uuid: self.service_solicitation_uuid,
            service_solicitation_uuid_mask: self.service_solicitation_uuid_mask,
            service_data_uuid: self.service_data_uuid,
            service_data: self.service_data,
            service_data_mask: self.service_data_mask,
            manufacturer_id: self.manufacturer_id,
            manufacturer_data: self.manufacturer_data,
            manufacturer_data_mask: self.manufacturer_data_mask,
            advertising_data_type: self.advertising_data_type,
            advertising_data: self.advertising_data,
            advertising_data_mask: self.advertising_data_mask,
            transport_block_filter: self.transport_block_filter,
        })
    }
}

fn check_mask(
    field: &'static str,
    data: Option<&[u8]>,
    mask: Option<&[u8]>,
) -> Result<(), Error> {
    match (data, mask) {
        (None, Some(_)) => Err(Error::RequiresCompanion {
            field: "mask",
            requires: field,
        }),
        (Some(data), Some(mask)) if data.len() != mask.len() => {
            Err(Error::MaskLengthMismatch(field))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_record::{data_types, ScanRecord};
    use uuid::uuid;

    const HEART_RATE: Uuid = uuid!("0000180d-0000-1000-8000-00805f9b34fb");
    const BATTERY: Uuid = uuid!("0000180f-0000-1000-8000-00805f9b34fb");

    fn addr(s: &str) -> BleAddress {
        BleAddress::parse(s, AddressType::Public).unwrap()
    }

    fn result_with_record(record: ScanRecord) -> ScanResult {
        ScanResult::new(Some(addr("01:02:03:AB:CD:EF")), Some(-40), Some(record))
    }

    fn heart_rate_record(data: &[u8]) -> ScanRecord {
        let mut payload = vec![(data.len() + 3) as u8, data_types::SERVICE_DATA_16_BIT_UUID, 0x0D, 0x18];
        payload.extend_from_slice(data);
        ScanRecord::parse(&payload)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let result = result_with_record(ScanRecord::parse(&[2, data_types::FLAGS, 0x06]));
        assert!(ScanFilter::EMPTY.matches(&result));

        // Even a result with no payload at all.
        let bare = ScanResult::new(Some(addr("01:02:03:AB:CD:EF")), None, None);
        assert!(ScanFilter::EMPTY.matches(&bare));
    }

    #[test]
    fn address_filter_requires_exact_address() {
        let filter = ScanFilter::builder()
            .device_address(addr("01:02:03:AB:CD:EF"))
            .build()
            .unwrap();

        assert!(filter.matches(&ScanResult::new(Some(addr("01:02:03:AB:CD:EF")), None, None)));
        assert!(!filter.matches(&ScanResult::new(Some(addr("01:02:03:AB:CD:EE")), None, None)));
        // Unresolvable sender never matches an address filter.
        assert!(!filter.matches(&ScanResult::new(None, None, None)));
    }

    #[test]
    fn content_filter_fails_without_record() {
        let filter = ScanFilter::builder().device_name("beacon").build().unwrap();
        let no_record = ScanResult::new(Some(addr("01:02:03:AB:CD:EF")), None, None);
        assert!(!filter.matches(&no_record));
    }

    #[test]
    fn name_filter_is_exact() {
        let record = ScanRecord::parse(&[7, data_types::COMPLETE_LOCAL_NAME, b'b', b'e', b'a', b'c', b'o', b'n']);
        let result = result_with_record(record);

        let hit = ScanFilter::builder().device_name("beacon").build().unwrap();
        assert!(hit.matches(&result));

        let miss = ScanFilter::builder().device_name("Beacon").build().unwrap();
        assert!(!miss.matches(&result));
    }

    #[test]
    fn service_uuid_matches_any_listed_uuid() {
        let record = ScanRecord::parse(&[
            5,
            data_types::COMPLETE_LIST_16_BIT_SERVICE_UUIDS,
            0x0D,
            0x18,
            0x0F,
            0x18,
        ]);
        let result = result_with_record(record);

        let filter = ScanFilter::builder().service_uuid(BATTERY).build().unwrap();
        assert!(filter.matches(&result));

        let absent = uuids::from_u16(0x1800);
        let filter = ScanFilter::builder().service_uuid(absent).build().unwrap();
        assert!(!filter.matches(&result));
    }

    #[test]
    fn service_uuid_mask_widens_the_match() {
        let record = ScanRecord::parse(&[
            3,
            data_types::COMPLETE_LIST_16_BIT_SERVICE_UUIDS,
            0x0F,
            0x18,
        ]);
        let result = result_with_record(record);

        // Ignore the low byte of the assigned number: 0x180D ~ 0x180F.
        let mask = Uuid::from_u128(0xFF00_u128 << 96);
        let filter = ScanFilter::builder()
            .service_uuid(HEART_RATE)
            .service_uuid_mask(mask)
            .build()
            .unwrap();
        assert!(filter.matches(&result));

        // Without the mask the same pattern misses.
        let filter = ScanFilter::builder().service_uuid(HEART_RATE).build().unwrap();
        assert!(!filter.matches(&result));
    }

    #[test]
    fn solicitation_uuid_match() {
        let record = ScanRecord::parse(&[
            3,
            data_types::LIST_16_BIT_SERVICE_SOLICITATION_UUIDS,
            0x0D,
            0x18,
        ]);
        let result = result_with_record(record);

        let filter = ScanFilter::builder()
            .service_solicitation_uuid(HEART_RATE)
            .build()
            .unwrap();
        assert!(filter.matches(&result));

        // Service and solicitation lists are distinct dimensions.
        let filter = ScanFilter::builder().service_uuid(HEART_RATE).build().unwrap();
        assert!(!filter.matches(&result));
    }

    #[test]
    fn service_data_masked_match() {
        let filter = ScanFilter::builder()
            .service_data_uuid(HEART_RATE)
            .service_data([0x01, 0x02])
            .service_data_mask([0xFF, 0x00])
            .build()
            .unwrap();

        // Second byte is masked out.
        assert!(filter.matches(&result_with_record(heart_rate_record(&[0x01, 0x99]))));
        // First byte differs on a kept bit.
        assert!(!filter.matches(&result_with_record(heart_rate_record(&[0x00, 0x02]))));
        // Record lacks the service-data entry entirely.
        assert!(!filter.matches(&result_with_record(ScanRecord::parse(&[]))));
    }

    #[test]
    fn manufacturer_data_match() {
        let record = ScanRecord::parse(&[
            6,
            data_types::MANUFACTURER_SPECIFIC_DATA,
            0xE0,
            0x00,
            0x01,
            0x02,
            0x03,
        ]);
        let result = result_with_record(record);

        let filter = ScanFilter::builder()
            .manufacturer_data(0x00E0, [0x01, 0x02])
            .build()
            .unwrap();
        assert!(filter.matches(&result));

        let filter = ScanFilter::builder()
            .manufacturer_data(0x00E1, [0x01, 0x02])
            .build()
            .unwrap();
        assert!(!filter.matches(&result));
    }

    #[test]
    fn advertising_data_type_presence_and_content() {
        let record = ScanRecord::parse(&[3, data_types::TX_POWER_LEVEL, 0x09, 0x00]);
        let result = result_with_record(record);

        // Type-only filter needs just the section to exist.
        let filter = ScanFilter::builder()
            .advertising_data_type(data_types::TX_POWER_LEVEL)
            .build()
            .unwrap();
        assert!(filter.matches(&result));

        let filter = ScanFilter::builder()
            .advertising_data_type(data_types::FLAGS)
            .build()
            .unwrap();
        assert!(!filter.matches(&result));

        // With data the content must match too.
        let filter = ScanFilter::builder()
            .advertising_data_type(data_types::TX_POWER_LEVEL)
            .advertising_data([0x09])
            .advertising_data_mask([0xFF])
            .build()
            .unwrap();
        assert!(filter.matches(&result));

        let filter = ScanFilter::builder()
            .advertising_data_type(data_types::TX_POWER_LEVEL)
            .advertising_data([0x0A])
            .advertising_data_mask([0xFF])
            .build()
            .unwrap();
        assert!(!filter.matches(&result));
    }

    #[test]
    fn partial_data_all_ones_mask_is_prefix_equality() {
        let pattern = [0x01, 0x02, 0x03];
        let mask = [0xFF, 0xFF, 0xFF];
        assert!(matches_partial_data(
            &pattern,
            Some(&mask),
            Some(&[0x01, 0x02, 0x03, 0x44])
        ));
        assert!(matches_partial_data(&pattern, None, Some(&[0x01, 0x02, 0x03, 0x44])));
        assert!(!matches_partial_data(
            &pattern,
            Some(&mask),
            Some(&[0x01, 0x02, 0x04])
        ));
    }

    #[test]
    fn partial_data_all_zero_mask_matches_any_long_enough_payload() {
        let pattern = [0x01, 0x02];
        let mask = [0x00, 0x00];
        assert!(matches_partial_data(&pattern, Some(&mask), Some(&[0xAA, 0xBB])));
        assert!(!matches_partial_data(&pattern, Some(&mask), Some(&[0xAA])));
    }

    #[test]
    fn partial_data_short_payload_never_matches() {
        let pattern = [0x01, 0x02];
        assert!(!matches_partial_data(&pattern, None, Some(&[0x01])));
        assert!(!matches_partial_data(&pattern, None, None));
        // Empty pattern matches any present payload.
        assert!(matches_partial_data(&[], None, Some(&[])));
    }

    #[test]
    fn builder_rejects_mask_without_base() {
        assert!(matches!(
            ScanFilter::builder()
                .service_uuid_mask(Uuid::from_u128(0))
                .build(),
            Err(Error::RequiresCompanion { .. })
        ));
        assert!(matches!(
            ScanFilter::builder()
                .service_data_uuid(HEART_RATE)
                .service_data_mask([0xFF])
                .build(),
            Err(Error::RequiresCompanion { .. })
        ));
        assert!(matches!(
            ScanFilter::builder()
                .service_solicitation_uuid_mask(Uuid::from_u128(0))
                .build(),
            Err(Error::RequiresCompanion { .. })
        ));
    }

    #[test]
    fn builder_rejects_length_mismatch() {
        assert_eq!(
            ScanFilter::builder()
                .service_data_uuid(HEART_RATE)
                .service_data([0x01, 0x02])
                .service_data_mask([0xFF])
                .build(),
            Err(Error::MaskLengthMismatch("service data"))
        );
        assert_eq!(
            ScanFilter::builder()
                .manufacturer_data(0x00E0, [0x01])
                .manufacturer_data_mask([0xFF, 0x00])
                .build(),
            Err(Error::MaskLengthMismatch("manufacturer data"))
        );
    }

    #[test]
    fn builder_rejects_data_without_uuid_or_type() {
        assert!(matches!(
            ScanFilter::builder().service_data([0x01]).build(),
            Err(Error::RequiresCompanion { .. })
        ));
        assert!(matches!(
            ScanFilter::builder().advertising_data([0x01]).build(),
            Err(Error::RequiresCompanion { .. })
        ));
    }

    #[test]
    fn builder_rejects_irk_for_non_static_random_address() {
        let rpa = BleAddress::parse("7F:00:00:00:00:01", AddressType::Random).unwrap();
        assert_eq!(
            ScanFilter::builder()
                .device_address(rpa)
                .irk([0u8; 16])
                .build(),
            Err(Error::IrkRequiresStaticAddress)
        );

        let static_random = BleAddress::parse("C0:00:00:00:00:01", AddressType::Random).unwrap();
        assert!(ScanFilter::builder()
            .device_address(static_random)
            .irk([0u8; 16])
            .build()
            .is_ok());

        assert!(matches!(
            ScanFilter::builder().irk([0u8; 16]).build(),
            Err(Error::RequiresCompanion { .. })
        ));
    }

    #[test]
    fn builder_rejects_zero_advertising_data_type() {
        assert_eq!(
            ScanFilter::builder().advertising_data_type(0).build(),
            Err(Error::InvalidAdvertisingDataType(0))
        );
    }

    fn full_filter() -> ScanFilter {
        ScanFilter::builder()
            .device_name("beacon")
            .device_address(BleAddress::parse("C0:11:22:33:44:55", AddressType::Random).unwrap())
            .irk([7u8; 16])
            .service_uuid(HEART_RATE)
            .service_uuid_mask(Uuid::from_u128(u128::MAX))
            .service_solicitation_uuid(BATTERY)
            .service_data_uuid(HEART_RATE)
            .service_data([0x01, 0x02])
            .service_data_mask([0xFF, 0x00])
            .manufacturer_data(0x00E0, [0xDE, 0xAD])
            .manufacturer_data_mask([0xFF, 0xFF])
            .advertising_data_type(data_types::TX_POWER_LEVEL)
            .advertising_data([0x09])
            .advertising_data_mask([0xFF])
            .transport_block_filter(
                TransportBlockFilter::new(0x01, crate::TdsMatch::Wildcard).unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn parcel_round_trip_preserves_every_field() {
        for filter in [
            ScanFilter::EMPTY,
            ScanFilter::builder().device_name("x").build().unwrap(),
            ScanFilter::builder()
                .device_address(addr("01:02:03:AB:CD:EF"))
                .build()
                .unwrap(),
            ScanFilter::builder()
                .service_data_uuid(HEART_RATE)
                .service_data([0x01])
                .build()
                .unwrap(),
            full_filter(),
        ] {
            let decoded = ScanFilter::from_bytes(&filter.to_bytes()).unwrap();
            assert_eq!(decoded, filter);
        }
    }

    #[test]
    fn unset_sentinels_on_the_wire() {
        let bytes = ScanFilter::EMPTY.to_bytes();
        let mut reader = ParcelReader::new(&bytes);
        for _ in 0..5 {
            // name, address, service uuid, solicitation uuid, service data uuid
            assert!(!reader.read_presence().unwrap());
        }
        assert_eq!(reader.read_i32().unwrap(), MANUFACTURER_ID_UNSET);
        assert!(!reader.read_presence().unwrap());
        assert_eq!(reader.read_i32().unwrap(), DATA_TYPE_NONE);
        assert!(!reader.read_presence().unwrap());
        assert!(!reader.read_presence().unwrap());
        reader.finish().unwrap();
    }

    #[test]
    fn decode_rejects_negative_manufacturer_id_with_data() {
        let mut parcel = Parcel::new();
        for _ in 0..5 {
            parcel.write_presence(false);
        }
        parcel.write_i32(-2);
        parcel.write_presence(true);
        parcel.write_byte_array(&[0x01]);
        parcel.write_presence(false);
        parcel.write_i32(0);
        parcel.write_presence(false);
        parcel.write_presence(false);

        assert_eq!(
            ScanFilter::from_bytes(parcel.as_bytes()),
            Err(Error::InvalidManufacturerId(-2))
        );
    }

    #[test]
    fn decode_rejects_negative_advertising_data_type() {
        let mut parcel = Parcel::new();
        for _ in 0..5 {
            parcel.write_presence(false);
        }
        parcel.write_i32(MANUFACTURER_ID_UNSET);
        parcel.write_presence(false);
        parcel.write_i32(-1);
        parcel.write_presence(false);
        parcel.write_presence(false);

        assert_eq!(
            ScanFilter::from_bytes(parcel.as_bytes()),
            Err(Error::InvalidAdvertisingDataType(-1))
        );
    }

    #[test]
    fn decode_truncated_parcel_fails_cleanly() {
        let bytes = full_filter().to_bytes();
        for len in 0..bytes.len() {
            assert!(ScanFilter::from_bytes(&bytes[..len]).is_err(), "len {len}");
        }
    }
}
