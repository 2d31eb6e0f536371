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

//! Filter over Transport Discovery Service blocks.
//!
//! A TDS advertisement carries an organization id octet followed by
//! transport-specific bytes (advertising data type 0x26). The filter pins
//! the organization id and optionally masks the bytes after it, with the
//! same partial-match semantics as the service/manufacturer data filters.

use parcel::{Parcel, ParcelReader};

use crate::scan_filter::matches_partial_data;
use crate::scan_record::{data_types, ScanRecord};
use crate::Error;

/// How the bytes following the organization id are matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TdsMatch {
    /// Organization id alone decides; block content is ignored.
    Wildcard,
    /// Masked prefix match against the block content.
    Data {
        data: Vec<u8>,
        mask: Option<Vec<u8>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportBlockFilter {
    org_id: u8,
    tds_match: TdsMatch,
}

impl TransportBlockFilter {
    /// `org_id` 0 is reserved and rejected; a data mask must be as long
    /// as the data it masks.
    pub fn new(org_id: u8, tds_match: TdsMatch) -> Result<Self, Error> {
        if org_id == 0 {
            return Err(Error::InvalidCombination(
                "transport block organization id 0 is reserved",
            ));
        }
        if let TdsMatch::Data {
            data,
            mask: Some(mask),
        } = &tds_match
        {
            if data.len() != mask.len() {
                return Err(Error::MaskLengthMismatch("transport block data"));
            }
        }
        Ok(TransportBlockFilter { org_id, tds_match })
    }

    pub fn org_id(&self) -> u8 {
        self.org_id
    }

    pub fn tds_match(&self) -> &TdsMatch {
        &self.tds_match
    }

    /// True when the record carries a transport discovery block for this
    /// organization whose content satisfies the configured match.
    pub fn matches(&self, record: &ScanRecord) -> bool {
        let Some(block) = record.advertising_data(data_types::TRANSPORT_DISCOVERY_DATA) else {
            return false;
        };
        let Some((&org_id, content)) = block.split_first() else {
            return false;
        };
        if org_id != self.org_id {
            return false;
        }
        match &self.tds_match {
            TdsMatch::Wildcard => true,
            TdsMatch::Data { data, mask } => {
                matches_partial_data(data, mask.as_deref(), Some(content))
            }
        }
    }

    pub(crate) fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_i32(self.org_id as i32);
        match &self.tds_match {
            TdsMatch::Wildcard => parcel.write_presence(false),
            TdsMatch::Data { data, mask } => {
                parcel.write_presence(true);
                parcel.write_byte_array(data);
                parcel.write_presence(mask.is_some());
                if let Some(mask) = mask {
                    parcel.write_byte_array(mask);
                }
            }
        }
    }

    pub(crate) fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let org_id = reader.read_i32()?;
        if !(1..=0xFF).contains(&org_id) {
            return Err(Error::InvalidCombination(
                "transport block organization id out of range",
            ));
        }
        let tds_match = if reader.read_presence()? {
            let data = reader.read_byte_array()?;
            let mask = if reader.read_presence()? {
                Some(reader.read_byte_array()?)
            } else {
                None
            };
            TdsMatch::Data { data, mask }
        } else {
            TdsMatch::Wildcard
        };
        TransportBlockFilter::new(org_id as u8, tds_match)
    }
}
