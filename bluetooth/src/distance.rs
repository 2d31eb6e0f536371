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

//! Parameters for a distance measurement session with a remote device.

use parcel::{Parcel, ParcelReader};

use crate::address::{AddressType, BleAddress};
use crate::Error;

/// How often measurement results are reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFrequency {
    #[default]
    Low,
    Medium,
    High,
}

impl ReportFrequency {
    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(ReportFrequency::Low),
            1 => Ok(ReportFrequency::Medium),
            2 => Ok(ReportFrequency::High),
            _ => Err(Error::InvalidCombination("unknown report frequency")),
        }
    }
}

/// Ranging technique to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementMethod {
    #[default]
    Auto,
    Rssi,
    ChannelSounding,
}

impl MeasurementMethod {
    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(MeasurementMethod::Auto),
            1 => Ok(MeasurementMethod::Rssi),
            2 => Ok(MeasurementMethod::ChannelSounding),
            _ => Err(Error::InvalidCombination("unknown measurement method")),
        }
    }
}

/// Default measurement session length.
pub const DEFAULT_DURATION_SECONDS: i32 = 60;

/// Immutable configuration for one measurement session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMeasurementParams {
    device: BleAddress,
    duration_seconds: i32,
    frequency: ReportFrequency,
    method: MeasurementMethod,
}

impl DistanceMeasurementParams {
    pub fn builder(device: BleAddress) -> DistanceMeasurementParamsBuilder {
        DistanceMeasurementParamsBuilder {
            device,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            frequency: ReportFrequency::default(),
            method: MeasurementMethod::default(),
        }
    }

    pub fn device(&self) -> BleAddress {
        self.device
    }

    pub fn duration_seconds(&self) -> i32 {
        self.duration_seconds
    }

    pub fn frequency(&self) -> ReportFrequency {
        self.frequency
    }

    pub fn method(&self) -> MeasurementMethod {
        self.method
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.device.to_string());
        parcel.write_i32(self.device.address_type().to_wire());
        parcel.write_i32(self.duration_seconds);
        parcel.write_i32(self.frequency as i32);
        parcel.write_i32(self.method as i32);
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let address = reader.read_string()?;
        let address_type = AddressType::from_wire(reader.read_i32()?)?;
        let device = BleAddress::parse(&address, address_type)?;
        let duration = reader.read_i32()?;
        let frequency = ReportFrequency::from_wire(reader.read_i32()?)?;
        let method = MeasurementMethod::from_wire(reader.read_i32()?)?;
        DistanceMeasurementParams::builder(device)
            .duration_seconds(duration)
            .frequency(frequency)
            .method(method)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct DistanceMeasurementParamsBuilder {
    device: BleAddress,
    duration_seconds: i32,
    frequency: ReportFrequency,
    method: MeasurementMethod,
}

impl DistanceMeasurementParamsBuilder {
    pub fn duration_seconds(mut self, seconds: i32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn frequency(mut self, frequency: ReportFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn method(mut self, method: MeasurementMethod) -> Self {
        self.method = method;
        self
    }

    pub fn build(self) -> Result<DistanceMeasurementParams, Error> {
        if self.duration_seconds < 0 {
            return Err(Error::InvalidDuration(self.duration_seconds as i64));
        }
        Ok(DistanceMeasurementParams {
            device: self.device,
            duration_seconds: self.duration_seconds,
            frequency: self.frequency,
            method: self.method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> BleAddress {
        BleAddress::parse("01:02:03:AB:CD:EF", AddressType::Public).unwrap()
    }

    #[test]
    fn defaults() {
        let params = DistanceMeasurementParams::builder(device()).build().unwrap();
        assert_eq!(params.duration_seconds(), DEFAULT_DURATION_SECONDS);
        assert_eq!(params.frequency(), ReportFrequency::Low);
        assert_eq!(params.method(), MeasurementMethod::Auto);
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert_eq!(
            DistanceMeasurementParams::builder(device())
                .duration_seconds(-1)
                .build(),
            Err(Error::InvalidDuration(-1))
        );
        assert!(DistanceMeasurementParams::builder(device())
            .duration_seconds(i32::MAX)
            .build()
            .is_ok());
    }

    #[test]
    fn parcel_round_trip() {
        let params = DistanceMeasurementParams::builder(device())
            .duration_seconds(120)
            .frequency(ReportFrequency::High)
            .method(MeasurementMethod::ChannelSounding)
            .build()
            .unwrap();
        let mut parcel = Parcel::new();
        params.write_to_parcel(&mut parcel);
        let mut reader = ParcelReader::new(parcel.as_bytes());
        let decoded = DistanceMeasurementParams::read_from_parcel(&mut reader).unwrap();
        reader.finish().unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn decode_rejects_unknown_enums() {
        let mut parcel = Parcel::new();
        parcel.write_string("01:02:03:AB:CD:EF");
        parcel.write_i32(0);
        parcel.write_i32(60);
        parcel.write_i32(9); // frequency out of range
        parcel.write_i32(0);
        let mut reader = ParcelReader::new(parcel.as_bytes());
        assert!(DistanceMeasurementParams::read_from_parcel(&mut reader).is_err());
    }
}
