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

//! Wi-Fi Display capability info exchanged during P2P discovery.
//!
//! The device-info field is a bit field straight out of the Wi-Fi
//! Display technical specification, section 5.1.2; accessors below
//! manipulate it in place.

use parcel::{Parcel, ParcelReader};

use crate::Error;

// Device info bit layout.
const DEVICE_TYPE_MASK: u16 = 0x03;
const COUPLED_SINK_SUPPORT_AT_SOURCE: u16 = 0x04;
const COUPLED_SINK_SUPPORT_AT_SINK: u16 = 0x08;
const SESSION_AVAILABLE_MASK: u16 = 0x30;
const SESSION_AVAILABLE_BIT: u16 = 0x10;

/// Role advertised in the WFD device information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WfdDeviceType {
    #[default]
    Source,
    PrimarySink,
    SecondarySink,
    SourceOrPrimarySink,
}

impl WfdDeviceType {
    fn bits(self) -> u16 {
        match self {
            WfdDeviceType::Source => 0,
            WfdDeviceType::PrimarySink => 1,
            WfdDeviceType::SecondarySink => 2,
            WfdDeviceType::SourceOrPrimarySink => 3,
        }
    }

    fn from_bits(bits: u16) -> Self {
        match bits & DEVICE_TYPE_MASK {
            0 => WfdDeviceType::Source,
            1 => WfdDeviceType::PrimarySink,
            2 => WfdDeviceType::SecondarySink,
            _ => WfdDeviceType::SourceOrPrimarySink,
        }
    }
}

/// Mutable capability record; unlike the builder-gated configs this is
/// plain state the discovery layer updates as capabilities change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WifiP2pWfdInfo {
    enabled: bool,
    device_info: u16,
    r2_device_info: u16,
    control_port: u16,
    max_throughput_mbps: u16,
}

impl WifiP2pWfdInfo {
    pub fn new(device_type: WfdDeviceType, control_port: u16, max_throughput_mbps: u16) -> Self {
        WifiP2pWfdInfo {
            enabled: true,
            device_info: device_type.bits(),
            r2_device_info: 0,
            control_port,
            max_throughput_mbps,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn device_type(&self) -> WfdDeviceType {
        WfdDeviceType::from_bits(self.device_info)
    }

    pub fn set_device_type(&mut self, device_type: WfdDeviceType) {
        self.device_info = (self.device_info & !DEVICE_TYPE_MASK) | device_type.bits();
    }

    pub fn is_coupled_sink_supported_at_source(&self) -> bool {
        self.device_info & COUPLED_SINK_SUPPORT_AT_SOURCE != 0
    }

    pub fn set_coupled_sink_supported_at_source(&mut self, supported: bool) {
        if supported {
            self.device_info |= COUPLED_SINK_SUPPORT_AT_SOURCE;
        } else {
            self.device_info &= !COUPLED_SINK_SUPPORT_AT_SOURCE;
        }
    }

    pub fn is_coupled_sink_supported_at_sink(&self) -> bool {
        self.device_info & COUPLED_SINK_SUPPORT_AT_SINK != 0
    }

    pub fn set_coupled_sink_supported_at_sink(&mut self, supported: bool) {
        if supported {
            self.device_info |= COUPLED_SINK_SUPPORT_AT_SINK;
        } else {
            self.device_info &= !COUPLED_SINK_SUPPORT_AT_SINK;
        }
    }

    pub fn is_session_available(&self) -> bool {
        self.device_info & SESSION_AVAILABLE_MASK != 0
    }

    pub fn set_session_available(&mut self, available: bool) {
        if available {
            self.device_info = (self.device_info & !SESSION_AVAILABLE_MASK) | SESSION_AVAILABLE_BIT;
        } else {
            self.device_info &= !SESSION_AVAILABLE_MASK;
        }
    }

    /// Raw device-info bit field as carried in the WFD IE.
    pub fn device_info(&self) -> u16 {
        self.device_info
    }

    /// WFD R2 device info; 0 when the device is not R2 capable.
    pub fn r2_device_info(&self) -> u16 {
        self.r2_device_info
    }

    pub fn set_r2_device_info(&mut self, info: u16) {
        self.r2_device_info = info;
    }

    pub fn control_port(&self) -> u16 {
        self.control_port
    }

    pub fn set_control_port(&mut self, port: u16) {
        self.control_port = port;
    }

    pub fn max_throughput_mbps(&self) -> u16 {
        self.max_throughput_mbps
    }

    pub fn set_max_throughput_mbps(&mut self, mbps: u16) {
        self.max_throughput_mbps = mbps;
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_i32(self.enabled as i32);
        parcel.write_i32(self.device_info as i32);
        parcel.write_i32(self.r2_device_info as i32);
        parcel.write_i32(self.control_port as i32);
        parcel.write_i32(self.max_throughput_mbps as i32);
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let enabled = reader.read_presence()?;
        let device_info = read_u16(reader)?;
        let r2_device_info = read_u16(reader)?;
        let control_port = read_u16(reader)?;
        let max_throughput_mbps = read_u16(reader)?;
        Ok(WifiP2pWfdInfo {
            enabled,
            device_info,
            r2_device_info,
            control_port,
            max_throughput_mbps,
        })
    }
}

fn read_u16(reader: &mut ParcelReader<'_>) -> Result<u16, Error> {
    let val = reader.read_i32()?;
    u16::try_from(val).map_err(|_| {
        Error::Parcel(parcel::ParcelError::Malformed(format!(
            "16-bit field out of range: {val}"
        )))
    })
}
