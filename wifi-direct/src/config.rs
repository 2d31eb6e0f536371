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

//! Configuration for forming or joining a P2P group.

use std::fmt;
use std::str::FromStr;

use parcel::{Parcel, ParcelReader};

use crate::error::config_limits::{MAX_SSID_BYTES, PASSPHRASE_MAX_LEN, PASSPHRASE_MIN_LEN};
use crate::Error;

/// A 48-bit MAC address in the lowercase colon-separated form the
/// supplicant layer exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The wildcard "any" address a config carries when no peer is
    /// pinned.
    pub const ANY: MacAddress = MacAddress([0x02, 0, 0, 0, 0, 0]);

    pub fn new(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(addr: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidMacAddress(addr.to_string());
        let mut octets = [0u8; 6];
        let mut groups = addr.split(':');
        for octet in octets.iter_mut() {
            let group = groups.next().ok_or_else(bad)?;
            if group.len() != 2 {
                return Err(bad());
            }
            *octet = u8::from_str_radix(group, 16).map_err(|_| bad())?;
        }
        if groups.next().is_some() {
            return Err(bad());
        }
        Ok(MacAddress(octets))
    }
}

/// Which band the group owner may pick its operating frequency from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOperatingBand {
    #[default]
    Auto,
    Band2GHz,
    Band5GHz,
    Band6GHz,
}

impl GroupOperatingBand {
    pub fn to_wire(self) -> i32 {
        match self {
            GroupOperatingBand::Auto => 0,
            GroupOperatingBand::Band2GHz => 1,
            GroupOperatingBand::Band5GHz => 2,
            GroupOperatingBand::Band6GHz => 3,
        }
    }

    pub fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(GroupOperatingBand::Auto),
            1 => Ok(GroupOperatingBand::Band2GHz),
            2 => Ok(GroupOperatingBand::Band5GHz),
            3 => Ok(GroupOperatingBand::Band6GHz),
            _ => Err(Error::InvalidBand(val)),
        }
    }
}

/// How a joining client obtains its IP configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpProvisioningMode {
    #[default]
    Ipv4Dhcp,
    Ipv6LinkLocal,
}

impl IpProvisioningMode {
    pub fn to_wire(self) -> i32 {
        match self {
            IpProvisioningMode::Ipv4Dhcp => 0,
            IpProvisioningMode::Ipv6LinkLocal => 1,
        }
    }

    pub fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(IpProvisioningMode::Ipv4Dhcp),
            1 => Ok(IpProvisioningMode::Ipv6LinkLocal),
            _ => Err(Error::InvalidIpProvisioningMode(val)),
        }
    }
}

/// Immutable P2P connection request. Either the peer is identified by
/// network name + passphrase, or by its MAC address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiP2pConfig {
    device_address: MacAddress,
    network_name: String,
    passphrase: String,
    group_operating_band: GroupOperatingBand,
    group_operating_frequency_mhz: u32,
    persistent: bool,
    ip_provisioning_mode: IpProvisioningMode,
    join_existing_group: bool,
}

impl WifiP2pConfig {
    pub fn builder() -> WifiP2pConfigBuilder {
        WifiP2pConfigBuilder::default()
    }

    pub fn device_address(&self) -> MacAddress {
        self.device_address
    }

    /// Empty when the peer is identified by MAC address instead.
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn group_operating_band(&self) -> GroupOperatingBand {
        self.group_operating_band
    }

    /// 0 when no explicit frequency was requested.
    pub fn group_operating_frequency_mhz(&self) -> u32 {
        self.group_operating_frequency_mhz
    }

    pub fn persistent(&self) -> bool {
        self.persistent
    }

    pub fn ip_provisioning_mode(&self) -> IpProvisioningMode {
        self.ip_provisioning_mode
    }

    pub fn join_existing_group(&self) -> bool {
        self.join_existing_group
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.device_address.to_string());
        parcel.write_string(&self.network_name);
        parcel.write_string(&self.passphrase);
        parcel.write_i32(self.group_operating_band.to_wire());
        parcel.write_i32(self.group_operating_frequency_mhz as i32);
        parcel.write_i32(self.persistent as i32);
        parcel.write_i32(self.ip_provisioning_mode.to_wire());
        parcel.write_i32(self.join_existing_group as i32);
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let device_address: MacAddress = reader.read_string()?.parse()?;
        let network_name = reader.read_string()?;
        let passphrase = reader.read_string()?;
        let band = GroupOperatingBand::from_wire(reader.read_i32()?)?;
        let frequency = reader.read_i32()?;
        let frequency = u32::try_from(frequency).map_err(|_| {
            Error::Parcel(parcel::ParcelError::Malformed(format!(
                "negative operating frequency {frequency}"
            )))
        })?;
        let persistent = reader.read_presence()?;
        let ip_mode = IpProvisioningMode::from_wire(reader.read_i32()?)?;
        let join = reader.read_presence()?;

        let mut builder = WifiP2pConfig::builder()
            .device_address(device_address)
            .persistent(persistent)
            .ip_provisioning_mode(ip_mode)
            .join_existing_group(join);
        if !network_name.is_empty() {
            builder = builder.network_name(network_name);
        }
        if !passphrase.is_empty() {
            builder = builder.passphrase(passphrase);
        }
        if frequency > 0 {
            builder = builder.group_operating_frequency_mhz(frequency);
        } else {
            builder = builder.group_operating_band(band);
        }
        builder.build()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut parcel = Parcel::new();
        self.write_to_parcel(&mut parcel);
        parcel.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ParcelReader::new(bytes);
        let config = WifiP2pConfig::read_from_parcel(&mut reader)?;
        reader.finish()?;
        Ok(config)
    }
}

/// Accumulates a P2P connection request; `build` applies the cross-field
/// rules and rejects the whole construction on the first violation.
#[derive(Debug, Default, Clone)]
pub struct WifiP2pConfigBuilder {
    device_address: Option<MacAddress>,
    network_name: String,
    passphrase: String,
    group_operating_band: GroupOperatingBand,
    group_operating_frequency_mhz: u32,
    persistent: bool,
    ip_provisioning_mode: IpProvisioningMode,
    join_existing_group: bool,
}

impl WifiP2pConfigBuilder {
    /// Pin the peer by MAC address. Mandatory when no network name is
    /// given.
    pub fn device_address(mut self, address: MacAddress) -> Self {
        self.device_address = Some(address);
        self
    }

    /// The group name. Must look like `DIRECT-xy…` with x and y
    /// alphanumeric; checked at build time.
    pub fn network_name(mut self, name: impl Into<String>) -> Self {
        self.network_name = name.into();
        self
    }

    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Mutually exclusive with
    /// [`group_operating_frequency_mhz`](Self::group_operating_frequency_mhz).
    pub fn group_operating_band(mut self, band: GroupOperatingBand) -> Self {
        self.group_operating_band = band;
        self
    }

    pub fn group_operating_frequency_mhz(mut self, mhz: u32) -> Self {
        self.group_operating_frequency_mhz = mhz;
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn ip_provisioning_mode(mut self, mode: IpProvisioningMode) -> Self {
        self.ip_provisioning_mode = mode;
        self
    }

    pub fn join_existing_group(mut self, join: bool) -> Self {
        self.join_existing_group = join;
        self
    }

    pub fn build(self) -> Result<WifiP2pConfig, Error> {
        let has_name = !self.network_name.is_empty();
        let has_passphrase = !self.passphrase.is_empty();

        if has_name != has_passphrase {
            return Err(Error::PartialCredentials);
        }
        if has_name {
            validate_network_name(&self.network_name)?;
            validate_passphrase(&self.passphrase)?;
        } else if self.device_address.unwrap_or(MacAddress::ANY) == MacAddress::ANY {
            return Err(Error::MissingIdentity);
        }
        if self.group_operating_frequency_mhz > 0
            && self.group_operating_band != GroupOperatingBand::Auto
        {
            return Err(Error::BandFrequencyConflict);
        }

        Ok(WifiP2pConfig {
            device_address: self.device_address.unwrap_or(MacAddress::ANY),
            network_name: self.network_name,
            passphrase: self.passphrase,
            group_operating_band: self.group_operating_band,
            group_operating_frequency_mhz: self.group_operating_frequency_mhz,
            persistent: self.persistent,
            ip_provisioning_mode: self.ip_provisioning_mode,
            join_existing_group: self.join_existing_group,
        })
    }
}

/// A network name begins with "DIRECT-xy" where x and y come from the
/// alphanumeric ASCII set; any SSID bytes may follow.
fn validate_network_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::EmptyNetworkName);
    }
    if name.len() > MAX_SSID_BYTES {
        return Err(Error::NetworkNameTooLong(name.len()));
    }
    let rest = name
        .strip_prefix("DIRECT-")
        .ok_or(Error::InvalidNetworkNamePrefix)?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(x), Some(y)) if x.is_ascii_alphanumeric() && y.is_ascii_alphanumeric() => Ok(()),
        _ => Err(Error::InvalidNetworkNamePrefix),
    }
}

fn validate_passphrase(passphrase: &str) -> Result<(), Error> {
    if !passphrase.is_ascii() {
        return Err(Error::PassphraseNotAscii);
    }
    if !(PASSPHRASE_MIN_LEN..=PASSPHRASE_MAX_LEN).contains(&passphrase.len()) {
        return Err(Error::PassphraseLength(passphrase.len()));
    }
    Ok(())
}
