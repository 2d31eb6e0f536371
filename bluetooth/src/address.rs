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

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// BLE addresses are either the peripheral's public MAC address or one of
/// the random address flavors.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum AddressType {
    Public,
    Random,
}

impl AddressType {
    /// Wire representation: 0 for public, 1 for random.
    pub fn to_wire(self) -> i32 {
        match self {
            AddressType::Public => 0,
            AddressType::Random => 1,
        }
    }

    pub fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(AddressType::Public),
            1 => Ok(AddressType::Random),
            _ => Err(Error::InvalidAddress(format!("address type {val}"))),
        }
    }
}

/// A 48-bit BLE device address and its type. Octets are stored in the
/// order they appear in the canonical string form, most significant first.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct BleAddress {
    octets: [u8; 6],
    kind: AddressType,
}

impl BleAddress {
    pub fn new(octets: [u8; 6], kind: AddressType) -> Self {
        BleAddress { octets, kind }
    }

    /// Parse the canonical `"01:02:03:AB:CD:EF"` form. Hex digits must be
    /// uppercase; anything else is rejected rather than normalized, so
    /// that string equality and octet equality always agree.
    pub fn parse(addr: &str, kind: AddressType) -> Result<Self, Error> {
        let bad = || Error::InvalidAddress(addr.to_string());
        let mut octets = [0u8; 6];
        let mut groups = addr.split(':');
        for octet in octets.iter_mut() {
            let group = groups.next().ok_or_else(bad)?;
            if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
                return Err(bad());
            }
            *octet = u8::from_str_radix(group, 16).map_err(|_| bad())?;
        }
        if groups.next().is_some() {
            return Err(bad());
        }
        Ok(BleAddress { octets, kind })
    }

    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    pub fn address_type(&self) -> AddressType {
        self.kind
    }

    /// Random static addresses have the two high bits of the most
    /// significant octet set. Only those (and public addresses) can be
    /// paired with an IRK.
    pub fn is_random_static(&self) -> bool {
        self.kind == AddressType::Random && self.octets[0] & 0xC0 == 0xC0
    }
}

impl fmt::Display for BleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl fmt::Debug for BleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self, self.kind)
    }
}

impl FromStr for BleAddress {
    type Err = Error;

    /// Parses with the default public address type.
    fn from_str(addr: &str) -> Result<Self, Self::Err> {
        BleAddress::parse(addr, AddressType::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_form() {
        let addr = BleAddress::parse("01:02:03:AB:CD:EF", AddressType::Public).unwrap();
        assert_eq!(addr.octets(), [0x01, 0x02, 0x03, 0xAB, 0xCD, 0xEF]);
        assert_eq!(addr.address_type(), AddressType::Public);
        assert_eq!(addr.to_string(), "01:02:03:AB:CD:EF");
    }

    #[test]
    fn parse_rejects_lowercase_hex() {
        assert!(matches!(
            BleAddress::parse("01:02:03:ab:cd:ef", AddressType::Public),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        for bad in ["", "01:02:03:AB:CD", "01:02:03:AB:CD:EF:00", "0102.03AB.CDEF", "01:02:03:AB:CD:E"] {
            assert!(BleAddress::parse(bad, AddressType::Public).is_err(), "{bad}");
        }
    }

    #[test]
    fn random_static_checks_high_bits() {
        let addr = BleAddress::parse("C0:00:00:00:00:01", AddressType::Random).unwrap();
        assert!(addr.is_random_static());

        let addr = BleAddress::parse("7F:00:00:00:00:01", AddressType::Random).unwrap();
        assert!(!addr.is_random_static());

        // Public addresses are never random static, whatever their bits.
        let addr = BleAddress::parse("C0:00:00:00:00:01", AddressType::Public).unwrap();
        assert!(!addr.is_random_static());
    }
}
