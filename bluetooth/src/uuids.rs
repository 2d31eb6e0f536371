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

//! UUID helpers for the Bluetooth short forms and for masked comparison.
//!
//! 16-bit and 32-bit UUIDs advertised over the air are shorthand for
//! `xxxxxxxx-0000-1000-8000-00805F9B34FB` with the short value in the top
//! 32 bits. Bluetooth Core Specification, Vol 3, Part B, Section 2.5.1.

use uuid::{uuid, Uuid};

/// The Bluetooth base UUID all short forms expand into.
pub const BASE_UUID: Uuid = uuid!("00000000-0000-1000-8000-00805f9b34fb");

const BASE_LOW_BITS: u128 = 0x0000_1000_8000_00805F9B34FB;
const SHORT_SHIFT: u32 = 96;

/// Promote an assigned 16-bit UUID to its 128-bit form.
pub fn from_u16(short: u16) -> Uuid {
    from_u32(short as u32)
}

/// Promote an assigned 32-bit UUID to its 128-bit form.
pub fn from_u32(short: u32) -> Uuid {
    Uuid::from_u128(((short as u128) << SHORT_SHIFT) | BASE_LOW_BITS)
}

/// Expand a little-endian 2-, 4- or 16-byte slice, as found in
/// advertisement payloads, into a full UUID. Other lengths yield `None`.
pub fn from_le_slice(bytes: &[u8]) -> Option<Uuid> {
    match bytes.len() {
        2 => Some(from_u16(u16::from_le_bytes(bytes.try_into().ok()?))),
        4 => Some(from_u32(u32::from_le_bytes(bytes.try_into().ok()?))),
        16 => {
            let mut be = [0u8; 16];
            for (dst, src) in be.iter_mut().zip(bytes.iter().rev()) {
                *dst = *src;
            }
            Some(Uuid::from_bytes(be))
        }
        _ => None,
    }
}

/// The shortest on-air encoding of a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortForm {
    U16(u16),
    U32(u32),
    Full(Uuid),
}

/// Report the shortest form a UUID can be advertised in. Only UUIDs that
/// sit on the Bluetooth base can shrink.
pub fn short_form(uuid: &Uuid) -> ShortForm {
    let val = uuid.as_u128();
    if val & ((1 << SHORT_SHIFT) - 1) != BASE_LOW_BITS {
        return ShortForm::Full(*uuid);
    }
    let short = (val >> SHORT_SHIFT) as u32;
    if short <= u16::MAX as u32 {
        ShortForm::U16(short as u16)
    } else {
        ShortForm::U32(short)
    }
}

/// Bitwise masked equality over the 128-bit value: wherever the mask bit
/// is 1 the operands must agree, masked-out bits are ignored. A `None`
/// mask means every bit is significant.
pub fn masked_equals(data: Uuid, pattern: Uuid, mask: Option<Uuid>) -> bool {
    match mask {
        None => data == pattern,
        Some(mask) => {
            let mask = mask.as_u128();
            data.as_u128() & mask == pattern.as_u128() & mask
        }
    }
}
