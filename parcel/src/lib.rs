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

//! Flat little-endian container the wireless surface types marshal through.
//!
//! Values are written as a sequence of 32-bit words and raw byte runs.
//! Optional fields are preceded by an i32 presence flag (0 or 1); variable
//! byte arrays carry an explicit i32 length. Readers never panic on
//! truncated or malformed input, they return [`ParcelError`].

use thiserror::Error;
use uuid::Uuid;

/// Reader-side failure. Writing is infallible.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParcelError {
    /// Ran off the end of the buffer.
    #[error("unexpected end of parcel at offset {offset}, needed {needed} more bytes")]
    UnexpectedEof { offset: usize, needed: usize },
    /// The bytes were readable but the value makes no sense, e.g. a
    /// presence flag that is neither 0 nor 1 or a negative array length.
    #[error("malformed parcel: {0}")]
    Malformed(String),
}

/// Growable write-side buffer.
#[derive(Default, Debug, Clone)]
pub struct Parcel {
    buf: Vec<u8>,
}

impl Parcel {
    pub fn new() -> Self {
        Parcel::default()
    }

    pub fn write_i32(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Presence flag for an optional field: 1 when present, 0 when absent.
    pub fn write_presence(&mut self, present: bool) {
        self.write_i32(present as i32);
    }

    /// i32 byte length followed by the UTF-8 bytes.
    pub fn write_string(&mut self, val: &str) {
        self.write_i32(val.len() as i32);
        self.buf.extend_from_slice(val.as_bytes());
    }

    /// Raw bytes with no length prefix. The length must be recoverable
    /// from context on the read side.
    pub fn write_blob(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// i32 length followed by the bytes.
    pub fn write_byte_array(&mut self, bytes: &[u8]) {
        self.write_i32(bytes.len() as i32);
        self.buf.extend_from_slice(bytes);
    }

    /// Two 64-bit halves, most significant first.
    pub fn write_uuid(&mut self, uuid: &Uuid) {
        let val = uuid.as_u128();
        self.write_u64((val >> 64) as u64);
        self.write_u64(val as u64);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a serialized parcel.
pub struct ParcelReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParcelReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ParcelReader { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ParcelError> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(ParcelError::UnexpectedEof {
                offset: self.pos,
                needed: len - available,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_i32(&mut self) -> Result<i32, ParcelError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes(
            bytes.try_into().expect("take returned 4 bytes"),
        ))
    }

    pub fn read_u64(&mut self) -> Result<u64, ParcelError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(
            bytes.try_into().expect("take returned 8 bytes"),
        ))
    }

    pub fn read_presence(&mut self) -> Result<bool, ParcelError> {
        match self.read_i32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ParcelError::Malformed(format!(
                "presence flag must be 0 or 1, got {other}"
            ))),
        }
    }

    pub fn read_string(&mut self) -> Result<String, ParcelError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(ParcelError::Malformed(format!(
                "negative string length {len}"
            )));
        }
        let bytes = self.take(len as usize)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|err| ParcelError::Malformed(format!("invalid utf-8 string: {err}")))
    }

    pub fn read_blob(&mut self, len: usize) -> Result<&'a [u8], ParcelError> {
        self.take(len)
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>, ParcelError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(ParcelError::Malformed(format!(
                "negative array length {len}"
            )));
        }
        Ok(self.take(len as usize)?.to_vec())
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, ParcelError> {
        let msb = self.read_u64()?;
        let lsb = self.read_u64()?;
        Ok(Uuid::from_u128(((msb as u128) << 64) | lsb as u128))
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails when trailing bytes are left over, which usually means the
    /// reader and writer disagree about the field order.
    pub fn finish(self) -> Result<(), ParcelError> {
        if self.pos == self.data.len() {
            Ok(())
        } else {
            Err(ParcelError::Malformed(format!(
                "{} trailing bytes after last field",
                self.data.len() - self.pos
            )))
        }
    }
}
