/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! Byte Reader Module
//!
//! Cursor-style reader over UEFI binary structures. Every read is bounds
//! checked and reports a `DecodeError::Truncated` naming what was being read,
//! so decoders never produce partial output.
//!
//! The module contains two main components:
//! - `ByteReader`: A byte stream reader providing methods for reading various data types
//! - `ByteParseable`: A parseable trait; types implementing this trait can be parsed directly from byte streams

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use uuid::Uuid;

use crate::error::DecodeError;

/// UEFI GUID size
pub const UEFI_GUID_SIZE: usize = 16;

/// Binary data parsing helper structure
///
/// Internally uses Cursor for data reading and position tracking.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

/// Trait for types that can be parsed from a byte stream
///
/// # Example
///
/// ```rust
/// use uefi_decoder::byte_reader::{ByteParseable, ByteReader};
/// use uefi_decoder::DecodeError;
///
/// struct Header {
///     revision: u32,
///     disk_guid: String,
/// }
///
/// impl ByteParseable for Header {
///     fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
///         let revision = parser.read_u32()?;
///         let disk_guid = parser.read_guid()?;
///         Ok(Self { revision, disk_guid })
///     }
/// }
/// ```
pub trait ByteParseable: Sized {
    /// Parse an instance of the current type from a byte reader
    ///
    /// # Errors
    ///
    /// Returns a DecodeError when the byte stream contains insufficient data or is incorrectly formatted
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError>;
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    /// Current reading position (byte offset)
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Number of unread bytes remaining
    pub fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len() as u64;
        total.saturating_sub(self.cursor.position()) as usize
    }

    pub fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, what: &str, wanted: usize) -> DecodeError {
        DecodeError::Truncated(format!(
            "{} needs {} bytes at offset {} but only {} remain",
            what,
            wanted,
            self.position(),
            self.remaining()
        ))
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        if self.remaining() < 1 {
            return Err(self.truncated("u8", 1));
        }
        self.cursor.read_u8().map_err(|e| DecodeError::Truncated(format!("Failed to read u8: {}", e)))
    }

    /// Read a u16 value (little-endian)
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        if self.remaining() < 2 {
            return Err(self.truncated("u16", 2));
        }
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|e| DecodeError::Truncated(format!("Failed to read u16: {}", e)))
    }

    /// Read a u32 value (little-endian)
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        if self.remaining() < 4 {
            return Err(self.truncated("u32", 4));
        }
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| DecodeError::Truncated(format!("Failed to read u32: {}", e)))
    }

    /// Read a u64 value (little-endian)
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        if self.remaining() < 8 {
            return Err(self.truncated("u64", 8));
        }
        self.cursor
            .read_u64::<LittleEndian>()
            .map_err(|e| DecodeError::Truncated(format!("Failed to read u64: {}", e)))
    }

    /// Borrow the next `length` bytes without copying
    ///
    /// # Errors
    /// * Returns an error when the requested number of bytes exceeds the remaining bytes
    pub fn read_slice(&mut self, length: usize) -> Result<&'a [u8], DecodeError> {
        if length > self.remaining() {
            return Err(self.truncated("field", length));
        }
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let end = start + length;
        self.cursor.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Read bytes of specified length
    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, DecodeError> {
        self.read_slice(length).map(<[u8]>::to_vec)
    }

    /// Borrow everything that has not been read yet
    pub fn read_rest(&mut self) -> &'a [u8] {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = (self.cursor.position() as usize).min(data.len());
        self.cursor.set_position(data.len() as u64);
        &data[start..]
    }

    /// Skip `length` bytes
    pub fn skip(&mut self, length: usize) -> Result<(), DecodeError> {
        self.read_slice(length).map(|_| ())
    }

    /// Read GUID (16 bytes)
    ///
    /// The first three groups are stored little-endian, the rest as a byte string
    pub fn read_guid(&mut self) -> Result<String, DecodeError> {
        let bytes = self.read_slice(UEFI_GUID_SIZE)?;
        let mut guid_bytes: [u8; UEFI_GUID_SIZE] = [0; UEFI_GUID_SIZE];
        guid_bytes.copy_from_slice(bytes);
        Ok(Uuid::from_bytes_le(guid_bytes).to_string())
    }

    /// Read a UTF-16LE string that occupies exactly `byte_length` bytes
    ///
    /// Decoding stops at the first NUL character; the remainder of the field is
    /// still consumed. Unpaired surrogates are dropped.
    pub fn read_utf16_field(&mut self, byte_length: usize) -> Result<String, DecodeError> {
        let field = self.read_slice(byte_length)?;
        Ok(decode_utf16_until_nul(field))
    }

    /// Read a NUL-terminated UTF-16LE string
    ///
    /// Reads code units until the terminator or the end of data; a trailing odd
    /// byte is left unread.
    pub fn read_utf16_nul_terminated(&mut self) -> Result<String, DecodeError> {
        let mut units = Vec::new();
        while self.remaining() >= 2 {
            let unit = self.read_u16()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        Ok(char::decode_utf16(units).filter_map(Result::ok).collect())
    }

    /// Read a NUL-terminated single byte string, invalid UTF-8 replaced
    pub fn read_ascii_nul_terminated(&mut self) -> Result<String, DecodeError> {
        let rest = self.read_rest();
        let end = rest.iter().position(|b| *b == 0);
        let text = &rest[..end.unwrap_or(rest.len())];
        let consumed = end.map(|idx| idx + 1).unwrap_or(rest.len());
        let new_position = self.position() as usize - rest.len() + consumed;
        self.cursor.set_position(new_position as u64);
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}

/// Decode UTF-16LE code units up to the first NUL, dropping anything undecodable
pub fn decode_utf16_until_nul(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|unit| *unit != 0);
    char::decode_utf16(units).filter_map(Result::ok).collect()
}
