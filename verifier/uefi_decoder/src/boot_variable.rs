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

//! Boot manager variables: `BootOrder` and `Boot####` load options

use log::debug;
use structured_data::{Data, Mapping};

use crate::byte_reader::{ByteParseable, ByteReader};
use crate::device_path::format_device_path;
use crate::error::DecodeError;

const VAR_BOOT_ORDER: &str = "BootOrder";
const YES_STR: &str = "Yes";
const NO_STR: &str = "No";
const VAR_BOOT_PREFIX: &str = "Boot";
const LOAD_OPTION_ACTIVE: u32 = 0x0000_0001;

/// EFI_LOAD_OPTION
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiLoadOption {
    pub enabled: bool,
    pub file_path_list_length: u16,
    pub description: String,
    /// Rendered device path, or its hex when it cannot be rendered
    pub device_path: String,
}

impl ByteParseable for EfiLoadOption {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let attributes = parser.read_u32()?;
        let file_path_list_length = parser.read_u16()?;
        let description = parser.read_utf16_nul_terminated()?;
        let path_length = (file_path_list_length as usize).min(parser.remaining());
        let path_bytes = parser.read_slice(path_length)?;
        let device_path = format_device_path(path_bytes).unwrap_or_else(|e| {
            debug!("Boot option {:?} keeps raw device path: {}", description, e);
            hex::encode(path_bytes)
        });
        Ok(EfiLoadOption {
            enabled: attributes & LOAD_OPTION_ACTIVE != 0,
            file_path_list_length,
            description,
            device_path,
        })
    }
}

impl From<EfiLoadOption> for Data {
    fn from(option: EfiLoadOption) -> Self {
        let mut fields = Mapping::new();
        let enabled = if option.enabled { YES_STR } else { NO_STR };
        fields.insert("Enabled".to_string(), enabled.into());
        fields.insert("FilePathListLength".to_string(), option.file_path_list_length.into());
        fields.insert("Description".to_string(), Data::String(option.description));
        fields.insert("DevicePath".to_string(), Data::String(option.device_path));
        Data::Mapping(fields)
    }
}

/// Whether `name` is a `Boot####` load option variable
pub fn is_boot_option_name(name: &str) -> bool {
    match name.strip_prefix(VAR_BOOT_PREFIX) {
        Some(number) => number.len() == 4 && number.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Decode `BootOrder` into `["Boot0001", ...]`
pub fn decode_boot_order(bytes: &[u8]) -> Result<Data, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::InvalidLength(format!(
            "BootOrder length({}) is not divisible by 2",
            bytes.len()
        )));
    }
    let mut parser = ByteReader::new(bytes);
    let mut entries = Vec::with_capacity(bytes.len() / 2);
    while !parser.is_end() {
        entries.push(Data::String(format!("Boot{:04x}", parser.read_u16()?)));
    }
    Ok(Data::Sequence(entries))
}

/// Decode a boot manager variable by name
///
/// Returns `Ok(None)` for names that are neither `BootOrder` nor `Boot####`.
pub fn decode_boot_variable(name: &str, bytes: &[u8]) -> Result<Option<Data>, DecodeError> {
    if name == VAR_BOOT_ORDER {
        return decode_boot_order(bytes).map(Some);
    }
    if is_boot_option_name(name) {
        let option = EfiLoadOption::parse_from(&mut ByteReader::new(bytes))?;
        return Ok(Some(option.into()));
    }
    Ok(None)
}
