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

use crate::byte_reader::{ByteReader, UEFI_GUID_SIZE};
use crate::error::DecodeError;

/// EFI_CERT_X509_GUID
pub const EFI_CERT_X509_GUID: &str = "a5c059a1-94e4-4aa7-87b5-ab155c2bf072";
/// EFI_CERT_SHA256_GUID
pub const EFI_CERT_SHA256_GUID: &str = "c1c41626-504c-4092-aca9-41f936934328";

/// Format a 16-byte EFI_GUID as `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
///
/// The first three groups are little-endian in memory, so the same bytes
/// always produce the same string but the string is not a hex dump of them.
pub fn format_guid(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.len() != UEFI_GUID_SIZE {
        return Err(DecodeError::InvalidLength(format!(
            "GUID must be {} bytes, got {}",
            UEFI_GUID_SIZE,
            bytes.len()
        )));
    }
    ByteReader::new(bytes).read_guid()
}
