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

//! UEFI signature databases (PK, KEK, db) and single signature entries

use std::mem::size_of;

use structured_data::{Data, Mapping};

use crate::byte_reader::{ByteParseable, ByteReader, UEFI_GUID_SIZE};
use crate::error::DecodeError;

/// Size of the fixed EFI_SIGNATURE_LIST prefix: type GUID and three u32 sizes
pub const SIGNATURE_LIST_PREFIX_SIZE: usize = UEFI_GUID_SIZE + size_of::<u32>() * 3;

/// EFI_SIGNATURE_DATA: owner GUID followed by the signature bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiSignatureData {
    pub signature_owner: String,
    pub signature_data: String,
}

/// EFI_SIGNATURE_LIST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiSignatureList {
    pub signature_type: String,
    pub signature_list_size: u32,
    pub signature_header_size: u32,
    pub signature_size: u32,
    pub signatures: Vec<EfiSignatureData>,
}

impl ByteParseable for EfiSignatureData {
    /// The signature data spans everything after the owner GUID
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let signature_owner = parser.read_guid()?;
        let signature_data = hex::encode(parser.read_rest());
        Ok(EfiSignatureData { signature_owner, signature_data })
    }
}

impl ByteParseable for EfiSignatureList {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let signature_type = parser.read_guid()?;
        let signature_list_size = parser.read_u32()?;
        let signature_header_size = parser.read_u32()?;
        let signature_size = parser.read_u32()?;

        let signatures_length = i64::from(signature_list_size)
            - SIGNATURE_LIST_PREFIX_SIZE as i64
            - i64::from(signature_header_size);
        if signatures_length < 0 {
            return Err(DecodeError::InvalidLength(format!(
                "SignatureListSize is too small {}",
                signature_list_size
            )));
        }
        if signature_size == 0 {
            return Err(DecodeError::InvalidValue("SignatureSize is 0".to_string()));
        }
        if signatures_length % i64::from(signature_size) != 0 {
            return Err(DecodeError::InvalidLength(format!(
                "SignatureListSize({}) is not divisible by SignatureSize({})",
                signatures_length, signature_size
            )));
        }
        if (signature_size as usize) < UEFI_GUID_SIZE {
            return Err(DecodeError::InvalidValue(format!(
                "SignatureSize({}) is smaller than the owner GUID",
                signature_size
            )));
        }

        parser.skip(signature_header_size as usize)?;
        let signature_count = (signatures_length / i64::from(signature_size)) as usize;
        let mut signatures = Vec::with_capacity(signature_count.min(parser.remaining() / UEFI_GUID_SIZE));
        for _ in 0..signature_count {
            let entry = parser.read_slice(signature_size as usize)?;
            signatures.push(EfiSignatureData::parse_from(&mut ByteReader::new(entry))?);
        }

        Ok(EfiSignatureList {
            signature_type,
            signature_list_size,
            signature_header_size,
            signature_size,
            signatures,
        })
    }
}

/// Parse a concatenation of EFI_SIGNATURE_LIST records until the input is consumed
pub fn parse_signature_database(bytes: &[u8]) -> Result<Vec<EfiSignatureList>, DecodeError> {
    let mut parser = ByteReader::new(bytes);
    let mut lists = Vec::new();
    while !parser.is_end() {
        lists.push(EfiSignatureList::parse_from(&mut parser)?);
    }
    Ok(lists)
}

/// Decode a signature database into `[{SignatureType, ..., Keys: [...]}, ...]`
pub fn decode_signature_database(bytes: &[u8]) -> Result<Data, DecodeError> {
    Ok(parse_signature_database(bytes)?.into_iter().map(Data::from).collect())
}

/// Decode one signature entry spanning the whole input, as found in authority events
pub fn decode_signature_entry(bytes: &[u8]) -> Result<Data, DecodeError> {
    Ok(EfiSignatureData::parse_from(&mut ByteReader::new(bytes))?.into())
}

impl From<EfiSignatureData> for Data {
    fn from(key: EfiSignatureData) -> Self {
        let mut fields = Mapping::new();
        fields.insert("SignatureOwner".to_string(), Data::String(key.signature_owner));
        fields.insert("SignatureData".to_string(), Data::String(key.signature_data));
        Data::Mapping(fields)
    }
}

impl From<EfiSignatureList> for Data {
    fn from(list: EfiSignatureList) -> Self {
        let mut fields = Mapping::new();
        fields.insert("SignatureType".to_string(), Data::String(list.signature_type));
        fields.insert("SignatureListSize".to_string(), list.signature_list_size.into());
        fields.insert("SignatureHeaderSize".to_string(), list.signature_header_size.into());
        fields.insert("SignatureSize".to_string(), list.signature_size.into());
        fields.insert("Keys".to_string(), list.signatures.into_iter().map(Data::from).collect());
        Data::Mapping(fields)
    }
}
