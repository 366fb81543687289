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

//! UEFI_GPT_DATA as measured in EV_EFI_GPT_EVENT

use std::mem::size_of;

use structured_data::{Data, Mapping};

use crate::byte_reader::{ByteParseable, ByteReader};
use crate::error::DecodeError;

/// Size of a UEFI_PARTITION_ENTRY
pub const UEFI_PARTITION_ENTRY_SIZE: usize = 128;
/// Size of the UTF-16LE PartitionName field
pub const UEFI_PARTITION_NAME_SIZE: usize = 72;

/// UEFI_PARTITION_TABLE_HEADER
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPartitionHeader {
    pub signature: String,
    pub revision: u32,
    pub header_size: u32,
    pub header_crc32: u32,
    pub my_lba: u64,
    pub alternate_lba: u64,
    pub first_usable_lba: u64,
    pub last_usable_lba: u64,
    pub disk_guid: String,
    pub partition_entry_lba: u64,
    pub number_of_partition_entries: u32,
    pub size_of_partition_entry: u32,
    pub partition_entry_array_crc32: u32,
}

/// UEFI_PARTITION_ENTRY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPartitionEntry {
    pub partition_type_guid: String,
    pub unique_partition_guid: String,
    pub starting_lba: u64,
    pub ending_lba: u64,
    pub attributes: u64,
    pub partition_name: String,
}

/// UEFI_GPT_DATA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiGptData {
    pub header: UefiPartitionHeader,
    pub partitions: Vec<UefiPartitionEntry>,
}

impl ByteParseable for UefiPartitionHeader {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let signature = String::from_utf8_lossy(parser.read_slice(size_of::<u64>())?).into_owned();
        let revision = parser.read_u32()?;
        let header_size = parser.read_u32()?;
        let header_crc32 = parser.read_u32()?;
        // Reserved
        parser.skip(size_of::<u32>())?;
        let my_lba = parser.read_u64()?;
        let alternate_lba = parser.read_u64()?;
        let first_usable_lba = parser.read_u64()?;
        let last_usable_lba = parser.read_u64()?;
        let disk_guid = parser.read_guid()?;
        let partition_entry_lba = parser.read_u64()?;
        let number_of_partition_entries = parser.read_u32()?;
        let size_of_partition_entry = parser.read_u32()?;
        let partition_entry_array_crc32 = parser.read_u32()?;
        Ok(Self {
            signature,
            revision,
            header_size,
            header_crc32,
            my_lba,
            alternate_lba,
            first_usable_lba,
            last_usable_lba,
            disk_guid,
            partition_entry_lba,
            number_of_partition_entries,
            size_of_partition_entry,
            partition_entry_array_crc32,
        })
    }
}

impl ByteParseable for UefiPartitionEntry {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let partition_type_guid = parser.read_guid()?;
        let unique_partition_guid = parser.read_guid()?;
        let starting_lba = parser.read_u64()?;
        let ending_lba = parser.read_u64()?;
        let attributes = parser.read_u64()?;
        let partition_name = parser.read_utf16_field(UEFI_PARTITION_NAME_SIZE)?;
        Ok(Self {
            partition_type_guid,
            unique_partition_guid,
            starting_lba,
            ending_lba,
            attributes,
            partition_name,
        })
    }
}

impl ByteParseable for UefiGptData {
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let header = UefiPartitionHeader::parse_from(parser)?;
        let number_of_partitions = parser.read_u64()?;
        let available = (parser.remaining() / UEFI_PARTITION_ENTRY_SIZE) as u64;
        if number_of_partitions > available {
            return Err(DecodeError::Truncated(format!(
                "NumberOfPartitions is {} but only {} partition entries fit",
                number_of_partitions, available
            )));
        }
        let mut partitions = Vec::with_capacity(number_of_partitions as usize);
        for _ in 0..number_of_partitions {
            let entry = parser.read_slice(UEFI_PARTITION_ENTRY_SIZE)?;
            partitions.push(UefiPartitionEntry::parse_from(&mut ByteReader::new(entry))?);
        }
        Ok(Self { header, partitions })
    }
}

/// Decode an EV_EFI_GPT_EVENT payload
pub fn decode_gpt(bytes: &[u8]) -> Result<Data, DecodeError> {
    Ok(UefiGptData::parse_from(&mut ByteReader::new(bytes))?.into())
}

impl From<UefiPartitionHeader> for Data {
    fn from(header: UefiPartitionHeader) -> Self {
        let mut fields = Mapping::new();
        fields.insert("Signature".to_string(), Data::String(header.signature));
        fields.insert("Revision".to_string(), Data::hex(header.revision.into()));
        fields.insert("HeaderSize".to_string(), header.header_size.into());
        fields.insert("HeaderCRC32".to_string(), Data::hex(header.header_crc32.into()));
        fields.insert("MyLBA".to_string(), Data::hex(header.my_lba));
        fields.insert("AlternateLBA".to_string(), Data::hex(header.alternate_lba));
        fields.insert("FirstUsableLBA".to_string(), Data::hex(header.first_usable_lba));
        fields.insert("LastUsableLBA".to_string(), Data::hex(header.last_usable_lba));
        fields.insert("DiskGuid".to_string(), Data::String(header.disk_guid));
        fields.insert("PartitionEntryLBA".to_string(), Data::hex(header.partition_entry_lba));
        fields.insert("NumberOfPartitionEntries".to_string(), header.number_of_partition_entries.into());
        fields.insert("SizeOfPartitionEntry".to_string(), header.size_of_partition_entry.into());
        fields.insert("PartitionEntryArrayCRC".to_string(), Data::hex(header.partition_entry_array_crc32.into()));
        Data::Mapping(fields)
    }
}

impl From<UefiPartitionEntry> for Data {
    fn from(entry: UefiPartitionEntry) -> Self {
        let mut fields = Mapping::new();
        fields.insert("PartitionTypeGUID".to_string(), Data::String(entry.partition_type_guid));
        fields.insert("UniquePartitionGUID".to_string(), Data::String(entry.unique_partition_guid));
        fields.insert("StartingLBA".to_string(), Data::hex(entry.starting_lba));
        fields.insert("EndingLBA".to_string(), Data::hex(entry.ending_lba));
        fields.insert("Attributes".to_string(), Data::hex(entry.attributes));
        fields.insert("PartitionName".to_string(), Data::String(entry.partition_name));
        Data::Mapping(fields)
    }
}

impl From<UefiGptData> for Data {
    fn from(gpt: UefiGptData) -> Self {
        let mut fields = Mapping::new();
        fields.insert("Header".to_string(), gpt.header.into());
        fields.insert("NumberOfPartitions".to_string(), Data::Integer(gpt.partitions.len() as i64));
        fields.insert("Partitions".to_string(), gpt.partitions.into_iter().map(Data::from).collect());
        Data::Mapping(fields)
    }
}
