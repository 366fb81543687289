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

#![allow(dead_code)]

pub const X509_TYPE_BYTES: [u8; 16] = [
    0xa1, 0x59, 0xc0, 0xa5, 0xe4, 0x94, 0xa7, 0x4a, 0x87, 0xb5, 0xab, 0x15, 0x5c, 0x2b, 0xf0, 0x72,
];
pub const SHA256_TYPE_BYTES: [u8; 16] = [
    0x26, 0x16, 0xc4, 0xc1, 0x4c, 0x50, 0x92, 0x40, 0xac, 0xa9, 0x41, 0xf9, 0x36, 0x93, 0x43, 0x28,
];
pub const OWNER_BYTES: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
pub const OWNER_GUID: &str = "03020100-0504-0706-0809-0a0b0c0d0e0f";

pub fn utf16z(text: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

pub fn node(node_type: u8, sub_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![node_type, sub_type];
    bytes.extend_from_slice(&((payload.len() + 4) as u16).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

pub fn end_node() -> Vec<u8> {
    node(0x7f, 0xff, &[])
}

pub fn file_node(path: &str) -> Vec<u8> {
    node(0x04, 0x04, &utf16z(path))
}

pub fn signature_list(type_guid: [u8; 16], entries: &[Vec<u8>]) -> Vec<u8> {
    let signature_size = 16 + entries.first().map(Vec::len).unwrap_or(0);
    let list_size = 28 + signature_size * entries.len();
    let mut bytes = type_guid.to_vec();
    bytes.extend_from_slice(&(list_size as u32).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(signature_size as u32).to_le_bytes());
    for entry in entries {
        bytes.extend_from_slice(&OWNER_BYTES);
        bytes.extend_from_slice(entry);
    }
    bytes
}

pub fn load_option(attributes: u32, description: &str, device_path: &[u8], optional: &[u8]) -> Vec<u8> {
    let mut bytes = attributes.to_le_bytes().to_vec();
    bytes.extend_from_slice(&(device_path.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&utf16z(description));
    bytes.extend_from_slice(device_path);
    bytes.extend_from_slice(optional);
    bytes
}

pub fn gpt_event(partitions: &[(u64, u64, &str)]) -> Vec<u8> {
    let mut bytes = b"EFI PART".to_vec();
    bytes.extend_from_slice(&0x0001_0000u32.to_le_bytes());
    bytes.extend_from_slice(&92u32.to_le_bytes());
    bytes.extend_from_slice(&0x1234u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&1u64.to_le_bytes());
    bytes.extend_from_slice(&0x3ffu64.to_le_bytes());
    bytes.extend_from_slice(&34u64.to_le_bytes());
    bytes.extend_from_slice(&0x3deu64.to_le_bytes());
    bytes.extend_from_slice(&OWNER_BYTES);
    bytes.extend_from_slice(&2u64.to_le_bytes());
    bytes.extend_from_slice(&128u32.to_le_bytes());
    bytes.extend_from_slice(&128u32.to_le_bytes());
    bytes.extend_from_slice(&0xabcdu32.to_le_bytes());
    bytes.extend_from_slice(&(partitions.len() as u64).to_le_bytes());
    for (start, end, name) in partitions {
        bytes.extend_from_slice(&X509_TYPE_BYTES);
        bytes.extend_from_slice(&OWNER_BYTES);
        bytes.extend_from_slice(&start.to_le_bytes());
        bytes.extend_from_slice(&end.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        let mut name_field = utf16z(name);
        name_field.resize(72, 0);
        bytes.extend_from_slice(&name_field);
    }
    bytes
}
