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

mod common;

use common::*;
use structured_data::Data;
use uefi_decoder::guid::{EFI_CERT_SHA256_GUID, EFI_CERT_X509_GUID};
use uefi_decoder::{
    decode_boot_order, decode_boot_variable, decode_gpt, decode_signature_database, decode_signature_entry,
    format_device_path, parse_signature_database, DecodeError,
};

#[test]
fn test_signature_database_lists_and_keys() {
    let mut bytes = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4], vec![0xbb; 4]]);
    bytes.extend(signature_list(SHA256_TYPE_BYTES, &[vec![0xcc; 32]]));

    let lists = parse_signature_database(&bytes).unwrap();
    assert_eq!(lists.len(), 2);
    let consumed: u32 = lists.iter().map(|list| list.signature_list_size).sum();
    assert_eq!(consumed as usize, bytes.len());

    let data = decode_signature_database(&bytes).unwrap();
    let first = &data.as_sequence().unwrap()[0];
    assert_eq!(first.get("SignatureType").and_then(Data::as_str), Some(EFI_CERT_X509_GUID));
    assert_eq!(first.get("SignatureSize").and_then(Data::as_int), Some(20));
    let keys = first.get("Keys").and_then(Data::as_sequence).unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].get("SignatureOwner").and_then(Data::as_str), Some(OWNER_GUID));
    assert_eq!(keys[1].get("SignatureData").and_then(Data::as_str), Some("bbbbbbbb"));

    let second = &data.as_sequence().unwrap()[1];
    assert_eq!(second.get("SignatureType").and_then(Data::as_str), Some(EFI_CERT_SHA256_GUID));
}

#[test]
fn test_signature_database_rejects_bad_sizes() {
    let mut too_small = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4]]);
    too_small[16..20].copy_from_slice(&20u32.to_le_bytes());
    assert!(matches!(decode_signature_database(&too_small), Err(DecodeError::InvalidLength(_))));

    let mut not_divisible = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4]]);
    not_divisible[16..20].copy_from_slice(&47u32.to_le_bytes());
    assert!(matches!(decode_signature_database(&not_divisible), Err(DecodeError::InvalidLength(_))));

    let mut zero_size = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4]]);
    zero_size[24..28].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(decode_signature_database(&zero_size), Err(DecodeError::InvalidValue(_))));

    let truncated = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4], vec![0xbb; 4]]);
    assert!(matches!(
        decode_signature_database(&truncated[..truncated.len() - 1]),
        Err(DecodeError::Truncated(_))
    ));
}

#[test]
fn test_signature_entry_spans_input() {
    let mut bytes = OWNER_BYTES.to_vec();
    bytes.extend_from_slice(&[0x30, 0x82, 0x01]);
    let key = decode_signature_entry(&bytes).unwrap();
    assert_eq!(key.get("SignatureOwner").and_then(Data::as_str), Some(OWNER_GUID));
    assert_eq!(key.get("SignatureData").and_then(Data::as_str), Some("308201"));
}

#[test]
fn test_device_path_renders_shim_path() {
    let mut bytes = node(0x02, 0x01, &[0xd0, 0x41, 0x03, 0x0a, 0, 0, 0, 0]);
    bytes.extend(node(0x01, 0x01, &[0x02, 0x1f]));
    let mut hd = 1u32.to_le_bytes().to_vec();
    hd.extend_from_slice(&0x800u64.to_le_bytes());
    hd.extend_from_slice(&0x100000u64.to_le_bytes());
    hd.extend_from_slice(&OWNER_BYTES);
    hd.extend_from_slice(&[0x02, 0x02]);
    bytes.extend(node(0x04, 0x01, &hd));
    bytes.extend(file_node("\\EFI\\redhat\\shimx64.efi"));
    bytes.extend(end_node());

    assert_eq!(
        format_device_path(&bytes).unwrap(),
        format!("PciRoot(0x0)/Pci(0x1f,0x2)/HD(1,GPT,{},0x800,0x100000)/File(\\EFI\\redhat\\shimx64.efi)", OWNER_GUID)
    );
}

#[test]
fn test_device_path_instances_and_unknown_nodes() {
    let mut bytes = node(0x01, 0x01, &[0x00, 0x00]);
    bytes.extend(node(0x7f, 0x01, &[]));
    bytes.extend(node(0x06, 0x01, &[0xaa, 0xbb]));
    bytes.extend(end_node());
    assert_eq!(format_device_path(&bytes).unwrap(), "Pci(0x0,0x0),Path(6,1,aabb)");
}

#[test]
fn test_device_path_malformed_input() {
    assert!(matches!(format_device_path(&[0x01, 0x01, 0x02, 0x00]), Err(DecodeError::Malformed { .. })));
    assert!(matches!(format_device_path(&node(0x01, 0x01, &[0, 0])), Err(DecodeError::Malformed { .. })));
    assert!(matches!(format_device_path(&[0x01, 0x01, 0x06, 0x00, 0x00]), Err(DecodeError::Truncated(_))));

    let mut short_pci = node(0x01, 0x01, &[0x00]);
    short_pci.extend(end_node());
    assert!(matches!(format_device_path(&short_pci), Err(DecodeError::Truncated(_))));
}

#[test]
fn test_boot_order() {
    let order = decode_boot_order(&[0x01, 0x00, 0x02, 0x00]).unwrap();
    assert_eq!(order, Data::Sequence(vec!["Boot0001".into(), "Boot0002".into()]));

    let lowercase = decode_boot_order(&[0x0a, 0x00]).unwrap();
    assert_eq!(lowercase, Data::Sequence(vec!["Boot000a".into()]));

    assert!(matches!(decode_boot_order(&[0x01, 0x00, 0x02]), Err(DecodeError::InvalidLength(_))));
}

#[test]
fn test_boot_option() {
    let mut path = file_node("\\EFI\\fedora\\shimx64.efi");
    path.extend(end_node());
    let bytes = load_option(0x1, "Fedora", &path, b"xy");

    let option = decode_boot_variable("Boot0003", &bytes).unwrap().unwrap();
    assert_eq!(option.get("Enabled").and_then(Data::as_str), Some("Yes"));
    assert_eq!(option.get("FilePathListLength").and_then(Data::as_int), Some(path.len() as i64));
    assert_eq!(option.get("Description").and_then(Data::as_str), Some("Fedora"));
    assert_eq!(option.get("DevicePath").and_then(Data::as_str), Some("File(\\EFI\\fedora\\shimx64.efi)"));

    let disabled = decode_boot_variable("Boot000F", &load_option(0x8, "Old", &path, &[])).unwrap().unwrap();
    assert_eq!(disabled.get("Enabled").and_then(Data::as_str), Some("No"));
}

#[test]
fn test_boot_option_keeps_unrenderable_path_as_hex() {
    let bytes = load_option(0x1, "Broken", &[0x01, 0x01, 0x02, 0x00], &[]);
    let option = decode_boot_variable("Boot0000", &bytes).unwrap().unwrap();
    assert_eq!(option.get("DevicePath").and_then(Data::as_str), Some("01010200"));
}

#[test]
fn test_other_variables_are_not_boot_variables() {
    assert!(decode_boot_variable("Timeout", &[0x05, 0x00]).unwrap().is_none());
    assert!(decode_boot_variable("BootNext1", &[0x05, 0x00]).unwrap().is_none());
    assert!(decode_boot_variable("Boot00012", &[0x05, 0x00]).unwrap().is_none());
}

#[test]
fn test_gpt_fields_and_hex_tags() {
    let bytes = gpt_event(&[(0x800, 0x1000, "EFI System"), (0x1001, 0x3de, "root")]);
    let gpt = decode_gpt(&bytes).unwrap();

    let header = gpt.get("Header").unwrap();
    assert_eq!(header.get("Signature").and_then(Data::as_str), Some("EFI PART"));
    assert_eq!(header.get("Revision"), Some(&Data::HexInteger(0x10000)));
    assert_eq!(header.get("HeaderSize"), Some(&Data::Integer(92)));
    assert_eq!(header.get("HeaderCRC32"), Some(&Data::HexInteger(0x1234)));
    assert_eq!(header.get("DiskGuid").and_then(Data::as_str), Some(OWNER_GUID));
    assert_eq!(header.get("PartitionEntryArrayCRC"), Some(&Data::HexInteger(0xabcd)));
    assert_eq!(gpt.get("NumberOfPartitions"), Some(&Data::Integer(2)));

    let partitions = gpt.get("Partitions").and_then(Data::as_sequence).unwrap();
    assert_eq!(partitions[0].get("PartitionName").and_then(Data::as_str), Some("EFI System"));
    assert_eq!(partitions[0].get("StartingLBA"), Some(&Data::HexInteger(0x800)));
    assert_eq!(partitions[1].get("PartitionTypeGUID").and_then(Data::as_str), Some(EFI_CERT_X509_GUID));

    let dumped = serde_json::to_value(&gpt).unwrap();
    assert_eq!(dumped["Partitions"][0]["StartingLBA"], "0x800");
    assert_eq!(dumped["Header"]["HeaderSize"], 92);
}

#[test]
fn test_gpt_rejects_truncated_partitions() {
    let bytes = gpt_event(&[(0x800, 0x1000, "EFI System")]);
    assert!(matches!(decode_gpt(&bytes[..bytes.len() - 10]), Err(DecodeError::Truncated(_))));
    assert!(matches!(decode_gpt(&bytes[..50]), Err(DecodeError::Truncated(_))));
}
