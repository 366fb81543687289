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
use serde_json::json;
use structured_data::Data;
use uefi_decoder::{enrich, DecodeError};

fn event(event_type: &str, payload: serde_json::Value) -> serde_json::Value {
    json!({"PCRIndex": 7, "EventType": event_type, "Event": payload, "Digests": []})
}

fn log_of(events: Vec<serde_json::Value>) -> Data {
    Data::try_from(json!({ "events": events })).unwrap()
}

fn payload(log: &Data, index: usize) -> &Data {
    &log.get("events").and_then(Data::as_sequence).unwrap()[index]
}

fn secure_boot(hex_data: &str) -> serde_json::Value {
    event(
        "EV_EFI_VARIABLE_DRIVER_CONFIG",
        json!({"UnicodeName": "SecureBoot", "VariableData": hex_data}),
    )
}

#[test]
fn test_enrich_device_paths_with_fallback() {
    let mut path = file_node("\\EFI\\BOOT\\BOOTX64.EFI");
    path.extend(end_node());
    let mut log = log_of(vec![
        event("EV_EFI_BOOT_SERVICES_APPLICATION", json!({"DevicePath": hex::encode(&path)})),
        event("EV_EFI_BOOT_SERVICES_DRIVER", json!({"DevicePath": "01010200"})),
        event("EV_EFI_RUNTIME_SERVICES_DRIVER", json!({"DevicePath": "not hex"})),
    ]);

    enrich(&mut log).unwrap();

    let path_of = |index| payload(&log, index).get("Event").and_then(|e| e.get("DevicePath")).cloned();
    assert_eq!(path_of(0), Some(Data::from("File(\\EFI\\BOOT\\BOOTX64.EFI)")));
    assert_eq!(path_of(1), Some(Data::from("01010200")));
    assert_eq!(path_of(2), Some(Data::from("not hex")));
}

#[test]
fn test_enrich_secure_boot() {
    let mut log = log_of(vec![secure_boot(""), secure_boot("00"), secure_boot("01")]);
    enrich(&mut log).unwrap();

    let enabled_of = |index| {
        payload(&log, index)
            .get("Event")
            .and_then(|e| e.get("VariableData"))
            .and_then(|v| v.get("Enabled"))
            .and_then(Data::as_str)
            .map(str::to_string)
    };
    assert_eq!(enabled_of(0).as_deref(), Some("No"));
    assert_eq!(enabled_of(1).as_deref(), Some("No"));
    assert_eq!(enabled_of(2).as_deref(), Some("Yes"));
}

#[test]
fn test_enrich_secure_boot_too_long_is_fatal() {
    let mut log = log_of(vec![secure_boot("01"), secure_boot("0101")]);
    match enrich(&mut log) {
        Err(DecodeError::Event { index, event_type, source }) => {
            assert_eq!(index, 1);
            assert_eq!(event_type, "EV_EFI_VARIABLE_DRIVER_CONFIG");
            assert!(matches!(*source, DecodeError::InvalidLength(_)));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_enrich_key_databases_but_not_dbx() {
    let db = signature_list(X509_TYPE_BYTES, &[vec![0xaa; 4]]);
    let mut log = log_of(vec![
        event("EV_EFI_VARIABLE_DRIVER_CONFIG", json!({"UnicodeName": "db", "VariableData": hex::encode(&db)})),
        event("EV_EFI_VARIABLE_DRIVER_CONFIG", json!({"UnicodeName": "dbx", "VariableData": "abcd"})),
        event("EV_EFI_VARIABLE_DRIVER_CONFIG", json!({"UnicodeName": "PK", "VariableData": hex::encode(&db)})),
    ]);
    enrich(&mut log).unwrap();

    let data_of = |index| payload(&log, index).get("Event").and_then(|e| e.get("VariableData")).cloned();
    let keys = data_of(0).unwrap();
    assert_eq!(keys.as_sequence().map(Vec::len), Some(1));
    assert_eq!(data_of(1), Some(Data::from("abcd")));
    assert_eq!(data_of(2), Some(keys));
}

#[test]
fn test_enrich_bad_key_database_names_event() {
    let mut log = log_of(vec![
        event("EV_NO_ACTION", json!("00")),
        event("EV_EFI_VARIABLE_DRIVER_CONFIG", json!({"UnicodeName": "KEK", "VariableData": "a1b2"})),
    ]);
    let err = enrich(&mut log).unwrap_err();
    assert!(err.to_string().starts_with("event 1 (EV_EFI_VARIABLE_DRIVER_CONFIG)"));
}

#[test]
fn test_enrich_authority_boot_and_gpt() {
    let mut authority = OWNER_BYTES.to_vec();
    authority.extend_from_slice(&[0x30, 0x82]);
    let gpt = gpt_event(&[(0x800, 0x1000, "EFI System")]);
    let mut log = log_of(vec![
        event("EV_EFI_VARIABLE_AUTHORITY", json!({"UnicodeName": "db", "VariableData": hex::encode(&authority)})),
        event("EV_EFI_VARIABLE_BOOT", json!({"UnicodeName": "BootOrder", "VariableData": "01000200"})),
        event("EV_EFI_VARIABLE_BOOT", json!({"UnicodeName": "Timeout", "VariableData": "0500"})),
        event("EV_EFI_GPT_EVENT", json!(hex::encode(&gpt))),
        event("EV_IPL", json!({"String": "grub_cmd: linux /vmlinuz"})),
    ]);
    let untouched = payload(&log, 4).clone();

    enrich(&mut log).unwrap();

    let data_of = |index| payload(&log, index).get("Event").and_then(|e| e.get("VariableData")).cloned();
    assert_eq!(
        data_of(0).and_then(|key| key.get("SignatureOwner").cloned()),
        Some(Data::from(OWNER_GUID))
    );
    assert_eq!(data_of(1), Some(Data::Sequence(vec!["Boot0001".into(), "Boot0002".into()])));
    assert_eq!(data_of(2), Some(Data::from("0500")));

    let gpt_event = payload(&log, 3).get("Event").unwrap();
    assert_eq!(gpt_event.get("NumberOfPartitions"), Some(&Data::Integer(1)));
    assert_eq!(payload(&log, 4), &untouched);
}

#[test]
fn test_enrich_odd_boot_order_is_fatal() {
    let mut log = log_of(vec![event(
        "EV_EFI_VARIABLE_BOOT",
        json!({"UnicodeName": "BootOrder", "VariableData": "010002"}),
    )]);
    assert!(matches!(enrich(&mut log), Err(DecodeError::Event { index: 0, .. })));
}

#[test]
fn test_enrich_without_events_is_noop() {
    let mut log = Data::try_from(json!({"pcrs": {}})).unwrap();
    let before = log.clone();
    enrich(&mut log).unwrap();
    assert_eq!(log, before);
}
