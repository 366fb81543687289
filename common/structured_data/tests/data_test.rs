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

use serde_json::json;
use structured_data::{Data, Mapping};

#[test]
fn test_data_from_json_keeps_shape() {
    let data = Data::try_from(json!({
        "PCRIndex": 7,
        "EventType": "EV_SEPARATOR",
        "Digests": [{"AlgorithmId": "sha256", "Digest": "abcd"}],
        "Event": null,
        "Enabled": true
    }))
    .unwrap();

    assert_eq!(data.get("PCRIndex").and_then(Data::as_int), Some(7));
    assert_eq!(data.get("EventType").and_then(Data::as_str), Some("EV_SEPARATOR"));
    assert!(data.get("Event").unwrap().is_null());
    assert_eq!(data.get("Enabled").and_then(Data::as_bool), Some(true));
    let digests = data.get("Digests").and_then(Data::as_sequence).unwrap();
    assert_eq!(digests[0].get("Digest").and_then(Data::as_str), Some("abcd"));
}

#[test]
fn test_data_rejects_floats() {
    let result = Data::try_from(json!({"value": 1.5}));
    assert!(result.is_err());
}

#[test]
fn test_large_unsigned_becomes_hex_integer() {
    let data = Data::try_from(json!(u64::MAX)).unwrap();
    assert_eq!(data, Data::HexInteger(u64::MAX));
}

#[test]
fn test_hex_integer_dumps_as_hex() {
    let mut fields = Mapping::new();
    fields.insert("MyLBA".to_string(), Data::hex(0x800));
    fields.insert("HeaderSize".to_string(), Data::Integer(92));
    let data = Data::Mapping(fields);

    let json_text = serde_json::to_string(&data).unwrap();
    assert_eq!(json_text, r#"{"HeaderSize":92,"MyLBA":"0x800"}"#);

    let yaml_text = serde_yaml::to_string(&data).unwrap();
    assert!(yaml_text.contains("0x800"));
    assert!(yaml_text.contains("HeaderSize: 92"));
}

#[test]
fn test_yaml_integer_keys_become_decimal_strings() {
    let yaml = "pcrs:\n  sha256:\n    0: 0x10\n    7: 0x20\n";
    let data: Data = serde_yaml::from_str(yaml).unwrap();
    let bank = data.get("pcrs").and_then(|pcrs| pcrs.get("sha256")).unwrap();
    assert_eq!(bank.get("0").and_then(Data::as_int), Some(16));
    assert_eq!(bank.get("7").and_then(Data::as_int), Some(32));
}

#[test]
fn test_display_renders_nested_values() {
    let data = Data::try_from(json!({"a": [1, "x"], "b": null})).unwrap();
    assert_eq!(data.to_string(), r#"{"a": [1, "x"], "b": null}"#);
}

#[test]
fn test_insert_only_into_mappings() {
    let mut mapping = Data::mapping();
    assert!(mapping.insert("Enabled", "Yes"));
    assert_eq!(mapping.get("Enabled").and_then(Data::as_str), Some("Yes"));

    let mut sequence = Data::Sequence(vec![]);
    assert!(!sequence.insert("Enabled", "Yes"));
}

#[test]
fn test_wide_json_integers_become_hex_strings() {
    let text = r#"{"sha256": {"7": 27817745813722458087632958224633702412424946002099506938012046418512563255657}}"#;
    let data: Data = serde_json::from_str(text).unwrap();
    let digest = data.get("sha256").and_then(|bank| bank.get("7")).and_then(Data::as_str);
    assert_eq!(digest, Some("3d804942b48713675409c395a718a3f32370b4990e19fb4443769d582945b969"));

    let data: Data = serde_json::from_str("340282366920938463463374607431768211456").unwrap();
    assert_eq!(data, Data::String("100000000000000000000000000000000".to_string()));

    let data = Data::try_from(json!({"wide": 340282366920938463463374607431768211455u128})).unwrap();
    assert_eq!(data.get("wide").and_then(Data::as_str), Some("ffffffffffffffffffffffffffffffff"));
}

#[test]
fn test_wide_json_floats_still_rejected() {
    assert!(serde_json::from_str::<Data>("1.5").is_err());
    assert!(serde_json::from_str::<Data>("1e400").is_err());
    assert!(serde_json::from_str::<Data>(r#"{"pcr": 12345678901234567890123456789012345678901.0}"#).is_err());
    assert!(serde_json::from_str::<Data>("-340282366920938463463374607431768211456000").is_err());
}

#[test]
fn test_hex_integer_dump_reads_back_as_string() {
    let data: Data = vec![("MyLBA".to_string(), Data::hex(1))].into_iter().collect();
    let yaml_text = serde_yaml::to_string(&data).unwrap();
    let reread: Data = serde_yaml::from_str(&yaml_text).unwrap();
    assert_eq!(reread.get("MyLBA"), Some(&Data::String("0x1".to_string())));
}
