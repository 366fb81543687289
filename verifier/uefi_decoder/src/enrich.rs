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

//! Enrichment of parsed event logs
//!
//! The external event log parser leaves several UEFI payloads as hex strings.
//! `enrich` replaces them in place with structured data so that policies can
//! inspect keys, boot options and partition tables.

use log::debug;
use structured_data::Data;

use crate::boot_variable::decode_boot_variable;
use crate::device_path::format_device_path;
use crate::error::DecodeError;
use crate::gpt::decode_gpt;
use crate::signature::{decode_signature_database, decode_signature_entry};

pub const EV_EFI_BOOT_SERVICES_APPLICATION: &str = "EV_EFI_BOOT_SERVICES_APPLICATION";
pub const EV_EFI_BOOT_SERVICES_DRIVER: &str = "EV_EFI_BOOT_SERVICES_DRIVER";
pub const EV_EFI_RUNTIME_SERVICES_DRIVER: &str = "EV_EFI_RUNTIME_SERVICES_DRIVER";
pub const EV_EFI_VARIABLE_DRIVER_CONFIG: &str = "EV_EFI_VARIABLE_DRIVER_CONFIG";
pub const EV_EFI_VARIABLE_AUTHORITY: &str = "EV_EFI_VARIABLE_AUTHORITY";
pub const EV_EFI_VARIABLE_BOOT: &str = "EV_EFI_VARIABLE_BOOT";
pub const EV_EFI_GPT_EVENT: &str = "EV_EFI_GPT_EVENT";

const VAR_SECURE_BOOT: &str = "SecureBoot";
const VAR_PK: &str = "PK";
const VAR_KEK: &str = "KEK";
const VAR_DB: &str = "db";

const FIELD_EVENTS: &str = "events";
const FIELD_EVENT_TYPE: &str = "EventType";
const FIELD_EVENT: &str = "Event";
const FIELD_DEVICE_PATH: &str = "DevicePath";
const FIELD_UNICODE_NAME: &str = "UnicodeName";
const FIELD_VARIABLE_DATA: &str = "VariableData";

/// Decode the UEFI payloads of every event in `log["events"]`
///
/// Device paths that cannot be rendered keep their hex form. Any other decode
/// failure aborts enrichment and names the offending event.
pub fn enrich(log: &mut Data) -> Result<(), DecodeError> {
    let events = match log.get_mut(FIELD_EVENTS).and_then(Data::as_sequence_mut) {
        Some(events) => events,
        None => return Ok(()),
    };
    for (index, event) in events.iter_mut().enumerate() {
        let event_type = match event.get(FIELD_EVENT_TYPE).and_then(Data::as_str) {
            Some(event_type) => event_type.to_string(),
            None => continue,
        };
        enrich_event(&event_type, event).map_err(|e| e.in_event(index, &event_type))?;
    }
    Ok(())
}

fn enrich_event(event_type: &str, event: &mut Data) -> Result<(), DecodeError> {
    match event_type {
        EV_EFI_BOOT_SERVICES_APPLICATION | EV_EFI_BOOT_SERVICES_DRIVER | EV_EFI_RUNTIME_SERVICES_DRIVER => {
            enrich_device_path(event);
            Ok(())
        }
        EV_EFI_VARIABLE_DRIVER_CONFIG => enrich_driver_config(event),
        EV_EFI_VARIABLE_AUTHORITY => enrich_authority(event),
        EV_EFI_VARIABLE_BOOT => enrich_boot_variable(event),
        EV_EFI_GPT_EVENT => enrich_gpt(event),
        _ => Ok(()),
    }
}

/// Hex-encoded bytes of a string field; `None` when absent or already decoded
fn hex_field(payload: &Data, field: &str) -> Option<Result<Vec<u8>, DecodeError>> {
    payload
        .get(field)
        .and_then(Data::as_str)
        .map(|text| hex::decode(text).map_err(DecodeError::from))
}

fn enrich_device_path(event: &mut Data) {
    let payload = match event.get_mut(FIELD_EVENT) {
        Some(payload) => payload,
        None => return,
    };
    let rendered = match hex_field(payload, FIELD_DEVICE_PATH) {
        Some(bytes) => bytes.and_then(|bytes| format_device_path(&bytes)),
        None => return,
    };
    match rendered {
        Ok(text) => {
            payload.insert(FIELD_DEVICE_PATH, text);
        }
        Err(e) => debug!("Keeping raw device path: {}", e),
    }
}

fn decode_secure_boot(bytes: &[u8]) -> Result<Data, DecodeError> {
    let enabled = match bytes {
        [] | [0] => "No",
        [_] => "Yes",
        _ => {
            return Err(DecodeError::InvalidLength(format!(
                "SecureBoot data length({}) > 1",
                bytes.len()
            )))
        }
    };
    Ok(std::iter::once(("Enabled", Data::from(enabled))).collect())
}

fn enrich_driver_config(event: &mut Data) -> Result<(), DecodeError> {
    let payload = match event.get_mut(FIELD_EVENT) {
        Some(payload) => payload,
        None => return Ok(()),
    };
    let name = match payload.get(FIELD_UNICODE_NAME).and_then(Data::as_str) {
        Some(name) => name.to_string(),
        None => return Ok(()),
    };
    let decode: fn(&[u8]) -> Result<Data, DecodeError> = match name.as_str() {
        VAR_PK | VAR_KEK | VAR_DB => decode_signature_database,
        VAR_SECURE_BOOT => decode_secure_boot,
        _ => return Ok(()),
    };
    if let Some(bytes) = hex_field(payload, FIELD_VARIABLE_DATA) {
        let decoded = decode(&bytes?)?;
        payload.insert(FIELD_VARIABLE_DATA, decoded);
    }
    Ok(())
}

fn enrich_authority(event: &mut Data) -> Result<(), DecodeError> {
    let payload = match event.get_mut(FIELD_EVENT) {
        Some(payload) => payload,
        None => return Ok(()),
    };
    if let Some(bytes) = hex_field(payload, FIELD_VARIABLE_DATA) {
        let decoded = decode_signature_entry(&bytes?)?;
        payload.insert(FIELD_VARIABLE_DATA, decoded);
    }
    Ok(())
}

fn enrich_boot_variable(event: &mut Data) -> Result<(), DecodeError> {
    let payload = match event.get_mut(FIELD_EVENT) {
        Some(payload) => payload,
        None => return Ok(()),
    };
    let name = match payload.get(FIELD_UNICODE_NAME).and_then(Data::as_str) {
        Some(name) => name.to_string(),
        None => return Ok(()),
    };
    if let Some(bytes) = hex_field(payload, FIELD_VARIABLE_DATA) {
        if let Some(decoded) = decode_boot_variable(&name, &bytes?)? {
            payload.insert(FIELD_VARIABLE_DATA, decoded);
        }
    }
    Ok(())
}

fn enrich_gpt(event: &mut Data) -> Result<(), DecodeError> {
    let bytes = match event.get(FIELD_EVENT).and_then(Data::as_str) {
        Some(text) => hex::decode(text)?,
        None => return Ok(()),
    };
    event.insert(FIELD_EVENT, decode_gpt(&bytes)?);
    Ok(())
}
