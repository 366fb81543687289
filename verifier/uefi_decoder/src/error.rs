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

use thiserror::Error;

/// Errors raised while decoding UEFI binary structures
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated input: {0}")]
    Truncated(String),

    #[error("invalid length: {0}")]
    InvalidLength(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("malformed {field}: {reason}")]
    Malformed { field: String, reason: String },

    #[error("event {index} ({event_type}): {source}")]
    Event {
        index: usize,
        event_type: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::Malformed { field: field.into(), reason: reason.into() }
    }

    /// Attach the position and type of the event whose payload failed to decode
    pub fn in_event(self, index: usize, event_type: &str) -> Self {
        DecodeError::Event { index, event_type: event_type.to_string(), source: Box::new(self) }
    }
}
