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

//! Decoders for the UEFI structures found in measured boot event logs.
//!
//! Every decoder turns a byte slice into [`structured_data::Data`] or fails
//! with a [`DecodeError`]; none of them produce partial output.

pub mod boot_variable;
pub mod byte_reader;
pub mod device_path;
pub mod enrich;
pub mod error;
pub mod gpt;
pub mod guid;
pub mod signature;

pub use boot_variable::{decode_boot_order, decode_boot_variable};
pub use device_path::format_device_path;
pub use enrich::enrich;
pub use error::DecodeError;
pub use gpt::decode_gpt;
pub use guid::format_guid;
pub use signature::{decode_signature_database, decode_signature_entry, parse_signature_database};
