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

//! Structured data shared by the decoders, the enricher and the test engine.
//!
//! `Data` is the closed value model of an event log record after it has been
//! read from the external parser: integers, strings, booleans, null, ordered
//! sequences and string-keyed mappings. Integers that are conventionally shown
//! in hexadecimal (LBAs, CRC32 values, attributes) carry their own tag so that
//! textual dumps render them as `0x...`.

mod data;

pub use data::{Data, Mapping};
