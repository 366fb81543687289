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

//! Event log checking driver
//!
//! Runs an external event log parser on a binary TPM event log, enriches the
//! parsed records with decoded UEFI structures and evaluates them with a
//! compiled policy.

pub mod checker;
pub mod config;
pub mod conversion;
pub mod error;

pub use checker::EventLogChecker;
pub use config::{CheckerConfig, OutputFormat, ParserConfig};
pub use conversion::{CommandLogParser, EventLogSource, ParsedLog};
pub use error::{ConfigError, ConversionError};
