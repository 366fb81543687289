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

//! Event log checking policies
//!
//! This crate evaluates a parsed and enriched TPM event log against the
//! intended state of a machine. A [`policy::Policy`] compiles intended-state
//! parameters into a [`test_engine::Test`]; evaluating the test yields an
//! empty string on acceptance or a reason for rejection.

pub mod error;
pub mod policy;
pub mod test_engine;

pub use error::{DeficientQuote, PolicyError};
pub use policy::{Policy, PolicyRegistry};
pub use test_engine::{Globals, Test};
