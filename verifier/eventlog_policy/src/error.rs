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

//! Error types for policy compilation
//!
//! Evaluation never fails: a subject that does not satisfy a test yields a
//! reason string. These errors cover building tests from parameters and
//! building PCR tests from quoted contents.

use thiserror::Error;

/// Errors that can occur while compiling a policy into a test
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A required policy parameter is absent
    #[error("params lacks {0}")]
    MissingParameter(String),

    /// The parameter set itself is not a mapping
    #[error("params is not a dict")]
    ParamsNotMapping,

    /// A policy parameter has the wrong shape
    #[error("params.{name} {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The same key tuple was registered twice in a dispatcher
    #[error("multiple tests for key_vals={0}")]
    DuplicateDispatchKey(String),

    /// A dispatcher key tuple does not match the dispatcher's key names
    #[error("key_vals={key_vals} does not match length of {key_names}")]
    KeyArity { key_vals: String, key_names: String },

    /// A dispatcher was declared without key names
    #[error("Dispatcher given empty list of key names")]
    NoDispatchKeys,

    #[error("there is no policy named {0:?}")]
    UnknownPolicy(String),

    #[error("{field} not in {fields}")]
    UnknownDelayedField { field: String, fields: String },

    /// A rejecting test must explain itself
    #[error("a rejection needs a non-empty reason")]
    EmptyRejection,

    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl PolicyError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PolicyError::InvalidParameter { name: name.into(), reason: reason.into() }
    }
}

/// The quoted PCR contents lack something the verifier cares about
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct DeficientQuote {
    reason: String,
}

impl DeficientQuote {
    pub fn new(reason: impl Into<String>) -> Self {
        DeficientQuote { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
