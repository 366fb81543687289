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

//! Delayed evaluation across the events of one log
//!
//! Per-event tests stash values into named accumulators in the globals; a
//! final test then examines all accumulated values together.

use structured_data::{Data, Mapping};

use super::{Globals, Test};
use crate::error::PolicyError;

/// A test to apply after stashing fields to test
///
/// For each field, accumulates a list of values in a correspondingly-named
/// global. As a test, ignores the given subject and instead applies the
/// configured fields test to the mapping of accumulated value lists.
#[derive(Debug, Clone)]
pub struct DelayToFields {
    field_names: Vec<String>,
    fields_test: Box<Test>,
}

impl DelayToFields {
    pub fn new<I, S>(fields_test: Test, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DelayToFields {
            field_names: field_names.into_iter().map(Into::into).collect(),
            fields_test: Box::new(fields_test),
        }
    }

    /// A test that accepts its subject and resets the accumulators
    pub fn initializer(&self) -> Test {
        Test::DelayInitializer(self.field_names.clone())
    }

    /// A test that appends its subject to the accumulator of `field_name`
    pub fn get(&self, field_name: &str) -> Result<Test, PolicyError> {
        if !self.field_names.iter().any(|name| name == field_name) {
            return Err(PolicyError::UnknownDelayedField {
                field: field_name.to_string(),
                fields: format!("{:?}", self.field_names),
            });
        }
        Ok(Test::DelayedField(field_name.to_string()))
    }

    pub(super) fn why_not(&self, globals: &mut Globals) -> String {
        let delayed: Mapping = self
            .field_names
            .iter()
            .map(|name| (name.clone(), globals.get(name).cloned().unwrap_or(Data::Null)))
            .collect();
        self.fields_test.why_not(globals, &Data::Mapping(delayed))
    }
}

pub(super) fn initialize(field_names: &[String], globals: &mut Globals) -> String {
    for field_name in field_names {
        globals.set(field_name.as_str(), Data::Sequence(Vec::new()));
    }
    String::new()
}

pub(super) fn stash(field_name: &str, globals: &mut Globals, subject: &Data) -> String {
    match globals.get_mut(field_name).and_then(Data::as_sequence_mut) {
        Some(values) => {
            values.push(subject.clone());
            String::new()
        }
        None => format!("malformed test: global {} is not a list", field_name),
    }
}
