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

use structured_data::Data;

use super::{Globals, RegExpTest, Test};
use crate::error::PolicyError;

/// How a [`VariableTest`] matches `Event.UnicodeName`
#[derive(Debug, Clone)]
pub enum UnicodeNameMatch {
    Exact(String),
    /// Full match against a regular expression
    Pattern(RegExpTest),
}

impl UnicodeNameMatch {
    pub fn exact(name: impl Into<String>) -> Self {
        UnicodeNameMatch::Exact(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, PolicyError> {
        RegExpTest::new(pattern, false).map(UnicodeNameMatch::Pattern)
    }

    fn why_not(&self, unicode_name: &str) -> String {
        match self {
            UnicodeNameMatch::Exact(expected) if expected == unicode_name => String::new(),
            UnicodeNameMatch::Exact(expected) => {
                format!("Event.UnicodeName is {} rather than {}", unicode_name, expected)
            }
            UnicodeNameMatch::Pattern(regexp) if regexp.is_match(unicode_name) => String::new(),
            UnicodeNameMatch::Pattern(regexp) => {
                format!("Event.UnicodeName, {}, does not match {}", unicode_name, regexp.pattern())
            }
        }
    }
}

/// Tests whether a given UEFI variable has a value passing the data test
#[derive(Debug, Clone)]
pub struct VariableTest {
    variable_name: String,
    unicode_name: UnicodeNameMatch,
    data_test: Box<Test>,
}

impl VariableTest {
    /// `variable_name` is the vendor GUID of the variable; `data_test` applies to `VariableData`
    pub fn new(variable_name: impl Into<String>, unicode_name: UnicodeNameMatch, data_test: Test) -> Self {
        VariableTest { variable_name: variable_name.into(), unicode_name, data_test: Box::new(data_test) }
    }

    pub(super) fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        let fields = match subject.as_mapping() {
            Some(fields) => fields,
            None => return "is not a dict".to_string(),
        };
        let event = match fields.get("Event") {
            Some(event) => event,
            None => return "has no Event field".to_string(),
        };
        let event = match event.as_mapping() {
            Some(event) => event,
            None => return "Event is not a dict".to_string(),
        };
        let variable_name = match event.get("VariableName") {
            Some(variable_name) => variable_name,
            None => return "Event has no VariableName field".to_string(),
        };
        if variable_name.as_str() != Some(self.variable_name.as_str()) {
            return format!(
                "Event.VariableName is {} rather than {}",
                plain(variable_name),
                self.variable_name
            );
        }
        let unicode_name = match event.get("UnicodeName") {
            Some(unicode_name) => unicode_name,
            None => return "Event has no UnicodeName field".to_string(),
        };
        let variable_data = match event.get("VariableData") {
            Some(variable_data) => variable_data,
            None => return "Event has no VariableData field".to_string(),
        };
        let unicode_name = match unicode_name.as_str() {
            Some(unicode_name) => unicode_name,
            None => return "Event.UnicodeName is not a str".to_string(),
        };
        let reason = self.unicode_name.why_not(unicode_name);
        if !reason.is_empty() {
            return reason;
        }
        self.data_test.why_not(globals, variable_data)
    }
}

/// Strings without quotes, everything else as displayed
fn plain(value: &Data) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
