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

//! Structural combinators: conjunction, disjunction, fields, iteration, tuples

use structured_data::Data;

use super::{Globals, Test};

pub(super) fn and_why_not(tests: &[Test], globals: &mut Globals, subject: &Data) -> String {
    for test in tests {
        let reason = test.why_not(globals, subject);
        if !reason.is_empty() {
            return reason;
        }
    }
    String::new()
}

pub(super) fn or_why_not(tests: &[Test], globals: &mut Globals, subject: &Data) -> String {
    if tests.is_empty() {
        return "does not pass empty disjunction".to_string();
    }
    let mut reasons = Vec::with_capacity(tests.len());
    for test in tests {
        let reason = test.why_not(globals, subject);
        if reason.is_empty() {
            return reason;
        }
        reasons.push(reason);
    }
    format!("[{}]", reasons.join(", "))
}

pub(super) fn tuple_why_not(tests: &[Test], globals: &mut Globals, subject: &Data) -> String {
    let items = match subject.as_sequence() {
        Some(items) => items,
        None => return "is not a list".to_string(),
    };
    if items.len() != tests.len() {
        return format!("has length {} instead of {}", items.len(), tests.len());
    }
    for (idx, (test, item)) in tests.iter().zip(items).enumerate() {
        let reason = test.why_not(globals, item);
        if !reason.is_empty() {
            return format!("[{}] {}", idx, reason);
        }
    }
    String::new()
}

/// Applies a test to the field having the given name
#[derive(Debug, Clone)]
pub struct FieldTest {
    field_name: String,
    field_test: Box<Test>,
    show_name: bool,
}

impl FieldTest {
    pub fn new(field_name: impl Into<String>, field_test: Test, show_name: bool) -> Self {
        FieldTest { field_name: field_name.into(), field_test: Box::new(field_test), show_name }
    }

    pub(super) fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        let fields = match subject.as_mapping() {
            Some(fields) => fields,
            None => return "is not a dict".to_string(),
        };
        let value = match fields.get(&self.field_name) {
            Some(value) => value,
            None => return format!("has no {} field", self.field_name),
        };
        let reason = self.field_test.why_not(globals, value);
        if !reason.is_empty() && self.show_name {
            return format!("{} {}", self.field_name, reason);
        }
        reason
    }
}

/// Applies a test to every member of a list
///
/// An optional initial test runs on the whole list before the members and an
/// optional final test runs on it afterwards; their reasons are not prefixed.
#[derive(Debug, Clone)]
pub struct IterateTest {
    elt_test: Box<Test>,
    show_elt: bool,
    initial_test: Option<Box<Test>>,
    final_test: Option<Box<Test>>,
}

impl IterateTest {
    pub fn new(elt_test: Test, show_elt: bool) -> Self {
        IterateTest { elt_test: Box::new(elt_test), show_elt, initial_test: None, final_test: None }
    }

    pub fn with_initial_test(mut self, test: Test) -> Self {
        self.initial_test = Some(Box::new(test));
        self
    }

    pub fn with_final_test(mut self, test: Test) -> Self {
        self.final_test = Some(Box::new(test));
        self
    }

    pub(super) fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        let items = match subject.as_sequence() {
            Some(items) => items,
            None => return "is not a list".to_string(),
        };
        if let Some(initial_test) = &self.initial_test {
            let reason = initial_test.why_not(globals, subject);
            if !reason.is_empty() {
                return reason;
            }
        }
        for (idx, elt) in items.iter().enumerate() {
            let reason = self.elt_test.why_not(globals, elt);
            if reason.is_empty() {
                continue;
            }
            if self.show_elt {
                return format!("{} {}", elt, reason);
            }
            return format!("[{}] {}", idx, reason);
        }
        match &self.final_test {
            Some(final_test) => final_test.why_not(globals, subject),
            None => String::new(),
        }
    }
}

impl From<IterateTest> for Test {
    fn from(iterate: IterateTest) -> Self {
        Test::Iterate(iterate)
    }
}
