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

use std::collections::HashMap;

use structured_data::Data;

use super::{render_tuple, Globals, Test};
use crate::error::PolicyError;

/// Applies a specific test for each tuple of key field values
#[derive(Debug, Clone)]
pub struct Dispatcher {
    key_names: Vec<String>,
    tests: HashMap<Vec<Data>, Test>,
}

impl Dispatcher {
    pub fn new<I, S>(key_names: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key_names: Vec<String> = key_names.into_iter().map(Into::into).collect();
        if key_names.is_empty() {
            return Err(PolicyError::NoDispatchKeys);
        }
        Ok(Dispatcher { key_names, tests: HashMap::new() })
    }

    fn rendered_key_names(&self) -> String {
        let names: Vec<Data> = self.key_names.iter().map(|name| Data::from(name.as_str())).collect();
        render_tuple(&names)
    }

    /// Set the test for the given value tuple
    ///
    /// # Errors
    /// * `KeyArity` when the tuple length differs from the number of key names
    /// * `DuplicateDispatchKey` when the tuple already has a test
    pub fn set(&mut self, key_vals: Vec<Data>, test: Test) -> Result<(), PolicyError> {
        if key_vals.len() != self.key_names.len() {
            return Err(PolicyError::KeyArity {
                key_vals: render_tuple(&key_vals),
                key_names: self.rendered_key_names(),
            });
        }
        if self.tests.contains_key(&key_vals) {
            return Err(PolicyError::DuplicateDispatchKey(render_tuple(&key_vals)));
        }
        self.tests.insert(key_vals, test);
        Ok(())
    }

    pub(super) fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        let fields = match subject.as_mapping() {
            Some(fields) => fields,
            None => return "is not a dict".to_string(),
        };
        let mut key_vals = Vec::with_capacity(self.key_names.len());
        for key_name in &self.key_names {
            match fields.get(key_name) {
                Some(value) => key_vals.push(value.clone()),
                None => return format!("has no {}", key_name),
            }
        }
        match self.tests.get(&key_vals) {
            Some(test) => test.why_not(globals, subject),
            None => format!(
                "has unexpected {} combination {}",
                self.rendered_key_names(),
                render_tuple(&key_vals)
            ),
        }
    }
}

/// Dispatches on `(Event.VariableName, Event.UnicodeName)` and tests `Event.VariableData`
#[derive(Debug, Clone)]
pub struct VariableDispatch {
    dispatcher: Dispatcher,
}

impl VariableDispatch {
    pub fn new() -> Self {
        let dispatcher = Dispatcher {
            key_names: vec!["VariableName".to_string(), "UnicodeName".to_string()],
            tests: HashMap::new(),
        };
        VariableDispatch { dispatcher }
    }

    /// Define the test for a specific variable
    pub fn set(&mut self, variable_name: &str, unicode_name: &str, data_test: Test) -> Result<(), PolicyError> {
        self.dispatcher.set(
            vec![Data::from(variable_name), Data::from(unicode_name)],
            Test::field("VariableData", data_test),
        )
    }

    pub fn into_test(self) -> Test {
        Test::field("Event", Test::Dispatcher(self.dispatcher))
    }
}

impl Default for VariableDispatch {
    fn default() -> Self {
        Self::new()
    }
}
