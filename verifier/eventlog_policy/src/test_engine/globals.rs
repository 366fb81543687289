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

/// Per-evaluation scratch variables shared by the tests of one evaluation
///
/// A fresh instance is created for every top-level evaluation and must not be
/// shared between evaluations.
#[derive(Debug, Default)]
pub struct Globals {
    variables: HashMap<String, Data>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Data> {
        self.variables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Data> {
        self.variables.get_mut(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Data) {
        self.variables.insert(name.into(), value);
    }
}
