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

mod nextgen2;
pub(crate) mod params;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use log::{debug, info};
use structured_data::Data;

pub use nextgen2::NextGen2;

use crate::error::PolicyError;
use crate::test_engine::Test;

/// A policy maps intended state expressed in some convenient form into the test to apply to an event log
pub trait Policy: Send + Sync {
    /// Name under which the policy is registered
    fn policy_type(&self) -> &str;

    /// Compile the given params into a test
    ///
    /// # Errors
    /// A `PolicyError` naming the first missing or malformed parameter.
    fn compile(&self, params: &Data) -> Result<Test, PolicyError>;
}

/// Immutable table of policies by name
#[derive(Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Arc<dyn Policy>>,
}

/// Collects policies for a [`PolicyRegistry`]
#[derive(Default)]
pub struct PolicyRegistryBuilder {
    policies: HashMap<String, Arc<dyn Policy>>,
}

impl PolicyRegistryBuilder {
    /// Remember the given policy under its type name; a later registration replaces an earlier one
    pub fn register(mut self, policy: Arc<dyn Policy>) -> Self {
        let name = policy.policy_type().to_string();
        debug!("Registering event log policy {}", name);
        self.policies.insert(name, policy);
        self
    }

    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry { policies: self.policies }
    }
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    /// Registry holding every policy shipped with this crate
    pub fn with_defaults() -> Self {
        Self::builder().register(Arc::new(NextGen2)).build()
    }

    /// Process-wide registry of the shipped policies
    pub fn get_instance() -> &'static PolicyRegistry {
        static INSTANCE: OnceLock<PolicyRegistry> = OnceLock::new();
        INSTANCE.get_or_init(PolicyRegistry::with_defaults)
    }

    /// Get a policy by name
    pub fn get_policy(&self, name: &str) -> Option<Arc<dyn Policy>> {
        self.policies.get(name).cloned()
    }

    /// Names of all registered policies, sorted
    pub fn policy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.policies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Compile the given parameter value set into a test
    ///
    /// # Errors
    /// * `UnknownPolicy` when no policy has the given name
    /// * whatever the policy reports for bad params
    pub fn compile(&self, policy_name: &str, params: &Data) -> Result<Test, PolicyError> {
        let policy = self
            .get_policy(policy_name)
            .ok_or_else(|| PolicyError::UnknownPolicy(policy_name.to_string()))?;
        let test = policy.compile(params)?;
        info!("Compiled event log policy {}", policy_name);
        Ok(test)
    }
}
