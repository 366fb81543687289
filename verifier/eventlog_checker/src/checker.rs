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

use std::collections::BTreeMap;
use std::sync::Arc;

use eventlog_policy::test_engine::pcrs_test;
use eventlog_policy::{PolicyRegistry, Test};
use log::{info, warn};
use structured_data::Data;

use crate::conversion::EventLogSource;
use crate::error::ConversionError;

/// Evaluates binary event logs against compiled policies
///
/// Every failure becomes the returned reason: callers only see an empty string
/// for acceptance or a description of why the log is rejected.
pub struct EventLogChecker {
    source: Arc<dyn EventLogSource>,
    registry: PolicyRegistry,
}

impl EventLogChecker {
    pub fn new(source: Arc<dyn EventLogSource>, registry: PolicyRegistry) -> Self {
        EventLogChecker { source, registry }
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Parse and enrich the given binary event log
    ///
    /// The conversion workspace is removed on success and kept when
    /// enrichment fails.
    pub async fn enriched_log(&self, eventlog: &[u8]) -> Result<Data, ConversionError> {
        let mut parsed = self.source.parse(eventlog).await?;
        let result = match uefi_decoder::enrich(parsed.log_mut()) {
            Ok(()) => parsed.save_enriched().await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            let (_, kept) = parsed.retain();
            if let Some(path) = kept {
                warn!("Enrichment failed, conversion workspace kept at {}: {}", path.display(), e);
            }
            return Err(e);
        }
        Ok(parsed.finish())
    }

    /// Apply `test` to the enriched form of `eventlog`
    pub async fn convert_and_test(&self, eventlog: &[u8], test: &Test) -> String {
        match self.enriched_log(eventlog).await {
            Ok(log) => test.check(&log),
            Err(e) => e.to_string(),
        }
    }

    /// Check `eventlog` against the named policy compiled with `params`
    pub async fn evaluate(&self, policy_name: &str, params: &Data, eventlog: &[u8]) -> String {
        let test = match self.registry.compile(policy_name, params) {
            Ok(test) => test,
            Err(e) => return e.to_string(),
        };
        let reason = self.convert_and_test(eventlog, &test).await;
        report(policy_name, &reason);
        reason
    }

    /// Check `eventlog` and the quoted PCR contents together
    ///
    /// `care` maps hash algorithm name to the PCR indices whose quoted values
    /// must equal the values the parser replayed from the log into `pcrs`.
    pub async fn evaluate_with_pcrs(
        &self,
        policy_name: &str,
        params: &Data,
        eventlog: &[u8],
        care: &BTreeMap<String, Vec<u32>>,
        got_pcrs: &Data,
    ) -> String {
        let pcrs = match pcrs_test(care, got_pcrs) {
            Ok(pcrs) => pcrs,
            Err(e) => return e.to_string(),
        };
        let test = match self.registry.compile(policy_name, params) {
            Ok(test) => test,
            Err(e) => return e.to_string(),
        };
        let reason = self.convert_and_test(eventlog, &Test::And(vec![pcrs, test])).await;
        report(policy_name, &reason);
        reason
    }
}

fn report(policy_name: &str, reason: &str) {
    if reason.is_empty() {
        info!("Event log satisfies policy {}", policy_name);
    } else {
        warn!("Event log rejected by policy {}: {}", policy_name, reason);
    }
}
