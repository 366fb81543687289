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

use std::path::PathBuf;

use thiserror::Error;
use uefi_decoder::DecodeError;

/// Failures turning a binary event log into enriched records
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("conversion I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse took too long, more than {0} seconds")]
    Timeout(u64),

    #[error("parse returned code {code:?}, workspace={workspace:?}, stderr={stderr:?}")]
    ParserFailed { code: Option<i32>, stderr: String, workspace: PathBuf },

    #[error("parser output is malformed: {0}")]
    Format(String),

    #[error("enrichment failed: {0}")]
    Enrich(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
