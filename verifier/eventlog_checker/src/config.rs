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

use common_log::config::LogConfig;
use serde::Deserialize;

use crate::error::ConfigError;

/// Placeholder in parser arguments replaced by the path of the binary event log
pub const INPUT_PLACEHOLDER: &str = "{input}";

fn default_program() -> String {
    "tpm2_eventlog".to_string()
}

fn default_args() -> Vec<String> {
    vec![INPUT_PLACEHOLDER.to_string()]
}

fn default_timeout_secs() -> u64 {
    100
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".klcvt")
}

/// Text format written by the external parser on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// External event log parser settings
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Budget for one parser run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory under which each conversion gets its own workspace
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
            work_dir: default_work_dir(),
            output_format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl CheckerConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path.into())?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = serde_yaml::from_str(config_str)?;
        Ok(config)
    }
}
