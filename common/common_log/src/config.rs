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

use serde::Deserialize;
use std::path::PathBuf;

fn default_level() -> String {
    "info".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_zip_count() -> u32 {
    6
}

/// Logging configuration, usually embedded in the checker configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Root level; one of trace, debug, info, warn, error, off
    #[serde(default = "default_level")]
    pub level: String,
    /// Rolling log file; console only when absent
    #[serde(default)]
    pub file: Option<FileConfig>,
    /// Per-module level overrides
    #[serde(default)]
    pub loggers: Vec<LoggerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub log_directory: String,
    pub log_file_name: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_zip_count")]
    pub max_zip_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: default_level(), file: None, loggers: Vec::new() }
    }
}

impl LogConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path.into())?;
        let config: LogConfig = serde_yaml::from_str(&config_str)?;
        Ok(config)
    }

    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }
}
