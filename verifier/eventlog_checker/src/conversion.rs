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

//! Conversion of binary event logs through an external parser
//!
//! Each conversion runs in its own temporary workspace holding the binary log
//! (`bin`), the parser output (`parsed.yaml`) and, once enriched, the
//! enriched records (`enriched.json`). A workspace is removed when its result
//! has been consumed successfully and kept for inspection otherwise.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use structured_data::Data;
use tempfile::TempDir;
use tokio::process::Command;

use crate::config::{OutputFormat, ParserConfig, INPUT_PLACEHOLDER};
use crate::error::ConversionError;

const BIN_FILE: &str = "bin";
const PARSED_FILE: &str = "parsed.yaml";
const ENRICHED_FILE: &str = "enriched.json";
const WORKSPACE_PREFIX: &str = "klcvt";

/// Source of parsed event logs
#[async_trait]
pub trait EventLogSource: Send + Sync {
    /// Parse a binary event log into records holding at least `events: [...]`
    async fn parse(&self, eventlog: &[u8]) -> Result<ParsedLog, ConversionError>;
}

/// A parsed event log together with the workspace it was produced in
#[derive(Debug)]
pub struct ParsedLog {
    log: Data,
    workspace: Option<TempDir>,
}

impl ParsedLog {
    /// A parsed log without a workspace
    pub fn new(log: Data) -> Self {
        ParsedLog { log, workspace: None }
    }

    fn with_workspace(log: Data, workspace: TempDir) -> Self {
        ParsedLog { log, workspace: Some(workspace) }
    }

    pub fn log(&self) -> &Data {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut Data {
        &mut self.log
    }

    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace.as_ref().map(TempDir::path)
    }

    /// Write the current records as JSON into the workspace, if there is one
    pub async fn save_enriched(&self) -> Result<(), ConversionError> {
        let path = match self.workspace_path() {
            Some(workspace) => workspace.join(ENRICHED_FILE),
            None => return Ok(()),
        };
        let content = serde_json::to_vec_pretty(&self.log).map_err(|e| ConversionError::Format(e.to_string()))?;
        tokio::fs::write(&path, content).await?;
        Ok(())
    }

    /// Consume the result, removing the workspace
    pub fn finish(self) -> Data {
        if let Some(workspace) = self.workspace {
            let path = workspace.path().to_path_buf();
            if let Err(e) = workspace.close() {
                warn!("Failed to remove conversion workspace {}: {}", path.display(), e);
            } else {
                debug!("Removed conversion workspace {}", path.display());
            }
        }
        self.log
    }

    /// Consume the result, keeping the workspace for inspection
    pub fn retain(self) -> (Data, Option<PathBuf>) {
        let kept = self.workspace.map(keep_workspace);
        (self.log, kept)
    }
}

fn keep_workspace(workspace: TempDir) -> PathBuf {
    let path = workspace.into_path();
    warn!("Keeping conversion workspace {} for inspection", path.display());
    path
}

/// Runs the configured parser program on the binary log
#[derive(Debug, Clone)]
pub struct CommandLogParser {
    config: ParserConfig,
}

impl CommandLogParser {
    pub fn new(config: ParserConfig) -> Self {
        CommandLogParser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn create_workspace(&self) -> Result<TempDir, ConversionError> {
        std::fs::create_dir_all(&self.config.work_dir)?;
        let workspace = tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir_in(&self.config.work_dir)?;
        info!("Working in {}", workspace.path().display());
        Ok(workspace)
    }

    fn render_args(&self, input: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        self.config.args.iter().map(|arg| arg.replace(INPUT_PLACEHOLDER, &input)).collect()
    }

    async fn run_parser(&self, workspace: &Path, eventlog: &[u8]) -> Result<Data, ConversionError> {
        let bin_path = workspace.join(BIN_FILE);
        tokio::fs::write(&bin_path, eventlog).await?;

        let child = Command::new(&self.config.program)
            .args(self.render_args(&bin_path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConversionError::Spawn { program: self.config.program.clone(), source })?;

        let budget = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(budget, child.wait_with_output())
            .await
            .map_err(|_| ConversionError::Timeout(self.config.timeout_secs))??;

        tokio::fs::write(workspace.join(PARSED_FILE), &output.stdout).await?;
        if !output.status.success() {
            return Err(ConversionError::ParserFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                workspace: workspace.to_path_buf(),
            });
        }
        parse_output(&output.stdout, self.config.output_format)
    }
}

/// Read parser output, which must be a mapping with an `events` list
pub fn parse_output(output: &[u8], format: OutputFormat) -> Result<Data, ConversionError> {
    let log: Data = match format {
        OutputFormat::Yaml => serde_yaml::from_slice(output).map_err(|e| ConversionError::Format(e.to_string()))?,
        OutputFormat::Json => serde_json::from_slice(output).map_err(|e| ConversionError::Format(e.to_string()))?,
    };
    if log.get("events").and_then(Data::as_sequence).is_none() {
        return Err(ConversionError::Format("output has no events list".to_string()));
    }
    Ok(log)
}

#[async_trait]
impl EventLogSource for CommandLogParser {
    async fn parse(&self, eventlog: &[u8]) -> Result<ParsedLog, ConversionError> {
        let workspace = self.create_workspace()?;
        match self.run_parser(workspace.path(), eventlog).await {
            Ok(log) => Ok(ParsedLog::with_workspace(log, workspace)),
            Err(e) => {
                warn!("Event log parser {} failed: {}", self.config.program, e);
                keep_workspace(workspace);
                Err(e)
            }
        }
    }
}
