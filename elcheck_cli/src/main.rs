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

mod commands;

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use base64::Engine;
use clap::Parser;
use eventlog_checker::{CheckerConfig, CommandLogParser, EventLogChecker};
use eventlog_policy::PolicyRegistry;
use log::{error, info};
use structured_data::Data;

use crate::commands::{Commands, DumpFormat};

const ACCEPTED: &str = "AOK";

#[derive(Parser)]
#[clap(author, version, about = "Check measured boot event logs against intended state", long_about = None)]
struct Cli {
    /// Checker configuration file (YAML)
    #[clap(short, long)]
    config: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

fn load_config(path: Option<&str>) -> Result<CheckerConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(CheckerConfig::from_yaml(path)?),
        None => Ok(CheckerConfig::default()),
    }
}

fn read_json(path: &str) -> Result<Data, Box<dyn Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
    let data = serde_json::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path, e))?;
    Ok(data)
}

fn read_care(path: &str) -> Result<BTreeMap<String, Vec<u32>>, Box<dyn Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
    let care = serde_json::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path, e))?;
    Ok(care)
}

fn read_eventlog(path: &str, base64_encoded: bool) -> Result<Vec<u8>, Box<dyn Error>> {
    let content = fs::read(path).map_err(|e| format!("failed to read {}: {}", path, e))?;
    if !base64_encoded {
        return Ok(content);
    }
    let compact: Vec<u8> = content.into_iter().filter(|b| !b.is_ascii_whitespace()).collect();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| format!("{} is not valid base64: {}", path, e))?;
    Ok(decoded)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>, Box<dyn Error>> {
    match path {
        Some(path) => Ok(fs::read(path).map_err(|e| format!("failed to read {}: {}", path, e))?),
        None => {
            let mut content = Vec::new();
            std::io::stdin().read_to_end(&mut content)?;
            Ok(content)
        }
    }
}

fn dump(log: &Data, format: DumpFormat) -> Result<String, Box<dyn Error>> {
    let text = match format {
        DumpFormat::Json => serde_json::to_string_pretty(log)?,
        DumpFormat::Yaml => serde_yaml::to_string(log)?,
    };
    Ok(text)
}

fn new_checker(config: &CheckerConfig) -> EventLogChecker {
    let parser = CommandLogParser::new(config.parser.clone());
    EventLogChecker::new(Arc::new(parser), PolicyRegistry::get_instance().clone())
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;
    if let Err(e) = common_log::init_with_config(config.logging.clone()) {
        eprintln!("failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Check { policy, params, base64, pcrs, care, eventlog } => {
            let params = read_json(&params)?;
            let eventlog = read_eventlog(&eventlog, base64)?;
            let checker = new_checker(&config);
            let reason = match (pcrs, care) {
                (Some(pcrs), Some(care)) => {
                    let got_pcrs = read_json(&pcrs)?;
                    let care = read_care(&care)?;
                    checker.evaluate_with_pcrs(&policy, &params, &eventlog, &care, &got_pcrs).await
                }
                _ => checker.evaluate(&policy, &params, &eventlog).await,
            };
            if reason.is_empty() {
                println!("{}", ACCEPTED);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}", reason);
                Ok(ExitCode::from(1))
            }
        }
        Commands::Policies => {
            for name in PolicyRegistry::get_instance().policy_names() {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Enrich { output, input, binary } => {
            let content = read_input(input.as_deref())?;
            let log = if binary {
                new_checker(&config).enriched_log(&content).await?
            } else {
                let mut log: Data = serde_yaml::from_slice(&content)?;
                uefi_decoder::enrich(&mut log)?;
                log
            };
            info!("Enriched event log");
            print!("{}", dump(&log, output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("elcheck failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
