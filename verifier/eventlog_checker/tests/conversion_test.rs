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

use std::fs;
use std::path::{Path, PathBuf};

use eventlog_checker::{CommandLogParser, ConversionError, EventLogSource, OutputFormat, ParserConfig};
use structured_data::Data;

const YAML_LOG: &[u8] = b"---\nversion: 1\nevents:\n  - EventNum: 0\n    PCRIndex: 0\n    EventType: EV_NO_ACTION\n";

fn parser_config(work_dir: &Path, program: &str, args: &[&str]) -> ParserConfig {
    ParserConfig {
        program: program.to_string(),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        timeout_secs: 10,
        work_dir: work_dir.to_path_buf(),
        output_format: OutputFormat::Yaml,
    }
}

fn workspaces(work_dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(work_dir)
        .map(|entries| entries.filter_map(|entry| entry.ok()).map(|entry| entry.path()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_parse_success_and_finish_removes_workspace() {
    let work_dir = tempfile::tempdir().unwrap();
    let parser = CommandLogParser::new(parser_config(work_dir.path(), "cat", &["{input}"]));

    let parsed = parser.parse(YAML_LOG).await.unwrap();
    let workspace = parsed.workspace_path().unwrap().to_path_buf();
    assert!(workspace.join("bin").is_file());
    assert_eq!(fs::read(workspace.join("parsed.yaml")).unwrap(), YAML_LOG);
    let first = parsed.log().get("events").and_then(Data::as_sequence).map(|events| events[0].clone());
    assert_eq!(first.and_then(|event| event.get("EventType").cloned()), Some(Data::from("EV_NO_ACTION")));

    let log = parsed.finish();
    assert!(log.get("version").is_some());
    assert!(!workspace.exists());
    assert!(workspaces(work_dir.path()).is_empty());
}

#[tokio::test]
async fn test_retain_keeps_workspace() {
    let work_dir = tempfile::tempdir().unwrap();
    let parser = CommandLogParser::new(parser_config(work_dir.path(), "cat", &["{input}"]));

    let parsed = parser.parse(YAML_LOG).await.unwrap();
    parsed.save_enriched().await.unwrap();
    let (_, kept) = parsed.retain();
    let kept = kept.unwrap();
    assert!(kept.join("enriched.json").is_file());
    assert_eq!(workspaces(work_dir.path()), vec![kept]);
}

#[tokio::test]
async fn test_json_output_format() {
    let work_dir = tempfile::tempdir().unwrap();
    let mut config = parser_config(work_dir.path(), "cat", &["{input}"]);
    config.output_format = OutputFormat::Json;
    let parser = CommandLogParser::new(config);

    let parsed = parser.parse(br#"{"events": [{"PCRIndex": 4, "Digests": []}]}"#).await.unwrap();
    let events = parsed.finish();
    assert_eq!(events.get("events").and_then(Data::as_sequence).map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_timeout_keeps_workspace() {
    let work_dir = tempfile::tempdir().unwrap();
    let mut config = parser_config(work_dir.path(), "sleep", &["5"]);
    config.timeout_secs = 1;
    let parser = CommandLogParser::new(config);

    let err = parser.parse(YAML_LOG).await.unwrap_err();
    assert!(matches!(err, ConversionError::Timeout(1)));
    assert_eq!(err.to_string(), "parse took too long, more than 1 seconds");
    let kept = workspaces(work_dir.path());
    assert_eq!(kept.len(), 1);
    assert!(kept[0].join("bin").is_file());
}

#[tokio::test]
async fn test_parser_failure_reports_code_and_stderr() {
    let work_dir = tempfile::tempdir().unwrap();
    let parser = CommandLogParser::new(parser_config(
        work_dir.path(),
        "sh",
        &["-c", "echo 'unsupported log' >&2; exit 3", "{input}"],
    ));

    match parser.parse(YAML_LOG).await {
        Err(ConversionError::ParserFailed { code, stderr, workspace }) => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr.trim(), "unsupported log");
            assert!(workspace.is_dir());
            assert_eq!(workspaces(work_dir.path()), vec![workspace]);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let work_dir = tempfile::tempdir().unwrap();
    let parser = CommandLogParser::new(parser_config(work_dir.path(), "/nonexistent/elcheck-parser", &["{input}"]));
    let err = parser.parse(YAML_LOG).await.unwrap_err();
    assert!(matches!(err, ConversionError::Spawn { .. }));
}

#[tokio::test]
async fn test_output_without_events_is_format_error() {
    let work_dir = tempfile::tempdir().unwrap();
    let parser = CommandLogParser::new(parser_config(work_dir.path(), "echo", &["pcrs: {}"]));
    let err = parser.parse(YAML_LOG).await.unwrap_err();
    assert!(matches!(err, ConversionError::Format(_)));
    assert_eq!(workspaces(work_dir.path()).len(), 1);
}
