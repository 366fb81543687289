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

use clap::{Subcommand, ValueEnum};

/// Text format of dumped records
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a binary event log against a policy
    Check {
        /// Policy name
        #[clap(short, long, default_value = "nextgen2")]
        policy: String,

        /// Intended-state parameters, JSON file
        #[clap(long, required = true)]
        params: String,

        /// The event log file is base64 encoded
        #[clap(long)]
        base64: bool,

        /// Quoted PCR contents, JSON file mapping hash algorithm to {PCR index: digest}
        #[clap(long, requires = "care")]
        pcrs: Option<String>,

        /// PCRs to compare, JSON file mapping hash algorithm to a list of PCR indices
        #[clap(long, requires = "pcrs")]
        care: Option<String>,

        /// Binary event log file
        eventlog: String,
    },

    /// List the registered policies
    Policies,

    /// Decode the UEFI payloads of a parsed event log and dump the result
    Enrich {
        /// Output format
        #[clap(short, long, value_enum, default_value = "yaml")]
        output: DumpFormat,

        /// Parsed event log (YAML or JSON), stdin when absent
        #[clap(short, long)]
        input: Option<String>,

        /// The input is a binary event log to run through the configured parser first
        #[clap(long)]
        binary: bool,
    },
}
