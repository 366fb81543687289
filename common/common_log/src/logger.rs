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

use crate::config::{FileConfig, LogConfig};
use chrono::{DateTime, Local};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const CONSOLE_APPENDER: &str = "console_appender";
const FILE_APPENDER: &str = "file_appender";

pub struct Logger {
    #[allow(dead_code)]
    handle: Handle,
}

impl Logger {
    pub fn new_from_config(config: LogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let final_config = Self::build_config(&config)?;
        let handle = log4rs::init_config(final_config)?;
        Ok(Self { handle })
    }

    /// Translate a `LogConfig` into a log4rs configuration without installing it
    pub fn build_config(config: &LogConfig) -> Result<Config, Box<dyn std::error::Error>> {
        let mut appender_names = vec![CONSOLE_APPENDER.to_string()];
        let console = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let mut log4rs_config =
            Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));

        if let Some(file_config) = &config.file {
            let appender = Self::create_appender(file_config)?;
            log4rs_config = log4rs_config.appender(Appender::builder().build(FILE_APPENDER, Box::new(appender)));
            appender_names.push(FILE_APPENDER.to_string());
        }

        // Module overrides share the root appenders
        for logger_config in &config.loggers {
            let logger = log4rs::config::Logger::builder()
                .appenders(appender_names.clone())
                .additive(false)
                .build(logger_config.path_prefix.clone(), Self::parse_level(&logger_config.level));
            log4rs_config = log4rs_config.logger(logger);
        }

        let root = Root::builder().appenders(appender_names).build(Self::parse_level(&config.level));
        Ok(log4rs_config.build(root)?)
    }

    fn create_appender(config: &FileConfig) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&config.log_directory)?;

        let now: DateTime<Local> = Local::now();
        let formatted_time = now.format("%Y%m%d%H%M%S%3f").to_string();

        let log_file = format!("{}/{}", config.log_directory, config.log_file_name);
        let archived_log_pattern =
            format!("{}/{}-{{}}-{}.gz", config.log_directory, config.log_file_name, formatted_time);

        let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
        let roller = FixedWindowRoller::builder().build(&archived_log_pattern, config.max_zip_count)?;
        let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

        let appender = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(log_file, Box::new(compound_policy))?;

        Ok(appender)
    }

    pub fn parse_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}
