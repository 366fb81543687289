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

//! Leaf comparisons against scalar values

use regex::Regex;
use structured_data::Data;

use crate::error::PolicyError;

pub(super) fn int_equal_why_not(expected: i64, subject: &Data) -> String {
    match subject.as_int() {
        Some(actual) if actual == expected => String::new(),
        Some(_) => format!("is not {}", expected),
        None => "is not a int".to_string(),
    }
}

pub(super) fn string_equal_why_not(expected: &str, subject: &Data) -> String {
    match subject.as_str() {
        Some(actual) if actual == expected => String::new(),
        Some(_) => format!("is not {:?}", expected),
        None => "is not a str".to_string(),
    }
}

/// Full match against a regular expression
#[derive(Debug, Clone)]
pub struct RegExpTest {
    pattern: String,
    regex: Regex,
}

impl RegExpTest {
    /// Compile `pattern`; with `dot_all` the `.` also matches newlines
    pub fn new(pattern: &str, dot_all: bool) -> Result<Self, PolicyError> {
        let flags = if dot_all { "(?s)" } else { "" };
        let anchored = format!(r"{}\A(?:{})\z", flags, pattern);
        let regex = Regex::new(&anchored)
            .map_err(|source| PolicyError::InvalidRegex { pattern: pattern.to_string(), source })?;
        Ok(RegExpTest { pattern: pattern.to_string(), regex })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub(super) fn why_not(&self, subject: &Data) -> String {
        match subject.as_str() {
            Some(text) if self.is_match(text) => String::new(),
            Some(_) => format!("does not match {}", self.pattern),
            None => "is not a str".to_string(),
        }
    }
}

/// Equality of PCR digests written as integers or hex strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexEqual {
    expected: String,
}

impl HexEqual {
    /// `None` when `expected` is neither a non-negative integer nor a hex string
    pub fn new(expected: &Data) -> Option<Self> {
        normalize_hex(expected).map(|expected| HexEqual { expected })
    }

    pub(super) fn why_not(&self, subject: &Data) -> String {
        match normalize_hex(subject) {
            Some(actual) if actual == self.expected => String::new(),
            Some(_) => format!("is not 0x{}", self.expected),
            None => "is not a hex digest".to_string(),
        }
    }
}

/// Lowercase hex without `0x` and without leading zeros; zero is `"0"`
fn normalize_hex(value: &Data) -> Option<String> {
    let digits = match value {
        Data::Integer(number) if *number >= 0 => format!("{:x}", number),
        Data::HexInteger(number) => format!("{:x}", number),
        Data::String(text) => {
            let text = text.trim();
            let text = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
            if text.is_empty() || !text.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            text.to_ascii_lowercase()
        }
        _ => return None,
    };
    let trimmed = digits.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex_spellings_agree() {
        let int_form = normalize_hex(&Data::Integer(0xab));
        assert_eq!(int_form.as_deref(), Some("ab"));
        assert_eq!(normalize_hex(&Data::from("0x00AB")), int_form);
        assert_eq!(normalize_hex(&Data::hex(0xab)), int_form);
        assert_eq!(normalize_hex(&Data::from("000")).as_deref(), Some("0"));
        assert_eq!(normalize_hex(&Data::from("xyz")), None);
        assert_eq!(normalize_hex(&Data::Integer(-1)), None);
    }

    #[test]
    fn test_regexp_is_full_match() {
        let test = RegExpTest::new("ab+", false).unwrap();
        assert_eq!(test.why_not(&Data::from("abbb")), "");
        assert_eq!(test.why_not(&Data::from("xabb")), "does not match ab+");
        assert_eq!(test.why_not(&Data::from("abx")), "does not match ab+");
        assert_eq!(test.why_not(&Data::Integer(1)), "is not a str");
    }

    #[test]
    fn test_regexp_alternation_is_anchored_as_a_whole() {
        let test = RegExpTest::new("BootOrder|Boot[0-9a-fA-F]+", false).unwrap();
        assert!(test.is_match("Boot0001"));
        assert!(!test.is_match("BootOrderX"));
    }

    #[test]
    fn test_regexp_dot_all() {
        assert!(!RegExpTest::new("a.*", false).unwrap().is_match("a\nb"));
        assert!(RegExpTest::new("a.*", true).unwrap().is_match("a\nb"));
    }
}
