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

//! Test engine
//!
//! A [`Test`] examines a [`Data`] subject and either approves it (empty
//! reason) or explains why not. Reasons are English fragments that make a
//! sentence when placed after a noun phrase naming the subject, for example
//! `Digests is not a list`.
//!
//! Tests are immutable trees and may be evaluated concurrently; the only
//! mutable state of an evaluation lives in its [`Globals`].

mod combinator;
mod delay;
mod digest;
mod dispatch;
mod globals;
mod pcrs;
mod scalar;
mod variable;

use structured_data::Data;

pub use combinator::{FieldTest, IterateTest};
pub use delay::DelayToFields;
pub use digest::{DigestTest, GoodDigests};
pub use dispatch::{Dispatcher, VariableDispatch};
pub use globals::Globals;
pub use pcrs::pcrs_test;
pub use scalar::{HexEqual, RegExpTest};
pub use variable::{UnicodeNameMatch, VariableTest};

use crate::error::PolicyError;

/// A compiled predicate over event log data
#[derive(Debug, Clone)]
pub enum Test {
    /// Every value passes
    AcceptAll,
    /// No value passes; holds the reason
    RejectAll(String),
    /// Conjunction, stopping at the first failure
    And(Vec<Test>),
    /// Disjunction, stopping at the first success
    Or(Vec<Test>),
    Dispatcher(Dispatcher),
    Field(FieldTest),
    Iterate(IterateTest),
    /// Positional tests over a sequence of exactly matching length
    Tuple(Vec<Test>),
    /// Resets the accumulators of a [`DelayToFields`]
    DelayInitializer(Vec<String>),
    /// Appends the subject to the named accumulator
    DelayedField(String),
    DelayToFields(DelayToFields),
    IntEqual(i64),
    StringEqual(String),
    RegExp(RegExpTest),
    HexEqual(HexEqual),
    Digest(DigestTest),
    Variable(VariableTest),
}

impl Test {
    /// Test the given value, return empty string for pass, explanation for fail
    pub fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        match self {
            Test::AcceptAll => String::new(),
            Test::RejectAll(why) => why.clone(),
            Test::And(tests) => combinator::and_why_not(tests, globals, subject),
            Test::Or(tests) => combinator::or_why_not(tests, globals, subject),
            Test::Dispatcher(dispatcher) => dispatcher.why_not(globals, subject),
            Test::Field(field) => field.why_not(globals, subject),
            Test::Iterate(iterate) => iterate.why_not(globals, subject),
            Test::Tuple(tests) => combinator::tuple_why_not(tests, globals, subject),
            Test::DelayInitializer(field_names) => delay::initialize(field_names, globals),
            Test::DelayedField(field_name) => delay::stash(field_name, globals, subject),
            Test::DelayToFields(delayer) => delayer.why_not(globals),
            Test::IntEqual(expected) => scalar::int_equal_why_not(*expected, subject),
            Test::StringEqual(expected) => scalar::string_equal_why_not(expected, subject),
            Test::RegExp(regexp) => regexp.why_not(subject),
            Test::HexEqual(expected) => expected.why_not(subject),
            Test::Digest(digest) => digest.why_not(globals, subject),
            Test::Variable(variable) => variable.why_not(globals, subject),
        }
    }

    /// Evaluate with a fresh set of globals
    pub fn check(&self, subject: &Data) -> String {
        self.why_not(&mut Globals::new(), subject)
    }

    pub fn reject_all(why: impl Into<String>) -> Result<Test, PolicyError> {
        let why = why.into();
        if why.is_empty() {
            return Err(PolicyError::EmptyRejection);
        }
        Ok(Test::RejectAll(why))
    }

    /// Apply `test` to the named field, prefixing failures with the field name
    pub fn field(field_name: impl Into<String>, test: Test) -> Test {
        Test::Field(FieldTest::new(field_name, test, true))
    }

    /// Apply `test` to the named field without naming the field in failures
    pub fn field_unnamed(field_name: impl Into<String>, test: Test) -> Test {
        Test::Field(FieldTest::new(field_name, test, false))
    }

    /// Conjunction of one field test per `(name, test)` pair
    pub fn fields<I, S>(fields: I) -> Test
    where
        I: IntoIterator<Item = (S, Test)>,
        S: Into<String>,
    {
        Test::And(fields.into_iter().map(|(name, test)| Test::field(name, test)).collect())
    }

    /// Apply `test` to every element of a sequence
    pub fn iterate(test: Test, show_elt: bool) -> Test {
        Test::Iterate(IterateTest::new(test, show_elt))
    }

    /// Full match of a string against `pattern`
    pub fn regexp(pattern: &str) -> Result<Test, PolicyError> {
        RegExpTest::new(pattern, false).map(Test::RegExp)
    }

    /// Full match where `.` also matches newlines
    pub fn regexp_dotall(pattern: &str) -> Result<Test, PolicyError> {
        RegExpTest::new(pattern, true).map(Test::RegExp)
    }

    pub fn string_equal(expected: impl Into<String>) -> Test {
        Test::StringEqual(expected.into())
    }

    /// Approve a subject whose `Digests` contain a good digest, else consult `or_else`
    pub fn digest(good: GoodDigests, or_else: Option<Test>) -> Test {
        Test::Digest(DigestTest::new(good, or_else))
    }

    /// Compare `SignatureOwner` and `SignatureData` of a signature entry
    pub fn signature(owner: impl Into<String>, data: impl Into<String>) -> Test {
        Test::And(vec![
            Test::field("SignatureOwner", Test::string_equal(owner)),
            Test::field("SignatureData", Test::string_equal(data)),
        ])
    }

    /// Membership in a set of `(owner, data)` signatures
    pub fn signature_set_member<I, O, D>(signatures: I) -> Test
    where
        I: IntoIterator<Item = (O, D)>,
        O: Into<String>,
        D: Into<String>,
    {
        Test::Or(signatures.into_iter().map(|(owner, data)| Test::signature(owner, data)).collect())
    }

    /// Every signature list has type `signature_type` and only keys from `keys`
    pub fn key_subset<I, O, D>(signature_type: impl Into<String>, keys: I) -> Test
    where
        I: IntoIterator<Item = (O, D)>,
        O: Into<String>,
        D: Into<String>,
    {
        Test::iterate(
            Test::And(vec![
                Test::field("SignatureType", Test::string_equal(signature_type)),
                Test::field("Keys", Test::iterate(Test::signature_set_member(keys), false)),
            ]),
            false,
        )
    }
}

impl From<Dispatcher> for Test {
    fn from(dispatcher: Dispatcher) -> Self {
        Test::Dispatcher(dispatcher)
    }
}

impl From<DelayToFields> for Test {
    fn from(delayer: DelayToFields) -> Self {
        Test::DelayToFields(delayer)
    }
}

impl From<VariableDispatch> for Test {
    fn from(dispatch: VariableDispatch) -> Self {
        dispatch.into_test()
    }
}

/// Render a tuple of values like `(0, "EV_IPL")`
fn render_tuple<T: std::fmt::Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_tests_are_shareable() {
        assert_send_sync::<Test>();
    }

    #[test]
    fn test_reject_all_needs_reason() {
        assert!(matches!(Test::reject_all(""), Err(PolicyError::EmptyRejection)));
        assert_eq!(Test::reject_all("is bad").unwrap().check(&Data::Null), "is bad");
    }

    #[test]
    fn test_render_tuple() {
        assert_eq!(render_tuple(&[Data::Integer(0), Data::from("EV_IPL")]), "(0, \"EV_IPL\")");
    }
}
