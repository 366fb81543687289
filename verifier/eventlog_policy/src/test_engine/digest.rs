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

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use structured_data::Data;

use super::{Globals, Test};

/// Approved hash values, grouped by hash algorithm name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodDigests {
    by_alg: BTreeMap<String, BTreeSet<String>>,
}

impl GoodDigests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alg: impl Into<String>, hash: impl Into<String>) {
        self.by_alg.entry(alg.into()).or_default().insert(hash.into());
    }

    /// Add every digest approved by `other`
    pub fn merge(&mut self, other: GoodDigests) {
        for (alg, hashes) in other.by_alg {
            self.by_alg.entry(alg).or_default().extend(hashes);
        }
    }

    pub fn contains(&self, alg: &str, hash: &str) -> bool {
        self.by_alg.get(alg).map_or(false, |hashes| hashes.contains(hash))
    }

    pub fn is_empty(&self) -> bool {
        self.by_alg.is_empty()
    }
}

impl<A: Into<String>, H: Into<String>> FromIterator<(A, H)> for GoodDigests {
    fn from_iter<I: IntoIterator<Item = (A, H)>>(iter: I) -> Self {
        let mut good = GoodDigests::new();
        good.extend(iter);
        good
    }
}

impl<A: Into<String>, H: Into<String>> Extend<(A, H)> for GoodDigests {
    fn extend<I: IntoIterator<Item = (A, H)>>(&mut self, iter: I) {
        for (alg, hash) in iter {
            self.insert(alg, hash);
        }
    }
}

impl fmt::Display for GoodDigests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (alg_idx, (alg, hashes)) in self.by_alg.iter().enumerate() {
            if alg_idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {{", alg)?;
            for (hash_idx, hash) in hashes.iter().enumerate() {
                if hash_idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:?}", hash)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

/// Tests whether the subject has an approved digest or passes an optional fallback test
#[derive(Debug, Clone)]
pub struct DigestTest {
    good_digests: GoodDigests,
    or_else: Option<Box<Test>>,
}

impl DigestTest {
    pub fn new(good_digests: GoodDigests, or_else: Option<Test>) -> Self {
        DigestTest { good_digests, or_else: or_else.map(Box::new) }
    }

    /// Whether `Digests` holds an approved entry, or the reason the list is malformed
    fn find_approved(&self, subject: &Data) -> Result<bool, String> {
        let fields = subject.as_mapping().ok_or_else(|| "is not a dict".to_string())?;
        let digest_list = fields.get("Digests").ok_or_else(|| "has no Digests".to_string())?;
        let digest_list = digest_list.as_sequence().ok_or_else(|| "Digests is not a list".to_string())?;
        for (idx, subject_digest) in digest_list.iter().enumerate() {
            let entry = subject_digest
                .as_mapping()
                .ok_or_else(|| format!("Digests[{}] is {}, not a dict", idx, subject_digest))?;
            let alg = entry.get("AlgorithmId").ok_or_else(|| format!("digest {} has no AlgorithmId", idx))?;
            let alg = alg
                .as_str()
                .ok_or_else(|| format!("Digests[{}].AlgorithmId is {}, not a str", idx, alg))?;
            let hash = entry.get("Digest").ok_or_else(|| format!("digest {} has no Digest", idx))?;
            let hash = hash
                .as_str()
                .ok_or_else(|| format!("Digests[{}].Digest is {}, not a str", idx, hash))?;
            if self.good_digests.contains(alg, hash) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(super) fn why_not(&self, globals: &mut Globals, subject: &Data) -> String {
        match self.find_approved(subject) {
            Err(reason) => return reason,
            Ok(true) => return String::new(),
            Ok(false) => {}
        }
        let or_else = match &self.or_else {
            Some(or_else) => or_else,
            None => return format!("has no digest approved by {}", self.good_digests),
        };
        let reason = or_else.why_not(globals, subject);
        if reason.is_empty() {
            return reason;
        }
        format!("{} and has no digest approved by {}", reason, self.good_digests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_digests_display() {
        let good: GoodDigests = vec![("sha256", "abcd"), ("sha1", "12"), ("sha256", "0123")].into_iter().collect();
        assert_eq!(good.to_string(), r#"{"sha1": {"12"}, "sha256": {"0123", "abcd"}}"#);
        assert_eq!(GoodDigests::new().to_string(), "{}");
    }
}
