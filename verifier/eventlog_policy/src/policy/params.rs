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

//! Checked access to intended-state parameters

use structured_data::{Data, Mapping};

use crate::error::PolicyError;
use crate::test_engine::GoodDigests;

pub(crate) fn as_params(params: &Data) -> Result<&Mapping, PolicyError> {
    params.as_mapping().ok_or(PolicyError::ParamsNotMapping)
}

/// Fail with the first of `names` absent from `params`
pub(crate) fn require_all(params: &Mapping, names: &[&str]) -> Result<(), PolicyError> {
    match names.iter().find(|name| !params.contains_key(**name)) {
        Some(name) => Err(PolicyError::MissingParameter(name.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn get<'a>(params: &'a Mapping, name: &str) -> Result<&'a Data, PolicyError> {
    params.get(name).ok_or_else(|| PolicyError::MissingParameter(name.to_string()))
}

pub(crate) fn list<'a>(value: &'a Data, path: &str) -> Result<&'a Vec<Data>, PolicyError> {
    value.as_sequence().ok_or_else(|| PolicyError::invalid_parameter(path, "is not a list"))
}

pub(crate) fn dict<'a>(value: &'a Data, path: &str) -> Result<&'a Mapping, PolicyError> {
    value.as_mapping().ok_or_else(|| PolicyError::invalid_parameter(path, "is not a dict"))
}

pub(crate) fn string<'a>(value: &'a Data, path: &str) -> Result<&'a str, PolicyError> {
    value.as_str().ok_or_else(|| PolicyError::invalid_parameter(path, "is not a str"))
}

pub(crate) fn field<'a>(fields: &'a Mapping, parent: &str, name: &str) -> Result<&'a Data, PolicyError> {
    fields
        .get(name)
        .ok_or_else(|| PolicyError::invalid_parameter(parent, format!("has no {}", name)))
}

/// Add one `{alg: hash}` digest to `good`
pub(crate) fn add_digest(good: &mut GoodDigests, value: &Data, path: &str) -> Result<(), PolicyError> {
    for (alg, hash) in dict(value, path)? {
        let hash = string(hash, &format!("{}.{}", path, alg))?;
        good.insert(alg.as_str(), hash);
    }
    Ok(())
}

/// Approved digests from a list of `{alg: hash}` mappings
pub(crate) fn digest_list(value: &Data, path: &str) -> Result<GoodDigests, PolicyError> {
    let mut good = GoodDigests::new();
    for (idx, digest) in list(value, path)?.iter().enumerate() {
        add_digest(&mut good, digest, &format!("{}[{}]", path, idx))?;
    }
    Ok(good)
}

/// `(owner, data)` pairs from a list of `{owner, data}` keys
pub(crate) fn key_list(value: &Data, path: &str) -> Result<Vec<(String, String)>, PolicyError> {
    let items = list(value, path)?;
    let mut keys = Vec::with_capacity(items.len());
    for (idx, key) in items.iter().enumerate() {
        let key_path = format!("{}[{}]", path, idx);
        let fields = dict(key, &key_path)?;
        let owner = string(field(fields, &key_path, "owner")?, &format!("{}.owner", key_path))?;
        let data = string(field(fields, &key_path, "data")?, &format!("{}.data", key_path))?;
        keys.push((owner.to_string(), data.to_string()));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Data {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_require_all_reports_first_missing() {
        let params = parse(r#"{"a": 1, "c": 2}"#);
        let err = require_all(as_params(&params).unwrap(), &["a", "b", "c", "d"]).unwrap_err();
        assert_eq!(err.to_string(), "params lacks b");
    }

    #[test]
    fn test_digest_list_shapes() {
        let good = digest_list(&parse(r#"[{"sha1": "aa", "sha256": "bb"}, {"sha256": "cc"}]"#), "shim").unwrap();
        assert!(good.contains("sha256", "cc"));
        assert!(good.contains("sha1", "aa"));
        let err = digest_list(&parse(r#"[{"sha1": 3}]"#), "shim").unwrap_err();
        assert_eq!(err.to_string(), "params.shim[0].sha1 is not a str");
        let err = digest_list(&parse(r#"{"sha1": "aa"}"#), "shim").unwrap_err();
        assert_eq!(err.to_string(), "params.shim is not a list");
    }

    #[test]
    fn test_key_list_needs_owner_and_data() {
        let keys = key_list(&parse(r#"[{"owner": "o", "data": "d"}]"#), "pk").unwrap();
        assert_eq!(keys, vec![("o".to_string(), "d".to_string())]);
        let err = key_list(&parse(r#"[{"owner": "o"}]"#), "pk").unwrap_err();
        assert_eq!(err.to_string(), "params.pk[0] has no data");
    }
}
