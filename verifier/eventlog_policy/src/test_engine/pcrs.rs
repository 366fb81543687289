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

use std::collections::BTreeMap;

use structured_data::Data;

use super::{HexEqual, Test};
use crate::error::DeficientQuote;

/// Build a test that the `pcrs` field equals the quoted PCR contents
///
/// `care` maps hash algorithm name to the PCR indices that matter. `got_pcrs`
/// maps hash algorithm name to a mapping from decimal PCR index to digest,
/// written as an integer or hex string.
///
/// # Errors
/// `DeficientQuote` when the quote lacks an algorithm or PCR that `care` declares.
pub fn pcrs_test(care: &BTreeMap<String, Vec<u32>>, got_pcrs: &Data) -> Result<Test, DeficientQuote> {
    let got_pcrs = got_pcrs.as_mapping().ok_or_else(|| DeficientQuote::new("got_pcrs is not a dict"))?;
    let mut digest_tests = Vec::with_capacity(care.len());
    for (hash_name, pcr_indices) in care {
        let got_by_index = got_pcrs
            .get(hash_name)
            .ok_or_else(|| DeficientQuote::new(format!("no {} hashes", hash_name)))?;
        let mut index_tests = Vec::with_capacity(pcr_indices.len());
        for index in pcr_indices {
            let index_s = index.to_string();
            let got_val = got_by_index
                .get(&index_s)
                .ok_or_else(|| DeficientQuote::new(format!("PCR {} got no {}", index, hash_name)))?;
            let expected = HexEqual::new(got_val).ok_or_else(|| {
                DeficientQuote::new(format!("PCR {} digest {} is not an int", index, hash_name))
            })?;
            index_tests.push(Test::field(index_s, Test::HexEqual(expected)));
        }
        digest_tests.push(Test::field(hash_name.clone(), Test::And(index_tests)));
    }
    Ok(Test::field("pcrs", Test::And(digest_tests)))
}
