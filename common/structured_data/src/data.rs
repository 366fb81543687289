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
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// String-keyed mapping; keys are unique and kept in sorted order.
pub type Mapping = BTreeMap<String, Data>;

/// Upper bound for preallocating sequences from untrusted size hints
const MAX_PREALLOCATED_ITEMS: usize = 4096;

/// Map key serde_json uses to hand over numbers it keeps as text
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// A value of an event log record
///
/// Floating-point numbers are not representable. Integers that do not fit in
/// a `u64` (PCR values written as integers by some tools) are read as
/// lowercase hex strings without prefix, whatever their width.
///
/// `HexInteger` is written out as a `"0x..."` string, so a dumped record read
/// back holds `String` where the original held `HexInteger`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Data {
    Null,
    Boolean(bool),
    Integer(i64),
    /// An integer rendered in hexadecimal when dumped
    HexInteger(u64),
    String(String),
    Sequence(Vec<Data>),
    Mapping(Mapping),
}

impl Data {
    /// Create a hex-tagged integer
    pub fn hex(value: u64) -> Self {
        Data::HexInteger(value)
    }

    /// Create an empty mapping
    pub fn mapping() -> Self {
        Data::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer value of either integer variant, if it fits in an `i64`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Data::Integer(value) => Some(*value),
            Data::HexInteger(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Data>> {
        match self {
            Data::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Data>> {
        match self {
            Data::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Data::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Data::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field of a mapping; `None` for missing fields and non-mappings
    pub fn get(&self, field: &str) -> Option<&Data> {
        self.as_mapping().and_then(|fields| fields.get(field))
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Data> {
        self.as_mapping_mut().and_then(|fields| fields.get_mut(field))
    }

    /// Insert a field, returning `false` when `self` is not a mapping
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Data>) -> bool {
        match self.as_mapping_mut() {
            Some(fields) => {
                fields.insert(field.into(), value.into());
                true
            }
            None => false,
        }
    }

}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Null => f.write_str("null"),
            Data::Boolean(value) => write!(f, "{}", value),
            Data::Integer(value) => write!(f, "{}", value),
            Data::HexInteger(value) => write!(f, "{:#x}", value),
            Data::String(value) => write!(f, "{:?}", value),
            Data::Sequence(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Data::Mapping(fields) => {
                f.write_str("{")?;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        Data::Boolean(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::Integer(value)
    }
}

impl From<i32> for Data {
    fn from(value: i32) -> Self {
        Data::Integer(i64::from(value))
    }
}

impl From<u32> for Data {
    fn from(value: u32) -> Self {
        Data::Integer(i64::from(value))
    }
}

impl From<u16> for Data {
    fn from(value: u16) -> Self {
        Data::Integer(i64::from(value))
    }
}

impl From<u8> for Data {
    fn from(value: u8) -> Self {
        Data::Integer(i64::from(value))
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::String(value.to_string())
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::String(value)
    }
}

impl From<Vec<Data>> for Data {
    fn from(items: Vec<Data>) -> Self {
        Data::Sequence(items)
    }
}

impl From<Mapping> for Data {
    fn from(fields: Mapping) -> Self {
        Data::Mapping(fields)
    }
}

impl FromIterator<Data> for Data {
    fn from_iter<I: IntoIterator<Item = Data>>(iter: I) -> Self {
        Data::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Data)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, Data)>>(iter: I) -> Self {
        Data::Mapping(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl TryFrom<serde_json::Value> for Data {
    type Error = serde_json::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Data::deserialize(value)
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::Null => serializer.serialize_unit(),
            Data::Boolean(value) => serializer.serialize_bool(*value),
            Data::Integer(value) => serializer.serialize_i64(*value),
            Data::HexInteger(value) => serializer.serialize_str(&format!("{:#x}", value)),
            Data::String(value) => serializer.serialize_str(value),
            Data::Sequence(items) => serializer.collect_seq(items),
            Data::Mapping(fields) => serializer.collect_map(fields),
        }
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataVisitor)
    }
}

struct DataVisitor;

impl DataVisitor {
    fn wide_integer<E: de::Error>(value: i128) -> Result<Data, E> {
        if let Ok(narrow) = i64::try_from(value) {
            return Ok(Data::Integer(narrow));
        }
        if let Ok(unsigned) = u64::try_from(value) {
            return Ok(Data::HexInteger(unsigned));
        }
        if value > 0 {
            return Ok(Data::String(format!("{:x}", value)));
        }
        Err(E::custom(format!("integer {} is out of range", value)))
    }

    /// Number kept as text by serde_json; only integers are accepted
    fn number_text<E: de::Error>(text: &str) -> Result<Data, E> {
        if text.contains(['.', 'e', 'E']) {
            return Err(E::custom(format!("floating point value {} is not supported", text)));
        }
        if let Ok(value) = text.parse::<i128>() {
            return Self::wide_integer(value);
        }
        if text.starts_with('-') {
            return Err(E::custom(format!("integer {} is out of range", text)));
        }
        decimal_to_hex(text)
            .map(Data::String)
            .ok_or_else(|| E::custom(format!("invalid integer {}", text)))
    }
}

/// Lowercase hex form of an unsigned decimal of any length
fn decimal_to_hex(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    // Little-endian base 2^32 limbs
    let mut limbs: Vec<u32> = vec![0];
    for ch in text.chars() {
        let mut carry = u64::from(ch.to_digit(10)?);
        for limb in limbs.iter_mut() {
            let wide = u64::from(*limb) * 10 + carry;
            *limb = wide as u32;
            carry = wide >> 32;
        }
        if carry > 0 {
            limbs.push(carry as u32);
        }
    }
    while limbs.len() > 1 && limbs.last() == Some(&0) {
        limbs.pop();
    }
    let mut digits = String::new();
    for (idx, limb) in limbs.iter().rev().enumerate() {
        if idx == 0 {
            digits.push_str(&format!("{:x}", limb));
        } else {
            digits.push_str(&format!("{:08x}", limb));
        }
    }
    Some(digits)
}

impl<'de> Visitor<'de> for DataVisitor {
    type Value = Data;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, string, boolean, null, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Data, E> {
        Ok(Data::Boolean(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Data, E> {
        Ok(Data::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Data, E> {
        Ok(i64::try_from(value)
            .map(Data::Integer)
            .unwrap_or(Data::HexInteger(value)))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Data, E> {
        Self::wide_integer(value)
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Data, E> {
        match i128::try_from(value) {
            Ok(value) => Self::wide_integer(value),
            Err(_) => Ok(Data::String(format!("{:x}", value))),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Data, E> {
        Err(E::custom(format!("floating point value {} is not supported", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Data, E> {
        Ok(Data::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Data, E> {
        Ok(Data::String(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<Data, E> {
        Ok(Data::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Data, E> {
        Ok(Data::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Data, D::Error> {
        Data::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Data, A::Error> {
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_ITEMS);
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = seq.next_element::<Data>()? {
            items.push(item);
        }
        Ok(Data::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Data, A::Error> {
        let mut fields = Mapping::new();
        while let Some(key) = map.next_key::<MapKey>()? {
            if fields.is_empty() && key.0 == JSON_NUMBER_TOKEN {
                let text: String = map.next_value()?;
                return Self::number_text(&text);
            }
            let value = map.next_value::<Data>()?;
            fields.insert(key.0, value);
        }
        Ok(Data::Mapping(fields))
    }
}

/// Mapping key; YAML allows integer keys (PCR indices), which become decimal strings
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Data::deserialize(deserializer)? {
            Data::String(key) => Ok(MapKey(key)),
            Data::Integer(key) => Ok(MapKey(key.to_string())),
            Data::HexInteger(key) => Ok(MapKey(key.to_string())),
            Data::Boolean(key) => Ok(MapKey(key.to_string())),
            other => Err(de::Error::custom(format!("unsupported mapping key {}", other))),
        }
    }
}
