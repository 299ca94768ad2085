//! Decoded ABI values.

use std::fmt;

use alloy_primitives::{Address, I256, U256};
use serde_json::{json, Value};

/// A single value decoded from (or encodable into) call data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Unsigned integer of any width up to 256 bits
    Uint(U256),
    /// Signed integer of any width up to 256 bits
    Int(I256),
    /// Boolean
    Bool(bool),
    /// 20-byte account address
    Address(Address),
    /// `bytesN`
    FixedBytes(Vec<u8>),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// `T[]`
    Array(Vec<AbiValue>),
    /// `T[k]`
    FixedArray(Vec<AbiValue>),
    /// `(T1,T2,...)`
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Short name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Uint(_) => "uint",
            AbiValue::Int(_) => "int",
            AbiValue::Bool(_) => "bool",
            AbiValue::Address(_) => "address",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
            AbiValue::FixedArray(_) => "fixed array",
            AbiValue::Tuple(_) => "tuple",
        }
    }

    /// Unsigned integer payload, if any
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    /// Address payload, if any
    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    /// JSON rendering: integers as decimal strings, byte strings as 0x hex
    pub fn to_json(&self) -> Value {
        match self {
            AbiValue::Uint(value) => json!(value.to_string()),
            AbiValue::Int(value) => json!(value.to_string()),
            AbiValue::Bool(value) => json!(value),
            AbiValue::Address(addr) => json!(addr.to_string()),
            AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes) => {
                json!(format!("0x{}", hex::encode(bytes)))
            }
            AbiValue::String(s) => json!(s),
            AbiValue::Array(items) | AbiValue::FixedArray(items) | AbiValue::Tuple(items) => {
                Value::Array(items.iter().map(AbiValue::to_json).collect())
            }
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: &[AbiValue]| {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        match self {
            AbiValue::Uint(value) => write!(f, "{}", value),
            AbiValue::Int(value) => write!(f, "{}", value),
            AbiValue::Bool(value) => write!(f, "{}", value),
            AbiValue::Address(addr) => write!(f, "{}", addr),
            AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes) => {
                write!(f, "0x{}", hex::encode(bytes))
            }
            AbiValue::String(s) => write!(f, "{:?}", s),
            AbiValue::Array(items) | AbiValue::FixedArray(items) => write!(f, "[{}]", join(items)),
            AbiValue::Tuple(items) => write!(f, "({})", join(items)),
        }
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<Address> for AbiValue {
    fn from(addr: Address) -> Self {
        AbiValue::Address(addr)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::String(value.to_string())
    }
}
