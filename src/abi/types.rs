//! ABI parameter type descriptors.

use std::fmt;

use super::AbiError;

/// Size of one ABI word in bytes.
pub const WORD: usize = 32;

/// A parsed ABI parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `uintN`, width in bits
    Uint(usize),
    /// `intN`, width in bits
    Int(usize),
    /// `bool`
    Bool,
    /// `address` (20 bytes)
    Address,
    /// `bytesN`, width in bytes
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parse a Solidity type string such as `uint256`, `bytes32[]` or `(address,bool)[2]`.
    pub fn parse(raw: &str) -> Result<ParamType, AbiError> {
        let ty = raw.trim();
        let unsupported = || AbiError::UnsupportedType(raw.trim().to_string());

        if let Some(body) = ty.strip_suffix(']') {
            let open = body.rfind('[').ok_or_else(unsupported)?;
            let inner = Box::new(ParamType::parse(&body[..open])?);
            let size = body[open + 1..].trim();
            if size.is_empty() {
                return Ok(ParamType::Array(inner));
            }
            let len = size.parse::<usize>().map_err(|_| unsupported())?;
            let array = ParamType::FixedArray(inner, len);
            // the whole head must stay addressable
            return array.head_size().map(|_| array).ok_or_else(unsupported);
        }

        let tuple_body = ty.strip_prefix("tuple").unwrap_or(ty);
        if let Some(body) = tuple_body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            let members = split_top_level(body)
                .into_iter()
                .filter(|member| !member.trim().is_empty())
                .map(ParamType::parse)
                .collect::<Result<Vec<_>, _>>()?;
            if members.is_empty() {
                return Err(unsupported());
            }
            return Ok(ParamType::Tuple(members));
        }

        match ty {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "byte" => return Ok(ParamType::FixedBytes(1)),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            _ => {}
        }

        if let Some(bits) = ty.strip_prefix("uint") {
            return parse_bits(bits).map(ParamType::Uint).ok_or_else(unsupported);
        }
        if let Some(bits) = ty.strip_prefix("int") {
            return parse_bits(bits).map(ParamType::Int).ok_or_else(unsupported);
        }
        if let Some(len) = ty.strip_prefix("bytes") {
            return match len.parse::<usize>() {
                Ok(n) if (1..=WORD).contains(&n) => Ok(ParamType::FixedBytes(n)),
                _ => Err(unsupported()),
            };
        }

        Err(unsupported())
    }

    /// Returns true if values of this type are stored in the tail region
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(members) => members.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head region, `None` if that
    /// does not fit in a `usize`
    pub fn head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(WORD);
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.head_size()?.checked_mul(*len),
            ParamType::Tuple(members) => members
                .iter()
                .try_fold(0usize, |total, member| total.checked_add(member.head_size()?)),
            _ => Some(WORD),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Address => write!(f, "address"),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            ParamType::Tuple(members) => {
                let members: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "({})", members.join(","))
            }
        }
    }
}

fn parse_bits(bits: &str) -> Option<usize> {
    let bits = bits.parse::<usize>().ok()?;
    (bits > 0 && bits <= 256 && bits % 8 == 0).then_some(bits)
}

/// Split on commas that are not nested inside parentheses.
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
