//! Function signature grammar and function descriptors.
//!
//! Signatures arrive in two shapes: canonical (`transfer(address,uint256)`)
//! from hash directories and annotated (`transfer(address to, uint256 amount)
//! returns (bool)`) from people. The parser accepts both and never fails; the
//! result is matched against the well-known registry to attach descriptions
//! and effects.

pub mod effects;
pub mod registry;

pub use self::effects::EffectMask;
pub use self::registry::{Registry, RegistryError, WellKnownFunction};

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::abi::{self, types::split_top_level};

/// One parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionParam {
    /// Parameter name, absent in canonical signatures
    pub name: Option<String>,
    /// Type string as written (e.g. "uint256")
    #[serde(rename = "type")]
    pub ty: String,
}

impl FunctionParam {
    /// Create a named parameter
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(ty: impl Into<String>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
        }
    }
}

/// A signature parsed from free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<FunctionParam>,
    /// Output parameters from a `returns (...)` clause
    pub outputs: Vec<FunctionParam>,
    /// The text this signature was parsed from
    pub raw: String,
}

impl ParsedSignature {
    /// `name(type,type,...)`
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }
}

/// Build the canonical form `name(type,type,...)` of a parameter list.
pub fn canonical_signature(name: &str, inputs: &[FunctionParam]) -> String {
    let types: Vec<&str> = inputs.iter().map(|p| p.ty.as_str()).collect();
    format!("{}({})", name, types.join(","))
}

/// Parse a signature such as `transfer(address to, uint256 amount) returns (bool)`.
///
/// Parsing is best effort: text without parentheses becomes a bare name with
/// no inputs, and an unterminated parameter list runs to the end of the text.
pub fn parse(raw: &str) -> ParsedSignature {
    let text = raw.trim();

    let Some(open) = text.find('(') else {
        return ParsedSignature {
            name: text.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            raw: raw.to_string(),
        };
    };

    let name = text[..open].trim().to_string();
    let (inputs, rest) = parse_param_list(&text[open + 1..]);

    let outputs = match rest.find("returns") {
        Some(idx) => {
            let clause = &rest[idx + "returns".len()..];
            match clause.find('(') {
                Some(open) => parse_param_list(&clause[open + 1..]).0,
                None => Vec::new(),
            }
        }
        None => Vec::new(),
    };

    ParsedSignature {
        name,
        inputs,
        outputs,
        raw: raw.to_string(),
    }
}

/// Parse parameters up to the `)` closing the list, returning the remaining text.
fn parse_param_list(s: &str) -> (Vec<FunctionParam>, &str) {
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                close = Some(i);
                break;
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    let (body, rest) = match close {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    };

    let params = split_top_level(body)
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_param)
        .collect();

    (params, rest)
}

/// `type [name]`, split at the first space.
fn parse_param(param: &str) -> FunctionParam {
    match param.split_once(' ') {
        Some((ty, name)) if !name.trim().is_empty() => FunctionParam::new(ty, name.trim()),
        Some((ty, _)) => FunctionParam::unnamed(ty),
        None => FunctionParam::unnamed(param),
    }
}

/// Parse `raw` and attach well-known registry data when it matches an entry.
pub fn parse_signature(raw: &str) -> FunctionDescriptor {
    let parsed = parse(raw);
    match registry::global().lookup(&parsed) {
        Some(entry) => FunctionDescriptor::WellKnown(entry),
        None => FunctionDescriptor::Parsed(parsed),
    }
}

/// A function description, either parsed ad hoc or backed by the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionDescriptor {
    /// Parsed from text with no registry match
    Parsed(ParsedSignature),
    /// A curated registry entry
    WellKnown(Arc<WellKnownFunction>),
}

impl FunctionDescriptor {
    /// Function name
    pub fn name(&self) -> &str {
        match self {
            FunctionDescriptor::Parsed(sig) => &sig.name,
            FunctionDescriptor::WellKnown(entry) => entry.name(),
        }
    }

    /// Input parameters
    pub fn inputs(&self) -> &[FunctionParam] {
        match self {
            FunctionDescriptor::Parsed(sig) => &sig.inputs,
            FunctionDescriptor::WellKnown(entry) => entry.inputs(),
        }
    }

    /// Output parameters
    pub fn outputs(&self) -> &[FunctionParam] {
        match self {
            FunctionDescriptor::Parsed(sig) => &sig.outputs,
            FunctionDescriptor::WellKnown(entry) => entry.outputs(),
        }
    }

    /// Human description, only for registry entries
    pub fn description(&self) -> Option<&str> {
        match self {
            FunctionDescriptor::Parsed(_) => None,
            FunctionDescriptor::WellKnown(entry) => Some(entry.description()),
        }
    }

    /// Known effects; empty for ad hoc signatures
    pub fn effects(&self) -> EffectMask {
        match self {
            FunctionDescriptor::Parsed(_) => EffectMask::empty(),
            FunctionDescriptor::WellKnown(entry) => entry.effects(),
        }
    }

    /// Returns true if the descriptor comes from the registry
    pub fn is_well_known(&self) -> bool {
        matches!(self, FunctionDescriptor::WellKnown(_))
    }

    /// `name(type,type,...)`
    pub fn canonical(&self) -> String {
        canonical_signature(self.name(), self.inputs())
    }

    /// 4-byte selector of the canonical signature
    pub fn selector(&self) -> [u8; 4] {
        match self {
            FunctionDescriptor::Parsed(sig) => abi::selector_of(&sig.canonical()),
            FunctionDescriptor::WellKnown(entry) => entry.selector(),
        }
    }

    /// Selector as lower-case hex
    pub fn selector_hex(&self) -> String {
        hex::encode(self.selector())
    }

    /// `view` for read-only functions, `nonpayable` otherwise
    pub fn state_mutability(&self) -> &'static str {
        if self.effects() == EffectMask::READ {
            "view"
        } else {
            "nonpayable"
        }
    }

    /// Full human-readable form with parameter names, outputs and description.
    pub fn describe(&self) -> String {
        let mut desc = format!("{}({})", self.name(), describe_params(self.inputs()));

        if !self.outputs().is_empty() {
            desc.push_str(&format!(" returns ({})", describe_params(self.outputs())));
        }

        if let Some(description) = self.description() {
            desc.push_str(" // ");
            desc.push_str(description);
        }

        desc
    }

    /// JSON ABI fragment for this function
    pub fn abi_json(&self) -> Value {
        let params = |params: &[FunctionParam]| -> Vec<Value> {
            params
                .iter()
                .map(|p| json!({ "name": p.name.clone().unwrap_or_default(), "type": p.ty }))
                .collect()
        };

        json!({
            "type": "function",
            "name": self.name(),
            "inputs": params(self.inputs()),
            "outputs": params(self.outputs()),
            "stateMutability": self.state_mutability(),
        })
    }
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

fn describe_params(params: &[FunctionParam]) -> String {
    params
        .iter()
        .map(|p| match &p.name {
            Some(name) => format!("{} {}", p.ty, name),
            None => p.ty.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
