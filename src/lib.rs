//! Core types, traits, and errors for the evmlens EVM bytecode disassembler.
//!
//! This library turns raw EVM bytecode into an annotated instruction stream and
//! recovers the function selectors the code references. Resolved selectors can
//! then be parsed into function descriptors and used to decode call data.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use evmlens::{
//!     disassembler::Disassembler,
//!     selectors::SelectorCache,
//!     signature::parse_signature,
//!     abi::decode_arguments,
//!     ERC20_INTERFACE,
//! };
//!
//! // One cache can be shared by every disassembler in the process
//! let cache = Arc::new(SelectorCache::default());
//! let disassembler = Disassembler::new(cache);
//!
//! let result = disassembler.disassemble_hex("0x6080604052").unwrap();
//! println!("{}", result);
//!
//! if result.implements(ERC20_INTERFACE) {
//!     let transfer = parse_signature("transfer(address,uint256)");
//!     let call_data = hex::decode("a9059cbb...").unwrap_or_default();
//!     let _values = decode_arguments(&transfer, &call_data, true);
//! }
//! ```

pub mod opcodes;
pub mod decoder;
pub mod disassembler;
pub mod selectors;
pub mod signature;
pub mod abi;
pub mod format;

use std::collections::HashSet;
use std::fmt;

use crate::opcodes::Instruction;

pub use crate::disassembler::Disassembler;
pub use crate::selectors::SelectorCache;
pub use crate::signature::{parse_signature, FunctionDescriptor};

/// Signatures a contract must expose to be treated as an ERC20 token.
pub const ERC20_INTERFACE: &[&str] = &[
    "totalSupply()",
    "balanceOf(address)",
    "allowance(address,address)",
    "transfer(address,uint256)",
    "approve(address,uint256)",
    "transferFrom(address,address,uint256)",
];

/// Signatures a contract must expose to be treated as an ERC721 token.
pub const ERC721_INTERFACE: &[&str] = &[
    "balanceOf(address)",
    "ownerOf(uint256)",
    "safeTransferFrom(address,address,uint256)",
    "safeTransferFrom(address,address,uint256,bytes)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "setApprovalForAll(address,bool)",
    "getApproved(uint256)",
    "isApprovedForAll(address,address)",
];

/// Outcome of decoding a single instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    /// A complete instruction
    Insn {
        /// Instruction descriptor
        instruction: &'static Instruction,
        /// Offset of the opcode byte
        pc: usize,
        /// Immediate bytes following the opcode
        immediate: &'a [u8],
    },
    /// The code ends before the instruction's immediate does
    Truncated {
        /// Instruction descriptor
        instruction: &'static Instruction,
        /// Offset of the opcode byte
        pc: usize,
        /// Immediate bytes actually present
        available: usize,
    },
}

/// Decoder trait: decodes one instruction at a time.
pub trait Decoder: Send + Sync {
    /// Decode a single instruction at offset `pc`.
    ///
    /// # Arguments
    /// * `code` - The bytecode to decode
    /// * `pc` - Offset of the opcode byte
    ///
    /// # Returns
    /// `None` once `pc` is past the end of `code`
    fn decode<'a>(&self, code: &'a [u8], pc: usize) -> Option<Step<'a>>;
}

/// Extra information attached to a decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Candidate signatures for a pushed function selector
    Signatures(Vec<String>),
    /// Printable text recovered from a 32-byte push
    Text(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Signatures(sigs) => write!(f, "{}", sigs.join(", ")),
            Annotation::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// One decoded instruction together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Instruction descriptor
    pub instruction: Instruction,
    /// Byte offset of the opcode
    pub pc: usize,
    /// Raw argument byte strings
    pub args: Vec<Vec<u8>>,
    /// Optional annotation (selector candidates or recovered text)
    pub annotation: Option<Annotation>,
}

impl DecodedLine {
    /// Arguments rendered as hex, comma separated
    pub fn args_hex(&self) -> String {
        self.args
            .iter()
            .map(hex::encode)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DecodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args_hex())?;
        }
        write!(f, " ;")?;
        if let Some(annotation) = &self.annotation {
            write!(f, " {}", annotation)?;
        }
        write!(f, " pc={}", self.pc)
    }
}

/// Result of disassembling one bytecode blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisassemblyResult {
    lines: Vec<DecodedLine>,
    code_len: usize,
    signatures: HashSet<String>,
}

impl DisassemblyResult {
    pub(crate) fn new(code_len: usize) -> Self {
        Self {
            lines: Vec::new(),
            code_len,
            signatures: HashSet::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: DecodedLine) {
        self.lines.push(line);
    }

    pub(crate) fn add_signatures<I>(&mut self, sigs: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.signatures.extend(sigs);
    }

    /// Decoded lines in bytecode order
    pub fn lines(&self) -> &[DecodedLine] {
        &self.lines
    }

    /// Length in bytes of the bytecode that was decoded
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Every signature discovered while decoding
    pub fn signatures(&self) -> &HashSet<String> {
        &self.signatures
    }

    /// Discovered signatures in lexical order
    pub fn sorted_signatures(&self) -> Vec<&str> {
        let mut sigs: Vec<&str> = self.signatures.iter().map(String::as_str).collect();
        sigs.sort_unstable();
        sigs
    }

    /// Returns true if every signature of `interface` was discovered
    pub fn implements(&self, interface: &[&str]) -> bool {
        interface.iter().all(|sig| self.signatures.contains(*sig))
    }
}

impl fmt::Display for DisassemblyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Error type for disassembly operations
#[derive(Debug, thiserror::Error)]
pub enum DisassemblyError {
    /// The raw input is not valid hex
    #[error("Invalid bytecode encoding: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),

    /// The bytecode ends in the middle of an instruction.
    ///
    /// Everything decoded before the broken instruction is kept in `partial`.
    #[error("Truncated instruction {mnemonic} at pc {pc}: expected {expected} argument bytes, found {available}")]
    Truncated {
        /// Offset of the truncated opcode
        pc: usize,
        /// Mnemonic of the truncated instruction
        mnemonic: &'static str,
        /// Immediate bytes the instruction requires
        expected: usize,
        /// Immediate bytes present
        available: usize,
        /// Lines and signatures decoded before the truncation
        partial: Box<DisassemblyResult>,
    },

    /// Rendering a disassembly failed
    #[error("Format error: {0}")]
    Format(String),
}

impl DisassemblyError {
    /// Partial result carried by a truncation error
    pub fn partial(&self) -> Option<&DisassemblyResult> {
        match self {
            DisassemblyError::Truncated { partial, .. } => Some(partial.as_ref()),
            _ => None,
        }
    }

    /// Consume the error, returning the partial result if there is one
    pub fn into_partial(self) -> Option<DisassemblyResult> {
        match self {
            DisassemblyError::Truncated { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::instruction;

    fn result_with(sigs: &[&str]) -> DisassemblyResult {
        let mut result = DisassemblyResult::new(0);
        result.add_signatures(sigs.iter().map(|s| s.to_string()));
        result
    }

    #[test]
    fn test_implements_erc20() {
        let result = result_with(&[
            "balanceOf(address)",
            "transfer(address,uint256)",
            "totalSupply()",
            "allowance(address,address)",
            "approve(address,uint256)",
            "transferFrom(address,address,uint256)",
        ]);

        assert!(result.implements(ERC20_INTERFACE));
        assert!(!result.implements(ERC721_INTERFACE));
        assert!(result.implements(&[]));
    }

    #[test]
    fn test_implements_is_exact_match() {
        let result = result_with(&["transfer(address, uint256)"]);
        assert!(!result.implements(&["transfer(address,uint256)"]));
    }

    #[test]
    fn test_line_display() {
        let line = DecodedLine {
            instruction: *instruction(0x63),
            pc: 12,
            args: vec![vec![0xa9, 0x05, 0x9c, 0xbb]],
            annotation: Some(Annotation::Signatures(vec![
                "transfer(address,uint256)".to_string(),
                "many_msg_babbage(bytes1)".to_string(),
            ])),
        };
        assert_eq!(
            line.to_string(),
            "PUSH4 a9059cbb ; transfer(address,uint256), many_msg_babbage(bytes1) pc=12"
        );

        let bare = DecodedLine {
            instruction: *instruction(0x01),
            pc: 3,
            args: Vec::new(),
            annotation: None,
        };
        assert_eq!(bare.to_string(), "ADD ; pc=3");
    }

    #[test]
    fn test_text_annotation_display() {
        let annotation = Annotation::Text("Ownable: caller".to_string());
        assert_eq!(annotation.to_string(), "\"Ownable: caller\"");
    }

    #[test]
    fn test_partial_accessors() {
        let mut partial = DisassemblyResult::new(3);
        partial.push_line(DecodedLine {
            instruction: *instruction(0x00),
            pc: 0,
            args: Vec::new(),
            annotation: None,
        });
        let err = DisassemblyError::Truncated {
            pc: 1,
            mnemonic: "PUSH2",
            expected: 2,
            available: 1,
            partial: Box::new(partial),
        };

        assert_eq!(err.partial().map(|p| p.lines().len()), Some(1));
        assert!(err.to_string().contains("PUSH2 at pc 1"));
        assert_eq!(err.into_partial().map(|p| p.code_len()), Some(3));
    }
}
