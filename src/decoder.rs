//! Single-step EVM instruction decoder.

use std::fmt;

use crate::opcodes::{self, Instruction};
use crate::{Decoder, Step};

/// Decodes one instruction at a time from raw EVM bytecode.
///
/// The decoder is stateless; it only knows how wide each instruction is.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvmDecoder;

impl EvmDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl fmt::Display for EvmDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmDecoder")
    }
}

impl Decoder for EvmDecoder {
    fn decode<'a>(&self, code: &'a [u8], pc: usize) -> Option<Step<'a>> {
        let opcode = *code.get(pc)?;
        let instruction: &'static Instruction = opcodes::instruction(opcode);

        let start = pc + 1;
        let end = start + instruction.immediate_len as usize;
        if end > code.len() {
            return Some(Step::Truncated {
                instruction,
                pc,
                available: code.len() - start,
            });
        }

        Some(Step::Insn {
            instruction,
            pc,
            immediate: &code[start..end],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_push4() {
        let code = [0x63, 0xa9, 0x05, 0x9c, 0xbb, 0x14];
        let decoder = EvmDecoder::new();

        match decoder.decode(&code, 0) {
            Some(Step::Insn { instruction, pc, immediate }) => {
                assert_eq!(instruction.mnemonic, "PUSH4");
                assert_eq!(pc, 0);
                assert_eq!(immediate, &[0xa9, 0x05, 0x9c, 0xbb]);
            }
            other => panic!("Expected instruction, got {:?}", other),
        }

        match decoder.decode(&code, 5) {
            Some(Step::Insn { instruction, immediate, .. }) => {
                assert_eq!(instruction.mnemonic, "EQ");
                assert!(immediate.is_empty());
            }
            other => panic!("Expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_push() {
        // PUSH2 with a single trailing byte
        let code = [0x61, 0x01];
        let decoder = EvmDecoder::new();

        match decoder.decode(&code, 0) {
            Some(Step::Truncated { instruction, pc, available }) => {
                assert_eq!(instruction.mnemonic, "PUSH2");
                assert_eq!(pc, 0);
                assert_eq!(available, 1);
            }
            other => panic!("Expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_past_end() {
        let decoder = EvmDecoder::new();
        assert!(decoder.decode(&[0x00], 1).is_none());
        assert!(decoder.decode(&[], 0).is_none());
    }

    #[test]
    fn test_decode_undefined_opcode() {
        let decoder = EvmDecoder::new();
        match decoder.decode(&[0x0c], 0) {
            Some(Step::Insn { instruction, immediate, .. }) => {
                assert!(!instruction.is_defined());
                assert!(immediate.is_empty());
            }
            other => panic!("Expected instruction, got {:?}", other),
        }
    }
}
