//! Linear-sweep EVM disassembly with selector and string recovery

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::decoder::EvmDecoder;
use crate::opcodes::{PUSH32, PUSH4};
use crate::selectors::SelectorCache;
use crate::{Annotation, DecodedLine, Decoder, DisassemblyError, DisassemblyResult, Step};

/// Walks bytecode front to back, annotating selector pushes and embedded text.
///
/// Cloning is cheap; clones share the selector cache.
#[derive(Debug, Clone)]
pub struct Disassembler {
    cache: Arc<SelectorCache>,
    decoder: EvmDecoder,
}

impl Disassembler {
    /// Create a disassembler resolving selectors through `cache`
    pub fn new(cache: Arc<SelectorCache>) -> Self {
        Self {
            cache,
            decoder: EvmDecoder::new(),
        }
    }

    /// The shared selector cache
    pub fn cache(&self) -> &Arc<SelectorCache> {
        &self.cache
    }

    /// Disassemble hex encoded bytecode, with or without a `0x` prefix.
    pub fn disassemble_hex(&self, code: &str) -> Result<DisassemblyResult, DisassemblyError> {
        let code = code.trim();
        let code = code
            .strip_prefix("0x")
            .or_else(|| code.strip_prefix("0X"))
            .unwrap_or(code);
        let bytes = hex::decode(code)?;
        self.disassemble(&bytes)
    }

    /// Disassemble raw bytecode.
    ///
    /// # Returns
    /// The full result, or [`DisassemblyError::Truncated`] carrying everything
    /// decoded before an instruction whose immediate runs past the end.
    pub fn disassemble(&self, code: &[u8]) -> Result<DisassemblyResult, DisassemblyError> {
        let start_time = Instant::now();
        let mut result = DisassemblyResult::new(code.len());
        // selector -> candidates, so each selector hits the cache once per call
        let mut memo: HashMap<[u8; 4], Vec<String>> = HashMap::new();

        let mut pc = 0;
        while let Some(step) = self.decoder.decode(code, pc) {
            let (instruction, immediate) = match step {
                Step::Insn { instruction, immediate, .. } => (instruction, immediate),
                Step::Truncated { instruction, pc, available } => {
                    log::debug!(
                        "Truncated {} at pc {} after {} lines",
                        instruction.mnemonic,
                        pc,
                        result.lines().len()
                    );
                    return Err(DisassemblyError::Truncated {
                        pc,
                        mnemonic: instruction.mnemonic,
                        expected: instruction.immediate_len as usize,
                        available,
                        partial: Box::new(result),
                    });
                }
            };

            let (args, annotation) = match instruction.opcode {
                PUSH4 => {
                    let mut selector = [0u8; 4];
                    selector.copy_from_slice(immediate);
                    let sigs = memo.entry(selector).or_insert_with(|| {
                        let sigs = self.cache.resolve(selector);
                        result.add_signatures(sigs.iter().cloned());
                        sigs.to_vec()
                    });
                    let annotation = (!sigs.is_empty()).then(|| Annotation::Signatures(sigs.clone()));
                    (vec![immediate.to_vec()], annotation)
                }
                PUSH32 => match embedded_text(immediate) {
                    Some(text) => (vec![text.as_bytes().to_vec()], Some(Annotation::Text(text))),
                    None => (vec![immediate.to_vec()], None),
                },
                _ if immediate.is_empty() => (Vec::new(), None),
                _ => (vec![immediate.to_vec()], None),
            };

            result.push_line(DecodedLine {
                instruction: *instruction,
                pc,
                args,
                annotation,
            });
            pc += instruction.size();
        }

        log::debug!(
            "Disassembled {} bytes into {} lines in {:?} ({} signatures)",
            code.len(),
            result.lines().len(),
            start_time.elapsed(),
            result.signatures().len()
        );

        Ok(result)
    }

    /// Disassemble several bytecodes in parallel, sharing one selector cache.
    ///
    /// Results are returned in input order.
    pub fn disassemble_batch(&self, codes: &[&[u8]]) -> Vec<Result<DisassemblyResult, DisassemblyError>> {
        codes.par_iter().map(|code| self.disassemble(code)).collect()
    }
}

/// Printable prefix of a 32-byte push, if it looks like a short string.
///
/// The push must contain a zero byte, the bytes before the first zero must be
/// non-empty and every one of them must be 7-bit.
fn embedded_text(word: &[u8]) -> Option<String> {
    let end = word.iter().position(|&b| b == 0)?;
    let prefix = &word[..end];
    if prefix.is_empty() || !prefix.is_ascii() {
        return None;
    }
    String::from_utf8(prefix.to_vec()).ok()
}
