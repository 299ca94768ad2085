//! JSON and JSON Lines output formatters

use serde::Serialize;

use crate::{Annotation, DecodedLine, DisassemblyError, DisassemblyResult};
use super::DisassemblyFormatter;

/// Serializable line for JSON output
#[derive(Serialize)]
struct LineJson<'a> {
    /// Program counter of the opcode
    pc: usize,
    /// Opcode byte as hex
    opcode: String,
    /// Mnemonic (e.g., "PUSH4", "SSTORE")
    mnemonic: &'a str,
    /// Arguments as hex strings
    args: Vec<String>,
    /// Candidate signatures of a pushed selector
    #[serde(skip_serializing_if = "Option::is_none")]
    signatures: Option<&'a [String]>,
    /// Text recovered from a 32-byte push
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

/// Serializable disassembly result for JSON output
#[derive(Serialize)]
struct DisassemblyJson<'a> {
    /// Length of the decoded bytecode
    code_len: usize,
    /// Decoded lines
    lines: Vec<LineJson<'a>>,
    /// Every discovered signature, sorted
    signatures: Vec<&'a str>,
}

/// One JSON Lines record
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RecordJson<'a> {
    Line(LineJson<'a>),
    Signature { signature: &'a str },
}

impl DisassemblyFormatter for super::JsonFormatter {
    fn format(&self, result: &DisassemblyResult) -> Result<String, DisassemblyError> {
        let document = DisassemblyJson {
            code_len: result.code_len(),
            lines: result.lines().iter().map(line_to_json).collect(),
            signatures: result.sorted_signatures(),
        };

        serde_json::to_string_pretty(&document)
            .map_err(|e| DisassemblyError::Format(format!("JSON serialization error: {}", e)))
    }
}

impl DisassemblyFormatter for super::JsonLinesFormatter {
    fn format(&self, result: &DisassemblyResult) -> Result<String, DisassemblyError> {
        let mut output = String::new();

        let lines = result.lines().iter().map(|line| RecordJson::Line(line_to_json(line)));
        let sigs = result
            .sorted_signatures()
            .into_iter()
            .map(|signature| RecordJson::Signature { signature });

        for record in lines.chain(sigs) {
            output.push_str(&serde_json::to_string(&record)
                .map_err(|e| DisassemblyError::Format(format!("JSON serialization error: {}", e)))?);
            output.push('\n');
        }

        Ok(output)
    }
}

/// Convert a decoded line to JSON format
fn line_to_json(line: &DecodedLine) -> LineJson<'_> {
    let (signatures, text) = match &line.annotation {
        Some(Annotation::Signatures(sigs)) => (Some(sigs.as_slice()), None),
        Some(Annotation::Text(text)) => (None, Some(text.as_str())),
        None => (None, None),
    };

    LineJson {
        pc: line.pc,
        opcode: format!("0x{:02x}", line.instruction.opcode),
        mnemonic: line.instruction.mnemonic,
        args: line.args.iter().map(hex::encode).collect(),
        signatures,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_result;
    use crate::format::{JsonFormatter, JsonLinesFormatter};
    use serde_json::Value;

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter.format(&sample_result()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["code_len"], 39);
        assert_eq!(value["signatures"][0], "totalSupply()");

        let lines = value["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["mnemonic"], "PUSH4");
        assert_eq!(lines[0]["opcode"], "0x63");
        assert_eq!(lines[0]["args"][0], "18160ddd");
        assert_eq!(lines[0]["signatures"][0], "totalSupply()");
        assert!(lines[1].get("signatures").is_none());
        assert_eq!(lines[1]["pc"], 5);
        assert_eq!(lines[2]["text"], "a, \"b\"");
    }

    #[test]
    fn test_json_lines_formatter() {
        let output = JsonLinesFormatter.format(&sample_result()).unwrap();
        let records: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0]["type"], "line");
        assert_eq!(records[0]["mnemonic"], "PUSH4");
        assert_eq!(records[2]["pc"], 6);
        assert_eq!(records[3]["type"], "signature");
        assert_eq!(records[3]["signature"], "totalSupply()");
    }
}
