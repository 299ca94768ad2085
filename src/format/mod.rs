//! Output format module implementation

mod json;
mod csv;

use crate::{DisassemblyError, DisassemblyResult};
use std::fmt;
use std::str::FromStr;
use clap::ValueEnum;

/// Supported output formats for disassembly results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text listing (default)
    #[default]
    Text,
    /// JSON document with lines and discovered signatures
    Json,
    /// JSON Lines format (one JSON object per line)
    JsonLines,
    /// CSV format (comma-separated values)
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonLines => write!(f, "jsonl"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "jsonlines" => Ok(OutputFormat::JsonLines),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl OutputFormat {
    /// Get all available output formats
    pub fn available_formats() -> &'static [Self] {
        &[
            OutputFormat::Text,
            OutputFormat::Json,
            OutputFormat::JsonLines,
            OutputFormat::Csv,
        ]
    }

    /// Get a formatter for this output format
    pub fn get_formatter(&self) -> Box<dyn DisassemblyFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
            OutputFormat::JsonLines => Box::new(JsonLinesFormatter),
            OutputFormat::Csv => Box::new(CsvFormatter),
        }
    }
}

/// Formatter trait for disassembly output
pub trait DisassemblyFormatter {
    /// Format a disassembly result
    fn format(&self, result: &DisassemblyResult) -> Result<String, DisassemblyError>;
}

/// Format disassembly in plain text
pub struct TextFormatter;

/// Format disassembly in JSON
pub struct JsonFormatter;

/// Format disassembly in JSON Lines
pub struct JsonLinesFormatter;

/// Format disassembly in CSV
pub struct CsvFormatter;

impl DisassemblyFormatter for TextFormatter {
    fn format(&self, result: &DisassemblyResult) -> Result<String, DisassemblyError> {
        let mut output = result.to_string();

        let sigs = result.sorted_signatures();
        if !sigs.is_empty() {
            output.push_str(&format!("\n; {} signatures found:\n", sigs.len()));
            for sig in sigs {
                output.push_str(&format!(";   {}\n", sig));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::opcodes::instruction;
    use crate::{Annotation, DecodedLine};
    use rstest::rstest;

    /// PUSH4 totalSupply selector, EQ, PUSH32 text
    pub(crate) fn sample_result() -> DisassemblyResult {
        let mut result = DisassemblyResult::new(39);
        result.push_line(DecodedLine {
            instruction: *instruction(0x63),
            pc: 0,
            args: vec![vec![0x18, 0x16, 0x0d, 0xdd]],
            annotation: Some(Annotation::Signatures(vec!["totalSupply()".to_string()])),
        });
        result.push_line(DecodedLine {
            instruction: *instruction(0x14),
            pc: 5,
            args: Vec::new(),
            annotation: None,
        });
        result.push_line(DecodedLine {
            instruction: *instruction(0x7f),
            pc: 6,
            args: vec![b"a, \"b\"".to_vec()],
            annotation: Some(Annotation::Text("a, \"b\"".to_string())),
        });
        result.add_signatures(["totalSupply()".to_string()]);
        result
    }

    #[test]
    fn test_text_formatter() {
        let output = TextFormatter.format(&sample_result()).unwrap();

        assert!(output.starts_with("PUSH4 18160ddd ; totalSupply() pc=0\nEQ ; pc=5\n"));
        assert!(output.contains("PUSH32 612c20226222 ; \"a, \\\"b\\\"\" pc=6\n"));
        assert!(output.contains("; 1 signatures found:\n;   totalSupply()\n"));
    }

    #[test]
    fn test_text_formatter_without_signatures() {
        let result = DisassemblyResult::new(0);
        assert_eq!(TextFormatter.format(&result).unwrap(), "");
    }

    #[rstest]
    #[case("text", OutputFormat::Text)]
    #[case("JSON", OutputFormat::Json)]
    #[case("jsonl", OutputFormat::JsonLines)]
    #[case("jsonlines", OutputFormat::JsonLines)]
    #[case("csv", OutputFormat::Csv)]
    fn test_parse_format(#[case] input: &str, #[case] expected: OutputFormat) {
        assert_eq!(input.parse::<OutputFormat>(), Ok(expected));
    }

    #[test]
    fn test_unknown_format() {
        assert!("ngram".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_format_selection() {
        let result = sample_result();
        for format in OutputFormat::available_formats() {
            let output = format.get_formatter().format(&result).unwrap();
            assert!(output.contains("18160ddd"), "{} output lacks selector", format);
        }
    }
}
