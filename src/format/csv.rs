//! CSV output formatter

use crate::{Annotation, DisassemblyError, DisassemblyResult};
use super::DisassemblyFormatter;

const HEADER: [&str; 6] = ["pc", "opcode", "mnemonic", "args", "signatures", "text"];

impl DisassemblyFormatter for super::CsvFormatter {
    fn format(&self, result: &DisassemblyResult) -> Result<String, DisassemblyError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).map_err(csv_error)?;

        for line in result.lines() {
            let (signatures, text) = match &line.annotation {
                Some(Annotation::Signatures(sigs)) => (sigs.join(";"), String::new()),
                Some(Annotation::Text(text)) => (String::new(), text.clone()),
                None => (String::new(), String::new()),
            };

            writer
                .write_record([
                    line.pc.to_string(),
                    format!("0x{:02x}", line.instruction.opcode),
                    line.instruction.mnemonic.to_string(),
                    line.args_hex(),
                    signatures,
                    text,
                ])
                .map_err(csv_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DisassemblyError::Format(format!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| DisassemblyError::Format(format!("CSV encoding error: {}", e)))
    }
}

fn csv_error(e: csv::Error) -> DisassemblyError {
    DisassemblyError::Format(format!("CSV serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_result;
    use crate::format::CsvFormatter;

    #[test]
    fn test_csv_formatter() {
        let output = CsvFormatter.format(&sample_result()).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][2], "PUSH4");
        assert_eq!(&rows[0][3], "18160ddd");
        assert_eq!(&rows[0][4], "totalSupply()");
        assert_eq!(&rows[1][0], "5");
        assert_eq!(&rows[1][3], "");
        // quoting survives the comma and quotes in the recovered text
        assert_eq!(&rows[2][5], "a, \"b\"");
    }
}
