use std::io::Write;
use anyhow::Result;

use crate::report::Device;

/// Final line written after all records, marking end-of-stream.
pub const COMPLETION_SENTINEL: &str = "DISCOVERY_COMPLETE";

/// Streams device records to the primary output channel, one JSON line per
/// record. Every line is flushed as it is written so a consumer can process
/// results incrementally instead of waiting for the run to finish.
pub struct OutputWriter<W: Write> {
    out: W,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_record(&mut self, device: &Device) -> Result<()> {
        let line = serde_json::to_string(device)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    /// Write the completion sentinel. Called exactly once, after the last
    /// record, including runs that discovered nothing.
    pub fn finish(&mut self) -> Result<()> {
        writeln!(self.out, "{}", COMPLETION_SENTINEL)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_then_sentinel() {
        let mut writer = OutputWriter::new(Vec::new());
        writer
            .write_record(&Device {
                name: "printer.lan".to_string(),
                ip: "192.168.0.20".to_string(),
                open_ports: vec![22, 443],
            })
            .unwrap();
        writer
            .write_record(&Device {
                name: "192.168.0.5".to_string(),
                ip: "192.168.0.5".to_string(),
                open_ports: vec![22],
            })
            .unwrap();
        writer.finish().unwrap();

        let output = String::from_utf8(writer.out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "{\"name\":\"printer.lan\",\"ip\":\"192.168.0.20\",\"open_ports\":[22,443]}"
        );
        assert_eq!(
            lines[1],
            "{\"name\":\"192.168.0.5\",\"ip\":\"192.168.0.5\",\"open_ports\":[22]}"
        );
        assert_eq!(lines[2], "DISCOVERY_COMPLETE");
    }

    #[test]
    fn test_empty_run_still_emits_sentinel() {
        let mut writer = OutputWriter::new(Vec::new());
        writer.finish().unwrap();

        assert_eq!(String::from_utf8(writer.out).unwrap(), "DISCOVERY_COMPLETE\n");
    }

    #[test]
    fn test_every_line_is_newline_terminated() {
        let mut writer = OutputWriter::new(Vec::new());
        writer
            .write_record(&Device {
                name: "192.168.0.5".to_string(),
                ip: "192.168.0.5".to_string(),
                open_ports: vec![],
            })
            .unwrap();
        writer.finish().unwrap();

        let output = String::from_utf8(writer.out).unwrap();
        assert!(output.ends_with('\n'));
        assert_eq!(output.matches('\n').count(), 2);
    }
}
