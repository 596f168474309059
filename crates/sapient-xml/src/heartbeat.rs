use std::io::Cursor;

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::XmlError;

/// Builds the `StatusReport` heartbeat sent periodically while registered.
#[derive(Clone, Debug)]
pub struct StatusReport {
    /// Sensor ID this report is sent as.
    pub sensor_id: i32,
    /// Monotonically increasing report counter, starting at `0` for the
    /// first heartbeat of a session.
    pub report_id: i32,
    /// Free-text system health string.
    pub system: String,
    /// Whether something changed since the last report. Always `false` in
    /// this mediator, since it has no concept of "changed" sensor state
    /// beyond the first report.
    pub changed: bool,
}

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            sensor_id: 0,
            report_id: 0,
            system: "OK".to_string(),
            changed: false,
        }
    }
}

impl StatusReport {
    /// Encodes the message to its XML wire form, including the leading XML
    /// declaration.
    pub fn encode(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let info = if self.report_id == 0 {
            "New"
        } else if self.changed {
            "Additional"
        } else {
            "Unchanged"
        };

        writer
            .create_element("StatusReport")
            .write_inner_content(|writer| -> std::io::Result<()> {
                writer
                    .create_element("timestamp")
                    .write_text_content(BytesText::new(&timestamp))?;
                writer
                    .create_element("sourceID")
                    .write_text_content(BytesText::new(&self.sensor_id.to_string()))?;
                writer
                    .create_element("reportID")
                    .write_text_content(BytesText::new(&self.report_id.to_string()))?;
                writer
                    .create_element("system")
                    .write_text_content(BytesText::new(&self.system))?;
                writer
                    .create_element("info")
                    .write_text_content(BytesText::new(info))?;
                Ok(())
            })?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|err| XmlError::Encoding(err.utf8_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_report_is_marked_new() {
        let report = StatusReport {
            sensor_id: 6,
            report_id: 0,
            ..StatusReport::default()
        };
        let xml = report.encode().unwrap();
        assert!(xml.contains("<info>New</info>"));
        assert!(xml.contains("<sourceID>6</sourceID>"));
    }

    #[test]
    fn later_unchanged_report_is_marked_unchanged() {
        let report = StatusReport {
            report_id: 4,
            changed: false,
            ..StatusReport::default()
        };
        let xml = report.encode().unwrap();
        assert!(xml.contains("<info>Unchanged</info>"));
    }

    #[test]
    fn later_changed_report_is_marked_additional() {
        let report = StatusReport {
            report_id: 4,
            changed: true,
            ..StatusReport::default()
        };
        let xml = report.encode().unwrap();
        assert!(xml.contains("<info>Additional</info>"));
    }
}
