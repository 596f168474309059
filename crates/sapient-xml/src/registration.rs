use std::io::Cursor;

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::XmlError;

/// Builds the `SensorRegistration` message sent once per TCP session, right
/// after connecting to the SDA server.
///
/// Two fixed mode definitions are always emitted — `Default` and `jam` —
/// each advertising a GPS, WGS84/30U/Grid detection location and a 10
/// second settle time, matching the sensor's only two operating modes.
#[derive(Clone, Debug)]
pub struct SensorRegistration {
    /// Sensor type string advertised to the server.
    pub sensor_type: String,
    /// Sensor ID, sent only when `sensor_id_set` is true.
    pub sensor_id: i32,
    /// Whether to include the `sensorID` element at all. The original
    /// implementation always sets this before sending, but the field
    /// models the upstream type honestly.
    pub sensor_id_set: bool,
}

impl Default for SensorRegistration {
    fn default() -> Self {
        Self {
            sensor_type: "Sky Net Longbow".to_string(),
            sensor_id: 0,
            sensor_id_set: false,
        }
    }
}

impl SensorRegistration {
    /// Encodes the message to its XML wire form, including the leading XML
    /// declaration.
    pub fn encode(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        writer
            .create_element("SensorRegistration")
            .write_inner_content(|writer| -> std::io::Result<()> {
                writer
                    .create_element("timestamp")
                    .write_text_content(BytesText::new(&timestamp))?;

                if self.sensor_id_set {
                    writer
                        .create_element("sensorID")
                        .write_text_content(BytesText::new(&self.sensor_id.to_string()))?;
                }

                writer
                    .create_element("sensorType")
                    .write_text_content(BytesText::new(&self.sensor_type))?;

                writer
                    .create_element("heartbeatDefinition")
                    .write_inner_content(|writer| -> std::io::Result<()> {
                        writer
                            .create_element("heartbeatInterval")
                            .with_attribute(("units", "seconds"))
                            .with_attribute(("value", "10"))
                            .write_empty()?;
                        Ok(())
                    })?;

                write_mode_definition(writer, "Default", false)?;
                write_mode_definition(writer, "jam", true)?;

                Ok(())
            })?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|err| XmlError::Encoding(err.utf8_error()))
    }
}

fn write_mode_definition(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    mode_name: &str,
    with_frequency_band_parameter: bool,
) -> std::io::Result<()> {
    writer
        .create_element("modeDefinition")
        .with_attribute(("type", "Permanent"))
        .write_inner_content(|writer| -> std::io::Result<()> {
            writer
                .create_element("modeName")
                .write_text_content(BytesText::new(mode_name))?;
            writer
                .create_element("settleTime")
                .with_attribute(("units", "seconds"))
                .with_attribute(("value", "10"))
                .write_empty()?;
            if with_frequency_band_parameter {
                writer
                    .create_element("modeParameter")
                    .with_attribute(("type", "Frequency Band"))
                    .with_attribute(("value", "Required"))
                    .write_empty()?;
            }
            writer
                .create_element("detectionDefinition")
                .write_inner_content(|writer| -> std::io::Result<()> {
                    writer
                        .create_element("locationType")
                        .with_attribute(("units", "decimal degrees-metres"))
                        .with_attribute(("datum", "WGS84"))
                        .with_attribute(("zone", "30U"))
                        .with_attribute(("north", "Grid"))
                        .write_text_content(BytesText::new("GPS"))?;
                    Ok(())
                })?;
            writer.create_element("taskDefinition").write_empty()?;
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_sensor_id_when_set() {
        let reg = SensorRegistration {
            sensor_id: 6,
            sensor_id_set: true,
            ..SensorRegistration::default()
        };
        let xml = reg.encode().unwrap();
        assert!(xml.contains("<sensorID>6</sensorID>"));
        assert!(xml.contains("<sensorType>Sky Net Longbow</sensorType>"));
        assert!(xml.contains("<modeName>Default</modeName>"));
        assert!(xml.contains("<modeName>jam</modeName>"));
    }

    #[test]
    fn only_the_jam_mode_carries_a_frequency_band_parameter() {
        let reg = SensorRegistration::default();
        let xml = reg.encode().unwrap();
        assert_eq!(xml.matches("modeParameter").count(), 2);
        let jam_block = &xml[xml.find("<modeName>jam</modeName>").unwrap()..];
        assert!(jam_block.contains("Frequency Band"));
        let default_block = &xml[..xml.find("<modeName>jam</modeName>").unwrap()];
        assert!(!default_block.contains("modeParameter"));
    }

    #[test]
    fn omits_sensor_id_when_not_set() {
        let reg = SensorRegistration::default();
        let xml = reg.encode().unwrap();
        assert!(!xml.contains("sensorID"));
    }
}
