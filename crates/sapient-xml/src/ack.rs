use crate::error::XmlError;
use crate::walk::{find, flatten};

/// A `SensorRegistrationACK` received from the SDA server in response to a
/// `SensorRegistration` message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SensorRegistrationAck {
    /// The server-assigned sensor ID echoed back in the acknowledgement.
    pub sensor_id: i32,
}

impl SensorRegistrationAck {
    /// Decodes a `SensorRegistrationACK` document.
    pub fn decode(xml: &str) -> Result<Self, XmlError> {
        let pairs = flatten(xml)?;
        let raw = find(&pairs, "SensorRegistrationACK.sensorID")
            .ok_or(XmlError::MissingField("SensorRegistrationACK.sensorID"))?;
        let sensor_id = raw
            .parse()
            .map_err(|_| XmlError::NotAnInteger {
                field: "SensorRegistrationACK.sensorID",
                value: raw.to_string(),
            })?;
        Ok(Self { sensor_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sensor_id() {
        let xml = "<SensorRegistrationACK><sensorID>6</sensorID></SensorRegistrationACK>";
        assert_eq!(
            SensorRegistrationAck::decode(xml).unwrap(),
            SensorRegistrationAck { sensor_id: 6 }
        );
    }

    #[test]
    fn missing_sensor_id_is_rejected() {
        let xml = "<SensorRegistrationACK></SensorRegistrationACK>";
        assert!(SensorRegistrationAck::decode(xml).is_err());
    }
}
