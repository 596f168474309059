use crate::ack::SensorRegistrationAck;
use crate::error::XmlError;
use crate::task::SensorTask;
use crate::walk::root_element_name;

/// An inbound message this mediator knows how to decode, dispatched by its
/// document's root element name. Unrecognised root elements decode to
/// `None` rather than an error — the SDA server speaks a broader SAPIENT
/// dialect than this mediator understands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InboundMessage {
    /// A `SensorRegistrationACK`.
    RegistrationAck(SensorRegistrationAck),
    /// A `SensorTask`.
    Task(SensorTask),
}

/// Inspects `xml`'s root element and decodes it into the matching
/// [`InboundMessage`] variant, or `None` if the root element is not one
/// this mediator acts on.
pub fn decode_inbound(xml: &str) -> Result<Option<InboundMessage>, XmlError> {
    let root = root_element_name(xml)?;
    match root.as_str() {
        "SensorRegistrationACK" => {
            Ok(Some(InboundMessage::RegistrationAck(SensorRegistrationAck::decode(xml)?)))
        }
        "SensorTask" => Ok(Some(InboundMessage::Task(SensorTask::decode(xml)?))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_registration_ack() {
        let xml = "<SensorRegistrationACK><sensorID>6</sensorID></SensorRegistrationACK>";
        let msg = decode_inbound(xml).unwrap();
        assert_eq!(
            msg,
            Some(InboundMessage::RegistrationAck(SensorRegistrationAck {
                sensor_id: 6
            }))
        );
    }

    #[test]
    fn dispatches_sensor_task() {
        let xml = "<SensorTask><sensorID>6</sensorID></SensorTask>";
        let msg = decode_inbound(xml).unwrap();
        assert!(matches!(msg, Some(InboundMessage::Task(_))));
    }

    #[test]
    fn unrecognised_root_element_decodes_to_none() {
        let xml = "<SomethingElse/>";
        assert_eq!(decode_inbound(xml).unwrap(), None);
    }
}
