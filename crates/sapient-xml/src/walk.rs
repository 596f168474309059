//! Flattens a parsed XML document into dotted-path key/value pairs (e.g.
//! `SensorTask.command.mode`). Decoders look fields up by path instead of
//! building a typed tree for every message shape.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XmlError;

/// Walks `xml`, returning one `(dotted.path, text)` pair per text node.
pub fn flatten(xml: &str) -> Result<Vec<(String, String)>, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut out = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                let trimmed = value.trim();
                if !trimmed.is_empty() && !stack.is_empty() {
                    out.push((stack.join("."), trimmed.to_string()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Returns the name of the document's root element, without materialising
/// the full flattened key set. Used to dispatch an inbound message to its
/// decoder before committing to parsing the whole thing.
pub fn root_element_name(xml: &str) -> Result<String, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) | Event::Empty(start) => {
                return Ok(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            Event::Eof => return Err(XmlError::Empty),
            _ => {}
        }
        buf.clear();
    }
}

/// Finds the value for an exact dotted path among flattened pairs.
pub fn find<'a>(pairs: &'a [(String, String)], path: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == path)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_elements_into_dotted_paths() {
        let xml = "<SensorTask><sensorID>6</sensorID><command><mode>jam 3</mode></command></SensorTask>";
        let pairs = flatten(xml).unwrap();
        assert_eq!(find(&pairs, "SensorTask.sensorID"), Some("6"));
        assert_eq!(find(&pairs, "SensorTask.command.mode"), Some("jam 3"));
    }

    #[test]
    fn root_element_name_ignores_the_xml_declaration() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?><SensorRegistrationACK><sensorID>6</sensorID></SensorRegistrationACK>";
        assert_eq!(root_element_name(xml).unwrap(), "SensorRegistrationACK");
    }
}
