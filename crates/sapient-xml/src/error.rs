/// Errors produced while decoding a SAPIENT XML message.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The document was not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),
    /// Writing the XML to the underlying buffer failed.
    #[error("XML write failed: {0}")]
    Io(#[from] std::io::Error),
    /// An element's text content was not valid UTF-8.
    #[error("non-UTF-8 element text: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// The document had no root element at all.
    #[error("empty document")]
    Empty,
    /// A field expected to hold an integer held something else.
    #[error("field {field} was not an integer: {value:?}")]
    NotAnInteger {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },
    /// A required field was missing from the document.
    #[error("missing required field {0}")]
    MissingField(&'static str),
}
