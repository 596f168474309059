use crate::command::CommandId;

/// Errors returned when a reply's payload does not match the shape expected
/// for the response type being decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResponseError {
    /// The payload was shorter than the response type requires.
    #[error("response payload too short")]
    Truncated,
}

/// Decoded `GetState` response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GetStateResponse {
    /// Which command this response answers; expected to equal `GetState`.
    pub response_id: CommandId,
    /// The MCM's raw target state code.
    pub state: u8,
}

impl GetStateResponse {
    /// Decodes a response payload that follows the command header byte.
    pub fn decode(payload: &[u8]) -> Result<Self, ResponseError> {
        let [response_id, state, ..] = *payload else {
            return Err(ResponseError::Truncated);
        };
        Ok(Self {
            response_id: CommandId::from_byte(response_id),
            state,
        })
    }
}

/// Decoded `GetSoftwareVersionNumber` response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GetSoftwareVersionNumberResponse {
    /// Which command this response answers.
    pub response_id: CommandId,
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build number.
    pub build: u16,
}

impl GetSoftwareVersionNumberResponse {
    /// Decodes a response payload that follows the command header byte.
    pub fn decode(payload: &[u8]) -> Result<Self, ResponseError> {
        if payload.len() < 7 {
            return Err(ResponseError::Truncated);
        }
        Ok(Self {
            response_id: CommandId::from_byte(payload[0]),
            major: u16::from_le_bytes([payload[1], payload[2]]),
            minor: u16::from_le_bytes([payload[3], payload[4]]),
            build: u16::from_le_bytes([payload[5], payload[6]]),
        })
    }
}

/// Decoded `GetMissionName` response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GetMissionNameResponse {
    /// Which command this response answers.
    pub response_id: CommandId,
    /// The currently loaded mission's name (without path or extension).
    pub name: String,
}

impl GetMissionNameResponse {
    /// Decodes a response payload that follows the command header byte.
    ///
    /// The name field is a NUL-terminated (or payload-bounded) ASCII string,
    /// mirroring the original's fixed `char[]` buffer.
    pub fn decode(payload: &[u8]) -> Result<Self, ResponseError> {
        if payload.is_empty() {
            return Err(ResponseError::Truncated);
        }
        let response_id = CommandId::from_byte(payload[0]);
        let name_bytes = &payload[1..];
        let end = name_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..end]).into_owned();
        Ok(Self { response_id, name })
    }
}

/// Decoded `GetMissionFileInstallProgress` response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GetMissionFileInstallProgressResponse {
    /// Which command this response answers.
    pub response_id: CommandId,
    /// Installation progress, 0-100. Only used for logging — completion is
    /// signalled by the enclosing command header, not this field.
    pub percent: u8,
}

impl GetMissionFileInstallProgressResponse {
    /// Decodes a response payload that follows the command header byte.
    pub fn decode(payload: &[u8]) -> Result<Self, ResponseError> {
        let [response_id, percent, ..] = *payload else {
            return Err(ResponseError::Truncated);
        };
        Ok(Self {
            response_id: CommandId::from_byte(response_id),
            percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_get_state_response() {
        let payload = [CommandId::GetState.to_byte(), 7];
        let resp = GetStateResponse::decode(&payload).unwrap();
        assert_eq!(resp.response_id, CommandId::GetState);
        assert_eq!(resp.state, 7);
    }

    #[test]
    fn decodes_version_response() {
        let mut payload = vec![CommandId::GetSoftwareVersionNumber.to_byte()];
        payload.extend_from_slice(&6u16.to_le_bytes());
        payload.extend_from_slice(&5u16.to_le_bytes());
        payload.extend_from_slice(&42u16.to_le_bytes());
        let resp = GetSoftwareVersionNumberResponse::decode(&payload).unwrap();
        assert_eq!((resp.major, resp.minor, resp.build), (6, 5, 42));
    }

    #[test]
    fn decodes_mission_name_stopping_at_nul() {
        let mut payload = vec![CommandId::GetMissionName.to_byte()];
        payload.extend_from_slice(b"KT-956-0185-00_AA_AAA_AC_AA_AA\0\0\0");
        let resp = GetMissionNameResponse::decode(&payload).unwrap();
        assert_eq!(resp.name, "KT-956-0185-00_AA_AAA_AC_AA_AA");
    }

    #[test]
    fn truncated_payload_is_rejected() {
        assert_eq!(
            GetStateResponse::decode(&[CommandId::GetState.to_byte()]),
            Err(ResponseError::Truncated)
        );
    }
}
