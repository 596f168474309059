use crate::command::CommandId;
use crate::frame::Frame;
use crate::module::Module;

fn command_only(command: CommandId) -> Frame {
    Frame::command(Module::Mcm, vec![command.to_byte()])
}

/// Builds a `Ping` request frame.
#[must_use]
pub fn ping() -> Frame {
    command_only(CommandId::Ping)
}

/// Builds a `GetState` request frame.
#[must_use]
pub fn get_state() -> Frame {
    command_only(CommandId::GetState)
}

/// Builds a `GetSoftwareVersionNumber` request frame.
#[must_use]
pub fn get_software_version_number() -> Frame {
    command_only(CommandId::GetSoftwareVersionNumber)
}

/// Builds a `GetMissionName` request frame.
#[must_use]
pub fn get_mission_name() -> Frame {
    command_only(CommandId::GetMissionName)
}

/// Builds a `GetMissionFileInstallProgress` request frame.
#[must_use]
pub fn get_mission_file_install_progress() -> Frame {
    command_only(CommandId::GetMissionFileInstallProgress)
}

/// Builds a `StartJamming` request frame.
#[must_use]
pub fn start_jamming() -> Frame {
    command_only(CommandId::StartJamming)
}

/// Builds a `StopJamming` request frame.
#[must_use]
pub fn stop_jamming() -> Frame {
    command_only(CommandId::StopJamming)
}

/// Builds an `UploadMissionCommand` request announcing a `size`-byte upload.
#[must_use]
pub fn upload_mission_command(size: u32) -> Frame {
    let mut payload = vec![CommandId::UploadMissionCommand.to_byte()];
    payload.extend_from_slice(&size.to_le_bytes());
    Frame::command(Module::Mcm, payload)
}

/// Builds a `VerifyMissionFileCrc` request carrying the mission's CRC-16.
#[must_use]
pub fn verify_mission_file_crc(crc: u16) -> Frame {
    let mut payload = vec![CommandId::VerifyMissionFileCrc.to_byte()];
    payload.extend_from_slice(&crc.to_le_bytes());
    Frame::command(Module::Mcm, payload)
}

/// Maximum number of mission-file bytes a single `DataChunk` frame can
/// carry. Chosen so a full 253-byte serial read fits in exactly one data
/// message.
pub const MAX_DATA_CHUNK_BYTES: usize = 253;

/// Builds one `DataChunk` request carrying `seq` and up to
/// [`MAX_DATA_CHUNK_BYTES`] bytes of `data`.
///
/// Returns the frame together with the number of bytes of `data` it
/// consumed, so the caller can advance through a larger buffer.
#[must_use]
pub fn data_chunk(seq: u16, data: &[u8]) -> (Frame, usize) {
    let take = data.len().min(MAX_DATA_CHUNK_BYTES);
    let mut payload = vec![CommandId::DataChunk.to_byte()];
    payload.extend_from_slice(&seq.to_le_bytes());
    payload.extend_from_slice(&data[..take]);
    (Frame::command(Module::Mcm, payload), take)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::decode_frame;

    #[test]
    fn upload_mission_command_encodes_size() {
        let frame = upload_mission_command(760);
        assert_eq!(frame.payload[0], CommandId::UploadMissionCommand.to_byte());
        assert_eq!(
            u32::from_le_bytes(frame.payload[1..5].try_into().unwrap()),
            760
        );
    }

    #[test]
    fn data_chunk_splits_oversized_input() {
        let data = vec![0xAB; 500];
        let (frame, taken) = data_chunk(0, &data);
        assert_eq!(taken, MAX_DATA_CHUNK_BYTES);
        assert_eq!(frame.payload.len(), 1 + 2 + MAX_DATA_CHUNK_BYTES);
    }

    #[test]
    fn request_frames_round_trip_through_the_wire() {
        let frame = ping();
        let wire = frame.encode();
        let (decoded, _) = decode_frame(&wire).unwrap();
        assert_eq!(decoded, frame);
    }
}
