/// Command/response header ids exchanged with the MCM.
///
/// The set is closed: every value the mediator ever sends or matches against
/// is named here. `Unknown` preserves whatever byte was actually received so
/// a caller can log it without the decoder having to fail the whole frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CommandId {
    /// Generic success reply.
    Ok,
    /// Generic failure reply; also the idiosyncratic "installation complete"
    /// signal for `GetMissionFileInstallProgress` (see `mercury`'s
    /// `wait_mission_install`).
    NotOk,
    /// Liveness probe.
    Ping,
    /// Query the MCM's current target state.
    GetState,
    /// Query the MCM's firmware version.
    GetSoftwareVersionNumber,
    /// Query the name of the mission currently loaded on the MCM.
    GetMissionName,
    /// Query mission installation progress.
    GetMissionFileInstallProgress,
    /// Begin a mission upload of the given size.
    UploadMissionCommand,
    /// Verify the CRC-16 of the just-uploaded mission file.
    VerifyMissionFileCrc,
    /// One chunk of mission file data, carrying a sequence number.
    DataChunk,
    /// Command jamming to start.
    StartJamming,
    /// Command jamming to stop.
    StopJamming,
    /// A command id the decoder does not recognise.
    Unknown(u8),
}

impl CommandId {
    /// Encodes the command id as its wire byte.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            CommandId::Ok => 0,
            CommandId::NotOk => 1,
            CommandId::Ping => 2,
            CommandId::GetState => 3,
            CommandId::GetSoftwareVersionNumber => 4,
            CommandId::GetMissionName => 5,
            CommandId::GetMissionFileInstallProgress => 6,
            CommandId::UploadMissionCommand => 7,
            CommandId::VerifyMissionFileCrc => 8,
            CommandId::DataChunk => 9,
            CommandId::StartJamming => 10,
            CommandId::StopJamming => 11,
            CommandId::Unknown(byte) => byte,
        }
    }

    /// Decodes a wire byte into a command id, never failing.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => CommandId::Ok,
            1 => CommandId::NotOk,
            2 => CommandId::Ping,
            3 => CommandId::GetState,
            4 => CommandId::GetSoftwareVersionNumber,
            5 => CommandId::GetMissionName,
            6 => CommandId::GetMissionFileInstallProgress,
            7 => CommandId::UploadMissionCommand,
            8 => CommandId::VerifyMissionFileCrc,
            9 => CommandId::DataChunk,
            10 => CommandId::StartJamming,
            11 => CommandId::StopJamming,
            other => CommandId::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_command_round_trips_through_its_byte() {
        let commands = [
            CommandId::Ok,
            CommandId::NotOk,
            CommandId::Ping,
            CommandId::GetState,
            CommandId::GetSoftwareVersionNumber,
            CommandId::GetMissionName,
            CommandId::GetMissionFileInstallProgress,
            CommandId::UploadMissionCommand,
            CommandId::VerifyMissionFileCrc,
            CommandId::DataChunk,
            CommandId::StartJamming,
            CommandId::StopJamming,
        ];
        for command in commands {
            assert_eq!(CommandId::from_byte(command.to_byte()), command);
        }
    }

    #[test]
    fn unrecognised_byte_round_trips_as_unknown() {
        assert_eq!(CommandId::from_byte(200), CommandId::Unknown(200));
        assert_eq!(CommandId::Unknown(200).to_byte(), 200);
    }
}
