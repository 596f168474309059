/// The downstream controller's own session state, distinct from
/// [`crate::TargetState`] which describes what the device itself reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControllerState {
    /// The serial device is not open or not responding to opens.
    SerialDisconnected,
    /// The device is open but not answering pings or commands.
    NoResponse,
    /// The device answered but is not ready to accept a new mission.
    NotReadyForMission,
    /// The device is ready to accept a new mission upload.
    ReadyForMission,
    /// The device is actively jamming.
    Jamming,
}
