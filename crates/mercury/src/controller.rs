use std::time::Duration;

use tokio::time::Instant;

use mcm_checksums::crc16_of_slice;
use mcm_codec::{request, CommandId, Codec, Frame, Module};
use mode_arbiter::ModeArbiter;
use serial_io::SerialAdapter;

use crate::state::ControllerState;
use crate::target_state::TargetState;
use crate::version::{Version, MIN_TARGET_VERSION};

const REPLY_TIMEOUT_DEFAULT: Duration = Duration::from_millis(2500);
const REPLY_TIMEOUT_CRC: Duration = Duration::from_millis(8100);
const INTER_PACKET_DELAY: Duration = Duration::from_millis(15);
const WAIT_READY: Duration = Duration::from_millis(300_000);
const WAIT_INSTALL: Duration = Duration::from_millis(300_000);
const TIME_BETWEEN_PINGS: Duration = Duration::from_millis(500);
const RECONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Drives one serial device for as long as it stays good, reopening it
/// after a fixed backoff whenever it doesn't. Never returns.
pub async fn run<S: SerialAdapter>(mut serial: S, arbiter: std::sync::Arc<ModeArbiter>) -> ! {
    loop {
        if serial.is_good() {
            let mut controller = Controller::new(serial);
            while controller.is_serial_good() {
                controller.tick(&arbiter).await;
            }
            serial = controller.into_serial();
        }
        tokio::time::sleep(RECONNECT_BACKOFF).await;
        serial.reinitialise(serial_io::DEFAULT_BAUD);
    }
}

/// The downstream controller's protocol state machine, generic over the
/// serial transport so it can be driven by [`serial_io::memory::MemorySerialAdapter`]
/// in tests.
pub struct Controller<S: SerialAdapter> {
    serial: S,
    codec: Codec,
    reply_timeout: Duration,
    state: ControllerState,
}

impl<S: SerialAdapter> Controller<S> {
    /// Wraps an already-open serial adapter in a fresh codec and controller
    /// state machine.
    #[must_use]
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            codec: Codec::new(),
            reply_timeout: REPLY_TIMEOUT_DEFAULT,
            state: ControllerState::NoResponse,
        }
    }

    /// Returns the serial adapter, consuming the controller.
    pub fn into_serial(self) -> S {
        self.serial
    }

    /// Reports whether the underlying serial device is still usable.
    #[must_use]
    pub fn is_serial_good(&self) -> bool {
        self.serial.is_good()
    }

    /// The controller's own session state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    async fn send_message_get_response(&mut self, frame: Frame) -> Option<Frame> {
        self.codec.drain_stale();
        let wire = Codec::encode(&frame);
        if self.serial.write_raw(&wire) != wire.len() {
            return None;
        }
        let timeout = self.reply_timeout;
        let serial = &mut self.serial;
        let got = self
            .codec
            .wait_for_message_available(timeout, || serial.read())
            .await;
        if !got {
            return None;
        }
        let reply = self.codec.pop_message()?;
        (reply.is_command_message() && reply.recipient == Module::Mcm).then_some(reply)
    }

    async fn send_message_check_ok(&mut self, frame: Frame) -> bool {
        match self.send_message_get_response(frame).await {
            Some(reply) => is_ok_status(&reply.payload),
            None => false,
        }
    }

    async fn send_command_check_ok(&mut self, command: CommandId) -> bool {
        self.send_message_check_ok(Frame::command(Module::Mcm, vec![command.to_byte()]))
            .await
    }

    /// Sends a `Ping` and checks for an `Ok` response.
    pub async fn ping(&mut self) -> bool {
        self.send_command_check_ok(CommandId::Ping).await
    }

    /// Sends `StartJamming` and checks for an `Ok` response.
    pub async fn start_jamming(&mut self) -> bool {
        let ok = self.send_command_check_ok(CommandId::StartJamming).await;
        if ok {
            tracing::info!("started jamming");
        } else {
            tracing::warn!("start jamming failed");
        }
        ok
    }

    /// Sends `StopJamming` and checks for an `Ok` response.
    pub async fn stop_jamming(&mut self) -> bool {
        let ok = self.send_command_check_ok(CommandId::StopJamming).await;
        if ok {
            tracing::info!("stopped jamming");
        } else {
            tracing::warn!("stop jamming failed");
        }
        ok
    }

    /// Fetches the device's current state.
    pub async fn get_target_state(&mut self) -> TargetState {
        let Some(reply) = self
            .send_message_get_response(request::get_state())
            .await
        else {
            return TargetState::Unknown;
        };
        if !is_ok_status(&reply.payload) {
            return TargetState::Unknown;
        }
        match mcm_codec::response::GetStateResponse::decode(&reply.payload[1..]) {
            Ok(decoded) if decoded.response_id == CommandId::GetState => {
                TargetState::Known(decoded.state)
            }
            _ => TargetState::Unknown,
        }
    }

    /// Fetches the device's firmware version.
    pub async fn get_target_version(&mut self) -> Option<Version> {
        let reply = self
            .send_message_get_response(request::get_software_version_number())
            .await?;
        if !is_ok_status(&reply.payload) {
            return None;
        }
        let decoded =
            mcm_codec::response::GetSoftwareVersionNumberResponse::decode(&reply.payload[1..])
                .ok()?;
        if decoded.response_id != CommandId::GetSoftwareVersionNumber {
            return None;
        }
        let version = Version {
            major: decoded.major,
            minor: decoded.minor,
            build: decoded.build,
        };
        tracing::info!(
            major = version.major,
            minor = version.minor,
            build = version.build,
            "detected target version"
        );
        Some(version)
    }

    /// Fetches the version and checks it against [`MIN_TARGET_VERSION`].
    pub async fn check_target_version(&mut self) -> bool {
        self.get_target_version()
            .await
            .is_some_and(|version| version.meets_minimum(&MIN_TARGET_VERSION))
    }

    /// Fetches the name of the mission currently loaded on the device.
    pub async fn get_mission_name(&mut self) -> Option<String> {
        let reply = self
            .send_message_get_response(request::get_mission_name())
            .await?;
        if !is_ok_status(&reply.payload) {
            return None;
        }
        let decoded =
            mcm_codec::response::GetMissionNameResponse::decode(&reply.payload[1..]).ok()?;
        (decoded.response_id == CommandId::GetMissionName).then_some(decoded.name)
    }

    async fn is_install_complete(&mut self) -> (bool, u8) {
        let Some(reply) = self
            .send_message_get_response(request::get_mission_file_install_progress())
            .await
        else {
            return (false, 0);
        };
        let status = reply.payload.first().copied().map(CommandId::from_byte);
        let percent = mcm_codec::response::GetMissionFileInstallProgressResponse::decode(
            &reply.payload[1..],
        )
        .map(|decoded| decoded.percent)
        .unwrap_or(0);
        // The device signals "installation complete" with a NotOk status on
        // this particular query; an Ok status means installation is still
        // in progress.
        (status == Some(CommandId::NotOk), percent)
    }

    /// Bounded wait for the device to become ready to accept a new mission.
    pub async fn wait_ready_for_mission(&mut self) -> bool {
        let deadline = Instant::now() + WAIT_READY;
        loop {
            if !self.serial.is_good() {
                return false;
            }
            if Instant::now() >= deadline {
                tracing::warn!("timed out waiting for system ready for new mission");
                return false;
            }

            if self.ping().await {
                tracing::info!("ping OK");
                if self.check_target_version().await {
                    tracing::info!("target version OK");
                    let state = self.get_target_state().await;
                    tracing::info!(?state, "target state");

                    if state.is_ready_for_new_mission() && !state.is_operational() {
                        self.state = ControllerState::ReadyForMission;
                        tracing::info!("target system ready for new mission");
                        return true;
                    } else if matches!(state, TargetState::Unknown) {
                        self.state = ControllerState::NoResponse;
                        tracing::warn!("get target state failed");
                    } else if state.is_startup() {
                        self.state = ControllerState::NotReadyForMission;
                        tracing::warn!("target system starting-up");
                    } else {
                        self.state = ControllerState::NotReadyForMission;
                        tracing::warn!("target system not ready for new mission");
                    }
                } else {
                    self.state = ControllerState::NoResponse;
                    tracing::warn!("target version fail");
                }
            } else {
                self.state = ControllerState::NoResponse;
                tracing::warn!("ping fail");
                tokio::time::sleep(TIME_BETWEEN_PINGS).await;
            }
        }
    }

    /// Bounded poll for mission installation to finish.
    pub async fn wait_mission_install(&mut self) -> bool {
        let deadline = Instant::now() + WAIT_INSTALL;
        let mut percent_prev = 255u8;
        loop {
            let (done, percent) = self.is_install_complete().await;
            if done {
                tracing::info!("installation completed");
                tracing::info!("mission installed");
                return true;
            }
            if percent != percent_prev {
                tracing::info!(percent, "installation progress");
                percent_prev = percent;
            }
            if Instant::now() >= deadline {
                tracing::warn!("timed out waiting for mission installation");
                return false;
            }
        }
    }

    /// Uploads the mission file at `path`: wait-ready, announce the upload
    /// size, stream the file in sequenced data chunks, verify its CRC-16,
    /// then wait for installation to complete.
    pub async fn send_mission(&mut self, path: &str) -> bool {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                tracing::warn!(path, "empty mission file");
                return false;
            }
            Err(err) => {
                tracing::error!(path, %err, "failed to open mission file");
                return false;
            }
        };
        let crc = crc16_of_slice(&bytes);

        if !self.wait_ready_for_mission().await {
            return false;
        }

        tracing::info!(size = bytes.len(), crc, "uploading mission");
        if !self
            .send_message_check_ok(request::upload_mission_command(bytes.len() as u32))
            .await
        {
            tracing::warn!("upload mission command failed");
            return false;
        }

        let mut offset = 0usize;
        let mut seq = 0u16;
        let mut total_sent = 0usize;
        while offset < bytes.len() {
            let (frame, taken) = request::data_chunk(seq, &bytes[offset..]);
            if !self.send_message_check_ok(frame).await {
                tracing::error!("data send failed");
                return false;
            }
            offset += taken;
            total_sent += taken;
            seq += 1;
            tracing::info!(sent = taken, total_sent, size = bytes.len(), "sent mission data");
        }

        tokio::time::sleep(INTER_PACKET_DELAY).await;
        let previous_timeout = self.reply_timeout;
        self.reply_timeout = REPLY_TIMEOUT_CRC;
        let crc_ok = self
            .send_message_check_ok(request::verify_mission_file_crc(crc))
            .await;
        self.reply_timeout = previous_timeout;

        if !crc_ok {
            tracing::warn!("CRC check failed");
            return false;
        }

        self.wait_mission_install().await
    }

    /// Runs one iteration of the inner command/state loop: ping, read the
    /// latched mode, reload and start or stop jamming as needed.
    pub async fn tick(&mut self, arbiter: &ModeArbiter) {
        if !self.ping().await {
            tracing::warn!("jammer ping failed");
            return;
        }

        let mode = arbiter.mode();
        if mode > 0 {
            let state = self.get_target_state().await;

            let mut reload_mission = true;
            if !state.is_zeroized() {
                let wanted = mode_arbiter::mission_name(mode);
                match self.get_mission_name().await {
                    Some(loaded) => reload_mission = wanted != loaded,
                    None => tracing::warn!("failed to retrieve mission name from jammer"),
                }
            }

            if reload_mission {
                self.stop_jamming().await;
                self.wait_ready_for_mission().await;
                let path = mode_arbiter::mission_path(mode);
                tracing::info!(path, "sending mission");
                self.send_mission(&path).await;
            }

            if !state.is_jamming_or_requested() {
                self.start_jamming().await;
            }
        } else {
            let state = self.get_target_state().await;
            if state.is_jamming() {
                self.stop_jamming().await;
            }
        }
    }
}

fn is_ok_status(payload: &[u8]) -> bool {
    payload.first().copied().map(CommandId::from_byte) == Some(CommandId::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_io::memory::MemorySerialAdapter;

    fn reply_with_status(status: CommandId) -> Vec<u8> {
        Frame::command(Module::Mcm, vec![status.to_byte()]).encode()
    }

    #[tokio::test]
    async fn ping_reads_queued_ok_reply() {
        let mut adapter = MemorySerialAdapter::new();
        adapter.push_inbound(&reply_with_status(CommandId::Ok));
        let mut controller = Controller::new(adapter);
        assert!(controller.ping().await);
    }

    #[tokio::test]
    async fn ping_fails_on_not_ok_reply() {
        let mut adapter = MemorySerialAdapter::new();
        adapter.push_inbound(&reply_with_status(CommandId::NotOk));
        let mut controller = Controller::new(adapter);
        assert!(!controller.ping().await);
    }

    #[tokio::test]
    async fn ping_times_out_with_no_reply() {
        let adapter = MemorySerialAdapter::new();
        let mut controller = Controller::new(adapter);
        controller.reply_timeout = Duration::from_millis(30);
        assert!(!controller.ping().await);
    }

    #[tokio::test]
    async fn get_target_state_decodes_known_state() {
        let mut adapter = MemorySerialAdapter::new();
        let mut payload = vec![CommandId::Ok.to_byte(), CommandId::GetState.to_byte()];
        payload.push(0x02); // ready for new mission
        adapter.push_inbound(&Frame::command(Module::Mcm, payload).encode());
        let mut controller = Controller::new(adapter);
        let state = controller.get_target_state().await;
        assert!(state.is_ready_for_new_mission());
    }
}
