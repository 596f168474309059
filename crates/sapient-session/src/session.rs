use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;

use mode_arbiter::ModeArbiter;
use sapient_xml::{decode_inbound, InboundMessage, SensorRegistration, StatusReport};

/// The sensor ID this mediator registers with, regardless of what the
/// server's acknowledgement reports back (see [`run_connected`]).
const SENSOR_ID: i32 = 6;
const HEARTBEAT: Duration = Duration::from_millis(10_000);
const REG_ACK_WAIT: Duration = Duration::from_millis(30_000);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const RECONNECT_BACKOFF_SECS: u32 = 10;
const MESSAGE_BUFFER_CAP: usize = 64 * 1024;

/// Connection parameters for the upstream SAPIENT session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Server IPv4 address, dotted-decimal.
    pub server_ip: String,
    /// Server TCP port.
    pub server_port: u16,
    /// When set, messages are terminated with `'@'` instead of `0x00` —
    /// useful when driving the session from a terminal.
    pub debug_terminator: bool,
}

impl SessionConfig {
    fn terminator(&self) -> u8 {
        if self.debug_terminator {
            b'@'
        } else {
            0
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RegistrationState {
    Connected,
    Registered,
}

/// Connects to the server and drives registration, heartbeat, and task
/// intake for as long as the connection stays up, reconnecting with a
/// fixed backoff on any failure. Never returns.
pub async fn run(config: SessionConfig, arbiter: Arc<ModeArbiter>) -> ! {
    loop {
        match connect(&config).await {
            Ok(stream) => {
                run_connected(stream, &config, &arbiter).await;
            }
            Err(err) => {
                tracing::error!(%err, "connection to SDA failed");
            }
        }

        for remaining in (1..=RECONNECT_BACKOFF_SECS).rev() {
            tracing::warn!(
                "SDA not available, retrying in {remaining} second{}...",
                if remaining > 1 { "s" } else { "" }
            );
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

async fn connect(config: &SessionConfig) -> std::io::Result<TcpStream> {
    tracing::info!(ip = %config.server_ip, port = config.server_port, "connecting to SDA");
    let addr = (config.server_ip.as_str(), config.server_port);
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timeout"))??;
    tracing::info!("connected to SDA");
    Ok(stream)
}

async fn run_connected(mut stream: TcpStream, config: &SessionConfig, arbiter: &ModeArbiter) {
    let mut state = RegistrationState::Connected;
    let mut report_id = 0i32;
    let mut message_buf = Vec::with_capacity(4096);
    let mut read_buf = [0u8; 4096];

    let registration = SensorRegistration {
        sensor_id: SENSOR_ID,
        sensor_id_set: true,
        ..Default::default()
    };
    let registration_xml = match registration.encode() {
        Ok(xml) => xml,
        Err(err) => {
            tracing::error!(%err, "failed to encode registration message");
            return;
        }
    };
    if write_message(&mut stream, &registration_xml).await.is_err() {
        return;
    }

    let reg_deadline = Instant::now() + REG_ACK_WAIT;
    let mut next_heartbeat = Instant::now() + HEARTBEAT;

    loop {
        tokio::select! {
            () = tokio::time::sleep_until(next_heartbeat), if state == RegistrationState::Registered => {
                tracing::info!("sending heartbeat");
                let heartbeat = StatusReport {
                    sensor_id: SENSOR_ID,
                    report_id,
                    ..Default::default()
                };
                report_id += 1;
                match heartbeat.encode() {
                    Ok(xml) if write_message(&mut stream, &xml).await.is_ok() => {}
                    _ => return,
                }
                next_heartbeat = Instant::now() + HEARTBEAT;
            }
            () = tokio::time::sleep_until(reg_deadline), if state == RegistrationState::Connected => {
                tracing::warn!("timed out waiting for registration acknowledgement");
                return;
            }
            result = stream.read(&mut read_buf) => {
                match result {
                    Ok(0) => {
                        tracing::warn!("connection closed by peer");
                        return;
                    }
                    Ok(n) => {
                        ingest(
                            &read_buf[..n],
                            &mut message_buf,
                            config.terminator(),
                            &mut state,
                            arbiter,
                        );
                    }
                    Err(err) => {
                        tracing::warn!(%err, "socket read failed");
                        return;
                    }
                }
            }
        }
    }
}

/// Feeds newly read bytes through the terminator-delimited message buffer,
/// dispatching each complete message.
fn ingest(
    bytes: &[u8],
    message_buf: &mut Vec<u8>,
    terminator: u8,
    state: &mut RegistrationState,
    arbiter: &ModeArbiter,
) {
    for &byte in bytes {
        if byte == terminator {
            let text = String::from_utf8_lossy(message_buf);
            handle_message(&text, state, arbiter);
            message_buf.clear();
        } else {
            message_buf.push(byte);
            if message_buf.len() > MESSAGE_BUFFER_CAP {
                tracing::error!("message exceeded buffer capacity, discarding");
                message_buf.clear();
            }
        }
    }
}

fn handle_message(text: &str, state: &mut RegistrationState, arbiter: &ModeArbiter) {
    tracing::info!("message received");
    let decoded = match decode_inbound(text) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(%err, "failed to decode inbound message");
            return;
        }
    };

    match decoded {
        Some(InboundMessage::RegistrationAck(ack)) => {
            tracing::info!(sensor_id = ack.sensor_id, "registration acknowledged");
            // The server-assigned sensor ID is logged but never adopted:
            // this session always continues to identify itself as SENSOR_ID.
            tracing::info!(sensor_id = SENSOR_ID, "using sensor ID");
            *state = RegistrationState::Registered;
        }
        Some(InboundMessage::Task(task)) if *state == RegistrationState::Registered => {
            if task.sensor_id == SENSOR_ID {
                tracing::info!(mode = task.mode, "sensor task message received");
                arbiter.set_mode(u32::try_from(task.mode).unwrap_or(0));
            } else {
                tracing::warn!(
                    task_sensor_id = task.sensor_id,
                    our_sensor_id = SENSOR_ID,
                    "received task with wrong sensor ID"
                );
            }
        }
        Some(InboundMessage::Task(_)) => {
            // Tasks are only honoured once registered.
        }
        None => {}
    }
}

async fn write_message(stream: &mut TcpStream, xml: &str) -> std::io::Result<()> {
    let mut bytes = xml.as_bytes().to_vec();
    bytes.push(0);
    stream.write_all(&bytes).await
}
