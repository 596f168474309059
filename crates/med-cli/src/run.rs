use std::process::ExitCode;
use std::sync::Arc;

use mode_arbiter::ModeArbiter;
use sapient_session::SessionConfig;
use serial_io::LinuxSerialAdapter;

use crate::args::Args;

/// Initialises logging, wires the shared mode cell into both sessions, and
/// runs them to completion (in practice, forever).
pub async fn run(args: Args) -> ExitCode {
    med_logging::init();

    if !mode_arbiter::check_mission_files_exist() {
        tracing::warn!("one or more mission files are missing; jamming for those modes will fail");
    }

    let arbiter = Arc::new(ModeArbiter::new());

    let serial = LinuxSerialAdapter::new(args.serial_dev.clone());
    let downstream = mercury::run(serial, Arc::clone(&arbiter));

    let session_config = SessionConfig {
        server_ip: args.server_ip.clone(),
        server_port: args.server_port,
        debug_terminator: args.debug_terminator,
    };
    let upstream = sapient_session::run(session_config, arbiter);

    tokio::join!(downstream, upstream);
    ExitCode::SUCCESS
}
