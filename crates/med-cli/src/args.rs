use clap::Parser;

/// Default SDA TCP port when none is given on the command line.
pub const DEFAULT_PORT: u16 = 14006;
/// Default MCM serial device node when none is given on the command line.
pub const DEFAULT_SERIAL_DEV: &str = "/dev/ttyUSB0";

/// Command-line arguments for the mediator process.
#[derive(Parser, Debug)]
#[command(name = "sapient-mediator", about = "SAPIENT/Mercury protocol mediator")]
pub struct Args {
    /// SDA (Sensor Data Aggregator) IPv4 address.
    pub server_ip: String,

    /// SDA TCP port.
    #[arg(default_value_t = DEFAULT_PORT)]
    pub server_port: u16,

    /// Serial device node for the MCM link.
    #[arg(default_value = DEFAULT_SERIAL_DEV)]
    pub serial_dev: String,

    /// Use `'@'` as the upstream message terminator instead of `0x00`.
    #[arg(short = 'd')]
    pub debug_terminator: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_ip_is_given() {
        let args = Args::parse_from(["sapient-mediator", "10.0.0.5"]);
        assert_eq!(args.server_port, DEFAULT_PORT);
        assert_eq!(args.serial_dev, DEFAULT_SERIAL_DEV);
        assert!(!args.debug_terminator);
    }

    #[test]
    fn all_positionals_and_debug_flag_are_parsed() {
        let args = Args::parse_from(["sapient-mediator", "10.0.0.5", "9000", "/dev/ttyS1", "-d"]);
        assert_eq!(args.server_ip, "10.0.0.5");
        assert_eq!(args.server_port, 9000);
        assert_eq!(args.serial_dev, "/dev/ttyS1");
        assert!(args.debug_terminator);
    }
}
