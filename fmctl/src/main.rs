//! fmctl: command-line control for FM radio backends.
//!
//! Each subcommand runs one FM operation through the dispatcher and prints
//! the backend's result. The hardware mode is resolved once at startup.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

use fmradio::types::{in_band, rds_text, station_to_mhz};
use fmradio::{
    global, Antenna, AntennaSwitch, BackendRegistry, DeviceType, FmDispatcher, FmError,
    HardwareMode, NativeConfig, RdsEvents, RdsSupport, Spacing,
};

mod config;
mod logging;

use config::{ConfigFile, Overrides};

/// fmctl - control an FM radio through its vendor backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (default: ./fmctl.toml if present)
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Property file providing ro.fm.* properties
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Hardware mode: name (jni, hisi) or code
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<HardwareMode>,

    /// Native FM driver library
    #[arg(short, long)]
    library: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory where log files are stored (console only if unset)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Number of days to keep log files
    #[arg(long)]
    log_retention_days: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Open the FM device
    Open,
    /// Close the FM device
    Close,
    /// Power up on a frequency (MHz)
    PowerUp { frequency: f32 },
    /// Power down
    PowerDown {
        /// Power down the transmitter instead of the receiver
        #[arg(long)]
        transmitter: bool,
    },
    /// Tune to a frequency (MHz)
    Tune { frequency: f32 },
    /// Seek the next station from a frequency (MHz)
    Seek {
        frequency: f32,
        /// Seek downwards
        #[arg(long)]
        down: bool,
    },
    /// Scan the whole band
    Scan {
        /// Station codes use 50 kHz spacing
        #[arg(long)]
        spacing_50khz: bool,
    },
    /// Stop a running scan or seek
    StopScan,
    /// Enable or disable RDS
    Rds { state: Switch },
    /// Read pending RDS events
    ReadRds,
    /// Print the program service name
    Ps,
    /// Print the last radio text
    RadioText,
    /// Activate alternative frequency
    Af,
    /// Mute or unmute audio
    Mute { state: Switch },
    /// Query RDS support
    RdsSupport,
    /// Switch antenna
    Antenna { antenna: AntennaArg },
    /// Print the selected hardware mode and backend
    Mode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AntennaArg {
    /// Wired headset antenna
    Long,
    /// Built-in antenna
    Short,
}

impl From<AntennaArg> for Antenna {
    fn from(value: AntennaArg) -> Self {
        match value {
            AntennaArg::Long => Antenna::Long,
            AntennaArg::Short => Antenna::Short,
        }
    }
}

fn parse_mode(s: &str) -> Result<HardwareMode, String> {
    s.parse().map_err(|e: fmradio::FmError| e.to_string())
}

/// Printable result of one command and whether the backend reported success.
struct Outcome {
    text: String,
    ok: bool,
}

impl Outcome {
    fn status(name: &str, ok: bool) -> Self {
        Self {
            text: format!("{}: {}", name, if ok { "ok" } else { "failed" }),
            ok,
        }
    }

    fn info(text: String) -> Self {
        Self { text, ok: true }
    }
}

fn warn_if_out_of_band(frequency: f32) {
    if !in_band(frequency) {
        warn!("{:.2} MHz is outside the FM broadcast band", frequency);
    }
}

fn run_command(fm: &FmDispatcher, command: &Command) -> Outcome {
    match command {
        Command::Open => Outcome::status("open", fm.open_dev()),
        Command::Close => Outcome::status("close", fm.close_dev()),
        Command::PowerUp { frequency } => {
            warn_if_out_of_band(*frequency);
            Outcome::status("power up", fm.power_up(*frequency))
        }
        Command::PowerDown { transmitter } => {
            let device = if *transmitter {
                DeviceType::Transmitter
            } else {
                DeviceType::Radio
            };
            Outcome::status("power down", fm.power_down(device.into()))
        }
        Command::Tune { frequency } => {
            warn_if_out_of_band(*frequency);
            Outcome::status("tune", fm.tune(*frequency))
        }
        Command::Seek { frequency, down } => {
            warn_if_out_of_band(*frequency);
            let found = fm.seek(*frequency, !*down);
            Outcome::info(format!("{:.2}", found))
        }
        Command::Scan { spacing_50khz } => match fm.auto_scan() {
            Some(stations) => {
                let spacing = if *spacing_50khz {
                    Spacing::Khz50
                } else {
                    Spacing::Khz100
                };
                let lines: Vec<String> = stations
                    .iter()
                    .map(|&s| format!("{:.2}", station_to_mhz(s, spacing)))
                    .collect();
                Outcome::info(format!(
                    "{} station(s) found\n{}",
                    stations.len(),
                    lines.join("\n")
                ))
            }
            None => Outcome::status("scan", false),
        },
        Command::StopScan => Outcome::status("stop scan", fm.stop_scan()),
        Command::Rds { state } => {
            Outcome::info(format!("set rds: status {}", fm.set_rds(state.is_on())))
        }
        Command::ReadRds => {
            let raw = fm.read_rds();
            let events = RdsEvents::from(raw);
            Outcome::info(format!(
                "events 0x{:04X} (ps={}, rt={}, af={})",
                events.0,
                events.has_program_name(),
                events.has_radio_text(),
                events.has_af()
            ))
        }
        Command::Ps => match fm.get_ps() {
            Some(bytes) => Outcome::info(rds_text(&bytes)),
            None => Outcome::status("ps", false),
        },
        Command::RadioText => match fm.get_lr_text() {
            Some(bytes) => Outcome::info(rds_text(&bytes)),
            None => Outcome::status("radio text", false),
        },
        Command::Af => Outcome::info(format!("af: {}", fm.active_af())),
        Command::Mute { state } => {
            Outcome::info(format!("set mute: status {}", fm.set_mute(state.is_on())))
        }
        Command::RdsSupport => {
            let code = fm.is_rds_support();
            let support = RdsSupport::from(code);
            Outcome {
                text: format!("rds support: {:?} ({})", support, code),
                ok: support != RdsSupport::Error,
            }
        }
        Command::Antenna { antenna } => {
            let code = fm.switch_antenna(Antenna::from(*antenna).into());
            let result = AntennaSwitch::from(code);
            Outcome {
                text: format!("switch antenna: {:?} ({})", result, code),
                ok: result == AntennaSwitch::Success,
            }
        }
        Command::Mode => Outcome::info(format!(
            "mode {} ({}), backend {}",
            fm.mode(),
            fm.mode().code(),
            fm.backend_name()
        )),
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load config file: explicit path > auto-detect > default
    let file_config = match config::find_config(args.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config file {}: {}", path.display(), e);
                return Err(e);
            }
        },
        None => ConfigFile::default(),
    };

    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| file_config.logging.log_dir.clone());
    let retention_days = args
        .log_retention_days
        .or(file_config.logging.retention_days)
        .unwrap_or(7);
    logging::init_logging(
        log_dir.as_deref(),
        retention_days,
        args.verbose,
        file_config.logging.level.as_deref(),
    )?;

    let overrides = Overrides {
        properties: args.properties.clone(),
        mode: args.mode,
        library: args.library.clone(),
    };

    let props = match config::resolve_properties(&overrides, &file_config) {
        Ok(props) => props,
        Err(e) => {
            error!("Failed to resolve FM properties: {}", e);
            return Err(e.into());
        }
    };

    let registry = BackendRegistry::with_defaults(NativeConfig::from_properties(&props));
    let fm = match global::get_or_init(|| FmDispatcher::from_properties(&props, &registry)) {
        Ok(fm) => fm,
        Err(e) => {
            error!("Failed to initialize FM backend: {}", e);
            if let Some(hint) = mode_hint(&e, &registry) {
                error!("{}", hint);
            }
            return Err(e.into());
        }
    };

    info!("Running {:?} on {} backend", args.command, fm.backend_name());
    let outcome = run_command(fm, &args.command);
    println!("{}", outcome.text);

    Ok(if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Lists the modes that can be served when the configured one cannot.
fn mode_hint(e: &FmError, registry: &BackendRegistry) -> Option<String> {
    if !e.is_mode_error() {
        return None;
    }
    let modes: Vec<String> = registry
        .modes()
        .into_iter()
        .map(|mode| format!("{} ({})", mode, mode.code()))
        .collect();
    if modes.is_empty() {
        Some("No FM backends are registered".to_string())
    } else {
        Some(format!("Available hardware modes: {}", modes.join(", ")))
    }
}
