// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! End-to-end capture against a simulated bench board
//!
//!     Usage: capture [design-file] [-t SELECTOR] [--set NAME=VALUE]... [--get NAME]...
//!
//! This program loads a TOML-described debug topology (such as
//! `design.toml` in this directory), stands up an in-memory board whose
//! registers match it, and then drives a full capture: configure the clock
//! domain, arm a trigger, start, poll and print the reconstructed waveform.
//! EIO outputs may be driven with `--set` and inputs read with `--get`.
//!
//! The TOML loader doubles as the reference `Loader` implementation; on real
//! hardware only the `Board` would be replaced by a JTAG-backed adapter.
//!
//! Run with the environment variable `RUST_LOG=debug` to watch the
//! programming sequence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fpga_ocla::Controller;
use fpga_ocla::adapter::{
    CaptureConfig, CaptureData, ChannelConfig, ExternalIo, Instrument, Transport,
};
use fpga_ocla::topology::Session;
use fpga_ocla::types::{TriggerCondition, TriggerEvent, TriggerKind, TriggerMode};

/// Parse a design file into a session topology
///
/// The design flow emits the debug topology as TOML; the `instances` list is
/// denormalized from the per-domain lists after parsing.
fn load_design(path: &Path) -> Result<Session, Vec<String>> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| vec![format!("could not read '{}': {err}", path.display())])?;
    let mut session: Session =
        toml::from_str(&text).map_err(|err| vec![format!("{err}")])?;
    session.instances = session
        .domains
        .iter()
        .flat_map(|d| d.instances.clone())
        .collect();
    Ok(session)
}

/// Register file of one simulated instrument
struct Core {
    kind: String,
    version: u32,
    id: u32,
    memory_depth: u32,
    probe_count: u32,
    config: CaptureConfig,
    channels: Vec<ChannelConfig>,
    status: u32,
    data: CaptureData,
}

/// Register file of one simulated EIO core
struct IoCore {
    outputs: Vec<u32>,
    inputs: Vec<u32>,
}

/// A board with every debug core the design expects
struct Board {
    cores: HashMap<u32, Core>,
    io_cores: HashMap<u32, IoCore>,
}

impl Board {
    /// Stand up cores matching the recorded topology
    fn for_design(session: &Session) -> Self {
        let cores = session
            .instances
            .iter()
            .map(|instance| {
                let bits = session
                    .probes_of(instance.index)
                    .flat_map(|p| p.signals.iter())
                    .map(|s| s.bitpos + s.bitwidth)
                    .max()
                    .unwrap_or(1);
                let words = bits.div_ceil(32);

                // Sample rows carry a free-running counter in the low byte
                // and its lsb mirrored to bit 8.
                let depth = instance.memory_depth;
                let mut values = Vec::new();
                for row in 0..depth {
                    values.push((row & 0xff) | ((row & 1) << 8));
                    values.extend(std::iter::repeat_n(0, words as usize - 1));
                }

                let core = Core {
                    kind: instance.kind.clone(),
                    version: instance.version,
                    id: instance.id,
                    memory_depth: depth,
                    probe_count: instance.probe_count,
                    config: Default::default(),
                    channels: vec![Default::default(); 4],
                    status: 0,
                    data: CaptureData {
                        depth,
                        words_per_line: words,
                        values,
                    },
                };
                (instance.base_addr, core)
            })
            .collect();

        let io_cores = session
            .eio_instances
            .iter()
            .map(|eio| {
                let words = eio.probes.iter().map(|p| p.word_count()).max().unwrap_or(1);
                let io = IoCore {
                    outputs: vec![0; words as usize],
                    // Something for --get to find.
                    inputs: (0..words).map(|w| 0x5a5a_5a5a ^ w).collect(),
                };
                (eio.base_addr, io)
            })
            .collect();

        Board { cores, io_cores }
    }

    fn core(&mut self, base: u32) -> Result<&mut Core, BoardError> {
        self.cores.get_mut(&base).ok_or(BoardError(base))
    }

    fn io_core(&mut self, base: u32) -> Result<&mut IoCore, BoardError> {
        self.io_cores.get_mut(&base).ok_or(BoardError(base))
    }
}

/// No core mapped at the accessed base address
#[derive(Debug)]
struct BoardError(u32);

impl std::error::Error for BoardError {}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no core at {:#010x}", self.0)
    }
}

impl Transport for Board {
    type Error = BoardError;
}

impl Instrument for Board {
    fn kind(&mut self, base: u32) -> Result<String, BoardError> {
        self.core(base).map(|c| c.kind.clone())
    }

    fn version(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.version)
    }

    fn id(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.id)
    }

    fn memory_depth(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.memory_depth)
    }

    fn probe_count(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.probe_count)
    }

    fn channel_count(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.channels.len() as u32)
    }

    fn max_compare_width(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|_| 16)
    }

    fn status(&mut self, base: u32) -> Result<u32, BoardError> {
        self.core(base).map(|c| c.status)
    }

    fn config(&mut self, base: u32) -> Result<CaptureConfig, BoardError> {
        self.core(base).map(|c| c.config)
    }

    fn channel_config(&mut self, base: u32, channel: u32) -> Result<ChannelConfig, BoardError> {
        self.core(base)
            .map(|c| c.channels.get(channel as usize).copied().unwrap_or_default())
    }

    fn configure(&mut self, base: u32, config: &CaptureConfig) -> Result<(), BoardError> {
        self.core(base)?.config = *config;
        Ok(())
    }

    fn configure_channel(
        &mut self,
        base: u32,
        channel: u32,
        config: &ChannelConfig,
    ) -> Result<(), BoardError> {
        let core = self.core(base)?;
        if let Some(slot) = core.channels.get_mut(channel as usize) {
            *slot = *config;
        }
        Ok(())
    }

    fn start(&mut self, base: u32) -> Result<(), BoardError> {
        // The simulated capture completes instantly.
        self.core(base)?.status = 1;
        Ok(())
    }

    fn data(&mut self, base: u32) -> Result<CaptureData, BoardError> {
        self.core(base).map(|c| c.data.clone())
    }
}

impl ExternalIo for Board {
    fn kind(&mut self, base: u32) -> Result<String, BoardError> {
        self.io_core(base).map(|_| "EIO".into())
    }

    fn read_outputs(&mut self, base: u32, words: u32) -> Result<Vec<u32>, BoardError> {
        let mut out = self.io_core(base)?.outputs.clone();
        out.resize(words as usize, 0);
        Ok(out)
    }

    fn write_outputs(&mut self, base: u32, words: &[u32]) -> Result<(), BoardError> {
        self.io_core(base)?.outputs = words.to_vec();
        Ok(())
    }

    fn read_inputs(&mut self, base: u32, words: u32) -> Result<Vec<u32>, BoardError> {
        let mut input = self.io_core(base)?.inputs.clone();
        input.resize(words as usize, 0);
        Ok(input)
    }
}

fn main() {
    env_logger::init();

    let matches = clap::Command::new("OCLA bench capture")
        .arg(
            clap::arg!([design] "Path to the design topology file")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("demos/design.toml"),
        )
        .arg(clap::arg!(-d --domain <ID> "Clock domain to capture").value_parser(clap::value_parser!(u32)).default_value("1"))
        .arg(clap::arg!(-p --probe <ID> "Probe to trigger on").value_parser(clap::value_parser!(u32)).default_value("1"))
        .arg(clap::arg!(-t --trigger <SELECTOR> "Signal selector to trigger on").default_value("valid"))
        .arg(
            clap::arg!(-n --samples <NUM> "Fixed sample size, 0 fills the memory")
                .value_parser(clap::value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            clap::arg!(--set <ASSIGNMENT> "Drive an EIO output, e.g. led=0x5")
                .action(clap::ArgAction::Append),
        )
        .arg(clap::arg!(--get <SIGNAL> "Read an EIO input").action(clap::ArgAction::Append))
        .get_matches();

    let design = matches.get_one::<PathBuf>("design").expect("defaulted");
    let domain = *matches.get_one::<u32>("domain").expect("defaulted");
    let probe = *matches.get_one::<u32>("probe").expect("defaulted");
    let trigger = matches.get_one::<String>("trigger").expect("defaulted");
    let samples = *matches.get_one::<u32>("samples").expect("defaulted");

    // The board is built from the same topology the session records, so
    // verification passes like it would against a freshly configured FPGA.
    let topology = load_design(design).unwrap_or_else(|errors| {
        for error in errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    });
    let board = Board::for_design(&topology);

    let mut controller = Controller::new(board);
    controller
        .start_session(&load_design, design.clone())
        .expect("could not start the debug session");

    let session = controller.session().expect("session is active");
    println!("User design loaded: {}", session.path.display());
    for domain in &session.domains {
        println!("Clock domain {}:", domain.index);
        for probe in &domain.probes {
            println!("  Probe {}", probe.index);
            for signal in &probe.signals {
                println!(
                    "    #{:<3} {:<24} pos={:<4} width={}",
                    signal.index, signal.name, signal.bitpos, signal.bitwidth
                );
            }
        }
    }

    controller
        .configure(
            domain,
            CaptureConfig {
                mode: TriggerMode::Pre,
                condition: TriggerCondition::Default,
                sample_size: samples,
            },
        )
        .expect("could not configure the clock domain");
    controller
        .add_trigger(
            domain,
            probe,
            trigger,
            TriggerKind::Edge,
            TriggerEvent::Rising,
            0,
            0,
        )
        .expect("could not add the trigger");
    controller.start(domain).expect("could not start the capture");

    // A real capture is polled at the caller's cadence; the simulated one
    // completes on start.
    let status = controller.status(domain).expect("could not read the status");
    println!("\nCapture status: {status:#x}");

    let waveform = controller.waveform(domain).expect("could not read the waveform");
    for probe in &waveform.probes {
        println!("Probe {}", probe.index);
        for signal in &probe.signals {
            let rows: Vec<String> = signal
                .values
                .chunks(signal.words_per_line.max(1) as usize)
                .map(|row| {
                    row.iter()
                        .rev()
                        .map(|w| format!("{w:08x}"))
                        .collect::<Vec<_>>()
                        .join("_")
                })
                .collect();
            println!("  {:<24} {}", signal.name, rows.join(" "));
        }
    }

    if let Some(assignments) = matches.get_many::<String>("set") {
        let assignments: Vec<&String> = assignments.collect();
        controller
            .set_io(&assignments)
            .expect("could not drive the EIO outputs");
        println!("\nEIO outputs driven: {}", assignments.len());
    }

    if let Some(signals) = matches.get_many::<String>("get") {
        let signals: Vec<&String> = signals.collect();
        let values = controller
            .get_io(&signals)
            .expect("could not read the EIO inputs");
        println!();
        for value in values {
            let words: Vec<String> = value.value.iter().rev().map(|w| format!("{w:08x}")).collect();
            println!("EIO #{:<3} {:<24} {}", value.index, value.name, words.join("_"));
        }
    }
}
