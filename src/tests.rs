// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

mod eio_io;
mod sessions;

use std::collections::BTreeMap;
use std::path::Path;

use crate::Controller;
use crate::adapter::{CaptureConfig, CaptureData, ChannelConfig, ExternalIo, Instrument, Transport};
use crate::topology::{
    ClockDomain, Direction, EioInstance, EioProbe, EioSignal, Instance, Probe, Session, Signal,
    SignalKind,
};

/// No debug core answers at the given base address
#[derive(Clone, Debug, PartialEq, Eq)]
struct NoCore(u32);

impl std::error::Error for NoCore {}

impl std::fmt::Display for NoCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no core at {:#010x}", self.0)
    }
}

/// Fake register state of one instrument core
#[derive(Clone, Debug)]
struct FakeInstrument {
    kind: String,
    version: u32,
    id: u32,
    memory_depth: u32,
    probe_count: u32,
    channel_count: u32,
    max_compare_width: u32,
    status: u32,
    config: CaptureConfig,
    channels: BTreeMap<u32, ChannelConfig>,
    started: bool,
    data: CaptureData,
}

/// Fake register state of one external-IO core
#[derive(Clone, Debug, Default)]
struct FakeEio {
    kind: String,
    outputs: Vec<u32>,
    inputs: Vec<u32>,
    /// Output bits that ignore writes, for write-confirm tests
    stuck: Vec<u32>,
    last_input_read: Option<u32>,
}

/// In-memory bench standing in for the register transport
#[derive(Clone, Debug, Default)]
struct Bench {
    instruments: BTreeMap<u32, FakeInstrument>,
    eios: BTreeMap<u32, FakeEio>,
}

impl Bench {
    fn instrument(&mut self, base: u32) -> Result<&mut FakeInstrument, NoCore> {
        self.instruments.get_mut(&base).ok_or(NoCore(base))
    }

    fn eio(&mut self, base: u32) -> Result<&mut FakeEio, NoCore> {
        self.eios.get_mut(&base).ok_or(NoCore(base))
    }
}

impl Transport for Bench {
    type Error = NoCore;
}

impl Instrument for Bench {
    fn kind(&mut self, base: u32) -> Result<String, NoCore> {
        self.instrument(base).map(|i| i.kind.clone())
    }

    fn version(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.version)
    }

    fn id(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.id)
    }

    fn memory_depth(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.memory_depth)
    }

    fn probe_count(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.probe_count)
    }

    fn channel_count(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.channel_count)
    }

    fn max_compare_width(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.max_compare_width)
    }

    fn status(&mut self, base: u32) -> Result<u32, NoCore> {
        self.instrument(base).map(|i| i.status)
    }

    fn config(&mut self, base: u32) -> Result<CaptureConfig, NoCore> {
        self.instrument(base).map(|i| i.config)
    }

    fn channel_config(&mut self, base: u32, channel: u32) -> Result<ChannelConfig, NoCore> {
        self.instrument(base)
            .map(|i| i.channels.get(&channel).copied().unwrap_or_default())
    }

    fn configure(&mut self, base: u32, config: &CaptureConfig) -> Result<(), NoCore> {
        self.instrument(base)?.config = *config;
        Ok(())
    }

    fn configure_channel(
        &mut self,
        base: u32,
        channel: u32,
        config: &ChannelConfig,
    ) -> Result<(), NoCore> {
        self.instrument(base)?.channels.insert(channel, *config);
        Ok(())
    }

    fn start(&mut self, base: u32) -> Result<(), NoCore> {
        self.instrument(base)?.started = true;
        Ok(())
    }

    fn data(&mut self, base: u32) -> Result<CaptureData, NoCore> {
        self.instrument(base).map(|i| i.data.clone())
    }
}

impl ExternalIo for Bench {
    fn kind(&mut self, base: u32) -> Result<String, NoCore> {
        self.eio(base).map(|e| e.kind.clone())
    }

    fn read_outputs(&mut self, base: u32, words: u32) -> Result<Vec<u32>, NoCore> {
        let eio = self.eio(base)?;
        let mut out = eio.outputs.clone();
        out.resize(words as usize, 0);
        Ok(out)
    }

    fn write_outputs(&mut self, base: u32, words: &[u32]) -> Result<(), NoCore> {
        let eio = self.eio(base)?;
        eio.outputs.resize(eio.outputs.len().max(words.len()), 0);
        for (i, word) in words.iter().enumerate() {
            let stuck = eio.stuck.get(i).copied().unwrap_or(0);
            eio.outputs[i] = (word & !stuck) | (eio.outputs[i] & stuck);
        }
        Ok(())
    }

    fn read_inputs(&mut self, base: u32, words: u32) -> Result<Vec<u32>, NoCore> {
        let eio = self.eio(base)?;
        eio.last_input_read = Some(words);
        let mut input = eio.inputs.clone();
        input.resize(words as usize, 0);
        Ok(input)
    }
}

fn signal(index: u32, name: &str, bitpos: u32, bitwidth: u32) -> Signal {
    Signal {
        index,
        name: name.into(),
        bitpos,
        bitwidth,
        kind: SignalKind::Normal,
    }
}

fn constant(index: u32, name: &str, bitpos: u32, bitwidth: u32) -> Signal {
    Signal {
        kind: SignalKind::Constant,
        ..signal(index, name, bitpos, bitwidth)
    }
}

fn eio_signal(index: u32, name: &str, bitpos: u32, bitwidth: u32) -> EioSignal {
    EioSignal {
        index,
        name: name.into(),
        bitpos,
        bitwidth,
    }
}

fn instance(index: u32, base_addr: u32) -> Instance {
    Instance {
        index,
        base_addr,
        kind: "OCLA".into(),
        version: 0x0001_0002,
        id: 0x4f43_4c41,
        memory_depth: 32,
        probe_count: 1,
    }
}

fn eio_instance() -> EioInstance {
    EioInstance {
        index: 1,
        base_addr: 0x2000,
        probes: vec![
            EioProbe {
                index: 1,
                direction: Direction::Output,
                signals: vec![eio_signal(0, "led", 0, 4), eio_signal(1, "ctrl", 4, 40)],
            },
            EioProbe {
                index: 1,
                direction: Direction::Input,
                signals: vec![eio_signal(0, "buttons", 0, 4), eio_signal(1, "sensor", 4, 33)],
            },
        ],
    }
}

/// A session with one domain, one instrument instance and an EIO core
///
/// Probe 1 samples `data[7:0]`, `valid`, `state[2:0]`, `flags[3:0]` and the
/// constant `gnd`.
fn session() -> Session {
    Session {
        path: Default::default(),
        domains: vec![ClockDomain {
            index: 1,
            instances: vec![instance(0, 0x1000)],
            probes: vec![Probe {
                index: 1,
                instance_index: 0,
                signals: vec![
                    signal(0, "data", 0, 8),
                    signal(1, "valid", 8, 1),
                    signal(2, "state", 9, 3),
                    signal(3, "flags", 12, 4),
                    constant(4, "gnd", 16, 1),
                ],
            }],
            config: Default::default(),
            triggers: Vec::new(),
        }],
        instances: vec![instance(0, 0x1000)],
        eio_instances: vec![eio_instance()],
    }
}

/// A session with two daisy-chained instances in one domain
///
/// Probe 1 samples instance 0, probe 2 samples instance 1.
fn chained_session() -> Session {
    Session {
        path: Default::default(),
        domains: vec![ClockDomain {
            index: 1,
            instances: vec![instance(0, 0x1000), instance(1, 0x1100)],
            probes: vec![
                Probe {
                    index: 1,
                    instance_index: 0,
                    signals: vec![signal(0, "data", 0, 8), signal(1, "valid", 8, 1)],
                },
                Probe {
                    index: 2,
                    instance_index: 1,
                    signals: vec![signal(0, "addr", 0, 16), signal(1, "wen", 16, 1)],
                },
            ],
            config: Default::default(),
            triggers: Vec::new(),
        }],
        instances: vec![instance(0, 0x1000), instance(1, 0x1100)],
        eio_instances: Vec::new(),
    }
}

/// Build a bench whose live state matches the session's recorded topology
fn bench_for(session: &Session) -> Bench {
    let mut bench = Bench::default();
    for instance in &session.instances {
        bench.instruments.insert(
            instance.base_addr,
            FakeInstrument {
                kind: instance.kind.clone(),
                version: instance.version,
                id: instance.id,
                memory_depth: instance.memory_depth,
                probe_count: instance.probe_count,
                channel_count: 4,
                max_compare_width: 16,
                status: 0,
                config: Default::default(),
                channels: Default::default(),
                started: false,
                data: Default::default(),
            },
        );
    }
    for eio in &session.eio_instances {
        let words = eio.probes.iter().map(EioProbe::word_count).max().unwrap_or(0) as usize;
        bench.eios.insert(
            eio.base_addr,
            FakeEio {
                kind: "EIO".into(),
                outputs: vec![0; words],
                inputs: vec![0; words],
                stuck: Vec::new(),
                last_input_read: None,
            },
        );
    }
    bench
}

/// A controller with the given session loaded and a matching bench behind it
fn loaded_with(session: Session) -> Controller<Bench> {
    let bench = bench_for(&session);
    let mut controller = Controller::new(bench);
    let loader = move |_: &Path| -> Result<Session, Vec<String>> { Ok(session.clone()) };
    controller
        .start_session(&loader, "Cargo.toml")
        .expect("could not load test session");
    controller
}

fn loaded() -> Controller<Bench> {
    loaded_with(session())
}
