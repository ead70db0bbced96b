// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

//! # Control plane for on-chip logic analyzer (OCLA) debug cores
//!
//! This crate drives the embedded logic-analyzer and external-IO debug cores
//! baked into an FPGA design: it loads the design's debug [topology], keeps
//! it [verified][verify] against the live hardware, manages capture
//! [triggers][trigger], arms captures and reassembles the sampled memory
//! into per-signal [waveforms][waveform]. Discrete IO bits are driven and
//! observed through the external-IO path in [eio].
//!
//! The crate is deliberately not concerned with how registers are reached:
//! all hardware access goes through the [adapter] contracts, keyed by the
//! base addresses recorded in the topology, and typically backed by a JTAG
//! register transport. Parsing the design file itself is likewise left to a
//! [`Loader`][session::Loader] implementation.
//!
//! # Example
//!
//! The following example drives a capture end to end against a bench
//! adapter: load a session, configure the clock domain, arm a trigger,
//! start, and read the waveform back.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use fpga_ocla::Controller;
//! use fpga_ocla::adapter::{
//!     CaptureConfig, CaptureData, ChannelConfig, ExternalIo, Instrument, Transport,
//! };
//! use fpga_ocla::topology::{ClockDomain, Instance, Probe, Session, Signal, SignalKind};
//! use fpga_ocla::types::{TriggerEvent, TriggerKind, TriggerMode};
//!
//! # #[derive(Default)]
//! # struct Bench {
//! #     channels: Vec<ChannelConfig>,
//! #     config: CaptureConfig,
//! #     started: bool,
//! # }
//! # impl Transport for Bench {
//! #     type Error = Infallible;
//! # }
//! # impl Instrument for Bench {
//! #     fn kind(&mut self, _: u32) -> Result<String, Infallible> {
//! #         Ok("OCLA".into())
//! #     }
//! #     fn version(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(0x0001_0000)
//! #     }
//! #     fn id(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(0x6f63_6c61)
//! #     }
//! #     fn memory_depth(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(4)
//! #     }
//! #     fn probe_count(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(1)
//! #     }
//! #     fn channel_count(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(4)
//! #     }
//! #     fn max_compare_width(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(32)
//! #     }
//! #     fn status(&mut self, _: u32) -> Result<u32, Infallible> {
//! #         Ok(self.started as u32)
//! #     }
//! #     fn config(&mut self, _: u32) -> Result<CaptureConfig, Infallible> {
//! #         Ok(self.config)
//! #     }
//! #     fn channel_config(&mut self, _: u32, ch: u32) -> Result<ChannelConfig, Infallible> {
//! #         Ok(self.channels[ch as usize])
//! #     }
//! #     fn configure(&mut self, _: u32, config: &CaptureConfig) -> Result<(), Infallible> {
//! #         self.config = *config;
//! #         Ok(())
//! #     }
//! #     fn configure_channel(
//! #         &mut self,
//! #         _: u32,
//! #         ch: u32,
//! #         config: &ChannelConfig,
//! #     ) -> Result<(), Infallible> {
//! #         let ch = ch as usize;
//! #         self.channels.resize(self.channels.len().max(ch + 1), Default::default());
//! #         self.channels[ch] = *config;
//! #         Ok(())
//! #     }
//! #     fn start(&mut self, _: u32) -> Result<(), Infallible> {
//! #         self.started = true;
//! #         Ok(())
//! #     }
//! #     fn data(&mut self, _: u32) -> Result<CaptureData, Infallible> {
//! #         Ok(CaptureData {
//! #             depth: 4,
//! #             words_per_line: 1,
//! #             values: vec![0x1e0, 0x1e1, 0x1e2, 0x1e3],
//! #         })
//! #     }
//! # }
//! # impl ExternalIo for Bench {
//! #     fn kind(&mut self, _: u32) -> Result<String, Infallible> {
//! #         Ok("EIO".into())
//! #     }
//! #     fn read_outputs(&mut self, _: u32, words: u32) -> Result<Vec<u32>, Infallible> {
//! #         Ok(vec![0; words as usize])
//! #     }
//! #     fn write_outputs(&mut self, _: u32, _: &[u32]) -> Result<(), Infallible> {
//! #         Ok(())
//! #     }
//! #     fn read_inputs(&mut self, _: u32, words: u32) -> Result<Vec<u32>, Infallible> {
//! #         Ok(vec![0; words as usize])
//! #     }
//! # }
//! #
//! # fn instance() -> Instance {
//! #     Instance {
//! #         index: 0,
//! #         base_addr: 0x1000,
//! #         kind: "OCLA".into(),
//! #         version: 0x0001_0000,
//! #         id: 0x6f63_6c61,
//! #         memory_depth: 4,
//! #         probe_count: 1,
//! #     }
//! # }
//! # fn topology() -> Session {
//! #     Session {
//! #         domains: vec![ClockDomain {
//! #             index: 1,
//! #             instances: vec![instance()],
//! #             probes: vec![Probe {
//! #                 index: 1,
//! #                 instance_index: 0,
//! #                 signals: vec![
//! #                     Signal {
//! #                         index: 0,
//! #                         name: "count".into(),
//! #                         bitpos: 0,
//! #                         bitwidth: 8,
//! #                         kind: SignalKind::Normal,
//! #                     },
//! #                     Signal {
//! #                         index: 1,
//! #                         name: "valid".into(),
//! #                         bitpos: 8,
//! #                         bitwidth: 1,
//! #                         kind: SignalKind::Normal,
//! #                     },
//! #                 ],
//! #             }],
//! #             ..Default::default()
//! #         }],
//! #         instances: vec![instance()],
//! #         ..Default::default()
//! #     }
//! # }
//! #
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = Controller::new(Bench::default());
//!
//! // The loader contract is usually backed by the design-file parser.
//! let loader = |_: &std::path::Path| -> Result<Session, Vec<String>> { Ok(topology()) };
//! # let design = std::env::temp_dir();
//! controller.start_session(&loader, design)?;
//!
//! // Capture the eight-bit `count` whenever `valid` rises.
//! controller.configure(1, CaptureConfig { mode: TriggerMode::Pre, ..Default::default() })?;
//! controller.add_trigger(1, 1, "valid", TriggerKind::Edge, TriggerEvent::Rising, 0, 0)?;
//! controller.start(1)?;
//!
//! // Polling cadence is the caller's business; the bench captures at once.
//! if controller.status(1)? != 0 {
//!     let waveform = controller.waveform(1)?;
//!     for probe in &waveform.probes {
//!         for signal in &probe.signals {
//!             println!("{}: {:x?}", signal.name, signal.values);
//!         }
//!     }
//! }
//! # controller.stop_session()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Serialization
//!
//! With the `serde` feature enabled, the topology, configuration and
//! waveform types derive `Serialize`/`Deserialize`, e.g. for tooling that
//! persists captures or describes topologies in configuration files.

pub mod adapter;
pub mod bits;
pub mod controller;
pub mod eio;
pub mod error;
pub mod selector;
pub mod session;
pub mod topology;
pub mod trigger;
pub mod types;
pub mod verify;
pub mod waveform;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use error::Error;
pub use selector::Selector;
