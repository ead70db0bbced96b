// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Register-level access to debug cores
//!
//! The control plane never touches registers itself. All hardware access goes
//! through the [`Instrument`] and [`ExternalIo`] adapter contracts, keyed by
//! the base address recorded in the topology. Implementations translate the
//! calls into whatever register encoding and transport (typically JTAG) the
//! platform provides.
//!
//! Both contracts share their transport error type through the [`Transport`]
//! base trait; adapter failures surface unchanged from every control-plane
//! operation as [`Error::Access`][crate::error::Error::Access]. Calls are
//! blocking and are neither retried nor timed out here.

use crate::types::{TriggerCondition, TriggerEvent, TriggerKind, TriggerMode};

/// Type tag reported by external-IO cores
pub const EIO_KIND: &str = "EIO";

/// Access to debug cores over a register transport
pub trait Transport {
    /// Error type returned by every register access
    type Error;
}

/// Adapter contract for one kind of logic-analyzer instrument
///
/// Every method addresses the register block of a single instrument instance
/// via its `base_addr`. Identity and capability reads back the values a
/// design records in its debug topology; the remaining methods program and
/// operate a capture.
pub trait Instrument: Transport {
    /// Read the instrument type string
    fn kind(&mut self, base_addr: u32) -> Result<String, Self::Error>;

    /// Read the instrument IP version
    fn version(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the instrument IP identifier
    fn id(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the sample memory depth
    fn memory_depth(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the number of probes wired into the instrument
    fn probe_count(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the number of trigger channels
    fn channel_count(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the widest value comparison the instrument supports, in bits
    fn max_compare_width(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read the raw capture status word
    fn status(&mut self, base_addr: u32) -> Result<u32, Self::Error>;

    /// Read back the operation mode configuration
    fn config(&mut self, base_addr: u32) -> Result<CaptureConfig, Self::Error>;

    /// Read back the configuration of one trigger channel
    fn channel_config(
        &mut self,
        base_addr: u32,
        channel: u32,
    ) -> Result<ChannelConfig, Self::Error>;

    /// Write the operation mode configuration
    fn configure(&mut self, base_addr: u32, config: &CaptureConfig) -> Result<(), Self::Error>;

    /// Write the configuration of one trigger channel
    fn configure_channel(
        &mut self,
        base_addr: u32,
        channel: u32,
        config: &ChannelConfig,
    ) -> Result<(), Self::Error>;

    /// Arm the instrument and start capturing
    fn start(&mut self, base_addr: u32) -> Result<(), Self::Error>;

    /// Retrieve the raw sample memory
    fn data(&mut self, base_addr: u32) -> Result<CaptureData, Self::Error>;
}

/// Adapter contract for external-IO cores
///
/// An external-IO core exposes discrete input and output bit registers,
/// accessed at 32-bit word granularity.
pub trait ExternalIo: Transport {
    /// Read the core type string
    ///
    /// A live external-IO core reports [`EIO_KIND`].
    fn kind(&mut self, base_addr: u32) -> Result<String, Self::Error>;

    /// Read back the first `words` words of the output register
    fn read_outputs(&mut self, base_addr: u32, words: u32) -> Result<Vec<u32>, Self::Error>;

    /// Write the output register
    fn write_outputs(&mut self, base_addr: u32, words: &[u32]) -> Result<(), Self::Error>;

    /// Read the first `words` words of the input register
    fn read_inputs(&mut self, base_addr: u32, words: u32) -> Result<Vec<u32>, Self::Error>;
}

/// Operation mode configuration of an instrument
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureConfig {
    /// Trigger placement within the capture window
    pub mode: TriggerMode,
    /// Boolean combination of armed trigger channels
    pub condition: TriggerCondition,
    /// Fixed number of samples to collect, or `0` to fill the sample memory
    pub sample_size: u32,
}

/// Configuration of a single trigger channel
///
/// The [`Default`] value is the cleared state the orchestrator programs into
/// every channel before assigning triggers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    /// Kind of condition the channel evaluates
    pub kind: TriggerKind,
    /// Event or comparison operator
    pub event: TriggerEvent,
    /// Comparison operand for value-compare triggers
    pub value: u32,
    /// Number of bits considered by a value comparison
    pub compare_width: u32,
    /// Absolute position of the watched bit within the instrument's probe
    /// bit space
    pub probe_bit: u32,
}

/// Raw sample memory of one instrument
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureData {
    /// Number of captured samples
    pub depth: u32,
    /// Number of 32-bit words per sample row
    pub words_per_line: u32,
    /// `depth * words_per_line` words of packed sample rows
    pub values: Vec<u32>,
}
