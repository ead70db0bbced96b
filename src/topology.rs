// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! The debug topology baked into a design
//!
//! A [`Session`] is the in-memory model of everything debug-related a design
//! carries: clock domains grouping logic-analyzer [`Instance`]s and their
//! [`Probe`]s, plus external-IO cores with their own probe hierarchy. It is
//! built once by a [`Loader`][crate::session::Loader] and only read or
//! mutated through the [`Controller`][crate::controller::Controller]
//! afterwards.
//!
//! All entities carry a stable index which is the caller-facing id, not their
//! position in the owning sequence. Lookups resolve indices afresh on every
//! operation; no references into the model outlive one operation.

use std::fmt;
use std::path::PathBuf;

use crate::adapter::CaptureConfig;
use crate::selector;
use crate::trigger::Trigger;

/// A design's debug topology and its capture state
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Session {
    /// Path of the design file this topology was loaded from
    pub path: PathBuf,
    /// Clock domains, in design order
    pub domains: Vec<ClockDomain>,
    /// All logic-analyzer instances of the design, across domains
    pub instances: Vec<Instance>,
    /// External-IO cores of the design
    pub eio_instances: Vec<EioInstance>,
}

impl Session {
    /// Look up a clock domain by its index
    pub fn domain(&self, index: u32) -> Option<&ClockDomain> {
        self.domains.iter().find(|d| d.index == index)
    }

    /// Look up a clock domain by its index, mutably
    pub fn domain_mut(&mut self, index: u32) -> Option<&mut ClockDomain> {
        self.domains.iter_mut().find(|d| d.index == index)
    }

    /// Look up an external-IO core by its index
    pub fn eio_instance(&self, index: u32) -> Option<&EioInstance> {
        self.eio_instances.iter().find(|i| i.index == index)
    }

    /// Iterate over all probes wired into the given instance
    pub fn probes_of(&self, instance: u32) -> impl Iterator<Item = &Probe> {
        self.domains
            .iter()
            .flat_map(|d| d.probes.iter())
            .filter(move |p| p.instance_index == instance)
    }
}

/// A clock domain grouping instances and probes that sample together
///
/// Instances within one domain are daisy chained and share one memory depth;
/// the [verifier][crate::verify] checks the recorded depths for skew.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ClockDomain {
    /// Stable, caller-facing domain id
    pub index: u32,
    /// Instances clocked by this domain
    pub instances: Vec<Instance>,
    /// Probes sampled in this domain
    pub probes: Vec<Probe>,
    /// Current operation mode configuration
    pub config: CaptureConfig,
    /// Configured triggers, in configuration order
    ///
    /// The position in this sequence is the trigger id used for edit and
    /// remove, and determines channel assignment when the domain is
    /// programmed.
    pub triggers: Vec<Trigger>,
}

impl ClockDomain {
    /// Look up an instance by its index
    pub fn instance(&self, index: u32) -> Option<&Instance> {
        self.instances.iter().find(|i| i.index == index)
    }

    /// Retrieve the lead instance
    ///
    /// The first instance in design order is the single point of start and
    /// status control for the whole (daisy-chained) domain.
    pub fn lead_instance(&self) -> Option<&Instance> {
        self.instances.first()
    }

    /// Look up a probe by its index
    pub fn probe(&self, index: u32) -> Option<&Probe> {
        self.probes.iter().find(|p| p.index == index)
    }

    /// Count the triggers targeting the given instance
    pub fn triggers_on(&self, instance: u32) -> usize {
        self.triggers
            .iter()
            .filter(|t| t.instance_index == instance)
            .count()
    }
}

/// One logic-analyzer register block at a given base address
///
/// The identity and capability fields record what the design was built with;
/// the [verifier][crate::verify] compares them against the live hardware
/// before any register-mutating operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Instance {
    /// Stable instance id
    pub index: u32,
    /// Base address of the register block
    pub base_addr: u32,
    /// Expected instrument type string
    pub kind: String,
    /// Expected IP version
    pub version: u32,
    /// Expected IP identifier
    pub id: u32,
    /// Expected sample memory depth
    pub memory_depth: u32,
    /// Expected number of probes
    pub probe_count: u32,
}

/// A named group of signals wired into one instrument instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Probe {
    /// Stable probe id
    pub index: u32,
    /// Index of the instance this probe is wired into
    pub instance_index: u32,
    /// Signals in bit order
    pub signals: Vec<Signal>,
}

impl Probe {
    /// Look up a signal by index or name
    ///
    /// A token that parses as an unsigned integer addresses the signal with
    /// that index; any other token must match a signal name exactly.
    pub fn signal(&self, token: &str) -> Option<&Signal> {
        find_signal(&self.signals, token, |s| (s.index, s.name.as_str()))
    }
}

/// A single named bit field within a probe's sampled bit space
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Signal {
    /// Stable signal id within the probe
    pub index: u32,
    /// Signal name
    pub name: String,
    /// Position of the signal's lowest bit in the probe's flattened bit space
    pub bitpos: u32,
    /// Width of the signal in bits
    pub bitwidth: u32,
    /// Whether the signal carries a design-time constant
    pub kind: SignalKind,
}

/// Nature of a sampled signal
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SignalKind {
    /// An ordinary design signal
    #[default]
    Normal,
    /// A signal tied to a constant; cannot source a trigger
    Constant,
}

/// An external-IO core at a given base address
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EioInstance {
    /// Stable instance id
    pub index: u32,
    /// Base address of the register block
    pub base_addr: u32,
    /// IO probes of the core
    pub probes: Vec<EioProbe>,
}

impl EioInstance {
    /// Look up a probe by index and direction
    ///
    /// Probe ids may collide across directions, so a probe is only
    /// identified by the pair.
    pub fn probe(&self, index: u32, direction: Direction) -> Option<&EioProbe> {
        self.probes
            .iter()
            .find(|p| p.index == index && p.direction == direction)
    }
}

/// A group of discrete IO signals sharing one direction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EioProbe {
    /// Stable probe id, unique per direction
    pub index: u32,
    /// Signal direction of the whole probe
    pub direction: Direction,
    /// Signals in bit order
    pub signals: Vec<EioSignal>,
}

impl EioProbe {
    /// Look up a signal by index or name
    ///
    /// Same index-before-name precedence as [`Probe::signal`].
    pub fn signal(&self, token: &str) -> Option<&EioSignal> {
        find_signal(&self.signals, token, |s| (s.index, s.name.as_str()))
    }

    /// Number of 32-bit register words spanned by this probe's signals
    pub fn word_count(&self) -> u32 {
        self.signals
            .iter()
            .map(|s| s.bitpos + s.bitwidth)
            .max()
            .unwrap_or(0)
            .div_ceil(32)
    }
}

/// A single named bit field within an IO register
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EioSignal {
    /// Stable signal id within the probe
    pub index: u32,
    /// Signal name
    pub name: String,
    /// Position of the signal's lowest bit in the IO register
    pub bitpos: u32,
    /// Width of the signal in bits
    pub bitwidth: u32,
}

/// Direction of an external-IO probe
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    #[default]
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Resolve a signal token against a signal list
///
/// `key` projects a list element to its `(index, name)` pair.
fn find_signal<'a, S>(signals: &'a [S], token: &str, key: impl Fn(&S) -> (u32, &str)) -> Option<&'a S> {
    let index = selector::parse_literal(token).and_then(|v| u32::try_from(v).ok());
    signals.iter().find(|s| {
        let (idx, name) = key(s);
        match index {
            Some(i) => idx == i,
            None => name == token,
        }
    })
}
