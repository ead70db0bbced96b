// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Control-plane error type
//!
//! Every operation failure is a value of [`Error`], generic over the
//! transport error type of the [adapter][crate::adapter] in use. All
//! variants are non-fatal and carry a human-readable message via
//! [`Display`][fmt::Display]; nothing here terminates the process and
//! nothing is retried. Retrying, if at all, is the caller's business.

use std::fmt;
use std::path::PathBuf;

use crate::selector;
use crate::topology::Direction;
use crate::types::{TriggerEvent, TriggerKind};
use crate::verify::Report;

/// Control-plane errors
///
/// `E` is the transport error type of the adapter behind the controller.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// A debug session is already loaded
    SessionActive,
    /// No debug session is loaded
    NoSession,
    /// The design file does not exist
    FileNotFound(PathBuf),
    /// The loader rejected the design file
    ///
    /// Carries every message the loader reported, verbatim.
    Load(Vec<String>),
    /// No clock domain with the given index
    UnknownDomain(u32),
    /// No probe with the given index in the clock domain
    UnknownProbe(u32),
    /// No signal with the given name or index in the probe
    UnknownSignal(String),
    /// No instance with the given index in the clock domain
    UnknownInstance(u32),
    /// No trigger with the given index in the clock domain
    UnknownTrigger(usize),
    /// No external-IO core with the given index
    UnknownEioInstance(u32),
    /// No external-IO probe with the given index and direction
    UnknownEioProbe(u32, Direction),
    /// No external-IO signal with the given name or index in the probe
    UnknownEioSignal(String),
    /// The signal selector could not be parsed
    Selector(selector::Error),
    /// The selector is valid but denotes a pattern not usable here
    UnsupportedSelector(String),
    /// The trigger event is not meaningful for the trigger kind
    EventMismatch(TriggerKind, TriggerEvent),
    /// Constant signals cannot source a trigger
    ConstantSignal(String),
    /// The requested compare width exceeds the instrument limit
    CompareWidthExceeded { requested: u32, limit: u32 },
    /// Every trigger channel of the target instance is in use
    ChannelsExhausted(u32),
    /// The selected bit range runs past the signal
    BitRangeExceeded { pos: u32, width: u32, limit: u32 },
    /// The selected bit index runs past the signal
    BitIndexExceeded { index: u32, limit: u32 },
    /// The requested sample size exceeds the instance memory depth
    SampleSizeExceeded { requested: u32, limit: u32 },
    /// The clock domain has no instances
    NoInstances(u32),
    /// A capture cannot start without at least one trigger
    NoTriggers,
    /// Live hardware does not match the recorded topology
    Verification(Report),
    /// An output write did not read back as written
    WriteConfirm,
    /// A register access failed
    Access(E),
}

impl<E> From<selector::Error> for Error<E> {
    fn from(err: selector::Error) -> Self {
        Self::Selector(err)
    }
}

impl<E> std::error::Error for Error<E>
where
    E: fmt::Debug + std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selector(inner) => Some(inner),
            Self::Access(inner) => Some(inner),
            _ => None,
        }
    }
}

impl<E> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionActive => write!(f, "debug session is already loaded"),
            Self::NoSession => write!(f, "debug session is not loaded"),
            Self::FileNotFound(path) => write!(f, "file '{}' not found", path.display()),
            Self::Load(messages) => {
                for msg in messages {
                    writeln!(f, "{msg}")?;
                }
                write!(f, "failed to load user design")
            }
            Self::UnknownDomain(id) => write!(f, "clock domain {id} not found"),
            Self::UnknownProbe(id) => write!(f, "probe {id} not found"),
            Self::UnknownSignal(name) => write!(f, "signal '{name}' not found"),
            Self::UnknownInstance(id) => write!(f, "instance {id} not found"),
            Self::UnknownTrigger(id) => write!(f, "trigger {id} not found"),
            Self::UnknownEioInstance(id) => write!(f, "EIO instance {id} not found"),
            Self::UnknownEioProbe(id, dir) => write!(f, "EIO {dir} probe {id} not found"),
            Self::UnknownEioSignal(name) => write!(f, "EIO signal '{name}' not found"),
            Self::Selector(inner) => write!(f, "{inner}"),
            Self::UnsupportedSelector(s) => {
                write!(f, "signal selector '{s}' cannot be used here")
            }
            Self::EventMismatch(kind, event) => {
                write!(f, "invalid '{event}' event for '{kind}' trigger")
            }
            Self::ConstantSignal(name) => {
                write!(f, "cannot set up a trigger on constant signal '{name}'")
            }
            Self::CompareWidthExceeded { requested, limit } => {
                write!(f, "compare width {requested} exceeds the width limit ({limit})")
            }
            Self::ChannelsExhausted(limit) => {
                write!(f, "all {limit} trigger channels of the instance are in use")
            }
            Self::BitRangeExceeded { pos, width, limit } => {
                write!(
                    f,
                    "bit range [{}:{pos}] runs past the signal width ({limit})",
                    pos + width - 1
                )
            }
            Self::BitIndexExceeded { index, limit } => {
                write!(f, "bit index {index} runs past the signal width ({limit})")
            }
            Self::SampleSizeExceeded { requested, limit } => {
                write!(f, "sample size {requested} is larger than the maximum of {limit}")
            }
            Self::NoInstances(id) => write!(f, "no instance found for clock domain {id}"),
            Self::NoTriggers => write!(f, "no trigger configuration set up"),
            Self::Verification(report) => {
                write!(f, "hardware verification failed ({} mismatches)", report.len())
            }
            Self::WriteConfirm => {
                write!(f, "output write-back mismatch, the write did not take effect")
            }
            Self::Access(_) => write!(f, "register access failed"),
        }
    }
}
