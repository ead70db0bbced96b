// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Verification of live hardware against the recorded topology
//!
//! Before any register-mutating operation, the control plane cross-checks
//! every instrument and external-IO instance of the active session against
//! the identity recorded at load time. Mismatches are collected per field
//! into a [`Report`] and logged individually; a single mismatching field
//! fails the verification as a whole, but never stops the remaining checks.

use std::fmt;

use crate::adapter::{EIO_KIND, ExternalIo, Instrument};
use crate::error::Error;
use crate::topology::Session;

/// Check every debug core of the session against the live hardware
///
/// For each instrument instance, the type string, version, id, memory depth
/// and probe count are read through the adapter and compared against the
/// values recorded in the topology. An instance whose type string does not
/// match is reported as missing and its remaining fields are skipped; all
/// other field mismatches are checked and reported independently. External-IO
/// instances are only checked for the [`EIO_KIND`] type tag.
///
/// The recorded memory depths within each clock domain are additionally
/// checked for skew, since starting and polling a domain through its lead
/// instance is only sound when all of its instances sample identically.
///
/// Fails with [`Error::Verification`] carrying the full [`Report`] iff at
/// least one mismatch was found. Register access failures abort the check
/// immediately.
pub fn check<A>(adapter: &mut A, session: &Session) -> Result<(), Error<A::Error>>
where
    A: Instrument + ExternalIo,
{
    let mut report = Report::default();

    for domain in &session.domains {
        for instance in &domain.instances {
            let index = instance.index;
            let base_addr = instance.base_addr;

            if Instrument::kind(adapter, base_addr).map_err(Error::Access)? != instance.kind {
                report.push(Mismatch::Missing { index, base_addr });
                continue;
            }

            let version = adapter.version(base_addr).map_err(Error::Access)?;
            if version != instance.version {
                report.push(Mismatch::Version {
                    index,
                    expected: instance.version,
                    actual: version,
                });
            }

            let id = adapter.id(base_addr).map_err(Error::Access)?;
            if id != instance.id {
                report.push(Mismatch::Id {
                    index,
                    expected: instance.id,
                    actual: id,
                });
            }

            let depth = adapter.memory_depth(base_addr).map_err(Error::Access)?;
            if depth != instance.memory_depth {
                report.push(Mismatch::MemoryDepth {
                    index,
                    expected: instance.memory_depth,
                    actual: depth,
                });
            }

            let probes = adapter.probe_count(base_addr).map_err(Error::Access)?;
            if probes != instance.probe_count {
                report.push(Mismatch::ProbeCount {
                    index,
                    expected: instance.probe_count,
                    actual: probes,
                });
            }
        }

        let mut depths = domain.instances.iter().map(|i| i.memory_depth);
        if let Some(first) = depths.next() {
            if depths.any(|d| d != first) {
                report.push(Mismatch::DepthSkew { domain: domain.index });
            }
        }
    }

    for instance in &session.eio_instances {
        if ExternalIo::kind(adapter, instance.base_addr).map_err(Error::Access)? != EIO_KIND {
            report.push(Mismatch::EioMissing {
                index: instance.index,
                base_addr: instance.base_addr,
            });
        }
    }

    if report.is_empty() {
        Ok(())
    } else {
        log::error!("hardware verification failed ({} mismatches)", report.len());
        Err(Error::Verification(report))
    }
}

/// Collected verification mismatches
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    mismatches: Vec<Mismatch>,
}

impl Report {
    /// Record a mismatch
    fn push(&mut self, mismatch: Mismatch) {
        log::error!("{mismatch}");
        self.mismatches.push(mismatch);
    }

    /// Retrieve the individual mismatches
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Number of mismatches found
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Check whether no mismatch was found
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A single verification mismatch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// No instrument of the recorded type answered at the base address
    Missing { index: u32, base_addr: u32 },
    /// IP version differs from the recorded one
    Version { index: u32, expected: u32, actual: u32 },
    /// IP identifier differs from the recorded one
    Id { index: u32, expected: u32, actual: u32 },
    /// Memory depth differs from the recorded one
    MemoryDepth { index: u32, expected: u32, actual: u32 },
    /// Probe count differs from the recorded one
    ProbeCount { index: u32, expected: u32, actual: u32 },
    /// Instances of one clock domain record different memory depths
    DepthSkew { domain: u32 },
    /// No external-IO core answered at the base address
    EioMissing { index: u32, base_addr: u32 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { index, base_addr } => {
                write!(f, "could not detect instance {index} at {base_addr:#010x}")
            }
            Self::Version { index, expected, actual } => write!(
                f,
                "instance {index} version mismatched (expected={expected:#x}, actual={actual:#x})"
            ),
            Self::Id { index, expected, actual } => write!(
                f,
                "instance {index} id mismatched (expected={expected:#x}, actual={actual:#x})"
            ),
            Self::MemoryDepth { index, expected, actual } => write!(
                f,
                "instance {index} memory depth mismatched (expected={expected}, actual={actual})"
            ),
            Self::ProbeCount { index, expected, actual } => write!(
                f,
                "instance {index} probe count mismatched (expected={expected}, actual={actual})"
            ),
            Self::DepthSkew { domain } => {
                write!(f, "instances of clock domain {domain} record differing memory depths")
            }
            Self::EioMissing { index, base_addr } => {
                write!(f, "could not detect EIO instance {index} at {base_addr:#010x}")
            }
        }
    }
}
