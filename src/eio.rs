// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! External-IO control
//!
//! External-IO cores expose discrete input and output bit registers next to
//! the logic analyzer. Outputs are driven through a read-modify-write of the
//! whole output vector with a read-back confirmation; inputs are read in one
//! sized request covering all selected signals.
//!
//! A single core with one probe per direction is supported, matching current
//! hardware; the resolution path already goes through indices to allow more
//! later.

use crate::adapter::{ExternalIo, Instrument};
use crate::bits;
use crate::controller::Controller;
use crate::error::Error;
use crate::selector::Selector;
use crate::session::SESSION_ID;
use crate::topology::Direction;
use crate::verify;

/// Index of the single supported external-IO instance
const INSTANCE: u32 = 1;
/// Index of the single supported probe per direction
const PROBE: u32 = 1;

/// Value of one external-IO signal
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EioValue {
    /// Signal name
    pub name: String,
    /// Signal index within its probe
    pub index: u32,
    /// Signal value, `ceil(bitwidth / 32)` packed words
    pub value: Vec<u32>,
}

impl<A: Instrument + ExternalIo> Controller<A> {
    /// Drive output signals
    ///
    /// Every selector must be an assignment: `name=value` drives the whole
    /// signal with the value zero extended or truncated to the signal
    /// width, `name[i]=value` drives the single bit `i`. Names may also be
    /// signal indices. A single malformed or unresolvable selector fails
    /// the whole call before anything is written.
    ///
    /// The full output vector is read back, updated and rewritten; a final
    /// read-back that does not match the written vector fails with
    /// [`Error::WriteConfirm`], so a silently dropped write surfaces as an
    /// error.
    pub fn set_io<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<(), Error<A::Error>> {
        let mut writes = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            match assignment.as_ref().parse()? {
                Selector::Assign { name, value } => writes.push((name, value, None)),
                Selector::AssignBit { name, index, value } => {
                    writes.push((name, value, Some(index)))
                }
                _ => return Err(Error::UnsupportedSelector(assignment.as_ref().into())),
            }
        }

        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let instance = session
            .eio_instance(INSTANCE)
            .ok_or(Error::UnknownEioInstance(INSTANCE))?;
        let probe = instance
            .probe(PROBE, Direction::Output)
            .ok_or(Error::UnknownEioProbe(PROBE, Direction::Output))?;

        let mut resolved = Vec::with_capacity(writes.len());
        for (name, value, bit) in &writes {
            let signal = probe
                .signal(name)
                .ok_or_else(|| Error::UnknownEioSignal(name.clone()))?;
            if let Some(index) = *bit {
                if index >= signal.bitwidth {
                    return Err(Error::BitIndexExceeded {
                        index,
                        limit: signal.bitwidth,
                    });
                }
            }
            resolved.push((signal, *value, *bit));
        }

        verify::check(&mut self.adapter, session)?;

        let words = probe.word_count();
        let base = instance.base_addr;
        let mut image =
            ExternalIo::read_outputs(&mut self.adapter, base, words).map_err(Error::Access)?;
        image.resize(words as usize, 0);

        for (signal, value, bit) in resolved {
            let halves = [value as u32, (value >> 32) as u32];
            match bit {
                Some(index) => {
                    bits::copy_bits(&halves, 0, &mut image, (signal.bitpos + index) as usize, 1)
                }
                None => {
                    // The value buffer must span the signal, whatever was
                    // supplied.
                    let mut value = halves.to_vec();
                    value.resize(value.len().max(bits::word_count(signal.bitwidth)), 0);
                    bits::copy_bits(
                        &value,
                        0,
                        &mut image,
                        signal.bitpos as usize,
                        signal.bitwidth as usize,
                    );
                }
            }
        }

        ExternalIo::write_outputs(&mut self.adapter, base, &image).map_err(Error::Access)?;

        let readback =
            ExternalIo::read_outputs(&mut self.adapter, base, words).map_err(Error::Access)?;
        if readback != image {
            return Err(Error::WriteConfirm);
        }
        Ok(())
    }

    /// Read input signals
    ///
    /// Selectors are signal names or indices; a leading `#` marks a signal
    /// for literal-free display upstream and is stripped without affecting
    /// resolution. The input register is read once, sized to the highest
    /// selected bit, and each signal's bits are extracted into its own
    /// [`EioValue`].
    pub fn get_io<S: AsRef<str>>(&mut self, signals: &[S]) -> Result<Vec<EioValue>, Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let instance = session
            .eio_instance(INSTANCE)
            .ok_or(Error::UnknownEioInstance(INSTANCE))?;
        let probe = instance
            .probe(PROBE, Direction::Input)
            .ok_or(Error::UnknownEioProbe(PROBE, Direction::Input))?;

        let mut resolved = Vec::with_capacity(signals.len());
        for signal in signals {
            let name = signal.as_ref();
            let name = name.strip_prefix('#').unwrap_or(name);
            resolved.push(
                probe
                    .signal(name)
                    .ok_or_else(|| Error::UnknownEioSignal(name.into()))?,
            );
        }

        verify::check(&mut self.adapter, session)?;

        let msb = resolved
            .iter()
            .map(|s| s.bitpos + s.bitwidth.max(1) - 1)
            .max()
            .unwrap_or(0);
        let words = msb / 32 + 1;
        let mut input = ExternalIo::read_inputs(&mut self.adapter, instance.base_addr, words)
            .map_err(Error::Access)?;
        input.resize(words as usize, 0);

        Ok(resolved
            .into_iter()
            .map(|signal| {
                let mut value = vec![0u32; bits::word_count(signal.bitwidth)];
                bits::copy_bits(
                    &input,
                    signal.bitpos as usize,
                    &mut value,
                    0,
                    signal.bitwidth as usize,
                );
                EioValue {
                    name: signal.name.clone(),
                    index: signal.index,
                    value,
                }
            })
            .collect())
    }
}
