// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Waveform reconstruction from raw sample memory
//!
//! An instrument samples all of its probe bits into flat rows of 32-bit
//! words. [`assemble`] turns those rows back into the logical view: one
//! value sequence per signal, each sample row reduced to the signal's own
//! bits. Extraction is bit accurate across word boundaries for signals of
//! any width and position.

use std::collections::BTreeMap;

use crate::adapter::CaptureData;
use crate::bits;
use crate::topology::ClockDomain;

/// Captured waveform of one clock domain
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waveform {
    /// Index of the captured domain
    pub domain: u32,
    /// Per-probe signal values
    pub probes: Vec<ProbeWaveform>,
}

/// Captured signal values of one probe
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeWaveform {
    /// Index of the probe
    pub index: u32,
    /// One value sequence per signal, in probe bit order
    pub signals: Vec<SignalWaveform>,
}

/// Captured value sequence of one signal
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalWaveform {
    /// Signal name
    pub name: String,
    /// Width of the signal in bits
    pub bitwidth: u32,
    /// Position of the signal in the probe's flattened bit space
    pub bitpos: u32,
    /// Number of 32-bit words per sample
    pub words_per_line: u32,
    /// Number of captured samples
    pub depth: u32,
    /// `depth * words_per_line` words of packed samples
    ///
    /// Each sample occupies `words_per_line` consecutive words with the
    /// signal's value starting at bit 0.
    pub values: Vec<u32>,
}

/// Reassemble per-signal waveforms from raw per-instance sample memory
///
/// `samples` holds each instance's raw capture keyed by instance index.
/// Every probe of the domain draws its rows from its own instance's capture;
/// a probe wired into an instance without sample data fails the assembly
/// with that instance's index.
pub(crate) fn assemble(
    domain: &ClockDomain,
    samples: &BTreeMap<u32, CaptureData>,
) -> Result<Waveform, u32> {
    let mut probes = Vec::with_capacity(domain.probes.len());

    for probe in &domain.probes {
        let data = samples
            .get(&probe.instance_index)
            .ok_or(probe.instance_index)?;
        let row_words = data.words_per_line as usize;
        let rows = if row_words == 0 {
            0
        } else {
            (data.values.len() / row_words).min(data.depth as usize)
        };
        debug_assert_eq!(rows, data.depth as usize);

        let mut signals = Vec::with_capacity(probe.signals.len());
        for signal in &probe.signals {
            // A row shorter than the recorded signal layout must not panic
            // the host tool; short rows yield truncated values.
            let width = signal
                .bitwidth
                .min((row_words * 32).saturating_sub(signal.bitpos as usize) as u32);
            debug_assert_eq!(width, signal.bitwidth);

            let words_per_line = bits::word_count(signal.bitwidth);
            let mut values = vec![0u32; words_per_line * rows];
            for row in 0..rows {
                let src = &data.values[row * row_words..(row + 1) * row_words];
                let dst = &mut values[row * words_per_line..(row + 1) * words_per_line];
                bits::copy_bits(src, signal.bitpos as usize, dst, 0, width as usize);
            }

            signals.push(SignalWaveform {
                name: signal.name.clone(),
                bitwidth: signal.bitwidth,
                bitpos: signal.bitpos,
                words_per_line: words_per_line as u32,
                depth: rows as u32,
                values,
            });
        }

        probes.push(ProbeWaveform {
            index: probe.index,
            signals,
        });
    }

    Ok(Waveform {
        domain: domain.index,
        probes,
    })
}
