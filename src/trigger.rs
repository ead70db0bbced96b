// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trigger configuration
//!
//! Triggers live on their clock domain and are addressed by their position
//! in the domain's trigger list. Adding and editing enforce the instrument's
//! per-instance limits: the channel capacity and the maximum compare width.
//! Capacity is per instance, not per domain, since several instances may
//! share a domain.

use std::fmt;

use crate::adapter::{ChannelConfig, ExternalIo, Instrument};
use crate::controller::Controller;
use crate::error::Error;
use crate::selector::Selector;
use crate::session::SESSION_ID;
use crate::topology::{Signal, SignalKind};
use crate::types::{TriggerEvent, TriggerKind};
use crate::verify;

/// A configured trigger condition on one signal
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    /// Index of the instance the watched probe is wired into
    pub instance_index: u32,
    /// Index of the watched probe
    pub probe_index: u32,
    /// Index of the watched signal within the probe
    pub signal_index: u32,
    /// Name of the watched signal, for display
    pub signal_name: String,
    /// Selected sub-range of the signal, if any
    pub range: Option<BitRange>,
    /// Channel configuration programmed into the instrument
    pub config: ChannelConfig,
}

/// A sub-range of a signal watched by a trigger
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitRange {
    /// Lowest selected bit, relative to the signal
    pub pos: u32,
    /// Number of selected bits
    pub width: u32,
}

/// Renders the watched signal the way it was selected: `name`, `name[i]` or
/// `name[hi:lo]`
impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(BitRange { pos, width }) if width > 1 => {
                write!(f, "{}[{}:{pos}]", self.signal_name, pos + width - 1)
            }
            Some(BitRange { pos, .. }) => write!(f, "{}[{pos}]", self.signal_name),
            None => write!(f, "{}", self.signal_name),
        }
    }
}

impl<A: Instrument + ExternalIo> Controller<A> {
    /// Add a trigger to a clock domain
    ///
    /// The signal selector addresses a signal of the given probe by name or
    /// index and may select a bit sub-range. A compare width of `0` lets a
    /// value-compare trigger default to the selected width, capped at the
    /// instrument limit.
    ///
    /// Fails without touching the trigger list if the selection does not
    /// resolve, the event does not pair with the trigger kind, the signal is
    /// a constant, a limit is exceeded, or every channel of the target
    /// instance is already taken.
    #[allow(clippy::too_many_arguments)]
    pub fn add_trigger(
        &mut self,
        domain: u32,
        probe: u32,
        signal: &str,
        kind: TriggerKind,
        event: TriggerEvent,
        value: u32,
        compare_width: u32,
    ) -> Result<(), Error<A::Error>> {
        let (token, range) = trigger_selection(signal)?;

        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;
        let prb = dom.probe(probe).ok_or(Error::UnknownProbe(probe))?;
        let sig = prb
            .signal(&token)
            .ok_or_else(|| Error::UnknownSignal(token.clone()))?;

        if !kind.accepts(event) {
            return Err(Error::EventMismatch(kind, event));
        }

        verify::check(&mut self.adapter, session)?;

        if sig.kind == SignalKind::Constant {
            return Err(Error::ConstantSignal(sig.name.clone()));
        }

        let instance = dom
            .instance(prb.instance_index)
            .ok_or(Error::UnknownInstance(prb.instance_index))?;

        let limit = self
            .adapter
            .max_compare_width(instance.base_addr)
            .map_err(Error::Access)?;
        if compare_width > limit {
            return Err(Error::CompareWidthExceeded {
                requested: compare_width,
                limit,
            });
        }

        let channels = self
            .adapter
            .channel_count(instance.base_addr)
            .map_err(Error::Access)?;
        if dom.triggers_on(instance.index) >= channels as usize {
            return Err(Error::ChannelsExhausted(channels));
        }

        let trigger = build(
            sig,
            range,
            prb.index,
            instance.index,
            kind,
            event,
            value,
            compare_width,
            limit,
        )?;

        self.domain_mut(domain)?.triggers.push(trigger);
        Ok(())
    }

    /// Replace the configuration of an existing trigger
    ///
    /// The trigger keeps its position in the domain's trigger list; the
    /// whole selection and configuration are replaced. The edit is
    /// all-or-nothing: on any failure the trigger is left untouched.
    ///
    /// Channel capacity is only re-checked when the new probe is wired into
    /// a different instance, since the trigger already occupies a channel of
    /// its current one.
    #[allow(clippy::too_many_arguments)]
    pub fn edit_trigger(
        &mut self,
        domain: u32,
        trigger: usize,
        probe: u32,
        signal: &str,
        kind: TriggerKind,
        event: TriggerEvent,
        value: u32,
        compare_width: u32,
    ) -> Result<(), Error<A::Error>> {
        let (token, range) = trigger_selection(signal)?;

        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;
        let prb = dom.probe(probe).ok_or(Error::UnknownProbe(probe))?;
        let sig = prb
            .signal(&token)
            .ok_or_else(|| Error::UnknownSignal(token.clone()))?;

        let current = dom
            .triggers
            .get(trigger)
            .ok_or(Error::UnknownTrigger(trigger))?;

        if !kind.accepts(event) {
            return Err(Error::EventMismatch(kind, event));
        }

        verify::check(&mut self.adapter, session)?;

        if sig.kind == SignalKind::Constant {
            return Err(Error::ConstantSignal(sig.name.clone()));
        }

        let instance = dom
            .instance(prb.instance_index)
            .ok_or(Error::UnknownInstance(prb.instance_index))?;

        let limit = self
            .adapter
            .max_compare_width(instance.base_addr)
            .map_err(Error::Access)?;
        if compare_width > limit {
            return Err(Error::CompareWidthExceeded {
                requested: compare_width,
                limit,
            });
        }

        if instance.index != current.instance_index {
            let channels = self
                .adapter
                .channel_count(instance.base_addr)
                .map_err(Error::Access)?;
            if dom.triggers_on(instance.index) >= channels as usize {
                return Err(Error::ChannelsExhausted(channels));
            }
        }

        let replacement = build(
            sig,
            range,
            prb.index,
            instance.index,
            kind,
            event,
            value,
            compare_width,
            limit,
        )?;

        *self
            .domain_mut(domain)?
            .triggers
            .get_mut(trigger)
            .ok_or(Error::UnknownTrigger(trigger))? = replacement;
        Ok(())
    }

    /// Remove a trigger from a clock domain
    pub fn remove_trigger(&mut self, domain: u32, trigger: usize) -> Result<(), Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        session.domain(domain).ok_or(Error::UnknownDomain(domain))?;

        verify::check(&mut self.adapter, session)?;

        let dom = self.domain_mut(domain)?;
        if trigger >= dom.triggers.len() {
            return Err(Error::UnknownTrigger(trigger));
        }
        dom.triggers.remove(trigger);
        Ok(())
    }
}

/// Decompose a selector into a signal token and an optional bit range
///
/// Bare literals address signals by index; list and assignment patterns have
/// no meaning in the trigger path.
fn trigger_selection<E>(selector: &str) -> Result<(String, Option<(u32, u32)>), Error<E>> {
    match selector.parse()? {
        Selector::Name(name) => Ok((name, None)),
        Selector::Bit { name, index } => Ok((name, Some((index, 1)))),
        Selector::Range { name, high, low } => Ok((name, Some((low, high - low + 1)))),
        Selector::Value(value) => Ok((value.to_string(), None)),
        _ => Err(Error::UnsupportedSelector(selector.into())),
    }
}

/// Assemble a trigger, validating the bit range and defaulting the compare
/// width
///
/// A zero compare width on a value-compare trigger defaults to the selected
/// sub-range width, or the full signal width, capped at the instrument's
/// `max_compare_width`.
#[allow(clippy::too_many_arguments)]
fn build<E>(
    signal: &Signal,
    range: Option<(u32, u32)>,
    probe: u32,
    instance: u32,
    kind: TriggerKind,
    event: TriggerEvent,
    value: u32,
    compare_width: u32,
    max_compare_width: u32,
) -> Result<Trigger, Error<E>> {
    let range = range
        .map(|(pos, width)| {
            if pos + width > signal.bitwidth {
                Err(Error::BitRangeExceeded {
                    pos,
                    width,
                    limit: signal.bitwidth,
                })
            } else {
                Ok(BitRange { pos, width })
            }
        })
        .transpose()?;

    let mut config = ChannelConfig {
        kind,
        event,
        value,
        compare_width,
        probe_bit: signal.bitpos + range.map_or(0, |r| r.pos),
    };

    if kind == TriggerKind::ValueCompare && compare_width == 0 {
        let selected = range.map_or(signal.bitwidth, |r| r.width);
        config.compare_width = selected.min(max_compare_width);
    }

    Ok(Trigger {
        instance_index: instance,
        probe_index: probe,
        signal_index: signal.index,
        signal_name: signal.name.clone(),
        range,
        config,
    })
}
