// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! The control plane proper
//!
//! A [`Controller`] pairs an [adapter][crate::adapter] with the session
//! [`Registry`] and exposes every user-facing operation: session lifecycle,
//! capture configuration, trigger management (see [trigger][crate::trigger]),
//! capture start and status, waveform retrieval and external IO (see
//! [eio][crate::eio]).
//!
//! Operations are synchronous and run to completion; polling a pending
//! capture is the caller's business. Every operation that reads or writes
//! instrument registers first [verifies][crate::verify] the live hardware
//! against the recorded topology and fails closed on a mismatch. This
//! includes the pure status and waveform reads.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::adapter::{CaptureConfig, ChannelConfig, ExternalIo, Instrument};
use crate::error::Error;
use crate::session::{Loader, Registry, SESSION_ID};
use crate::topology::{ClockDomain, Session};
use crate::verify;
use crate::waveform::{self, Waveform};

/// Control plane for the debug cores of one FPGA
///
/// Generic over the adapter providing register access. All operations borrow
/// the topology for their own duration only; indices are re-resolved on
/// every call.
#[derive(Debug, Default)]
pub struct Controller<A> {
    pub(crate) adapter: A,
    pub(crate) registry: Registry,
}

impl<A> Controller<A> {
    /// Create a controller driving debug cores through the given adapter
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            registry: Registry::new(),
        }
    }

    /// Retrieve the active session topology
    ///
    /// This is the data source for topology reporting; rendering it is left
    /// to the caller.
    pub fn session(&self) -> Option<&Session> {
        self.registry.get(SESSION_ID)
    }
}

impl<A: Instrument + ExternalIo> Controller<A> {
    /// Load a design file and activate its debug session
    ///
    /// Fails while a session is active, when the file does not exist, or
    /// when the loader rejects the file. A rejected load registers nothing
    /// and surfaces every loader diagnostic inside
    /// [`Error::Load`].
    pub fn start_session(
        &mut self,
        loader: &impl Loader,
        path: impl Into<PathBuf>,
    ) -> Result<(), Error<A::Error>> {
        if self.registry.is_loaded() {
            return Err(Error::SessionActive);
        }

        let path = path.into();
        if !path.exists() {
            return Err(Error::FileNotFound(path));
        }

        let mut session = loader.load(&path).map_err(Error::Load)?;
        session.path = path;
        self.registry.register(session).map_err(|_| Error::SessionActive)
    }

    /// Discard the active debug session
    pub fn stop_session(&mut self) -> Result<(), Error<A::Error>> {
        self.registry.unregister().map(drop).ok_or(Error::NoSession)
    }

    /// Verify the live hardware against the recorded topology
    ///
    /// Performed implicitly by every hardware-touching operation; exposed
    /// for callers that want the result without side effects.
    pub fn verify(&mut self) -> Result<(), Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        verify::check(&mut self.adapter, session)
    }

    /// Set the operation mode configuration of a clock domain
    ///
    /// The configuration takes effect on the hardware when the domain is
    /// [started][Self::start]. A fixed sample size must fit the domain's
    /// memory depth; `0` fills the sample memory.
    pub fn configure(&mut self, domain: u32, config: CaptureConfig) -> Result<(), Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;

        verify::check(&mut self.adapter, session)?;

        // All instances of a domain sample identically, so the lead
        // instance bounds the sample size for the whole domain.
        let lead = dom.lead_instance().ok_or(Error::NoInstances(domain))?;
        if config.sample_size > lead.memory_depth {
            return Err(Error::SampleSizeExceeded {
                requested: config.sample_size,
                limit: lead.memory_depth,
            });
        }

        self.domain_mut(domain)?.config = config;
        Ok(())
    }

    /// Program and start a capture on a clock domain
    ///
    /// Requires at least one configured trigger. All instances of the
    /// domain are programmed, then the capture is started through the lead
    /// instance only; the daisy chain propagates it to the rest.
    pub fn start(&mut self, domain: u32) -> Result<(), Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;

        verify::check(&mut self.adapter, session)?;

        if dom.triggers.is_empty() {
            return Err(Error::NoTriggers);
        }
        let lead = dom.lead_instance().ok_or(Error::NoInstances(domain))?;

        program(&mut self.adapter, dom)?;

        log::info!("starting capture on clock domain {domain} via instance {}", lead.index);
        self.adapter.start(lead.base_addr).map_err(Error::Access)
    }

    /// Read the raw capture status of a clock domain
    ///
    /// Reads the lead instance only. Like every other hardware access, the
    /// read is gated on a passing verification.
    pub fn status(&mut self, domain: u32) -> Result<u32, Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;

        verify::check(&mut self.adapter, session)?;

        let lead = dom.lead_instance().ok_or(Error::NoInstances(domain))?;
        self.adapter.status(lead.base_addr).map_err(Error::Access)
    }

    /// Retrieve the captured waveform of a clock domain
    ///
    /// Fetches the raw sample memory of every instance in the domain and
    /// reassembles it into per-probe, per-signal bit-accurate value
    /// sequences.
    pub fn waveform(&mut self, domain: u32) -> Result<Waveform, Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;
        let dom = session.domain(domain).ok_or(Error::UnknownDomain(domain))?;

        verify::check(&mut self.adapter, session)?;

        let mut samples = BTreeMap::new();
        for instance in &dom.instances {
            let data = self.adapter.data(instance.base_addr).map_err(Error::Access)?;
            samples.insert(instance.index, data);
        }

        waveform::assemble(dom, &samples).map_err(Error::UnknownInstance)
    }

    /// Read the live state of every instrument instance
    ///
    /// The instrument-side complement of [`session`][Self::session]:
    /// identity, capture status, operation mode and per-channel trigger
    /// configuration as currently held in hardware.
    pub fn instance_info(&mut self) -> Result<Vec<InstanceInfo>, Error<A::Error>> {
        let session = self.registry.get(SESSION_ID).ok_or(Error::NoSession)?;

        verify::check(&mut self.adapter, session)?;

        let mut infos = Vec::new();
        for instance in &session.instances {
            let base = instance.base_addr;
            let channel_count = self.adapter.channel_count(base).map_err(Error::Access)?;
            let channels = (0..channel_count)
                .map(|ch| self.adapter.channel_config(base, ch))
                .collect::<Result<_, _>>()
                .map_err(Error::Access)?;

            infos.push(InstanceInfo {
                index: instance.index,
                base_addr: base,
                kind: Instrument::kind(&mut self.adapter, base).map_err(Error::Access)?,
                version: self.adapter.version(base).map_err(Error::Access)?,
                id: self.adapter.id(base).map_err(Error::Access)?,
                probe_count: self.adapter.probe_count(base).map_err(Error::Access)?,
                memory_depth: self.adapter.memory_depth(base).map_err(Error::Access)?,
                status: self.adapter.status(base).map_err(Error::Access)?,
                config: self.adapter.config(base).map_err(Error::Access)?,
                channels,
            });
        }
        Ok(infos)
    }

    /// Look up a clock domain of the active session, mutably
    pub(crate) fn domain_mut(&mut self, domain: u32) -> Result<&mut ClockDomain, Error<A::Error>> {
        self.registry
            .get_mut(SESSION_ID)
            .ok_or(Error::NoSession)?
            .domain_mut(domain)
            .ok_or(Error::UnknownDomain(domain))
    }
}

/// Program a domain's configuration into all of its instances
///
/// Every instance receives the operation mode configuration, then all of its
/// trigger channels are cleared and the domain's triggers targeting it are
/// written to channels 0, 1, ... in trigger-list order. Channel assignment
/// is positional; a trigger does not own a channel number.
fn program<A: Instrument>(adapter: &mut A, domain: &ClockDomain) -> Result<(), Error<A::Error>> {
    let cleared = ChannelConfig::default();

    for instance in &domain.instances {
        let base = instance.base_addr;
        log::debug!("programming instance {} at {base:#010x}", instance.index);

        adapter.configure(base, &domain.config).map_err(Error::Access)?;

        for channel in 0..adapter.channel_count(base).map_err(Error::Access)? {
            adapter
                .configure_channel(base, channel, &cleared)
                .map_err(Error::Access)?;
        }

        let mut channel = 0;
        for trigger in &domain.triggers {
            if trigger.instance_index == instance.index {
                adapter
                    .configure_channel(base, channel, &trigger.config)
                    .map_err(Error::Access)?;
                channel += 1;
            }
        }
    }
    Ok(())
}

/// Live state of one instrument instance
///
/// Produced by [`Controller::instance_info`]. All fields are read from the
/// hardware, not from the recorded topology.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceInfo {
    /// Instance id from the topology
    pub index: u32,
    /// Base address of the register block
    pub base_addr: u32,
    /// Instrument type string
    pub kind: String,
    /// IP version
    pub version: u32,
    /// IP identifier
    pub id: u32,
    /// Number of probes
    pub probe_count: u32,
    /// Sample memory depth
    pub memory_depth: u32,
    /// Raw capture status word
    pub status: u32,
    /// Operation mode configuration
    pub config: CaptureConfig,
    /// Per-channel trigger configuration
    pub channels: Vec<ChannelConfig>,
}
