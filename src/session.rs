// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Session lifecycle
//!
//! The [`Registry`] owns the active debug [`Session`] and enforces the
//! single-session invariant through explicit checks rather than hidden
//! global state: loading fails while a session is active, unloading fails
//! without one. Sessions are addressed by id to leave room for multiple
//! concurrent sessions later; today [`SESSION_ID`] is the only valid id.
//!
//! Parsing the design file into a [`Session`] is not the control plane's
//! business. It consumes the [`Loader`] contract for that, typically backed
//! by the toolchain's design-file parser.

use std::path::Path;

use crate::topology::Session;

/// Id of the single supported debug session
pub const SESSION_ID: u32 = 1;

/// A parser building debug [`Session`]s from design files
///
/// On failure, a loader reports all of its diagnostics as a list of
/// messages; the control plane surfaces them verbatim and registers
/// nothing.
///
/// The contract is also implemented for compatible closures.
pub trait Loader {
    /// Build the session topology described by the given design file
    fn load(&self, path: &Path) -> Result<Session, Vec<String>>;
}

impl<F> Loader for F
where
    F: Fn(&Path) -> Result<Session, Vec<String>>,
{
    fn load(&self, path: &Path) -> Result<Session, Vec<String>> {
        self(path)
    }
}

/// Owner of the active debug session
///
/// At most one session is active at a time. A future version may hold a
/// mapping of session ids instead; the id-based accessors are already shaped
/// for that.
#[derive(Debug, Default)]
pub struct Registry {
    active: Option<Session>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Default::default()
    }

    /// Check whether a session is active
    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    /// Retrieve the session with the given id
    pub fn get(&self, id: u32) -> Option<&Session> {
        (id == SESSION_ID).then(|| self.active.as_ref()).flatten()
    }

    /// Retrieve the session with the given id, mutably
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Session> {
        (id == SESSION_ID).then(|| self.active.as_mut()).flatten()
    }

    /// Register a freshly loaded session
    ///
    /// Fails with the rejected session while another one is active.
    pub fn register(&mut self, session: Session) -> Result<(), Session> {
        if self.active.is_some() {
            Err(session)
        } else {
            self.active = Some(session);
            Ok(())
        }
    }

    /// Discard the active session
    pub fn unregister(&mut self) -> Option<Session> {
        self.active.take()
    }
}
