// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

use std::path::PathBuf;

use crate::Error;

fn ok_loader(session: Session) -> impl Fn(&Path) -> Result<Session, Vec<String>> {
    move |_| Ok(session.clone())
}

#[test]
fn a_second_session_is_rejected() {
    let mut controller = loaded();
    assert_eq!(
        controller.start_session(&ok_loader(session()), "Cargo.toml"),
        Err(Error::SessionActive)
    );
}

#[test]
fn the_design_file_must_exist() {
    let mut controller = Controller::new(Bench::default());
    assert_eq!(
        controller.start_session(&ok_loader(session()), "no/such/design.bit"),
        Err(Error::FileNotFound(PathBuf::from("no/such/design.bit")))
    );
    assert!(controller.session().is_none());
}

#[test]
fn loader_diagnostics_are_surfaced_verbatim() {
    let mut controller = Controller::new(Bench::default());
    let loader = |_: &Path| -> Result<Session, Vec<String>> {
        Err(vec!["bad record at line 3".into(), "unexpected eof".into()])
    };

    let err = controller.start_session(&loader, "Cargo.toml").unwrap_err();
    assert_eq!(
        err,
        Error::Load(vec!["bad record at line 3".into(), "unexpected eof".into()])
    );
    let rendered = err.to_string();
    assert!(rendered.contains("bad record at line 3"));
    assert!(rendered.contains("unexpected eof"));
    assert!(rendered.ends_with("failed to load user design"));

    // A rejected load registers nothing.
    assert!(controller.session().is_none());
}

#[test]
fn the_session_records_its_design_file() {
    let controller = loaded();
    assert_eq!(controller.session().unwrap().path, PathBuf::from("Cargo.toml"));
}

#[test]
fn stopping_without_a_session_fails() {
    let mut controller = Controller::new(Bench::default());
    assert_eq!(controller.stop_session(), Err(Error::NoSession));
}

#[test]
fn stopping_discards_the_session() {
    let mut controller = loaded();
    controller.stop_session().unwrap();
    assert!(controller.session().is_none());
    assert_eq!(controller.status(1), Err(Error::NoSession));

    // A fresh session may be loaded afterwards.
    controller
        .start_session(&ok_loader(session()), "Cargo.toml")
        .unwrap();
    assert!(controller.session().is_some());
}

#[test]
fn operations_require_a_session() {
    use crate::types::{TriggerEvent, TriggerKind};

    let mut controller = Controller::new(Bench::default());
    assert_eq!(controller.verify(), Err(Error::NoSession));
    assert_eq!(controller.status(1), Err(Error::NoSession));
    assert_eq!(
        controller.add_trigger(1, 1, "data", TriggerKind::Edge, TriggerEvent::Rising, 0, 0),
        Err(Error::NoSession)
    );
    assert_eq!(controller.set_io(&["led=1"]), Err(Error::NoSession));
}
