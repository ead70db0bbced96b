// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

use crate::Error;
use crate::eio::EioValue;
use crate::topology::Direction;

fn outputs(controller: &Controller<Bench>) -> Vec<u32> {
    controller.adapter.eios[&0x2000].outputs.clone()
}

/// Wire the bench outputs back to the inputs
fn loop_back(controller: &mut Controller<Bench>) {
    let eio = controller.adapter.eios.get_mut(&0x2000).unwrap();
    eio.inputs = eio.outputs.clone();
}

#[test]
fn written_values_land_at_the_signal_position() {
    let mut controller = loaded();
    controller.set_io(&["led=0x5", "ctrl=0x1"]).unwrap();

    // led occupies bits [3:0], ctrl bits [43:4].
    assert_eq!(outputs(&controller), vec![0x15, 0x0]);
}

#[test]
fn values_are_truncated_to_the_signal_width() {
    let mut controller = loaded();
    controller.set_io(&["led=0xff"]).unwrap();
    assert_eq!(outputs(&controller)[0], 0xf);
}

#[test]
fn wide_signals_span_words() {
    let mut controller = loaded();
    controller.set_io(&["ctrl=0xfffffffff"]).unwrap();

    // 36 set bits shifted to position 4.
    assert_eq!(outputs(&controller), vec![0xffff_fff0, 0xff]);
}

#[test]
fn bit_assignments_touch_a_single_bit() {
    let mut controller = loaded();
    controller.set_io(&["led=0x9"]).unwrap();
    controller.set_io(&["led[1]=1"]).unwrap();
    assert_eq!(outputs(&controller)[0], 0xb);

    controller.set_io(&["led[3]=0"]).unwrap();
    assert_eq!(outputs(&controller)[0], 0x3);

    assert_eq!(
        controller.set_io(&["led[4]=1"]),
        Err(Error::BitIndexExceeded { index: 4, limit: 4 })
    );
}

#[test]
fn set_then_get_round_trips() {
    let mut controller = loaded();
    controller.set_io(&["led=0x3"]).unwrap();
    loop_back(&mut controller);

    // The bench wires outputs back to inputs, and `buttons` sits at the
    // same bits as `led`.
    let values = controller.get_io(&["buttons"]).unwrap();
    assert_eq!(
        values,
        vec![EioValue {
            name: "buttons".into(),
            index: 0,
            value: vec![0x3],
        }]
    );
}

#[test]
fn get_io_extracts_multi_word_signals() {
    let mut controller = loaded();
    {
        let eio = controller.adapter.eios.get_mut(&0x2000).unwrap();
        // sensor occupies bits [36:4].
        eio.inputs = vec![0xabcd_e010, 0x1f];
    }

    let values = controller.get_io(&["sensor", "0"]).unwrap();
    assert_eq!(values[0].name, "sensor");
    assert_eq!(values[0].value, vec![0xfabc_de01, 0x1]);

    // "0" addresses `buttons` by index.
    assert_eq!(values[1].name, "buttons");
    assert_eq!(values[1].value, vec![0x0]);
}

#[test]
fn get_io_sizes_its_read_to_the_selection() {
    let mut controller = loaded();
    controller.get_io(&["buttons"]).unwrap();
    assert_eq!(controller.adapter.eios[&0x2000].last_input_read, Some(1));

    controller.get_io(&["buttons", "sensor"]).unwrap();
    assert_eq!(controller.adapter.eios[&0x2000].last_input_read, Some(2));
}

#[test]
fn literal_suppression_markers_are_stripped() {
    let mut controller = loaded();
    let values = controller.get_io(&["#buttons"]).unwrap();
    assert_eq!(values[0].name, "buttons");
}

#[test]
fn a_malformed_assignment_fails_the_whole_call() {
    let mut controller = loaded();
    let before = outputs(&controller);

    assert!(controller.set_io(&["led=1", "ctrl["]).is_err());
    assert!(matches!(
        controller.set_io(&["led=1", "ctrl"]),
        Err(Error::UnsupportedSelector(_))
    ));
    assert_eq!(
        controller.set_io(&["led=1", "blink=0"]),
        Err(Error::UnknownEioSignal("blink".into()))
    );

    assert_eq!(outputs(&controller), before);
}

#[test]
fn unknown_read_signals_are_rejected() {
    let mut controller = loaded();
    assert_eq!(
        controller.get_io(&["buttons", "blink"]),
        Err(Error::UnknownEioSignal("blink".into()))
    );
}

#[test]
fn a_stuck_output_bit_fails_the_write_confirm() {
    let mut controller = loaded();
    controller.adapter.eios.get_mut(&0x2000).unwrap().stuck = vec![0x1, 0x0];

    assert_eq!(controller.set_io(&["led=0x1"]), Err(Error::WriteConfirm));
}

#[test]
fn io_is_gated_on_verification() {
    let mut controller = loaded();
    controller.adapter.eios.get_mut(&0x2000).unwrap().kind = "GPIO".into();

    assert!(matches!(controller.set_io(&["led=1"]), Err(Error::Verification(_))));
    assert!(matches!(controller.get_io(&["buttons"]), Err(Error::Verification(_))));
    assert_eq!(outputs(&controller), vec![0, 0]);
}

#[test]
fn probes_resolve_by_index_and_direction() {
    // Input and output probes share index 1; writes must resolve the
    // output probe, reads the input probe.
    let probes = &session().eio_instances[0].probes;
    assert_eq!(probes[0].index, probes[1].index);
    assert_eq!(probes[0].direction, Direction::Output);
    assert_eq!(probes[1].direction, Direction::Input);
}
