// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

macro_rules! parse_test {
    ($n:ident, $($s:literal => $r:expr),+ $(,)?) => {
        #[test]
        fn $n() {
            $(
                assert_eq!($s.parse::<Selector>(), $r, "selector: {}", $s);
            )+
        }
    };
}

parse_test!(
    plain_names,
    "ack" => Ok(Selector::Name("ack".into())),
    "  counter_q  " => Ok(Selector::Name("counter_q".into())),
    "top$u0.bus" => Ok(Selector::Name("top$u0.bus".into())),
);

parse_test!(
    single_bits,
    "data[3]" => Ok(Selector::Bit { name: "data".into(), index: 3 }),
    "data[0x10]" => Ok(Selector::Bit { name: "data".into(), index: 16 }),
);

parse_test!(
    bit_ranges,
    "data[7:4]" => Ok(Selector::Range { name: "data".into(), high: 7, low: 4 }),
    "data[5:5]" => Ok(Selector::Range { name: "data".into(), high: 5, low: 5 }),
);

parse_test!(
    name_lists,
    "ack,req" => Ok(Selector::List(vec!["ack".into(), "req".into()])),
    "a, b ,c" => Ok(Selector::List(vec!["a".into(), "b".into(), "c".into()])),
);

parse_test!(
    literals,
    "42" => Ok(Selector::Value(42)),
    "0x1f" => Ok(Selector::Value(0x1f)),
    "0B101" => Ok(Selector::Value(0b101)),
);

parse_test!(
    assignments,
    "led=1" => Ok(Selector::Assign { name: "led".into(), value: 1 }),
    "led = 0xff" => Ok(Selector::Assign { name: "led".into(), value: 0xff }),
    "led[2]=0" => Ok(Selector::AssignBit { name: "led".into(), index: 2, value: 0 }),
);

parse_test!(
    rejects_reversed_ranges,
    "data[4:7]" => Err(Error::ReversedRange { high: 4, low: 7 }),
);

parse_test!(
    rejects_empty_names,
    "" => Err(Error::Empty),
    "   " => Err(Error::Empty),
    "[3]" => Err(Error::Empty),
    "=5" => Err(Error::Empty),
);

parse_test!(
    rejects_malformed_literals,
    "0xzz" => Err(Error::BadLiteral("0xzz".into())),
    "12ab" => Err(Error::BadLiteral("12ab".into())),
    "led=" => Err(Error::BadLiteral("".into())),
    "led=beef" => Err(Error::BadLiteral("beef".into())),
    "data[x]" => Err(Error::BadLiteral("x".into())),
);

parse_test!(
    rejects_malformed_selectors,
    "data[3" => Err(Error::Malformed("data[3".into())),
    "data[7:4]=1" => Err(Error::Malformed("data[7:4]=1".into())),
    "a,b[1]" => Err(Error::Malformed("b[1]".into())),
    "na me" => Err(Error::Malformed("na me".into())),
);

#[test]
fn range_accessor() {
    let sel: Selector = "data[7:4]".parse().unwrap();
    assert_eq!(sel.range(), Some((4, 4)));
    let sel: Selector = "data[3]".parse().unwrap();
    assert_eq!(sel.range(), Some((3, 1)));
    let sel: Selector = "data".parse().unwrap();
    assert_eq!(sel.range(), None);
}

#[test]
fn round_trip_display() {
    for s in ["ack", "data[3]", "data[7:4]", "ack,req", "42"] {
        let sel: Selector = s.parse().unwrap();
        assert_eq!(sel.to_string(), s);
    }
}
