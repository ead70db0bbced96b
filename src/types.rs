// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trigger vocabulary shared by the topology model and the adapter contract
//!
//! Every enum maps bidirectionally to its command token: [`FromStr`] accepts
//! the token (case insensitively) and [`Display`][fmt::Display] renders it.
//! Unknown tokens are an explicit [`UnknownToken`] error, never a fallback
//! variant.


use std::fmt;
use std::str::FromStr;

/// Defines an enum with a bidirectional token mapping
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// The command token denoting this variant
            pub const fn token(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, UnknownToken> {
                match s.to_ascii_lowercase().as_str() {
                    $($token => Ok(Self::$variant),)+
                    _ => Err(UnknownToken { what: $what, token: s.into() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

token_enum!(
    /// Kind of condition a trigger channel evaluates
    TriggerKind as "trigger type" {
        /// Channel disarmed
        None => "none",
        /// Signal transition
        Edge => "edge",
        /// Signal state
        Level => "level",
        /// Comparison against a literal value
        ValueCompare => "value_compare",
    }
);

token_enum!(
    /// Event or comparison operator evaluated by a trigger channel
    ///
    /// Which events are meaningful depends on the [`TriggerKind`]; see
    /// [`TriggerKind::accepts`].
    TriggerEvent as "trigger event" {
        None => "none",
        Rising => "rising",
        Falling => "falling",
        Either => "either",
        High => "high",
        Low => "low",
        Equal => "equal",
        NotEqual => "not_equal",
        Greater => "greater",
        Less => "less",
    }
);

token_enum!(
    /// Placement of the trigger position within the capture window
    TriggerMode as "trigger mode" {
        /// Free-running capture, triggers ignored
        Disabled => "disable",
        /// Samples are collected once the trigger fires
        Pre => "pre",
        /// Samples are collected up to the trigger firing
        Post => "post",
        /// Trigger centered in the capture window
        Center => "center",
    }
);

token_enum!(
    /// Boolean combination of multiple armed trigger channels
    TriggerCondition as "trigger condition" {
        Default => "default",
        And => "and",
        Or => "or",
        Xor => "xor",
    }
);

impl TriggerKind {
    /// Check whether `event` is meaningful for this kind of trigger
    ///
    /// The pairing is a fixed compatibility table: edges pair with transition
    /// events, levels with states, value compares with comparison operators.
    /// [`TriggerKind::None`] only pairs with [`TriggerEvent::None`].
    pub fn accepts(self, event: TriggerEvent) -> bool {
        use TriggerEvent as E;

        match self {
            Self::None => matches!(event, E::None),
            Self::Edge => matches!(event, E::Rising | E::Falling | E::Either),
            Self::Level => matches!(event, E::High | E::Low),
            Self::ValueCompare => {
                matches!(event, E::Equal | E::NotEqual | E::Greater | E::Less)
            }
        }
    }
}

impl Default for TriggerKind {
    fn default() -> Self {
        Self::None
    }
}

impl Default for TriggerEvent {
    fn default() -> Self {
        Self::None
    }
}

impl Default for TriggerMode {
    fn default() -> Self {
        Self::Disabled
    }
}

impl Default for TriggerCondition {
    fn default() -> Self {
        Self::Default
    }
}

/// A token denoting no known variant of an enum
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownToken {
    what: &'static str,
    token: String,
}

impl std::error::Error for UnknownToken {}

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.what, self.token)
    }
}
