//! Result flags returned by controllers and edit handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Outcome of handling a gesture or key event.
///
/// The flags are independent and combine with `|`. A value without any flag
/// set means the event was ignored and should propagate further.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HandleEventResult(u8);

impl HandleEventResult {
    /// No flags: the event was ignored.
    pub const IGNORED: Self = Self(0);
    /// The event was consumed.
    pub const HANDLED: Self = Self(1);
    /// The owner wants to terminate the current interaction.
    pub const REQUEST_FINISH: Self = Self(2);
    /// The owner wants to be deactivated.
    pub const REQUEST_DEACTIVATION: Self = Self(4);

    const ALL: u8 = 0b111;

    /// Build from raw bits. Unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_ignored(self) -> bool {
        self.0 == 0
    }

    pub fn is_handled(self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub fn is_request_finish(self) -> bool {
        self.contains(Self::REQUEST_FINISH)
    }

    pub fn is_request_deactivation(self) -> bool {
        self.contains(Self::REQUEST_DEACTIVATION)
    }

    pub fn set_handled(self) -> Self {
        self | Self::HANDLED
    }

    pub fn set_request_finish(self) -> Self {
        self | Self::REQUEST_FINISH
    }

    pub fn set_request_deactivation(self) -> Self {
        self | Self::REQUEST_DEACTIVATION
    }

    pub fn clear_handled(self) -> Self {
        self.without(Self::HANDLED)
    }

    pub fn clear_request_finish(self) -> Self {
        self.without(Self::REQUEST_FINISH)
    }

    pub fn clear_request_deactivation(self) -> Self {
        self.without(Self::REQUEST_DEACTIVATION)
    }

    /// Whether all flags of `other` are set.
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for HandleEventResult {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for HandleEventResult {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for HandleEventResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ignored() {
            return f.write_str("IGNORED");
        }
        let names = [
            (Self::HANDLED, "HANDLED"),
            (Self::REQUEST_FINISH, "REQUEST_FINISH"),
            (Self::REQUEST_DEACTIVATION, "REQUEST_DEACTIVATION"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&set.join(" | "))
    }
}
