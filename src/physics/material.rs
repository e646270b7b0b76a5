//! Collision material categories
//!
//! A mask selects which categories a probe reports. Each block snapshot also
//! carries the mask of categories it belongs to; a block is relevant to a
//! query when the two intersect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Raw category bits
pub mod flags {
    pub const SOLID: u8 = 1 << 0;
    pub const FLUID: u8 = 1 << 1;
    pub const TRIGGER: u8 = 1 << 2;
    pub const DAMAGE: u8 = 1 << 3;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MaterialMask(pub u8);

impl MaterialMask {
    pub const EMPTY: MaterialMask = MaterialMask(0);
    pub const SOLID: MaterialMask = MaterialMask(flags::SOLID);
    pub const FLUID: MaterialMask = MaterialMask(flags::FLUID);
    pub const TRIGGER: MaterialMask = MaterialMask(flags::TRIGGER);
    pub const DAMAGE: MaterialMask = MaterialMask(flags::DAMAGE);
    pub const ALL: MaterialMask =
        MaterialMask(flags::SOLID | flags::FLUID | flags::TRIGGER | flags::DAMAGE);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set
    pub fn contains(self, other: MaterialMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when at least one bit is shared
    pub fn intersects(self, other: MaterialMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn without(self, other: MaterialMask) -> MaterialMask {
        MaterialMask(self.0 & !other.0)
    }
}

impl BitOr for MaterialMask {
    type Output = MaterialMask;

    fn bitor(self, rhs: MaterialMask) -> MaterialMask {
        MaterialMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for MaterialMask {
    fn bitor_assign(&mut self, rhs: MaterialMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MaterialMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "MaterialMask(EMPTY)");
        }
        let names: Vec<&str> = [
            (MaterialMask::SOLID, "SOLID"),
            (MaterialMask::FLUID, "FLUID"),
            (MaterialMask::TRIGGER, "TRIGGER"),
            (MaterialMask::DAMAGE, "DAMAGE"),
        ]
        .into_iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| name)
        .collect();
        write!(f, "MaterialMask({})", names.join(" | "))
    }
}
