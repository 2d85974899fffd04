//! Hub-side unit number

use std::fmt;

/// Small integer identifying a device in the host registry
///
/// Valid units are 1 through 254.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Unit(u8);

impl Unit {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 254;

    /// `None` outside 1..=254
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every valid unit in ascending order
    pub fn all() -> impl Iterator<Item = Unit> {
        (Self::MIN..=Self::MAX).map(Unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Unit> for u8 {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}
