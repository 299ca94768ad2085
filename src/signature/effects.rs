//! State-impact classification of well-known functions.

use std::fmt;

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Effects a function call has on chain state.
    ///
    /// The empty mask means the effects are unknown. Compound categories are
    /// unions of the categories declared above them plus their own bit, so a
    /// new compound must only be built from flags that already exist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectMask: u64 {
        /// Reads state
        const READ = 1 << 0;
        /// Changes any data on chain
        const WRITE = 1 << 1;
        /// Emits an event
        const TRIGGER = 1 << 2;

        /// Writes contract storage
        const STATE_WRITE = Self::WRITE.bits() | 1 << 3;
        /// Writes to an address (code or balance)
        const ADDRESS_WRITE = Self::WRITE.bits() | 1 << 4;

        /// Moves funds
        const TRANSFER = Self::STATE_WRITE.bits() | Self::TRIGGER.bits() | 1 << 5;
        /// Mints tokens
        const MINT = Self::TRANSFER.bits() | 1 << 6;
        /// Burns tokens
        const BURN = Self::TRANSFER.bits() | 1 << 7;
        /// Destroys the contract
        const SELFDESTRUCT = Self::ADDRESS_WRITE.bits()
            | Self::STATE_WRITE.bits()
            | Self::TRIGGER.bits()
            | 1 << 8;
        /// Grants or revokes a role
        const ACCESS_CONTROL_UPDATE = Self::STATE_WRITE.bits() | 1 << 9;
    }
}

impl EffectMask {
    /// Returns true if no effect is known
    pub fn is_unknown(&self) -> bool {
        self.is_empty()
    }

    /// Returns true if `self` shares any category with `other`
    pub fn is(&self, other: EffectMask) -> bool {
        self.intersects(other)
    }

    /// Name of the exact category, "unknown" for anything else.
    ///
    /// The bare write bit only ever appears inside a compound and has no name.
    pub fn name(&self) -> &'static str {
        const NAMES: [(EffectMask, &str); 9] = [
            (EffectMask::READ, "read"),
            (EffectMask::TRIGGER, "trigger"),
            (EffectMask::STATE_WRITE, "state write"),
            (EffectMask::ADDRESS_WRITE, "address write"),
            (EffectMask::TRANSFER, "transfer"),
            (EffectMask::MINT, "mint"),
            (EffectMask::BURN, "burn"),
            (EffectMask::SELFDESTRUCT, "selfdestruct"),
            (EffectMask::ACCESS_CONTROL_UPDATE, "access control update"),
        ];

        NAMES
            .iter()
            .find(|(mask, _)| mask == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for EffectMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for EffectMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compounds_contain_their_parts() {
        assert!(EffectMask::STATE_WRITE.contains(EffectMask::WRITE));
        assert!(EffectMask::ADDRESS_WRITE.contains(EffectMask::WRITE));
        assert!(EffectMask::TRANSFER.contains(EffectMask::STATE_WRITE | EffectMask::TRIGGER));
        assert!(EffectMask::MINT.contains(EffectMask::TRANSFER));
        assert!(EffectMask::BURN.contains(EffectMask::TRANSFER));
        assert!(EffectMask::SELFDESTRUCT
            .contains(EffectMask::ADDRESS_WRITE | EffectMask::STATE_WRITE | EffectMask::TRIGGER));
        assert!(EffectMask::ACCESS_CONTROL_UPDATE.contains(EffectMask::STATE_WRITE));
        assert!(!EffectMask::ACCESS_CONTROL_UPDATE.contains(EffectMask::TRIGGER));
    }

    #[test]
    fn test_compounds_are_distinct() {
        assert_ne!(EffectMask::MINT, EffectMask::BURN);
        assert!(!EffectMask::MINT.contains(EffectMask::BURN));
        assert!(!EffectMask::TRANSFER.contains(EffectMask::ADDRESS_WRITE));
    }

    #[test]
    fn test_is_and_unknown() {
        assert!(EffectMask::empty().is_unknown());
        assert!(EffectMask::MINT.is(EffectMask::TRIGGER));
        assert!(!EffectMask::READ.is(EffectMask::WRITE));
        assert!(!EffectMask::empty().is(EffectMask::READ));
    }

    #[test]
    fn test_names() {
        assert_eq!(EffectMask::READ.to_string(), "read");
        assert_eq!(EffectMask::BURN.to_string(), "burn");
        assert_eq!(EffectMask::ACCESS_CONTROL_UPDATE.to_string(), "access control update");
        assert_eq!(EffectMask::STATE_WRITE.to_string(), "state write");
        assert_eq!(EffectMask::WRITE.to_string(), "unknown");
        assert_eq!(EffectMask::empty().to_string(), "unknown");
        assert_eq!((EffectMask::READ | EffectMask::TRIGGER).to_string(), "unknown");
    }
}
