//! Transaction type tags.

use std::fmt;

/// The 2-byte code selecting which body layout applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EntityType(pub u16);

impl EntityType {
    pub const TRANSFER: Self = Self(0x4154);
    pub const MOSAIC_DEFINITION: Self = Self(0x414D);
    pub const MULTISIG_ACCOUNT_MODIFICATION: Self = Self(0x4155);
    pub const NAMESPACE_METADATA: Self = Self(0x4344);
    pub const AGGREGATE_COMPLETE: Self = Self(0x4141);
    pub const AGGREGATE_BONDED: Self = Self(0x4241);

    pub const fn is_aggregate(self) -> bool {
        self.0 == Self::AGGREGATE_COMPLETE.0 || self.0 == Self::AGGREGATE_BONDED.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}
