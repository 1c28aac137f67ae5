//! Strongly typed, zero-cost identifier wrappers.
//!
//! Vendor identifiers (`StreetId`, `NodeId`, `ConditionId`, `ProfileId`)
//! wrap `i64`: MultiNet ships them as doubles that exceed the 32-bit range,
//! and HERE link ids are large integers.  `EdgeId` is the dense position of
//! an edge in the prepared edge table and doubles as the output object id
//! (`EdgeFID`) via [`EdgeId::oid`].

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Dense index of an edge in the prepared edge table.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Vendor street identifier (HERE `LINK_ID`, MultiNet `ID`).
    pub struct StreetId(i64);
}

typed_id! {
    /// Vendor junction identifier (HERE `REF_IN_ID`/`NREF_IN_ID`,
    /// MultiNet `F_JNCTID`/`T_JNCTID`/`JNCTID`).
    pub struct NodeId(i64);
}

typed_id! {
    /// Key linking the rows of one condition or maneuver (HERE `COND_ID`,
    /// MultiNet maneuver/sign `ID`).
    pub struct ConditionId(i64);
}

typed_id! {
    /// Speed profile / pattern identifier as written by the vendor.
    pub struct ProfileId(i64);
}

impl EdgeId {
    /// 1-based object id written to `EdgeFID` / `Edge#FID` columns.
    #[inline]
    pub fn oid(self) -> i64 {
        i64::from(self.0) + 1
    }
}
