//! crates/sv_core/src/ids.rs
//! Name tokens for parties and districts.
//! District names are Norwegian county names ("Østfold", "Møre og Romsdal"),
//! so tokens are UTF-8; the shape check only rejects empty, padded, overlong
//! or control-character names.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const NAME_MAX_CHARS: usize = 64;

/// Token shape shared by party codes and district names.
#[inline]
pub fn is_valid_name(s: &str) -> bool {
    let len = s.chars().count();
    (1..=NAME_MAX_CHARS).contains(&len)
        && s.trim() == s
        && !s.chars().any(char::is_control)
}

macro_rules! name_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_name(s) { Ok(Self(s.to_owned())) } else { Err(CoreError::InvalidName) }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                if is_valid_name(&value) { Ok(Self(value)) } else { Err(CoreError::InvalidName) }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

name_newtype!(
    /// Party code as used on the ballot statistics ("A", "H", "FRP", "RØDT").
    /// Ordering is plain lexicographic and doubles as the seat tie rule.
    PartyCode
);

name_newtype!(
    /// Electoral district (county) name.
    DistrictId
);
