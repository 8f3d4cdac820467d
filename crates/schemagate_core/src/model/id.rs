//! Strongly-typed integer identifiers.

use serde::{Deserialize, Serialize};

/// Primary key of a `Company_List` row (`smallint`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i16);

/// Key of the company group a company belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyGroupId(i32);

macro_rules! impl_int_newtype {
    ($t:ty, $inner:ty) => {
        impl $t {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $t {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $inner {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_int_newtype!(CompanyId, i16);
impl_int_newtype!(CompanyGroupId, i32);
