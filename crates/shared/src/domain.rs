use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownChoice;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SurveyId);

/// A closed vocabulary whose wire form is its display label.
pub trait Choice: Copy + Eq + 'static {
    /// Every option, in canonical order.
    const ALL: &'static [Self];
    const KIND: &'static str;

    fn label(self) -> &'static str;

    fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == raw)
    }
}

macro_rules! choice_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];
            const KIND: &'static str = $kind;

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::from_label(raw.trim()).ok_or_else(|| UnknownChoice::new($kind, raw))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

choice_enum!(LikedOption, "liked-most option", {
    Students => "Students",
    Location => "Location",
    Campus => "Campus",
    Atmosphere => "Atmosphere",
    DormRooms => "Dorm Rooms",
    Sports => "Sports",
});

choice_enum!(InterestSource, "interest source", {
    Friends => "Friends",
    Television => "Television",
    Internet => "Internet",
    Other => "Other",
});

choice_enum!(GraduationMonth, "graduation month", {
    January => "January",
    February => "February",
    March => "March",
    April => "April",
    May => "May",
    June => "June",
    July => "July",
    August => "August",
    September => "September",
    October => "October",
    November => "November",
    December => "December",
});

choice_enum!(Likelihood, "likelihood", {
    VeryLikely => "Very Likely",
    Likely => "Likely",
    Unlikely => "Unlikely",
});

impl Default for Likelihood {
    fn default() -> Self {
        Self::VeryLikely
    }
}
