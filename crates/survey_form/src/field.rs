use std::{fmt, str::FromStr};

use thiserror::Error;

/// Editable survey fields, addressed by the form's input names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    StreetAddress,
    City,
    State,
    ZipCode,
    Phone,
    Email,
    SurveyDate,
    GraduationMonth,
    GraduationYear,
    LikedMost,
    InterestSource,
    Likelihood,
    Comments,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown survey field {0:?}")]
pub struct UnknownField(pub String);

impl Field {
    pub const ALL: [Field; 15] = [
        Field::FirstName,
        Field::LastName,
        Field::StreetAddress,
        Field::City,
        Field::State,
        Field::ZipCode,
        Field::Phone,
        Field::Email,
        Field::SurveyDate,
        Field::GraduationMonth,
        Field::GraduationYear,
        Field::LikedMost,
        Field::InterestSource,
        Field::Likelihood,
        Field::Comments,
    ];

    /// Fields the submission gate insists on.
    pub const REQUIRED: [Field; 4] = [
        Field::FirstName,
        Field::LastName,
        Field::ZipCode,
        Field::SurveyDate,
    ];

    /// Key used in request bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::FirstName => "stu_first",
            Field::LastName => "stu_last",
            Field::StreetAddress => "stu_street",
            Field::City => "stu_city",
            Field::State => "stu_state",
            Field::ZipCode => "stu_zip",
            Field::Phone => "stu_phone",
            Field::Email => "stu_email",
            Field::SurveyDate => "survey_date",
            Field::GraduationMonth => "stu_gradmonth",
            Field::GraduationYear => "stu_gradyear",
            Field::LikedMost => "stu_likedmost",
            Field::InterestSource => "stu_interestsource",
            Field::Likelihood => "stu_likelihood",
            Field::Comments => "additional_comments",
        }
    }

    /// Key used by the listing endpoint.
    pub fn listing_name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::StreetAddress => "street_address",
            Field::City => "city",
            Field::State => "state",
            Field::ZipCode => "zip",
            Field::Phone => "telephone",
            Field::Email => "email",
            Field::SurveyDate => "date_of_survey",
            Field::GraduationMonth => "graduation_month",
            Field::GraduationYear => "graduation_year",
            Field::LikedMost => "liked_most",
            Field::InterestSource => "interest_source",
            Field::Likelihood => "likelihood",
            Field::Comments => "comments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::StreetAddress => "Street Address",
            Field::City => "City",
            Field::State => "State",
            Field::ZipCode => "Zip Code",
            Field::Phone => "Phone Number",
            Field::Email => "Email",
            Field::SurveyDate => "Date of Survey",
            Field::GraduationMonth => "HS Graduation Month",
            Field::GraduationYear => "HS Graduation Year",
            Field::LikedMost => "Liked Most",
            Field::InterestSource => "Interest Source",
            Field::Likelihood => "Likelihood",
            Field::Comments => "Additional Comments",
        }
    }

    /// City and state follow the zip code and cannot be set directly.
    pub fn is_derived(self) -> bool {
        matches!(self, Field::City | Field::State)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts wire names, listing names, and the hyphenated listing name.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
        Field::ALL
            .into_iter()
            .find(|field| field.wire_name() == wanted || field.listing_name() == wanted)
            .ok_or_else(|| UnknownField(raw.to_string()))
    }
}
