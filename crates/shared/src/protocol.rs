use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{GraduationMonth, InterestSource, Likelihood, SurveyId};

pub const SURVEY_DATE_FORMAT: &str = "%Y-%m-%d";

/// One survey submission as sent to and received from the survey collection.
///
/// Outgoing keys follow the form field names (`stu_first`, `survey_date`, ...).
/// Incoming bodies may also use the listing names (`first_name`,
/// `date_of_survey`, ...). Empty optional values travel as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SurveyId>,
    #[serde(rename = "stu_first", alias = "first_name", default, deserialize_with = "wire::text")]
    pub first_name: String,
    #[serde(rename = "stu_last", alias = "last_name", default, deserialize_with = "wire::text")]
    pub last_name: String,
    #[serde(rename = "stu_street", alias = "street_address", default, deserialize_with = "wire::text")]
    pub street_address: String,
    #[serde(rename = "stu_city", alias = "city", default, deserialize_with = "wire::text")]
    pub city: String,
    #[serde(rename = "stu_state", alias = "state", default, deserialize_with = "wire::text")]
    pub state: String,
    #[serde(rename = "stu_zip", alias = "zip", default, deserialize_with = "wire::zip_code")]
    pub zip_code: String,
    #[serde(rename = "stu_phone", alias = "telephone", default, deserialize_with = "wire::text")]
    pub phone: String,
    #[serde(rename = "stu_email", alias = "email", default, deserialize_with = "wire::text")]
    pub email: String,
    #[serde(alias = "date_of_survey", default, with = "wire::blank_date")]
    pub survey_date: Option<NaiveDate>,
    #[serde(rename = "stu_gradmonth", alias = "graduation_month", default, with = "wire::blank_choice")]
    pub graduation_month: Option<GraduationMonth>,
    #[serde(rename = "stu_gradyear", alias = "graduation_year", default, deserialize_with = "wire::text")]
    pub graduation_year: String,
    /// Comma-joined liked-most options; see the form codec for the canonical form.
    #[serde(rename = "stu_likedmost", alias = "liked_most", default, deserialize_with = "wire::text")]
    pub liked_most: String,
    #[serde(rename = "stu_interestsource", alias = "interest_source", default, with = "wire::blank_choice")]
    pub interest_source: Option<InterestSource>,
    #[serde(rename = "stu_likelihood", alias = "likelihood", default, deserialize_with = "wire::likelihood")]
    pub likelihood: Likelihood,
    #[serde(rename = "additional_comments", alias = "comments", default, deserialize_with = "wire::text")]
    pub comments: String,
}

impl SurveyRecord {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn survey_date_text(&self) -> String {
        self.survey_date
            .map(|date| date.format(SURVEY_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

mod wire {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::SURVEY_DATE_FORMAT;
    use crate::domain::{Choice, Likelihood};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Number(serde_json::Number),
    }

    /// Free text; backends may hand back numeric columns (phone, year) as
    /// JSON numbers.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<RawText>::deserialize(deserializer)? {
            Some(RawText::Text(text)) => text,
            Some(RawText::Number(number)) => number.to_string(),
            None => String::new(),
        })
    }

    /// Null or blank falls back to the form default.
    pub fn likelihood<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Likelihood, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Likelihood::default());
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Likelihood::default());
        }
        Likelihood::from_label(raw)
            .ok_or_else(|| de::Error::custom(format!("unknown {} {raw:?}", Likelihood::KIND)))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawZip {
        Text(String),
        Number(u32),
    }

    pub fn zip_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<RawZip>::deserialize(deserializer)? {
            Some(RawZip::Text(text)) => text,
            Some(RawZip::Number(number)) => format!("{number:05}"),
            None => String::new(),
        })
    }

    pub mod blank_date {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => serializer.collect_str(&date.format(SURVEY_DATE_FORMAT)),
                None => serializer.serialize_str(""),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            parse_date(raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid survey date {raw:?}")))
        }

        /// Accepts `YYYY-MM-DD`, an ISO timestamp, or an RFC 2822 date as
        /// emitted by some JSON backends for date columns.
        fn parse_date(raw: &str) -> Option<NaiveDate> {
            if let Ok(date) = NaiveDate::parse_from_str(raw, SURVEY_DATE_FORMAT) {
                return Some(date);
            }
            if let Some((day, _)) = raw.split_once('T') {
                if let Ok(date) = NaiveDate::parse_from_str(day, SURVEY_DATE_FORMAT) {
                    return Some(date);
                }
            }
            DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|stamp| stamp.date_naive())
        }
    }

    pub mod blank_choice {
        use super::*;

        pub fn serialize<T: Choice, S: Serializer>(
            value: &Option<T>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str((*value).map(Choice::label).unwrap_or_default())
        }

        pub fn deserialize<'de, T: Choice, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<T>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            T::from_label(raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unknown {} {raw:?}", T::KIND)))
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
