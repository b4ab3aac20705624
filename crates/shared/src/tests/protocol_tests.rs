use super::*;
use serde_json::json;

fn sample_record() -> SurveyRecord {
    SurveyRecord {
        id: Some(SurveyId(3)),
        first_name: "Ann".into(),
        last_name: "Lee".into(),
        zip_code: "22030".into(),
        city: "Fairfax".into(),
        state: "VA".into(),
        survey_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        graduation_month: Some(GraduationMonth::June),
        liked_most: "Campus,Sports".into(),
        interest_source: Some(InterestSource::Internet),
        likelihood: Likelihood::Likely,
        ..SurveyRecord::default()
    }
}

#[test]
fn serializes_with_form_field_names() {
    let value = serde_json::to_value(sample_record()).expect("serialize");
    assert_eq!(value["id"], 3);
    assert_eq!(value["stu_first"], "Ann");
    assert_eq!(value["stu_zip"], "22030");
    assert_eq!(value["survey_date"], "2024-05-01");
    assert_eq!(value["stu_gradmonth"], "June");
    assert_eq!(value["stu_likedmost"], "Campus,Sports");
    assert_eq!(value["stu_interestsource"], "Internet");
    assert_eq!(value["stu_likelihood"], "Likely");
    assert_eq!(value["additional_comments"], "");
}

#[test]
fn unpersisted_record_omits_id_and_blanks_optional_choices() {
    let value = serde_json::to_value(SurveyRecord::default()).expect("serialize");
    assert!(value.get("id").is_none());
    assert_eq!(value["survey_date"], "");
    assert_eq!(value["stu_gradmonth"], "");
    assert_eq!(value["stu_interestsource"], "");
    assert_eq!(value["stu_likelihood"], "Very Likely");
}

#[test]
fn accepts_listing_field_names() {
    let record: SurveyRecord = serde_json::from_value(json!({
        "id": 9,
        "first_name": "Bo",
        "last_name": "Park",
        "street_address": "1 Main St",
        "city": "Vienna",
        "state": "VA",
        "zip": 22180,
        "telephone": "7035550100",
        "email": "bo@example.com",
        "date_of_survey": "Wed, 01 May 2024 00:00:00 GMT",
        "graduation_month": "May",
        "graduation_year": "2023",
        "liked_most": "Students,Location",
        "interest_source": "Friends",
        "likelihood": "Unlikely",
        "comments": null
    }))
    .expect("deserialize");

    assert_eq!(record.id, Some(SurveyId(9)));
    assert_eq!(record.first_name, "Bo");
    assert_eq!(record.zip_code, "22180");
    assert_eq!(record.phone, "7035550100");
    assert_eq!(record.survey_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(record.graduation_month, Some(GraduationMonth::May));
    assert_eq!(record.interest_source, Some(InterestSource::Friends));
    assert_eq!(record.likelihood, Likelihood::Unlikely);
    assert_eq!(record.comments, "");
}

#[test]
fn numeric_zip_codes_are_zero_padded() {
    let record: SurveyRecord =
        serde_json::from_value(json!({ "stu_zip": 2108 })).expect("deserialize");
    assert_eq!(record.zip_code, "02108");
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let record: SurveyRecord = serde_json::from_value(json!({})).expect("deserialize");
    assert_eq!(record, SurveyRecord::default());
    assert!(!record.is_persisted());
}

#[test]
fn rejects_unknown_likelihood() {
    let err = serde_json::from_value::<SurveyRecord>(json!({ "stu_likelihood": "Maybe" }))
        .expect_err("unknown likelihood");
    assert!(err.to_string().contains("likelihood"), "unexpected error: {err}");
}

#[test]
fn accepts_iso_timestamp_dates() {
    let record: SurveyRecord =
        serde_json::from_value(json!({ "survey_date": "2024-05-01T00:00:00" }))
            .expect("deserialize");
    assert_eq!(record.survey_date_text(), "2024-05-01");
}

#[test]
fn numeric_text_columns_are_read_as_text() {
    let record: SurveyRecord = serde_json::from_value(json!({
        "id": 1,
        "graduation_year": 2023,
        "stu_phone": 7035550100u64
    }))
    .expect("deserialize");
    assert_eq!(record.graduation_year, "2023");
    assert_eq!(record.phone, "7035550100");
}

#[test]
fn null_or_blank_likelihood_uses_default() {
    for raw in [json!({ "likelihood": null }), json!({ "stu_likelihood": " " })] {
        let record: SurveyRecord = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(record.likelihood, Likelihood::VeryLikely);
    }
}
