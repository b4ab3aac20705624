//! Pre-submission gate. Only presence is checked; phone, email and zip
//! formats are left to input constraints at the boundary.

use shared::protocol::SurveyRecord;

use crate::field::Field;

pub fn missing_required(record: &SurveyRecord) -> Vec<Field> {
    Field::REQUIRED
        .into_iter()
        .filter(|field| !is_present(record, *field))
        .collect()
}

pub fn is_submittable(record: &SurveyRecord) -> bool {
    missing_required(record).is_empty()
}

fn is_present(record: &SurveyRecord, field: Field) -> bool {
    match field {
        Field::FirstName => !record.first_name.is_empty(),
        Field::LastName => !record.last_name.is_empty(),
        Field::ZipCode => !record.zip_code.is_empty(),
        Field::SurveyDate => record.survey_date.is_some(),
        _ => true,
    }
}
