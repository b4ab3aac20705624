//! Zip-driven derivation of city and state.

use shared::protocol::SurveyRecord;

use crate::zip::ZipTable;

/// City and state for a raw zip input, or two empty strings when the trimmed
/// input is not exactly five ASCII digits or is absent from the table.
pub fn derive_location(zip: &str, table: &ZipTable) -> (String, String) {
    let zip = zip.trim();
    if !is_five_digits(zip) {
        return (String::new(), String::new());
    }
    match table.lookup(zip) {
        Some(entry) => (entry.city.clone(), entry.state.clone()),
        None => (String::new(), String::new()),
    }
}

/// Recomputes `city`/`state` from the record's current zip code.
pub fn apply(record: &mut SurveyRecord, table: &ZipTable) {
    let (city, state) = derive_location(&record.zip_code, table);
    record.city = city;
    record.state = state;
}

fn is_five_digits(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
