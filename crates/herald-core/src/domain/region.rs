//! Language → regional context table used by the generators.

/// ISO 639-1 code → region description.
const LANGUAGE_REGIONS: [(&str, &str); 19] = [
    ("en", "North America / UK / Australia (Global Western)"),
    ("es", "Spain / Latin America"),
    ("fr", "France / Quebec / West Africa"),
    ("de", "Germany / Austria / Switzerland"),
    ("it", "Italy"),
    ("pt", "Brazil / Portugal"),
    ("hi", "India (Regional Hub)"),
    ("ar", "Middle East / North Africa (MENA)"),
    ("zh", "China / East Asia"),
    ("ja", "Japan"),
    ("ko", "Korea"),
    ("ms", "Malaysia / Southeast Asia"),
    ("ta", "Tamil Nadu / South Asia"),
    ("te", "Andhra Pradesh / South Asia"),
    ("vi", "Vietnam"),
    ("ru", "Russia / CIS Region"),
    ("tr", "Turkey"),
    ("id", "Indonesia"),
    ("th", "Thailand"),
];

pub fn region_for_language(language: &str) -> Option<&'static str> {
    LANGUAGE_REGIONS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, region)| *region)
}
