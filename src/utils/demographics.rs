//! Code tables used when validating participant registrations.

pub const OUT_OF_US: &str = "OO";

const US_STATES: [(&str, &str); 52] = [
    ("NY", "New York"),
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District Of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    (OUT_OF_US, "Out of US"),
];

const GENDERS: [(&str, &str); 4] = [
    ("M", "Male"),
    ("F", "Female"),
    ("N", "Non-Binary"),
    ("-", "Prefer not to answer"),
];

const ETHNICITIES: [(&str, &str); 7] = [
    ("as", "Asian/Pacific Islander"),
    ("aa", "Black or African American"),
    ("hs", "Hispanic or Latino"),
    ("na", "Native American or American Indian"),
    ("oo", "Other"),
    ("wh", "White"),
    ("pn", "Prefer not to respond"),
];

fn lookup(table: &[(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == code).map(|(_, label)| *label)
}

pub fn state_name(code: &str) -> Option<&'static str> {
    lookup(&US_STATES, code)
}

pub fn gender_label(code: &str) -> Option<&'static str> {
    lookup(&GENDERS, code)
}

pub fn ethnicity_label(code: &str) -> Option<&'static str> {
    lookup(&ETHNICITIES, code)
}
