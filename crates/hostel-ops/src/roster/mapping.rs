//! Header-synonym mapping for roster exports. Spreadsheets from different
//! owners label the same columns differently; normalization happens here so
//! the parser works off one canonical field set.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RosterField {
    FullName,
    Phone,
    Room,
    JoinDate,
    FeeAmount,
}

/// Normalize a raw header cell: strip the BOM, trim, lowercase, collapse
/// internal whitespace.
pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn field_for_header(raw: &str) -> Option<RosterField> {
    match normalize_header(raw).as_str() {
        "name" | "full name" | "student" | "student name" => Some(RosterField::FullName),
        "phone" | "mobile" | "contact" | "phone number" => Some(RosterField::Phone),
        "room" | "room no" | "room no." | "room number" | "room id" => Some(RosterField::Room),
        "join date" | "joined" | "joining date" | "date of joining" => Some(RosterField::JoinDate),
        "fee" | "fees" | "fee amount" | "monthly fee" | "rent" | "monthly rent" => {
            Some(RosterField::FeeAmount)
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(raw: &str) -> Option<RosterField> {
    field_for_header(raw)
}
