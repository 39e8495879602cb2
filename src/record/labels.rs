//! Description-table labels and the fields they populate

use crate::record::Field;

/// Label text in the first cell of a description row, and its target field
pub const DESCRIPTION_LABELS: &[(&str, Field)] = &[
    ("Date(s) of Birth Used", Field::DateOfBirth),
    ("Place of Birth", Field::PlaceOfBirth),
    ("Hair", Field::Hair),
    ("Eyes", Field::Eyes),
    ("Height", Field::Height),
    ("Weight", Field::Weight),
    ("Sex", Field::Sex),
    ("Race", Field::Race),
    ("Nationality", Field::Nationality),
];

/// Looks up a row label; matching is exact and case-sensitive
pub fn field_for_label(label: &str) -> Option<Field> {
    DESCRIPTION_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, field)| *field)
}
