//! Record model
//!
//! A [`Record`] is the field map extracted from one detail page. Field names
//! come from a closed vocabulary ([`Field`]); unset fields are simply absent.

mod labels;

pub use labels::{field_for_label, DESCRIPTION_LABELS};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Every field a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Name,
    Sex,
    DateOfBirth,
    PlaceOfBirth,
    DateOfCase,
    PlaceOfCase,
    Details,
    Height,
    Weight,
    Hair,
    Eyes,
    Race,
    Nationality,
    Reward,
    FieldOffice,
    Source,
    PicUrl,
    PicBase64,
    AdditionalPicUrl,
    AdditionalPicBase64,
}

impl Field {
    /// All fields, in declaration order
    pub const ALL: [Field; 21] = [
        Field::Id,
        Field::Name,
        Field::Sex,
        Field::DateOfBirth,
        Field::PlaceOfBirth,
        Field::DateOfCase,
        Field::PlaceOfCase,
        Field::Details,
        Field::Height,
        Field::Weight,
        Field::Hair,
        Field::Eyes,
        Field::Race,
        Field::Nationality,
        Field::Reward,
        Field::FieldOffice,
        Field::Source,
        Field::PicUrl,
        Field::PicBase64,
        Field::AdditionalPicUrl,
        Field::AdditionalPicBase64,
    ];

    /// Column name used in exported tables
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name",
            Self::Sex => "Sex",
            Self::DateOfBirth => "DateOfBirth",
            Self::PlaceOfBirth => "PlaceOfBirth",
            Self::DateOfCase => "DateOfCase",
            Self::PlaceOfCase => "PlaceOfCase",
            Self::Details => "Details",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Hair => "Hair",
            Self::Eyes => "Eyes",
            Self::Race => "Race",
            Self::Nationality => "Nationality",
            Self::Reward => "Reward",
            Self::FieldOffice => "FieldOffice",
            Self::Source => "Source",
            Self::PicUrl => "PicUrl",
            Self::PicBase64 => "PicBase64",
            Self::AdditionalPicUrl => "AdditionalPicUrl",
            Self::AdditionalPicBase64 => "AdditionalPicBase64",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// The fixed export schema
pub const DEFAULT_COLUMNS: [Field; 13] = [
    Field::Id,
    Field::Name,
    Field::Sex,
    Field::DateOfBirth,
    Field::PlaceOfBirth,
    Field::Nationality,
    Field::PlaceOfCase,
    Field::DateOfCase,
    Field::Details,
    Field::Height,
    Field::Hair,
    Field::Eyes,
    Field::Source,
];

/// Structured fields extracted from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<Field, String>,
}

impl Record {
    /// Creates a record for the given detail URL
    ///
    /// `Source` is set here and nowhere else, and `Id` is always present
    /// but empty: no stable identifier is derivable from the markup yet.
    pub fn for_source(url: &str) -> Self {
        let mut record = Self::default();
        record.fields.insert(Field::Id, String::new());
        record.fields.insert(Field::Source, url.to_string());
        record
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Value for export, empty when unset
    pub fn value(&self, field: Field) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn source(&self) -> &str {
        self.value(Field::Source)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

/// Records in discovery order
pub type RecordSet = Vec<Record>;
