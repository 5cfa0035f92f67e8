//! Line grammar of the store file.
//!
//! ```text
//! # Pets
//! name | species | age
//!
//! # Treatments
//! petName | treatmentName | YYYY-MM-DD | completed | note
//! ```
//!
//! Names and species are lower-cased on read. Pet lines ignore fields past the
//! third; treatment lines split into at most five fields so a note may contain
//! the separator.

use crate::domain::model::Treatment;
use crate::domain::registry::PetList;
use crate::utils::validation::{parse_iso_date, FIELD_SEPARATOR};
use std::fmt::Write;
use thiserror::Error;

pub const PETS_HEADER: &str = "# Pets";
pub const TREATMENTS_HEADER: &str = "# Treatments";

const PET_FIELDS: usize = 3;
const TREATMENT_MIN_FIELDS: usize = 4;
const TREATMENT_MAX_FIELDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Pets,
    Treatments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Header(Section),
    Data(&'a str),
}

/// Trims the line and recognizes headers case-insensitively.
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        Line::Blank
    } else if line.eq_ignore_ascii_case(PETS_HEADER) {
        Line::Header(Section::Pets)
    } else if line.eq_ignore_ascii_case(TREATMENTS_HEADER) {
        Line::Header(Section::Treatments)
    } else {
        Line::Data(line)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("{0} is blank")]
    BlankField(&'static str),

    #[error("invalid age '{0}'")]
    InvalidAge(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetRecord {
    pub name: String,
    pub species: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRecord {
    pub pet_name: String,
    pub treatment: Treatment,
}

fn canonical(field: &str) -> String {
    field.trim().to_lowercase()
}

pub fn parse_pet_line(line: &str) -> Result<PetRecord, RecordError> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() < PET_FIELDS {
        return Err(RecordError::TooFewFields {
            expected: PET_FIELDS,
            found: parts.len(),
        });
    }

    let name = canonical(parts[0]);
    if name.is_empty() {
        return Err(RecordError::BlankField("pet name"));
    }
    let species = canonical(parts[1]);
    if species.is_empty() {
        return Err(RecordError::BlankField("species"));
    }

    // The sign is dropped; magnitudes past u32 are invalid.
    let raw_age = parts[2].trim();
    let age = raw_age
        .parse::<i64>()
        .ok()
        .and_then(|a| u32::try_from(a.unsigned_abs()).ok())
        .ok_or_else(|| RecordError::InvalidAge(raw_age.to_string()))?;

    Ok(PetRecord { name, species, age })
}

pub fn parse_treatment_line(line: &str) -> Result<TreatmentRecord, RecordError> {
    let parts: Vec<&str> = line.splitn(TREATMENT_MAX_FIELDS, FIELD_SEPARATOR).collect();
    if parts.len() < TREATMENT_MIN_FIELDS {
        return Err(RecordError::TooFewFields {
            expected: TREATMENT_MIN_FIELDS,
            found: parts.len(),
        });
    }

    let pet_name = canonical(parts[0]);
    if pet_name.is_empty() {
        return Err(RecordError::BlankField("pet name"));
    }
    let name = canonical(parts[1]);
    if name.is_empty() {
        return Err(RecordError::BlankField("treatment name"));
    }

    let raw_date = parts[2].trim();
    let date = parse_iso_date(raw_date)
        .ok_or_else(|| RecordError::InvalidDate(raw_date.to_string()))?;

    // Anything but a literal `true` reads as not completed.
    let completed = parts[3].trim().eq_ignore_ascii_case("true");
    let note = parts.get(4).map(|n| n.trim().to_string());

    Ok(TreatmentRecord {
        pet_name,
        treatment: Treatment::new(name, note, date).with_completed(completed),
    })
}

pub fn encode(pets: &PetList) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", PETS_HEADER);
    for pet in pets {
        let _ = writeln!(out, "{} | {} | {}", pet.name(), pet.species(), pet.age());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", TREATMENTS_HEADER);
    for pet in pets {
        for t in pet.treatments() {
            let _ = writeln!(
                out,
                "{} | {} | {} | {} | {}",
                pet.name(),
                t.name(),
                t.date(),
                t.is_completed(),
                t.note().unwrap_or("")
            );
        }
    }
    out
}
