//! Turns store text into a registry, dropping whatever would break its
//! invariants and counting each drop in a [`LoadReport`].

use crate::core::format::{self, Line, Section};
use crate::domain::model::{Pet, Treatment};
use crate::domain::registry::PetList;
use std::collections::{BTreeMap, HashMap};

/// What a load kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub pets_loaded: usize,
    pub treatments_loaded: usize,
    pub malformed_lines: usize,
    pub duplicate_pets: usize,
    pub orphaned_treatments: usize,
    pub duplicate_treatments: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.malformed_lines
            + self.duplicate_pets
            + self.orphaned_treatments
            + self.duplicate_treatments
    }

    pub fn is_clean(&self) -> bool {
        self.dropped() == 0
    }
}

/// Rebuilds `pets` from store contents.
///
/// Pets are registered as their lines are read; treatments are buffered per
/// pet name and only attached once every pet is known, so line order never
/// decides whether a treatment finds its pet. Bad lines are logged and
/// skipped, never fatal.
pub fn load_from_str(contents: &str, pets: &mut PetList) -> LoadReport {
    pets.clear();
    let mut report = LoadReport::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut pending: BTreeMap<String, Vec<Treatment>> = BTreeMap::new();
    let mut section = Section::Pets;

    for (number, raw) in contents.lines().enumerate() {
        let line_no = number + 1;
        let data = match format::classify(raw) {
            Line::Blank => continue,
            Line::Header(next) => {
                section = next;
                continue;
            }
            Line::Data(data) => data,
        };

        match section {
            Section::Pets => match format::parse_pet_line(data) {
                Ok(record) => {
                    if index.contains_key(&record.name) {
                        tracing::warn!(line = line_no, "Pet already added: {}", record.name);
                        report.duplicate_pets += 1;
                        continue;
                    }
                    let name = record.name.clone();
                    if !pets.add(Pet::new(record.name, record.species, record.age)) {
                        tracing::warn!(line = line_no, "Pet already added: {}", name);
                        report.duplicate_pets += 1;
                        continue;
                    }
                    index.insert(name, pets.len() - 1);
                    report.pets_loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(line = line_no, "Malformed pet line ({}): {}", e, data);
                    report.malformed_lines += 1;
                }
            },
            Section::Treatments => match format::parse_treatment_line(data) {
                Ok(record) => pending
                    .entry(record.pet_name)
                    .or_default()
                    .push(record.treatment),
                Err(e) => {
                    tracing::warn!(line = line_no, "Malformed treatment line ({}): {}", e, data);
                    report.malformed_lines += 1;
                }
            },
        }
    }

    reconcile(pets, &index, pending, &mut report);
    report
}

fn reconcile(
    pets: &mut PetList,
    index: &HashMap<String, usize>,
    pending: BTreeMap<String, Vec<Treatment>>,
    report: &mut LoadReport,
) {
    for (pet_name, treatments) in pending {
        let Some(pet) = index.get(&pet_name).and_then(|&i| pets.get_mut(i)) else {
            let names: Vec<&str> = treatments.iter().map(Treatment::name).collect();
            tracing::warn!(
                "Pet '{}' not found for treatments: {}",
                pet_name,
                names.join(", ")
            );
            report.orphaned_treatments += treatments.len();
            continue;
        };

        for treatment in treatments {
            let label = treatment.to_string();
            if pet.add_treatment(treatment) {
                report.treatments_loaded += 1;
            } else {
                tracing::warn!("Duplicate treatment '{}' for pet '{}'", label, pet.name());
                report.duplicate_treatments += 1;
            }
        }
    }
}
