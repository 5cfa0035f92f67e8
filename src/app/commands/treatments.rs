use super::{Command, CommandContext};
use crate::app::args::ArgSpec;
use crate::domain::model::{Pet, Treatment};
use crate::domain::registry::PetList;
use crate::utils::error::{CareError, Result};
use crate::utils::validation::validate_field_text;

pub(crate) fn find_pet<'p>(pets: &'p PetList, name: &str) -> Result<&'p Pet> {
    pets.get_by_name(name).ok_or_else(|| CareError::PetNotFound {
        name: name.to_string(),
    })
}

fn find_pet_mut<'p>(pets: &'p mut PetList, name: &str) -> Result<&'p mut Pet> {
    pets.get_by_name_mut(name).ok_or_else(|| CareError::PetNotFound {
        name: name.to_string(),
    })
}

pub struct AddTreatmentCommand;

impl AddTreatmentCommand {
    const SYNTAX: &'static str = "add-treatment n/PET_NAME t/TREATMENT_NAME d/DATE [note/NOTE]";
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "t/", "d/"]).with_greedy(&["note/"]);
}

impl Command for AddTreatmentCommand {
    fn name(&self) -> &'static str {
        "add-treatment"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Logs a treatment for a pet"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let pet_name = args.require("n/", "Pet name", Self::SYNTAX)?;
        let name = args.require("t/", "Treatment name", Self::SYNTAX)?;
        let date = args.date("d/", "Date", Self::SYNTAX)?;
        validate_field_text("Treatment name", name)?;
        // An empty note/ just means no note.
        let note = args.get("note/").filter(|n| !n.is_empty());
        if let Some(n) = note {
            validate_field_text("Note", n)?;
        }

        let pet = find_pet_mut(ctx.pets, pet_name)?;
        if !pet.add_treatment(Treatment::new(name, note.map(str::to_string), date)) {
            return Err(CareError::DuplicateTreatment {
                pet: pet.name().to_string(),
                treatment: name.to_string(),
                date,
            });
        }
        tracing::info!("Added treatment '{}' for {} on {}", name, pet.name(), date);

        let mut out = format!(
            "Added treatment \"{}\" on {} for {}.",
            name,
            date,
            pet.name()
        );
        if let Some(n) = note {
            out.push_str(&format!("\n  Note: {}", n));
        }
        Ok(out)
    }
}

pub struct DeleteTreatmentCommand;

impl DeleteTreatmentCommand {
    const SYNTAX: &'static str = "delete-treatment n/PET_NAME i/INDEX";
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "i/"]);
}

impl Command for DeleteTreatmentCommand {
    fn name(&self) -> &'static str {
        "delete-treatment"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Deletes one of a pet's treatments by index"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let pet_name = args.require("n/", "Pet name", Self::SYNTAX)?;
        let index = args.index("i/", Self::SYNTAX)?;

        let pet = find_pet_mut(ctx.pets, pet_name)?;
        let removed = pet.remove_treatment(index).ok_or_else(|| CareError::InvalidIndex {
            pet: pet.name().to_string(),
            index: index + 1,
        })?;
        tracing::info!("Deleted treatment '{}' from {}", removed.name(), pet.name());
        Ok(format!(
            "Deleted treatment \"{} on {}\" for {}.",
            removed.name(),
            removed.date(),
            pet.name()
        ))
    }
}

/// `mark` and `unmark` differ only in the flag they set.
pub struct MarkTreatmentCommand {
    completed: bool,
}

impl MarkTreatmentCommand {
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "i/"]);

    pub fn mark() -> Self {
        Self { completed: true }
    }

    pub fn unmark() -> Self {
        Self { completed: false }
    }
}

impl Command for MarkTreatmentCommand {
    fn name(&self) -> &'static str {
        if self.completed {
            "mark"
        } else {
            "unmark"
        }
    }

    fn syntax(&self) -> &'static str {
        if self.completed {
            "mark n/PET_NAME i/INDEX"
        } else {
            "unmark n/PET_NAME i/INDEX"
        }
    }

    fn summary(&self) -> &'static str {
        if self.completed {
            "Marks a treatment as completed"
        } else {
            "Marks a treatment as not completed"
        }
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let pet_name = args.require("n/", "Pet name", self.syntax())?;
        let index = args.index("i/", self.syntax())?;

        let pet = find_pet_mut(ctx.pets, pet_name)?;
        let display_name = pet.name().to_string();
        let treatment = pet
            .treatment_mut(index)
            .ok_or_else(|| CareError::InvalidIndex {
                pet: display_name.clone(),
                index: index + 1,
            })?;
        treatment.set_completed(self.completed);
        tracing::info!(
            "{}: {} i/{} \"{}\"",
            self.name(),
            display_name,
            index + 1,
            treatment.name()
        );

        let status = if self.completed {
            "Marked as done"
        } else {
            "Marked as not done"
        };
        Ok(format!(
            "{}\nPet: {}\nIndex: {}\n  {}",
            status,
            display_name,
            index + 1,
            treatment
        ))
    }
}

pub struct ListPetTreatmentsCommand;

impl ListPetTreatmentsCommand {
    const SYNTAX: &'static str = "list-treatments n/PET_NAME";
    const ARGS: ArgSpec = ArgSpec::new(&["n/"]);
}

impl Command for ListPetTreatmentsCommand {
    fn name(&self) -> &'static str {
        "list-treatments"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Lists one pet's treatments with their indices"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let pet = find_pet(ctx.pets, args.require("n/", "Pet name", Self::SYNTAX)?)?;
        if pet.treatments().is_empty() {
            return Ok(format!("{} has no logged treatments.", pet.name()));
        }
        let mut lines = vec![format!("{}'s treatment history:", pet.name())];
        lines.extend(
            pet.treatments()
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{}. {}", i + 1, t)),
        );
        Ok(lines.join("\n"))
    }
}

pub struct ListAllTreatmentsCommand;

impl Command for ListAllTreatmentsCommand {
    fn name(&self) -> &'static str {
        "list-all-treatments"
    }

    fn syntax(&self) -> &'static str {
        "list-all-treatments"
    }

    fn summary(&self) -> &'static str {
        "Lists every treatment of every pet by date"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        if !args.trim().is_empty() {
            return Err(CareError::usage(self.syntax()));
        }
        let mut rows: Vec<(&Pet, &Treatment)> = ctx
            .pets
            .iter()
            .flat_map(|p| p.treatments().iter().map(move |t| (p, t)))
            .collect();
        if rows.is_empty() {
            return Ok("No treatments logged.".to_string());
        }
        rows.sort_by_key(|(_, t)| t.date());
        Ok(rows
            .iter()
            .map(|(p, t)| format!("{}: {}", p.name(), t))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
