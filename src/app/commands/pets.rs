use super::{Command, CommandContext};
use crate::app::args::ArgSpec;
use crate::domain::model::Pet;
use crate::utils::error::{CareError, Result};
use crate::utils::validation::validate_field_text;

pub struct AddPetCommand;

impl AddPetCommand {
    const SYNTAX: &'static str = "add-pet n/NAME s/SPECIES a/AGE";
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "s/", "a/"]);
}

impl Command for AddPetCommand {
    fn name(&self) -> &'static str {
        "add-pet"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Registers a new pet"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let name = args.require("n/", "Pet name", Self::SYNTAX)?;
        let species = args.require("s/", "Species", Self::SYNTAX)?;
        let age: u32 = args.number("a/", "Age", Self::SYNTAX)?;
        validate_field_text("Pet name", name)?;
        validate_field_text("Species", species)?;

        if !ctx.pets.add(Pet::new(name, species, age)) {
            return Err(CareError::DuplicatePet {
                name: name.to_string(),
            });
        }
        tracing::info!("Added pet {} ({}, {})", name, species, age);
        Ok(format!("{} has been successfully added.", name))
    }
}

pub struct DeletePetCommand;

impl DeletePetCommand {
    const SYNTAX: &'static str = "delete-pet n/PET_NAME";
    const ARGS: ArgSpec = ArgSpec::new(&["n/"]);
}

impl Command for DeletePetCommand {
    fn name(&self) -> &'static str {
        "delete-pet"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Removes a pet and all of its treatments"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let name = args.require("n/", "Pet name", Self::SYNTAX)?;
        let pet = ctx.pets.delete(name).ok_or_else(|| CareError::PetNotFound {
            name: name.to_string(),
        })?;
        tracing::info!("Deleted pet {} ({}, {})", pet.name(), pet.species(), pet.age());
        Ok(format!(
            "Successfully removed {} ({}, {}) from the list.",
            pet.name(),
            pet.species(),
            pet.age()
        ))
    }
}

pub struct EditPetCommand;

impl EditPetCommand {
    const SYNTAX: &'static str = "edit-pet n/NAME [nn/NEW_NAME] [s/SPECIES] [a/AGE]";
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "nn/", "s/", "a/"]);
}

impl Command for EditPetCommand {
    fn name(&self) -> &'static str {
        "edit-pet"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Changes a pet's name, species and/or age"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let args = Self::ARGS.parse(args)?;
        let old_name = args.require("n/", "Pet name", Self::SYNTAX)?;
        let new_name = args.optional("nn/", "New name")?;
        let species = args.optional("s/", "Species")?;
        let age: Option<u32> = args.optional_number("a/", "Age")?;
        if new_name.is_none() && species.is_none() && age.is_none() {
            return Err(CareError::usage(Self::SYNTAX));
        }
        if let Some(n) = new_name {
            validate_field_text("New name", n)?;
        }
        if let Some(s) = species {
            validate_field_text("Species", s)?;
        }

        let pet = ctx.pets.get_by_name(old_name).ok_or_else(|| CareError::PetNotFound {
            name: old_name.to_string(),
        })?;
        let current_name = pet.name().to_string();
        let rename = new_name.filter(|n| *n != current_name);
        let species = species.filter(|s| *s != pet.species());
        let age = age.filter(|a| *a != pet.age());

        let mut changes = Vec::new();
        if let Some(n) = rename {
            ctx.pets.rename(&current_name, n)?;
            changes.push(format!("name → {}", n));
        }
        let target = rename.unwrap_or(current_name.as_str());
        if let Some(pet) = ctx.pets.get_by_name_mut(target) {
            if let Some(s) = species {
                pet.set_species(s);
                changes.push(format!("species → {}", s));
            }
            if let Some(a) = age {
                pet.set_age(a);
                changes.push(format!("age → {}", a));
            }
        }

        if changes.is_empty() {
            return Ok(
                "Nothing to update. Provide at least one of nn/, s/, a/ with a new value."
                    .to_string(),
            );
        }
        tracing::info!("Edited pet {}: {}", current_name, changes.join(", "));
        Ok(format!("Updated {}: {}", current_name, changes.join(", ")))
    }
}

pub struct ListPetsCommand;

impl Command for ListPetsCommand {
    fn name(&self) -> &'static str {
        "list-pets"
    }

    fn syntax(&self) -> &'static str {
        "list-pets"
    }

    fn summary(&self) -> &'static str {
        "Lists all registered pets"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &str) -> Result<String> {
        if ctx.pets.is_empty() {
            return Ok("No pets found.".to_string());
        }
        let mut lines = vec!["Here are your pets:".to_string()];
        lines.extend(
            ctx.pets
                .iter()
                .enumerate()
                .map(|(i, pet)| format!("{}. {}", i + 1, pet)),
        );
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::PetList;
    use chrono::NaiveDate;

    fn exec(command: &dyn Command, pets: &mut PetList, args: &str) -> Result<String> {
        let mut ctx = CommandContext {
            pets,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        command.execute(&mut ctx, args)
    }

    #[test]
    fn test_add_pet_keeps_casing_and_multi_word_names() {
        let mut pets = PetList::new();
        let out = exec(&AddPetCommand, &mut pets, "n/Mr Whiskers s/Maine Coon a/4").unwrap();
        assert_eq!(out, "Mr Whiskers has been successfully added.");
        let pet = pets.get(0).unwrap();
        assert_eq!((pet.name(), pet.species(), pet.age()), ("Mr Whiskers", "Maine Coon", 4));
    }

    #[test]
    fn test_add_pet_rejections() {
        let mut pets = PetList::new();
        exec(&AddPetCommand, &mut pets, "n/Milo s/Cat a/3").unwrap();
        assert!(matches!(
            exec(&AddPetCommand, &mut pets, "n/MILO s/Dog a/1"),
            Err(CareError::DuplicatePet { .. })
        ));
        assert!(matches!(
            exec(&AddPetCommand, &mut pets, "n/Rex s/Dog a/-1"),
            Err(CareError::InvalidNumber { .. })
        ));
        assert!(matches!(
            exec(&AddPetCommand, &mut pets, "n/Rex s/Dog"),
            Err(CareError::UsageError { .. })
        ));
        assert!(matches!(
            exec(&AddPetCommand, &mut pets, "n/Rex|Max s/Dog a/2"),
            Err(CareError::InvalidField { .. })
        ));
        assert_eq!(pets.len(), 1);
    }

    #[test]
    fn test_delete_pet() {
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));
        let out = exec(&DeletePetCommand, &mut pets, "n/milo").unwrap();
        assert_eq!(out, "Successfully removed Milo (Cat, 3) from the list.");
        assert!(matches!(
            exec(&DeletePetCommand, &mut pets, "n/milo"),
            Err(CareError::PetNotFound { .. })
        ));
    }

    #[test]
    fn test_edit_pet_updates_fields() {
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));
        let out = exec(&EditPetCommand, &mut pets, "n/milo nn/Oscar s/Dog a/4").unwrap();
        assert_eq!(out, "Updated Milo: name → Oscar, species → Dog, age → 4");
        let pet = pets.get(0).unwrap();
        assert_eq!((pet.name(), pet.species(), pet.age()), ("Oscar", "Dog", 4));
    }

    #[test]
    fn test_edit_pet_conflicts_and_no_ops() {
        let mut pets = PetList::new();
        pets.add(Pet::new("Milo", "Cat", 3));
        pets.add(Pet::new("Rex", "Dog", 5));
        assert!(matches!(
            exec(&EditPetCommand, &mut pets, "n/Milo nn/rex"),
            Err(CareError::DuplicatePet { .. })
        ));
        let out = exec(&EditPetCommand, &mut pets, "n/Milo s/Cat a/3").unwrap();
        assert!(out.starts_with("Nothing to update"));
        assert!(matches!(
            exec(&EditPetCommand, &mut pets, "n/Milo"),
            Err(CareError::UsageError { .. })
        ));
        // Changing only the casing of the name is a rename.
        exec(&EditPetCommand, &mut pets, "n/Milo nn/MILO").unwrap();
        assert_eq!(pets.get(0).map(|p| p.name()), Some("MILO"));
        // So is changing only the casing of the species.
        let out = exec(&EditPetCommand, &mut pets, "n/milo s/cat").unwrap();
        assert_eq!(out, "Updated MILO: species → cat");
        assert_eq!(pets.get(0).map(|p| p.species()), Some("cat"));
    }

    #[test]
    fn test_list_pets() {
        let mut pets = PetList::new();
        assert_eq!(exec(&ListPetsCommand, &mut pets, "").unwrap(), "No pets found.");
        pets.add(Pet::new("Milo", "Cat", 3));
        assert_eq!(
            exec(&ListPetsCommand, &mut pets, "").unwrap(),
            "Here are your pets:\n1. Milo (Species: Cat, Age: 3 years old)"
        );
    }
}
