//! Read-only views over every pet's treatments.

use super::treatments::find_pet;
use super::{Command, CommandContext};
use crate::app::args::ArgSpec;
use crate::domain::model::{Pet, Treatment};
use crate::domain::registry::PetList;
use crate::utils::error::{CareError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

type Row<'p> = (&'p Pet, &'p Treatment);

/// Every treatment of the pets in scope, in registry order.
fn rows<'p>(pets: impl IntoIterator<Item = &'p Pet>) -> Vec<Row<'p>> {
    pets.into_iter()
        .flat_map(|p| p.treatments().iter().map(move |t| (p, t)))
        .collect()
}

/// `None` means every pet.
fn scope<'p>(pets: &'p PetList, name: Option<&str>) -> Result<Vec<&'p Pet>> {
    match name {
        Some(n) => Ok(vec![find_pet(pets, n)?]),
        None => Ok(pets.iter().collect()),
    }
}

fn in_range(t: &Treatment, from: NaiveDate, to: NaiveDate) -> bool {
    t.date() >= from && t.date() <= to
}

fn row_line((pet, t): &Row<'_>) -> String {
    format!("{}: {}", pet.name(), t)
}

fn date_range(
    fields: &ArgSpec,
    args: &str,
    usage: &str,
) -> Result<(Option<String>, NaiveDate, NaiveDate)> {
    let args = fields.parse(args)?;
    let from = args.date("from/", "Start date", usage)?;
    let to = args.date("to/", "End date", usage)?;
    let pet = args.optional("n/", "Pet name")?.map(str::to_string);
    Ok((pet, from, to))
}

pub struct FindTreatmentCommand;

impl Command for FindTreatmentCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn syntax(&self) -> &'static str {
        "find KEYWORD"
    }

    fn summary(&self) -> &'static str {
        "Finds treatments whose name contains a keyword"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let keyword = args.trim();
        if keyword.is_empty() {
            return Err(CareError::usage(self.syntax()));
        }
        let needle = keyword.to_lowercase();
        let found: Vec<String> = rows(ctx.pets.iter())
            .iter()
            .filter(|(_, t)| t.name().to_lowercase().contains(&needle))
            .map(row_line)
            .collect();
        tracing::debug!("find '{}': {} match(es)", keyword, found.len());

        if found.is_empty() {
            return Ok(format!("No treatments found containing: \"{}\"", keyword));
        }
        let mut lines = vec![format!(
            "Found {} treatment(s) containing: \"{}\"",
            found.len(),
            keyword
        )];
        lines.extend(found);
        Ok(lines.join("\n"))
    }
}

pub struct TreatmentDateCommand;

impl TreatmentDateCommand {
    const SYNTAX: &'static str = "treatment-date from/DATE to/DATE";
    const ARGS: ArgSpec = ArgSpec::new(&["from/", "to/"]);
}

impl Command for TreatmentDateCommand {
    fn name(&self) -> &'static str {
        "treatment-date"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Lists treatments dated within a range"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let (_, from, to) = date_range(&Self::ARGS, args, Self::SYNTAX)?;
        if from > to {
            return Err(CareError::InvalidField {
                field: "Start date".to_string(),
                reason: "cannot be after end date".to_string(),
            });
        }
        let found: Vec<String> = rows(ctx.pets.iter())
            .iter()
            .filter(|(_, t)| in_range(t, from, to))
            .map(row_line)
            .collect();
        if found.is_empty() {
            return Ok(format!("No treatments found from {} to {}.", from, to));
        }
        let mut lines = vec![format!(
            "Found {} treatment(s) from {} to {}:",
            found.len(),
            from,
            to
        )];
        lines.extend(found);
        Ok(lines.join("\n"))
    }
}

pub struct FilterTreatmentsCommand;

impl FilterTreatmentsCommand {
    const SYNTAX: &'static str = "filter-treatments [n/PET_NAME] from/DATE to/DATE";
    const ARGS: ArgSpec = ArgSpec::new(&["n/", "from/", "to/"]);
}

impl Command for FilterTreatmentsCommand {
    fn name(&self) -> &'static str {
        "filter-treatments"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Lists treatments within a date range, optionally for one pet"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let (pet_name, mut from, mut to) = date_range(&Self::ARGS, args, Self::SYNTAX)?;
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }
        let pets = scope(ctx.pets, pet_name.as_deref())?;
        let mut found: Vec<Row<'_>> = rows(pets)
            .into_iter()
            .filter(|(_, t)| in_range(t, from, to))
            .collect();

        let label = pet_name.as_deref().unwrap_or("all pets");
        if found.is_empty() {
            return Ok(format!(
                "No treatments found for {} between {} and {}.",
                label, from, to
            ));
        }
        found.sort_by_key(|(_, t)| t.date());
        tracing::debug!("filter-treatments: {} row(s) for {}", found.len(), label);

        let header = match &pet_name {
            Some(name) => format!("{}'s treatments between {} and {}:", name, from, to),
            None => format!("Treatments between {} and {}:", from, to),
        };
        let mut lines = vec![header];
        lines.extend(
            found
                .iter()
                .enumerate()
                .map(|(i, row)| format!("{}. {}", i + 1, row_line(row))),
        );
        Ok(lines.join("\n"))
    }
}

pub struct OverdueTreatmentsCommand;

impl OverdueTreatmentsCommand {
    const SYNTAX: &'static str = "overdue-treatments [n/PET_NAME]";
    const ARGS: ArgSpec = ArgSpec::new(&["n/"]);
}

impl Command for OverdueTreatmentsCommand {
    fn name(&self) -> &'static str {
        "overdue-treatments"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Lists incomplete treatments dated before today"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        if ctx.pets.is_empty() {
            return Ok("No pets added".to_string());
        }
        let parsed = Self::ARGS.parse(args)?;
        if !parsed.preamble().is_empty() {
            return Err(CareError::usage(Self::SYNTAX));
        }
        let pet_name = parsed.optional("n/", "Pet name")?;
        let pets = scope(ctx.pets, pet_name)?;
        let today = ctx.today;
        // Report the pet's stored casing, not what was typed.
        let suffix = match (pet_name, pets.first()) {
            (Some(_), Some(pet)) => format!(" for {}", pet.name()),
            _ => String::new(),
        };

        let overdue: Vec<Row<'_>> = rows(pets)
            .into_iter()
            .filter(|(_, t)| !t.is_completed() && t.date() < today)
            .collect();

        if overdue.is_empty() {
            return Ok(format!("No overdue treatment{}. Way to go!", suffix));
        }
        let mut lines = vec![format!("Overdue Treatments{}:", suffix)];
        for (pet, t) in &overdue {
            let days = (today - t.date()).num_days();
            let entry = format!(
                "\"{}\" was due on {} (overdue for {} days)",
                t.name(),
                t.date(),
                days
            );
            if pet_name.is_some() {
                lines.push(entry);
            } else {
                lines.push(format!("{}: {}", pet.name(), entry));
            }
        }
        Ok(lines.join("\n"))
    }
}

pub struct GroupTreatmentsCommand;

impl GroupTreatmentsCommand {
    const SYNTAX: &'static str = "group-treatments [n/PET_NAME]";
    const ARGS: ArgSpec = ArgSpec::new(&["n/"]);

    /// The first word of the name, lower-cased so groups merge across casing.
    fn kind(t: &Treatment) -> String {
        t.name()
            .split_whitespace()
            .next()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl Command for GroupTreatmentsCommand {
    fn name(&self) -> &'static str {
        "group-treatments"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Groups treatments by type (first word of the name)"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let parsed = Self::ARGS.parse(args)?;
        let pet_name = parsed.optional("n/", "Pet name")?;
        let pets = scope(ctx.pets, pet_name)?;
        let all = rows(pets.iter().copied());

        let header = match pet_name {
            Some(_) => {
                let name = pets.first().map(|p| p.name()).unwrap_or_default();
                if all.is_empty() {
                    return Ok(format!("No treatments for {} to group.", name));
                }
                format!("{}'s treatments grouped by type:", name)
            }
            None => {
                if all.is_empty() {
                    return Ok("No treatments logged.".to_string());
                }
                "Treatments grouped by type:".to_string()
            }
        };

        let mut groups: BTreeMap<String, Vec<Row<'_>>> = BTreeMap::new();
        for row in all {
            groups.entry(Self::kind(row.1)).or_default().push(row);
        }
        let mut lines = vec![header];
        for (kind, mut members) in groups {
            members.sort_by_key(|(_, t)| t.date());
            lines.push(format!("== {} ==", kind));
            lines.extend(
                members
                    .iter()
                    .enumerate()
                    .map(|(i, row)| format!("{}. {}", i + 1, row_line(row))),
            );
        }
        Ok(lines.join("\n"))
    }
}

pub struct SummaryCommand;

impl SummaryCommand {
    const SYNTAX: &'static str = "summary from/DATE to/DATE";
    const ARGS: ArgSpec = ArgSpec::new(&["from/", "to/"]);
}

impl Command for SummaryCommand {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        "Summarises completed treatments within a date range"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let (_, from, to) = date_range(&Self::ARGS, args, Self::SYNTAX)?;
        if from > to {
            return Err(CareError::InvalidField {
                field: "Start date".to_string(),
                reason: "cannot be after end date".to_string(),
            });
        }
        let done: Vec<String> = rows(ctx.pets.iter())
            .iter()
            .filter(|(_, t)| t.is_completed() && in_range(t, from, to))
            .map(row_line)
            .collect();
        if done.is_empty() {
            return Ok(format!("No treatments found from {} to {}.", from, to));
        }
        let mut lines = vec![format!("Treatment Summary from: {} to: {}", from, to)];
        lines.extend(done);
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn exec(command: &dyn Command, pets: &mut PetList, args: &str) -> Result<String> {
        let mut ctx = CommandContext {
            pets,
            today: date(2024, 6, 1),
        };
        command.execute(&mut ctx, args)
    }

    fn sample() -> PetList {
        let mut milo = Pet::new("Milo", "Cat", 3);
        milo.add_treatment(
            Treatment::new("Vaccine booster", None, date(2024, 3, 10)).with_completed(true),
        );
        milo.add_treatment(Treatment::new("Deworming", None, date(2024, 5, 20)));
        let mut rex = Pet::new("Rex", "Dog", 5);
        rex.add_treatment(Treatment::new("vaccine rabies", None, date(2024, 1, 5)));
        rex.add_treatment(Treatment::new("Checkup", None, date(2024, 7, 1)));

        let mut pets = PetList::new();
        pets.add(milo);
        pets.add(rex);
        pets
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut pets = sample();
        let out = exec(&FindTreatmentCommand, &mut pets, "VACCINE").unwrap();
        assert_eq!(
            out,
            "Found 2 treatment(s) containing: \"VACCINE\"\n\
             Milo: [X] Vaccine booster on 2024-03-10\n\
             Rex: [ ] vaccine rabies on 2024-01-05"
        );
        let out = exec(&FindTreatmentCommand, &mut pets, "groom").unwrap();
        assert_eq!(out, "No treatments found containing: \"groom\"");
        assert!(matches!(
            exec(&FindTreatmentCommand, &mut pets, "  "),
            Err(CareError::UsageError { .. })
        ));
    }

    #[test]
    fn test_treatment_date_is_inclusive_and_rejects_reversed_range() {
        let mut pets = sample();
        let out = exec(&TreatmentDateCommand, &mut pets, "from/2024-03-10 to/2024-05-20").unwrap();
        assert!(out.starts_with("Found 2 treatment(s) from 2024-03-10 to 2024-05-20:"));
        assert!(out.contains("Deworming"));

        let err = exec(&TreatmentDateCommand, &mut pets, "from/2024-06-01 to/2024-01-01")
            .unwrap_err();
        assert_eq!(err.to_string(), "Start date cannot be after end date.");
        assert!(matches!(
            exec(&TreatmentDateCommand, &mut pets, "from/2024-06-01"),
            Err(CareError::UsageError { .. })
        ));
    }

    #[test]
    fn test_filter_swaps_bounds_and_sorts() {
        let mut pets = sample();
        let out =
            exec(&FilterTreatmentsCommand, &mut pets, "from/2024-12-31 to/2024-01-01").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Treatments between 2024-01-01 and 2024-12-31:");
        assert_eq!(lines[1], "1. Rex: [ ] vaccine rabies on 2024-01-05");
        assert_eq!(lines[4], "4. Rex: [ ] Checkup on 2024-07-01");

        let out = exec(
            &FilterTreatmentsCommand,
            &mut pets,
            "n/milo from/2024-05-01 to/2024-05-31",
        )
        .unwrap();
        assert_eq!(
            out,
            "milo's treatments between 2024-05-01 and 2024-05-31:\n\
             1. Milo: [ ] Deworming on 2024-05-20"
        );
        assert!(matches!(
            exec(&FilterTreatmentsCommand, &mut pets, "n/ghost from/2024-05-01 to/2024-05-31"),
            Err(CareError::PetNotFound { .. })
        ));
    }

    #[test]
    fn test_overdue_uses_context_date() {
        let mut pets = sample();
        let out = exec(&OverdueTreatmentsCommand, &mut pets, "").unwrap();
        assert_eq!(
            out,
            "Overdue Treatments:\n\
             Milo: \"Deworming\" was due on 2024-05-20 (overdue for 12 days)\n\
             Rex: \"vaccine rabies\" was due on 2024-01-05 (overdue for 148 days)"
        );

        let out = exec(&OverdueTreatmentsCommand, &mut pets, "n/milo").unwrap();
        assert_eq!(
            out,
            "Overdue Treatments for Milo:\n\
             \"Deworming\" was due on 2024-05-20 (overdue for 12 days)"
        );

        let mut empty = PetList::new();
        assert_eq!(exec(&OverdueTreatmentsCommand, &mut empty, "").unwrap(), "No pets added");

        let mut fresh = PetList::new();
        fresh.add(Pet::new("Luna", "Rabbit", 1));
        assert_eq!(
            exec(&OverdueTreatmentsCommand, &mut fresh, "n/luna").unwrap(),
            "No overdue treatment for Luna. Way to go!"
        );
    }

    #[test]
    fn test_group_by_first_word() {
        let mut pets = sample();
        let out = exec(&GroupTreatmentsCommand, &mut pets, "").unwrap();
        assert_eq!(
            out,
            "Treatments grouped by type:\n\
             == checkup ==\n\
             1. Rex: [ ] Checkup on 2024-07-01\n\
             == deworming ==\n\
             1. Milo: [ ] Deworming on 2024-05-20\n\
             == vaccine ==\n\
             1. Rex: [ ] vaccine rabies on 2024-01-05\n\
             2. Milo: [X] Vaccine booster on 2024-03-10"
        );

        pets.add(Pet::new("Luna", "Rabbit", 1));
        assert_eq!(
            exec(&GroupTreatmentsCommand, &mut pets, "n/LUNA").unwrap(),
            "No treatments for Luna to group."
        );
    }

    #[test]
    fn test_summary_lists_completed_only() {
        let mut pets = sample();
        let out = exec(&SummaryCommand, &mut pets, "from/2024-01-01 to/2024-12-31").unwrap();
        assert_eq!(
            out,
            "Treatment Summary from: 2024-01-01 to: 2024-12-31\n\
             Milo: [X] Vaccine booster on 2024-03-10"
        );
        assert_eq!(
            exec(&SummaryCommand, &mut pets, "from/2024-04-01 to/2024-04-30").unwrap(),
            "No treatments found from 2024-04-01 to 2024-04-30."
        );
    }
}
