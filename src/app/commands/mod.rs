pub mod pets;
pub mod queries;
pub mod treatments;

use crate::domain::registry::PetList;
use crate::utils::error::{CareError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Everything a command may touch. The registry is handed in by the engine
/// that owns it.
pub struct CommandContext<'a> {
    pub pets: &'a mut PetList,
    pub today: NaiveDate,
}

pub trait Command {
    fn name(&self) -> &'static str;
    fn syntax(&self) -> &'static str;
    fn summary(&self) -> &'static str;

    /// Whether a successful run changes the registry and should be saved.
    fn mutates(&self) -> bool {
        false
    }

    fn ends_session(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<String>;
}

pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    /// A registry with no commands, not even `help`.
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Adds `command` under its name, replacing any command already there.
    pub fn register(&mut self, command: Box<dyn Command>) {
        self.commands.insert(command.name(), command);
    }

    /// The full command set, with `help` describing every other command.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(ByeCommand));
        registry.register(Box::new(pets::AddPetCommand));
        registry.register(Box::new(pets::DeletePetCommand));
        registry.register(Box::new(pets::EditPetCommand));
        registry.register(Box::new(pets::ListPetsCommand));
        registry.register(Box::new(treatments::AddTreatmentCommand));
        registry.register(Box::new(treatments::DeleteTreatmentCommand));
        registry.register(Box::new(treatments::MarkTreatmentCommand::mark()));
        registry.register(Box::new(treatments::MarkTreatmentCommand::unmark()));
        registry.register(Box::new(treatments::ListPetTreatmentsCommand));
        registry.register(Box::new(treatments::ListAllTreatmentsCommand));
        registry.register(Box::new(queries::FindTreatmentCommand));
        registry.register(Box::new(queries::TreatmentDateCommand));
        registry.register(Box::new(queries::FilterTreatmentsCommand));
        registry.register(Box::new(queries::OverdueTreatmentsCommand));
        registry.register(Box::new(queries::GroupTreatmentsCommand));
        registry.register(Box::new(queries::SummaryCommand));

        let help = HelpCommand::new(&registry);
        registry.register(Box::new(help));
        registry
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name.to_lowercase().as_str()).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Splits a line into its command and the raw argument text.
    pub fn resolve<'i>(&self, input: &'i str) -> Result<(&dyn Command, &'i str)> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CareError::EmptyCommand);
        }
        let (word, args) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));
        let command = self.get(word).ok_or_else(|| CareError::UnknownCommand {
            name: word.to_string(),
        })?;
        Ok((command, args.trim()))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_default_commands()
    }
}

pub struct ByeCommand;

pub const FAREWELL: &str = "Bye bye, Have a wonderful day ahead :)";

impl Command for ByeCommand {
    fn name(&self) -> &'static str {
        "bye"
    }

    fn syntax(&self) -> &'static str {
        "bye"
    }

    fn summary(&self) -> &'static str {
        "Exits the application"
    }

    fn ends_session(&self) -> bool {
        true
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &str) -> Result<String> {
        Ok(FAREWELL.to_string())
    }
}

struct HelpEntry {
    name: &'static str,
    syntax: &'static str,
    summary: &'static str,
}

pub struct HelpCommand {
    entries: Vec<HelpEntry>,
}

impl HelpCommand {
    const NAME: &'static str = "help";
    const SYNTAX: &'static str = "help [COMMAND]";
    const SUMMARY: &'static str = "Lists commands, or shows how to use one";

    fn new(registry: &CommandRegistry) -> Self {
        let mut entries: Vec<HelpEntry> = registry
            .commands
            .values()
            .map(|c| HelpEntry {
                name: c.name(),
                syntax: c.syntax(),
                summary: c.summary(),
            })
            .collect();
        entries.push(HelpEntry {
            name: Self::NAME,
            syntax: Self::SYNTAX,
            summary: Self::SUMMARY,
        });
        entries.sort_by_key(|e| e.name);
        Self { entries }
    }
}

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn syntax(&self) -> &'static str {
        Self::SYNTAX
    }

    fn summary(&self) -> &'static str {
        Self::SUMMARY
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &str) -> Result<String> {
        let topic = args.trim().to_lowercase();
        if topic.is_empty() {
            let mut lines = vec!["Available commands:".to_string()];
            lines.extend(
                self.entries
                    .iter()
                    .map(|e| format!("  {:<20} {}", e.name, e.summary)),
            );
            lines.push("Type 'help COMMAND' for its syntax.".to_string());
            return Ok(lines.join("\n"));
        }

        let entry = self
            .entries
            .iter()
            .find(|e| e.name == topic)
            .ok_or(CareError::UnknownCommand { name: topic })?;
        Ok(format!("Usage: {}\n{}", entry.syntax, entry.summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(registry: &CommandRegistry, pets: &mut PetList, line: &str) -> Result<String> {
        let (command, args) = registry.resolve(line)?;
        let mut ctx = CommandContext {
            pets,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        command.execute(&mut ctx, args)
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = CommandRegistry::with_default_commands();
        let (command, args) = registry.resolve("  LIST-PETS  ").unwrap();
        assert_eq!(command.name(), "list-pets");
        assert_eq!(args, "");
    }

    #[test]
    fn test_resolve_errors() {
        let registry = CommandRegistry::with_default_commands();
        assert!(matches!(registry.resolve("   "), Err(CareError::EmptyCommand)));
        assert!(matches!(
            registry.resolve("fly n/Milo"),
            Err(CareError::UnknownCommand { name }) if name == "fly"
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        let registry = CommandRegistry::with_default_commands();
        let mut pets = PetList::new();
        let output = run(&registry, &mut pets, "help").unwrap();
        for name in registry.names() {
            assert!(output.contains(name), "help is missing {}", name);
        }
        assert_eq!(registry.len(), 18);
    }

    #[test]
    fn test_help_for_one_command() {
        let registry = CommandRegistry::with_default_commands();
        let mut pets = PetList::new();
        let output = run(&registry, &mut pets, "help MARK").unwrap();
        assert!(output.starts_with("Usage: mark n/PET_NAME i/INDEX"));
        assert!(run(&registry, &mut pets, "help nope").is_err());
    }

    #[test]
    fn test_bye_ends_session() {
        let registry = CommandRegistry::with_default_commands();
        let (command, _) = registry.resolve("bye").unwrap();
        assert!(command.ends_session());
        assert!(!command.mutates());
    }
}
