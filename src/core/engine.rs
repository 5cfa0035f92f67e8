use crate::app::commands::{CommandContext, CommandRegistry};
use crate::core::loader::LoadReport;
use crate::domain::ports::PetStore;
use crate::domain::registry::PetList;
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

pub const GREETING: &str = "Hello! Welcome to CuddleCare.";
pub const PROMPT: &str = "> ";
pub const LOAD_FAILED: &str = "Failed to load data.";
pub const SAVE_FAILED: &str = "Failed to save data.";
pub const INVALID_INPUT: &str = "Input is not valid UTF-8 text; line ignored.";

/// What one input line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub exit: bool,
}

/// Owns the registry and its store. Every I/O failure stops here: it is
/// logged and turned into a one-line notice, never a crash.
pub struct CareEngine<S: PetStore> {
    store: S,
    pets: PetList,
    commands: CommandRegistry,
    clock: Box<dyn Fn() -> NaiveDate>,
}

impl<S: PetStore> CareEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pets: PetList::new(),
            commands: CommandRegistry::with_default_commands(),
            clock: Box::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Replaces the source of "today" used by date-relative commands.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn pets(&self) -> &PetList {
        &self.pets
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the in-memory registry with the store's contents. Failures are
    /// logged before being returned.
    pub fn load(&mut self) -> Result<LoadReport> {
        match self.store.load(&mut self.pets) {
            Ok(report) => {
                tracing::info!(
                    path = %self.store.location().display(),
                    pets = report.pets_loaded,
                    treatments = report.treatments_loaded,
                    dropped = report.dropped(),
                    "Data loaded"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Failed to load data: {} (Category: {:?})", e, e.category());
                Err(e)
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.pets).map_err(|e| {
            tracing::error!("Failed to save data: {} (Category: {:?})", e, e.category());
            e
        })
    }

    /// Runs one line. A successful mutating command is followed by a save;
    /// a failed save is reported after the command's own output.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let (command, args) = match self.commands.resolve(line) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("Rejected input '{}': {}", line.trim(), e);
                return Outcome {
                    output: e.user_friendly_message(),
                    exit: false,
                };
            }
        };

        let mut ctx = CommandContext {
            pets: &mut self.pets,
            today: (self.clock)(),
        };
        let result = command.execute(&mut ctx, args);
        let (name, mutates, exit) = (command.name(), command.mutates(), command.ends_session());

        match result {
            Ok(mut output) => {
                if mutates && self.save().is_err() {
                    output.push('\n');
                    output.push_str(SAVE_FAILED);
                }
                Outcome { output, exit }
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", name, e);
                Outcome {
                    output: e.user_friendly_message(),
                    exit: false,
                }
            }
        }
    }

    /// The interactive session: load, greet, then one command per line until
    /// `bye` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        if self.load().is_err() {
            writeln!(out, "{}", LOAD_FAILED)?;
        }
        writeln!(out, "{}", GREETING)?;

        let mut buf = Vec::new();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out)?;
                break;
            }
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let Ok(line) = std::str::from_utf8(raw) else {
                tracing::warn!("Skipped input line that is not valid UTF-8 ({} bytes)", raw.len());
                writeln!(out, "{}", INVALID_INPUT)?;
                continue;
            };

            let outcome = self.execute(line);
            writeln!(out, "{}", outcome.output)?;
            if outcome.exit {
                break;
            }
        }
        out.flush()
    }
}
