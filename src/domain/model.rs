use chrono::NaiveDate;
use std::fmt;

/// Case-insensitive name comparison shared by pets and treatments.
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treatment {
    name: String,
    note: Option<String>,
    date: NaiveDate,
    completed: bool,
}

impl Treatment {
    /// An empty or whitespace-only note is stored as no note.
    pub fn new(name: impl Into<String>, note: Option<String>, date: NaiveDate) -> Self {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            name: name.into(),
            note,
            date,
            completed: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Same name (ignoring case) on the same date.
    pub fn is_duplicate_of(&self, other: &Treatment) -> bool {
        self.date == other.date && same_name(&self.name, &other.name)
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "X" } else { " " };
        write!(f, "[{}] {} on {}", mark, self.name, self.date)?;
        if let Some(note) = &self.note {
            write!(f, " (note: {})", note)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    name: String,
    species: String,
    age: u32,
    treatments: Vec<Treatment>,
}

impl Pet {
    pub fn new(name: impl Into<String>, species: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            age,
            treatments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn treatments(&self) -> &[Treatment] {
        &self.treatments
    }

    // Renames go through PetList::rename so uniqueness is checked.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_species(&mut self, species: impl Into<String>) {
        self.species = species.into();
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn is_duplicate_treatment(&self, treatment: &Treatment) -> bool {
        self.treatments.iter().any(|t| t.is_duplicate_of(treatment))
    }

    /// Appends unless a treatment with the same name and date already exists.
    pub fn add_treatment(&mut self, treatment: Treatment) -> bool {
        if self.is_duplicate_treatment(&treatment) {
            return false;
        }
        self.treatments.push(treatment);
        true
    }

    /// Zero-based.
    pub fn treatment_mut(&mut self, index: usize) -> Option<&mut Treatment> {
        self.treatments.get_mut(index)
    }

    /// Zero-based; later treatments shift down.
    pub fn remove_treatment(&mut self, index: usize) -> Option<Treatment> {
        if index < self.treatments.len() {
            Some(self.treatments.remove(index))
        } else {
            None
        }
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Species: {}, Age: {} years old)",
            self.name, self.species, self.age
        )
    }
}
