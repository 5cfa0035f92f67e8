use crate::domain::model::{same_name, Pet};
use crate::utils::error::{CareError, Result};

/// All pets of a session, in insertion order, with case-insensitively unique
/// names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetList {
    pets: Vec<Pet>,
}

impl PetList {
    pub fn new() -> Self {
        Self { pets: Vec::new() }
    }

    /// Returns false, leaving the list untouched, when the name is taken.
    pub fn add(&mut self, pet: Pet) -> bool {
        if self.contains(pet.name()) {
            return false;
        }
        self.pets.push(pet);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.pets.iter().position(|p| same_name(p.name(), name))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| same_name(p.name(), name))
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| same_name(p.name(), name))
    }

    pub fn get(&self, index: usize) -> Option<&Pet> {
        self.pets.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pet> {
        self.pets.get_mut(index)
    }

    pub fn delete(&mut self, name: &str) -> Option<Pet> {
        let index = self.position(name)?;
        Some(self.pets.remove(index))
    }

    /// Renaming to a different casing of the same name is allowed.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let index = self.position(old_name).ok_or_else(|| CareError::PetNotFound {
            name: old_name.to_string(),
        })?;
        if let Some(other) = self.position(new_name) {
            if other != index {
                return Err(CareError::DuplicatePet {
                    name: new_name.to_string(),
                });
            }
        }
        self.pets[index].set_name(new_name);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pets.clear();
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pet> {
        self.pets.iter()
    }
}

impl<'a> IntoIterator for &'a PetList {
    type Item = &'a Pet;
    type IntoIter = std::slice::Iter<'a, Pet>;

    fn into_iter(self) -> Self::IntoIter {
        self.pets.iter()
    }
}
