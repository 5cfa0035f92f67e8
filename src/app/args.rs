//! Tokenizer for tag-prefixed arguments such as `n/Milo t/Vaccine d/2024-01-10`.
//!
//! A word starting with a known prefix opens a field; following words without
//! a prefix extend it, so values may contain spaces. Words before the first
//! prefix form the preamble. A greedy prefix takes the rest of the line
//! verbatim.

use crate::utils::error::{CareError, Result};
use crate::utils::validation::require_iso_date;
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    prefixes: &'static [&'static str],
    greedy: &'static [&'static str],
}

impl ArgSpec {
    pub const fn new(prefixes: &'static [&'static str]) -> Self {
        Self {
            prefixes,
            greedy: &[],
        }
    }

    pub const fn with_greedy(mut self, greedy: &'static [&'static str]) -> Self {
        self.greedy = greedy;
        self
    }

    fn match_prefix(&self, word: &str) -> Option<&'static str> {
        self.prefixes
            .iter()
            .chain(self.greedy.iter())
            .filter(|p| word.starts_with(**p))
            .max_by_key(|p| p.len())
            .copied()
    }

    /// Splits `input` into fields keyed by prefix. The longest matching prefix
    /// wins; a prefix given twice is an error.
    pub fn parse(&self, input: &str) -> Result<ParsedArgs> {
        let mut parsed = ParsedArgs::default();
        let mut preamble: Vec<&str> = Vec::new();
        let mut open: Option<usize> = None;

        for (offset, word) in words(input) {
            let Some(prefix) = self.match_prefix(word) else {
                match open {
                    Some(i) => {
                        let value = &mut parsed.fields[i].1;
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(word);
                    }
                    None => preamble.push(word),
                }
                continue;
            };

            if parsed.get(prefix).is_some() {
                return Err(CareError::InvalidField {
                    field: prefix.to_string(),
                    reason: "was given more than once".to_string(),
                });
            }

            if self.greedy.contains(&prefix) {
                let rest = input[offset + prefix.len()..].trim().to_string();
                parsed.fields.push((prefix, rest));
                break;
            }

            parsed.fields.push((prefix, word[prefix.len()..].to_string()));
            open = Some(parsed.fields.len() - 1);
        }

        parsed.preamble = preamble.join(" ");
        Ok(parsed)
    }
}

fn words(input: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in input.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, &input[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &input[s..]));
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    preamble: String,
    fields: Vec<(&'static str, String)>,
}

impl ParsedArgs {
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn is_empty(&self) -> bool {
        self.preamble.is_empty() && self.fields.is_empty()
    }

    /// `Some("")` when the prefix was given without a value.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    pub fn optional(&self, prefix: &str, label: &str) -> Result<Option<&str>> {
        match self.get(prefix) {
            None => Ok(None),
            Some("") => Err(CareError::InvalidField {
                field: label.to_string(),
                reason: "cannot be empty".to_string(),
            }),
            Some(value) => Ok(Some(value)),
        }
    }

    pub fn require(&self, prefix: &str, label: &str, usage: &str) -> Result<&str> {
        self.optional(prefix, label)?
            .ok_or_else(|| CareError::usage(usage))
    }

    pub fn date(&self, prefix: &str, label: &str, usage: &str) -> Result<NaiveDate> {
        require_iso_date(self.require(prefix, label, usage)?)
    }

    pub fn number<T: FromStr>(&self, prefix: &str, label: &str, usage: &str) -> Result<T> {
        parse_number(self.require(prefix, label, usage)?, label)
    }

    pub fn optional_number<T: FromStr>(&self, prefix: &str, label: &str) -> Result<Option<T>> {
        self.optional(prefix, label)?
            .map(|v| parse_number(v, label))
            .transpose()
    }

    /// A 1-based index, returned zero-based.
    pub fn index(&self, prefix: &str, usage: &str) -> Result<usize> {
        let index: usize = self.number(prefix, "Index", usage)?;
        index.checked_sub(1).ok_or_else(|| CareError::InvalidNumber {
            field: "Index".to_string(),
            value: index.to_string(),
        })
    }
}

fn parse_number<T: FromStr>(value: &str, label: &str) -> Result<T> {
    value.parse().map_err(|_| CareError::InvalidNumber {
        field: label.to_string(),
        value: value.to_string(),
    })
}
