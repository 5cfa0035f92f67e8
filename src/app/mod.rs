// Command front end: argument tokenizer and the command set.

pub mod args;
pub mod commands;
