//! Command knowledge: what programs, subcommands and options mean.

pub mod scope;

pub use scope::{OptionMatch, OptionScope};

use std::collections::HashMap;

use log::debug;

use crate::config::{Config, ProgramSpec, SubcommandSpec};
use crate::parse::{CommandSchema, tokenize};

/// Summary used for programs the knowledge base has no entry for.
pub const UNKNOWN_PROGRAM_SUMMARY: &str = "No description available";

/// Registry of program knowledge, keyed by program name.
pub struct Registry {
    programs: HashMap<String, ProgramSpec>,
}

impl Registry {
    /// Build the registry from configuration.
    ///
    /// Later entries win when a name appears twice.
    pub fn from_config(config: &Config) -> Self {
        let programs = config
            .programs
            .iter()
            .map(|p| (p.name.clone(), p.clone()))
            .collect::<HashMap<_, _>>();
        debug!("knowledge registry loaded with {} programs", programs.len());
        Self { programs }
    }

    /// Look up a program by the word used to invoke it.
    ///
    /// Tries the exact word first, then its basename (`/bin/ls` → `ls`).
    pub fn program(&self, word: &str) -> Option<&ProgramSpec> {
        self.programs
            .get(word)
            .or_else(|| self.programs.get(tokenize::base_name(word)))
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl ProgramSpec {
    pub fn schema(&self) -> CommandSchema {
        CommandSchema {
            name: self.name.clone(),
            summary: self.summary.clone(),
        }
    }

    pub fn subcommand(&self, word: &str) -> Option<&SubcommandSpec> {
        self.subcommands.iter().find(|s| s.name == word)
    }
}

impl SubcommandSpec {
    pub fn schema(&self) -> CommandSchema {
        CommandSchema {
            name: self.name.clone(),
            summary: self.summary.clone(),
        }
    }
}

/// Schema for a program missing from the knowledge base.
pub fn unknown_program(name: &str) -> CommandSchema {
    CommandSchema {
        name: name.to_string(),
        summary: UNKNOWN_PROGRAM_SUMMARY.into(),
    }
}
