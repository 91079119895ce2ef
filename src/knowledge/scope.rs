use std::ops::Range;

use crate::parse::{OptionSchema, tokenize};

/// The options visible at a point in a command, innermost first.
///
/// After `git commit`, the scope holds commit's options followed by git's own.
#[derive(Debug, Default, Clone)]
pub struct OptionScope<'a> {
    layers: Vec<&'a [OptionSchema]>,
}

/// How a dash-prefixed word resolved against a scope.
#[derive(Debug, PartialEq, Eq)]
pub enum OptionMatch<'a> {
    /// The whole word is one flag: `-l`, `--all`.
    Flag(&'a OptionSchema),
    /// A flag with its value attached: `-n5`, `--width=80`.
    Sticky(&'a OptionSchema),
    /// Several short flags in one word, with byte ranges relative to the word.
    ///
    /// When `sticky` is set the last flag takes a value and its range runs to
    /// the end of the word: `-xfarchive` is `-x` then `f` with value `archive`.
    Cluster {
        flags: Vec<(&'a OptionSchema, Range<usize>)>,
        sticky: bool,
    },
}

impl<'a> OptionMatch<'a> {
    /// Whether the next word is this option's value.
    pub fn expects_value(&self) -> bool {
        match self {
            OptionMatch::Flag(schema) => schema.takes_value,
            OptionMatch::Sticky(_) => false,
            OptionMatch::Cluster { flags, sticky } => {
                !sticky && flags.last().is_some_and(|(s, _)| s.takes_value)
            }
        }
    }
}

impl<'a> OptionScope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer searched after the existing ones.
    pub fn with(mut self, options: &'a [OptionSchema]) -> Self {
        self.layers.push(options);
        self
    }

    pub fn short(&self, flag: &str) -> Option<&'a OptionSchema> {
        self.layers
            .iter()
            .copied()
            .flat_map(|layer| layer.iter())
            .find(|o| o.matches_short(flag))
    }

    pub fn long(&self, flag: &str) -> Option<&'a OptionSchema> {
        self.layers
            .iter()
            .copied()
            .flat_map(|layer| layer.iter())
            .find(|o| o.matches_long(flag))
    }

    /// Resolve a word against the scope. Returns `None` when the word is not
    /// an option known here.
    pub fn resolve(&self, word: &str) -> Option<OptionMatch<'a>> {
        if let Some((flag, value)) = tokenize::split_long_option(word) {
            let schema = self.long(flag)?;
            return Some(match value {
                Some(_) => OptionMatch::Sticky(schema),
                None => OptionMatch::Flag(schema),
            });
        }
        if !word.starts_with('-') || word.len() < 2 || word.starts_with("--") {
            return None;
        }

        // Some tools spell whole words with one dash (`find -name`).
        if let Some(schema) = self.short(word) {
            return Some(OptionMatch::Flag(schema));
        }

        if let Some(head) = word.get(..2)
            && word.len() > 2
            && let Some(schema) = self.short(head)
            && schema.takes_value
        {
            return Some(OptionMatch::Sticky(schema));
        }

        // getopt: the first value-taking flag swallows the rest of the word.
        let mut flags = Vec::new();
        let mut sticky = false;
        for (flag, range) in tokenize::short_cluster(word)? {
            let schema = self.short(&flag)?;
            if schema.takes_value && range.end < word.len() {
                flags.push((schema, range.start..word.len()));
                sticky = true;
                break;
            }
            flags.push((schema, range));
        }
        Some(OptionMatch::Cluster { flags, sticky })
    }
}
