use thiserror::Error;

use crate::value::Coerce;

/// A definition string that doesn't describe a usable option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("no long flag in option definition `{0}`")]
    MissingLong(String),
    #[error("long flag must begin with `-` in option definition `{0}`")]
    NotAFlag(String),
}

/// An option such as `-v, --version` or `-o, --out <path>`.
pub struct Opt {
    flags: String,
    short: Option<String>,
    long: String,
    requires_value: bool,
    optional_value: bool,
    description: String,
    pub(crate) coerce: Option<Coerce>,
}

impl Opt {
    /// Parses `flags`, split on commas, pipes and whitespace.
    ///
    /// `<value>` marks an option that requires a value, `[value]` one
    /// whose value may be omitted.
    pub fn new(flags: &str, description: &str) -> Result<Opt, DefinitionError> {
        let requires_value = flags.contains('<');
        let optional_value = !requires_value && flags.contains('[');

        let mut words = flags
            .split(|c: char| c == ',' || c == '|' || c.is_whitespace())
            .filter(|it| !it.is_empty())
            .peekable();

        let first = words.next();
        let short = match (first, words.peek()) {
            (Some(short), Some(next)) if !next.starts_with(['[', '<']) => Some(short.to_string()),
            _ => None,
        };
        let long = if short.is_some() { words.next() } else { first };
        let long = match long {
            Some(it) if it.starts_with('<') || it.starts_with('[') => {
                return Err(DefinitionError::MissingLong(flags.to_string()))
            }
            Some(it) if !it.starts_with('-') => {
                return Err(DefinitionError::NotAFlag(flags.to_string()))
            }
            Some(it) if it.trim_start_matches('-').is_empty() => {
                return Err(DefinitionError::MissingLong(flags.to_string()))
            }
            Some(it) => it.to_string(),
            None => return Err(DefinitionError::MissingLong(flags.to_string())),
        };

        Ok(Opt {
            flags: flags.to_string(),
            short,
            long,
            requires_value,
            optional_value,
            description: description.to_string(),
            coerce: None,
        })
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }
    pub fn long(&self) -> &str {
        &self.long
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn requires_value(&self) -> bool {
        self.requires_value
    }
    pub fn optional_value(&self) -> bool {
        self.optional_value
    }
    pub fn is_switch(&self) -> bool {
        !self.requires_value && !self.optional_value
    }

    pub fn matches(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long == token
    }

    /// The long flag without its dashes, used as the event name.
    pub fn name(&self) -> &str {
        self.long.trim_start_matches('-')
    }

    /// The camel-cased name values are stored under.
    pub fn attribute_key(&self) -> String {
        camel(self.name())
    }
}

impl std::fmt::Debug for Opt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opt")
            .field("flags", &self.flags)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("requires_value", &self.requires_value)
            .field("optional_value", &self.optional_value)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// `age-now` -> `ageNow`.
pub(crate) fn camel(s: &str) -> String {
    let mut words = s.split('-');
    let mut res = words.next().unwrap_or_default().to_string();
    for word in words {
        res.extend(first_upper(word));
    }
    res
}

fn first_upper(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().next().map(|it| it.to_ascii_uppercase()).into_iter().chain(s.chars().skip(1))
}
