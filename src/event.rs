//! Per-command notification tables.
//!
//! Events are addressed by name:
//!
//! * an option's canonical name (`version`, `age-now`, `help`),
//! * `command:<name>` when a sub-command is dispatched,
//! * `command:*` when no sub-command matched.

use std::{collections::BTreeMap, fmt};

use crate::{Error, Result};

pub const WILDCARD: &str = "command:*";

pub fn command_event(name: &str) -> String {
    format!("command:{name}")
}

/// Payload handed to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Option { name: &'a str, value: Option<&'a str> },
    Command { name: &'a str, args: &'a [String], unknown: &'a [String] },
}

pub type Listener = Box<dyn FnMut(&Event<'_>) -> anyhow::Result<()>>;

#[derive(Default)]
pub(crate) struct Listeners {
    map: BTreeMap<String, Vec<Listener>>,
}

impl Listeners {
    pub(crate) fn add(&mut self, event: &str, listener: Listener) {
        self.map.entry(event.to_string()).or_default().push(listener);
    }

    pub(crate) fn has(&self, event: &str) -> bool {
        self.map.get(event).is_some_and(|it| !it.is_empty())
    }

    /// Calls listeners in registration order, stopping at the first error.
    pub(crate) fn emit(&mut self, event: &str, payload: &Event<'_>) -> Result<()> {
        let Some(listeners) = self.map.get_mut(event) else { return Ok(()) };
        tracing::trace!(event, n = listeners.len(), "emit");
        for listener in listeners.iter_mut() {
            listener(payload).map_err(Error::Action)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter().map(|(k, v)| (k, v.len()))).finish()
    }
}
