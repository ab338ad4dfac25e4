/// A positional argument declared in a command spec, e.g. `<src>`,
/// `[target]` or `<files...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    name: String,
    required: bool,
    variadic: bool,
}

impl Arg {
    pub fn new(placeholder: &str) -> Arg {
        let (required, inner) = if let Some(it) = strip_delims(placeholder, '<', '>') {
            (true, it)
        } else if let Some(it) = strip_delims(placeholder, '[', ']') {
            (false, it)
        } else {
            (true, placeholder)
        };
        let (variadic, name) = match inner.strip_suffix("...") {
            Some(it) => (true, it),
            None => (false, inner),
        };
        Arg { name: name.to_string(), required, variadic }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_required(&self) -> bool {
        self.required
    }
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (l, r) = if self.required { ("<", ">") } else { ("[", "]") };
        let dots = if self.variadic { "..." } else { "" };
        write!(f, "{l}{}{dots}{r}", self.name)
    }
}

fn strip_delims(s: &str, l: char, r: char) -> Option<&str> {
    s.strip_prefix(l)?.strip_suffix(r)
}

/// Splits `copy <src> <dst...>` into the command name and its arguments.
pub(crate) fn parse_spec(spec: &str) -> (String, Vec<Arg>) {
    let mut words = spec.split_whitespace();
    let name = words.next().unwrap_or_default().to_string();
    (name, words.map(Arg::new).collect())
}
