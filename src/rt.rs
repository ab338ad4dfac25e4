//! Token level machinery: normalization, the option scanner and what a
//! scan leaves behind.

use crate::{opt::Opt, Error, Result};

/// Splits one raw argument into the tokens it stands for.
///
/// `-abc` becomes `-a -b -c` and `--name=value` becomes `--name value`.
/// An argument naming a registered option exactly is kept as is.
pub(crate) fn expand(arg: &str, opts: &[Opt]) -> Vec<String> {
    if opts.iter().any(|it| it.matches(arg)) {
        return vec![arg.to_string()];
    }
    if is_short_cluster(arg) {
        return arg[1..].chars().map(|c| format!("-{c}")).collect();
    }
    match split_long(arg) {
        Some((flag, value)) => vec![flag.to_string(), value.to_string()],
        None => vec![arg.to_string()],
    }
}

fn is_short_cluster(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && !arg.starts_with("--")
}

fn split_long(arg: &str) -> Option<(&str, &str)> {
    if !arg.starts_with("--") {
        return None;
    }
    arg.split_once('=').filter(|(flag, _)| flag.len() > 2)
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// A registered option, by index, with the value it consumed.
    Opt { idx: usize, value: Option<String> },
    /// Something flag-shaped nobody registered, and the value it may have.
    Unknown { flag: String, value: Option<String> },
    Positional(String),
    /// A positional argument found after `--`.
    Literal(String),
}

/// Scans raw arguments left to right, expanding each one when it is reached.
///
/// Starts in normal mode; the first bare `--` switches to literal mode for
/// the rest of the input, and is dropped. The value of an option that
/// requires one is taken raw, so `-m -ab` keeps `-ab` whole.
pub(crate) struct Parser {
    after_double_dash: bool,
    /// Expanded pieces of the current argument, reversed.
    pending: Vec<String>,
    rargs: Vec<String>,
}

impl Parser {
    pub(crate) fn new(mut args: Vec<String>) -> Self {
        args.reverse();
        Self { after_double_dash: false, pending: Vec::new(), rargs: args }
    }

    pub(crate) fn next_token(&mut self, opts: &[Opt]) -> Option<Result<Token>> {
        let flag = match self.pop_flag(opts)? {
            Ok(it) => it,
            Err(arg) if self.after_double_dash => return Some(Ok(Token::Literal(arg))),
            Err(arg) => return Some(Ok(Token::Positional(arg))),
        };

        let Some(idx) = opts.iter().position(|it| it.matches(&flag)) else {
            if flag.len() == 1 {
                return Some(Ok(Token::Positional(flag)));
            }
            let value = match self.peek() {
                Some(it) if !it.starts_with('-') => self.next(),
                _ => None,
            };
            tracing::trace!(%flag, ?value, "unknown option");
            return Some(Ok(Token::Unknown { flag, value }));
        };

        let opt = &opts[idx];
        let value = if opt.requires_value() {
            match self.next() {
                Some(it) => Some(it),
                None => return Some(Err(Error::MissingOptionArgument(opt.flags().to_string()))),
            }
        } else if opt.optional_value() {
            match self.peek() {
                Some(it) if it == "-" || !it.starts_with('-') => self.next(),
                _ => None,
            }
        } else {
            None
        };
        Some(Ok(Token::Opt { idx, value }))
    }

    /// Everything not consumed yet, in input order.
    pub(crate) fn into_remaining(self) -> Vec<String> {
        self.rargs.into_iter().chain(self.pending).rev().collect()
    }

    fn pop_flag(&mut self, opts: &[Opt]) -> Option<Result<String, String>> {
        if self.pending.is_empty() && !self.after_double_dash {
            let arg = self.rargs.pop()?;
            if arg == "--" {
                self.after_double_dash = true;
                return self.next().map(Err);
            }
            self.pending = expand(&arg, opts);
            self.pending.reverse();
        }
        let arg = self.next()?;
        if self.after_double_dash {
            return Some(Err(arg));
        }
        if arg.starts_with('-') {
            Some(Ok(arg))
        } else {
            Some(Err(arg))
        }
    }

    fn peek(&self) -> Option<&str> {
        self.pending.last().or(self.rargs.last()).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        self.pending.pop().or_else(|| self.rargs.pop())
    }
}

/// What a command's scan leaves behind, in input order.
///
/// Positional arguments and unknown options stay interleaved so that a
/// sub-command can rescan them as if they had been given to it directly.
/// When the scan stopped at a sub-command's name, `tail` holds the
/// arguments after it untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Rest {
    items: Vec<Item>,
    tail: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Arg(String),
    Literal(String),
    /// An unknown flag or the value it swallowed.
    Unknown(String),
}

fn lower(token: Token, items: &mut Vec<Item>) {
    match token {
        Token::Opt { .. } => (),
        Token::Unknown { flag, value } => {
            items.push(Item::Unknown(flag));
            items.extend(value.map(Item::Unknown));
        }
        Token::Positional(it) => items.push(Item::Arg(it)),
        Token::Literal(it) => items.push(Item::Literal(it)),
    }
}

impl Rest {
    pub(crate) fn push(&mut self, token: Token) {
        lower(token, &mut self.items)
    }

    pub(crate) fn set_tail(&mut self, tail: Vec<String>) {
        self.tail = tail;
    }

    /// Items with the tail classified as if no options were registered.
    fn view(&self) -> Vec<Item> {
        let mut res = self.items.clone();
        let mut p = Parser::new(self.tail.clone());
        while let Some(Ok(token)) = p.next_token(&[]) {
            lower(token, &mut res);
        }
        res
    }

    pub(crate) fn args(&self) -> Vec<String> {
        self.view()
            .into_iter()
            .filter_map(|it| match it {
                Item::Arg(it) | Item::Literal(it) => Some(it),
                Item::Unknown(_) => None,
            })
            .collect()
    }

    pub(crate) fn unknown(&self) -> Vec<String> {
        self.view()
            .into_iter()
            .filter_map(|it| match it {
                Item::Unknown(it) => Some(it),
                Item::Arg(_) | Item::Literal(_) => None,
            })
            .collect()
    }

    fn first_arg_idx(&self) -> Option<usize> {
        self.items.iter().position(|it| !matches!(it, Item::Unknown(_)))
    }

    pub(crate) fn first_arg(&self) -> Option<&str> {
        match &self.items[self.first_arg_idx()?] {
            Item::Arg(it) | Item::Literal(it) | Item::Unknown(it) => Some(it),
        }
    }

    pub(crate) fn set_first_arg(&mut self, arg: String) {
        if let Some(idx) = self.first_arg_idx() {
            match &mut self.items[idx] {
                Item::Arg(it) | Item::Literal(it) | Item::Unknown(it) => *it = arg,
            }
        }
    }

    pub(crate) fn shift(&mut self) -> Option<String> {
        let idx = self.first_arg_idx()?;
        match self.items.remove(idx) {
            Item::Arg(it) | Item::Literal(it) | Item::Unknown(it) => Some(it),
        }
    }

    /// Turns the rest back into arguments, fencing literal ones with `--`.
    pub(crate) fn into_tokens(self) -> Vec<String> {
        let mut res = Vec::with_capacity(self.items.len() + self.tail.len() + 1);
        let mut literal = false;
        for item in self.items {
            match item {
                Item::Literal(it) => {
                    if !literal {
                        literal = true;
                        res.push("--".to_string());
                    }
                    res.push(it)
                }
                Item::Arg(it) | Item::Unknown(it) => res.push(it),
            }
        }
        res.extend(self.tail);
        res
    }
}
