use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::Path,
};

use crate::{
    arg::{self, Arg},
    event::{command_event, Event, Listeners, WILDCARD},
    exec::Delegation,
    help,
    opt::{camel, Opt},
    rt::{self, Rest, Token},
    value::{Bound, Coerce, Value},
    Error, Result,
};

type Action = Box<dyn FnMut(&Invocation<'_>) -> anyhow::Result<()>>;

/// Extra settings for [`Command::external_command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandOpts {
    /// Delegate to this command when no other sub-command is named.
    pub is_default: bool,
}

/// What a successful parse ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An action ran. Holds the sub-command names leading to it, empty for
    /// the root's own action.
    Dispatched(Vec<String>),
    /// An external sub-command should run; see [`Delegation::exec_or_exit`].
    Delegated(Delegation),
    /// No sub-command matched these positional arguments.
    Wildcard(Vec<String>),
    /// Nothing to do, typically a good moment to print usage.
    NoCommand,
}

/// A program or one of its sub-commands.
pub struct Command {
    name: String,
    description: Option<String>,
    usage: Option<String>,
    version: Option<String>,
    version_flag: Option<String>,
    alias: Option<String>,
    options: Vec<Opt>,
    args: Vec<Arg>,
    subcommands: Vec<Command>,
    externals: BTreeSet<String>,
    default_external: Option<String>,
    action: Option<Action>,
    listeners: Listeners,
    values: BTreeMap<String, Value>,
    raw_args: Vec<String>,
}

impl Default for Command {
    /// An anonymous root, named after the executable by [`Command::parse_env`].
    fn default() -> Command {
        Command::new("")
    }
}

impl Command {
    pub fn new(name: &str) -> Command {
        let mut res = Command {
            name: name.to_string(),
            description: None,
            usage: None,
            version: None,
            version_flag: None,
            alias: None,
            options: Vec::new(),
            args: Vec::new(),
            subcommands: Vec::new(),
            externals: BTreeSet::new(),
            default_external: None,
            action: None,
            listeners: Listeners::default(),
            values: BTreeMap::new(),
            raw_args: Vec::new(),
        };
        res.option("-h, --help", "output usage information");
        res
    }

    fn from_spec(spec: &str) -> Command {
        let (name, args) = arg::parse_spec(spec);
        let mut res = Command::new(&name);
        res.args = args;
        res
    }

    /// Adds a sub-command described by `spec` and returns it.
    ///
    /// The first word of `spec` is the name, the rest are positional
    /// placeholders: `<required>`, `[optional]`, `<variadic...>`.
    pub fn command(&mut self, spec: &str) -> &mut Command {
        let idx = self.subcommands.len();
        self.subcommands.push(Command::from_spec(spec));
        &mut self.subcommands[idx]
    }

    /// Adds a sub-command implemented by the `<program>-<name>` executable.
    ///
    /// Returns `self`, so several externals can be chained.
    pub fn external_command(&mut self, spec: &str, description: &str, opts: CommandOpts) -> &mut Command {
        let sub = self.command(spec);
        sub.description(description);
        let name = sub.name.clone();
        if opts.is_default {
            self.default_external = Some(name.clone());
        }
        self.externals.insert(name);
        self
    }

    /// Adds an option, e.g. `-o, --out <path>`.
    ///
    /// # Panics
    ///
    /// If `flags` has no long flag.
    pub fn option(&mut self, flags: &str, description: &str) -> &mut Command {
        self.add_option(flags, description, None)
    }

    /// Like [`Command::option`], converting the value with `coerce` before
    /// storing it.
    pub fn option_with(
        &mut self,
        flags: &str,
        description: &str,
        coerce: impl Fn(&str) -> Result<Value, String> + 'static,
    ) -> &mut Command {
        self.add_option(flags, description, Some(Box::new(coerce)))
    }

    fn add_option(&mut self, flags: &str, description: &str, coerce: Option<Coerce>) -> &mut Command {
        let mut opt = Opt::new(flags, description).unwrap_or_else(|err| panic!("{err}"));
        opt.coerce = coerce;
        self.push_option(opt)
    }

    fn push_option(&mut self, opt: Opt) -> &mut Command {
        match self.options.iter_mut().find(|it| it.name() == opt.name()) {
            Some(it) => *it = opt,
            None => self.options.push(opt),
        }
        self
    }

    pub fn action(&mut self, f: impl FnMut(&Invocation<'_>) -> anyhow::Result<()> + 'static) -> &mut Command {
        self.action = Some(Box::new(f));
        self
    }

    /// Registers `f` for `event`, see [`crate::event`] for the names.
    pub fn on(&mut self, event: &str, f: impl FnMut(&Event<'_>) -> anyhow::Result<()> + 'static) -> &mut Command {
        self.listeners.add(event, Box::new(f));
        self
    }

    /// Sets the version and adds `-v, --version`.
    pub fn version(&mut self, version: &str) -> &mut Command {
        self.version_with_flags(version, "-v, --version")
    }

    pub fn version_with_flags(&mut self, version: &str, flags: &str) -> &mut Command {
        self.version = Some(version.to_string());
        self.add_option(flags, "output the version number", None);
        self.version_flag = self.options.iter().find(|it| it.flags() == flags).map(|it| it.name().to_string());
        self
    }

    pub fn description(&mut self, text: &str) -> &mut Command {
        self.description = Some(text.to_string());
        self
    }

    pub fn usage(&mut self, text: &str) -> &mut Command {
        self.usage = Some(text.to_string());
        self
    }

    pub fn alias(&mut self, alias: &str) -> &mut Command {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
    pub fn get_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
    pub fn get_usage(&self) -> &str {
        match &self.usage {
            Some(it) => it,
            None if self.subcommands.is_empty() => "[options]",
            None => "[options] [command]",
        }
    }
    pub fn get_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
    pub fn get_options(&self) -> &[Opt] {
        &self.options
    }
    pub fn get_args(&self) -> &[Arg] {
        &self.args
    }
    pub fn get_subcommands(&self) -> &[Command] {
        &self.subcommands
    }
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|it| it.name == name || it.alias.as_deref() == Some(name))
    }
    pub fn is_external(&self, name: &str) -> bool {
        self.externals.contains(name)
    }
    pub fn get_default_external(&self) -> Option<&str> {
        self.default_external.as_deref()
    }
    pub fn get_raw_args(&self) -> &[String] {
        &self.raw_args
    }

    /// The value stored for an option, by attribute key (`dryRun`) or
    /// canonical name (`dry-run`).
    pub fn value(&self, key: &str) -> Option<&Value> {
        lookup(&self.values, key)
    }

    /// Parses user supplied arguments, without the program path.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw = args.into_iter().map(Into::into).collect::<Vec<String>>();
        self.raw_args = raw.clone();

        let rest = self.scan(raw.clone())?;
        let mut ctx = Ctx { raw: &raw, program: self.name.clone(), path: Vec::new() };
        self.resolve(rest, false, &mut ctx)
    }

    /// Parses [`std::env::args_os`], naming the program after the
    /// executable if it has no name yet.
    pub fn parse_env(&mut self) -> Result<Outcome> {
        let mut args = std::env::args_os();
        let progn = args.next();
        if self.name.is_empty() {
            if let Some(stem) = progn.as_deref().map(Path::new).and_then(Path::file_stem) {
                self.name = stem.to_string_lossy().into_owned();
            }
        }
        let args = args.map(|it| it.into_string().map_err(Error::NonUtf8Argument)).collect::<Result<Vec<_>>>()?;
        self.parse(args)
    }

    pub fn parse_env_or_exit(&mut self) -> Outcome {
        self.parse_env().unwrap_or_else(|err| err.exit())
    }

    /// Fires the options found in `args` and returns what's left.
    ///
    /// Scanning stops at a leading positional that names a sub-command this
    /// command hands over to; the arguments after it stay raw for that
    /// sub-command to scan with its own options.
    fn scan(&mut self, args: Vec<String>) -> Result<Rest> {
        let mut rest = Rest::default();
        let mut p = rt::Parser::new(args);
        while let Some(token) = p.next_token(&self.options) {
            match token? {
                Token::Opt { idx, value } => self.fire_option(idx, value.as_deref())?,
                Token::Positional(arg) if rest.first_arg().is_none() && self.claims(&arg) => {
                    tracing::trace!(command = %arg, "handing over the remaining arguments");
                    rest.push(Token::Positional(arg));
                    rest.set_tail(p.into_remaining());
                    break;
                }
                token => rest.push(token),
            }
        }
        Ok(rest)
    }

    /// Whether naming `name` first routes to a sub-command, in process or
    /// external.
    fn claims(&self, name: &str) -> bool {
        let idx = self.subcommands.iter().position(|it| it.name == name || it.alias.as_deref() == Some(name));
        idx.is_some_and(|idx| self.externals.contains(&self.subcommands[idx].name) || self.is_routable(idx))
    }

    fn fire_option(&mut self, idx: usize, value: Option<&str>) -> Result<()> {
        let opt = &self.options[idx];
        let stored = match (value, &opt.coerce) {
            (None, _) => Value::Bool(true),
            (Some(value), Some(coerce)) => coerce(value)
                .map_err(|reason| Error::InvalidValue { flag: opt.long().to_string(), reason })?,
            (Some(value), None) => Value::Str(value.to_string()),
        };
        let name = opt.name().to_string();
        self.values.insert(opt.attribute_key(), stored);

        tracing::trace!(option = %name, ?value, "matched option");
        self.listeners.emit(&name, &Event::Option { name: &name, value })?;

        if name == "help" {
            return Err(Error::Help(help::render(self)));
        }
        if self.version_flag.as_deref() == Some(name.as_str()) {
            return Err(Error::Version(self.version.clone().unwrap_or_default()));
        }
        Ok(())
    }

    fn resolve(&mut self, mut rest: Rest, invoked: bool, ctx: &mut Ctx<'_>) -> Result<Outcome> {
        let Some(mut name) = rest.first_arg().map(str::to_string) else {
            if let Some(name) = self.default_external.clone() {
                return Ok(ctx.delegate(name, &rest));
            }
            if invoked && self.action.is_some() {
                return self.run_action(rest, ctx);
            }
            if let Some(flag) = rest.unknown().into_iter().next() {
                return Err(Error::UnknownOption(flag));
            }
            if self.subcommands.is_empty() && !self.args.iter().any(Arg::is_required) {
                return self.wildcard(rest, ctx);
            }
            return Ok(Outcome::NoCommand);
        };

        if let Some(sub) = self.subcommands.iter().find(|it| it.alias.as_deref() == Some(name.as_str())) {
            tracing::debug!(alias = %name, command = %sub.name, "resolved alias");
            name = sub.name.clone();
            rest.set_first_arg(name.clone());
        }

        if self.externals.contains(&name) {
            rest.shift();
            return Ok(ctx.delegate(name, &rest));
        }
        let idx = self.subcommands.iter().position(|it| it.name == name);
        if idx.is_none() {
            if let Some(default) = self.default_external.clone() {
                return Ok(ctx.delegate(default, &rest));
            }
        }
        if let Some(idx) = idx.filter(|&idx| self.is_routable(idx)) {
            rest.shift();
            let (args, unknown) = (rest.args(), rest.unknown());
            ctx.enter(&name);
            let path = ctx.path.clone();
            let outcome = self.subcommands[idx].dispatch(rest, ctx)?;
            let event = command_event(&name);
            let handled = self.listeners.has(&event);
            self.listeners.emit(&event, &Event::Command { name: &name, args: &args, unknown: &unknown })?;
            return Ok(match outcome {
                Outcome::Wildcard(_) | Outcome::NoCommand if handled => Outcome::Dispatched(path),
                outcome => outcome,
            });
        }

        self.wildcard(rest, ctx)
    }

    fn is_routable(&self, idx: usize) -> bool {
        let sub = &self.subcommands[idx];
        sub.action.is_some()
            || !sub.subcommands.is_empty()
            || sub.listeners.has(WILDCARD)
            || self.listeners.has(&command_event(&sub.name))
    }

    /// Continues a parse in a sub-command named by the parent.
    ///
    /// Whatever the parent left over is scanned again, so options the
    /// parent didn't know about get a second chance here.
    fn dispatch(&mut self, rest: Rest, ctx: &mut Ctx<'_>) -> Result<Outcome> {
        let rest = self.scan(rest.into_tokens())?;
        self.resolve(rest, true, ctx)
    }

    fn wildcard(&mut self, rest: Rest, ctx: &mut Ctx<'_>) -> Result<Outcome> {
        let (args, unknown) = (rest.args(), rest.unknown());
        tracing::debug!(command = %self.name, ?args, "no sub-command matched");
        self.listeners.emit(WILDCARD, &Event::Command { name: "*", args: &args, unknown: &unknown })?;
        if self.action.is_some() {
            return self.run_action(rest, ctx);
        }
        Ok(Outcome::Wildcard(args))
    }

    fn run_action(&mut self, rest: Rest, ctx: &mut Ctx<'_>) -> Result<Outcome> {
        if let Some(flag) = rest.unknown().into_iter().next() {
            return Err(Error::UnknownOption(flag));
        }
        let bound = bind(&self.args, rest.args());
        for (spec, bound) in self.args.iter().zip(&bound) {
            if spec.is_required() && bound.is_absent() {
                return Err(Error::MissingArgument(spec.name().to_string()));
            }
        }

        let inv = Invocation { name: &self.name, specs: &self.args, bound, values: &self.values };
        if let Some(action) = self.action.as_mut() {
            action(&inv).map_err(Error::Action)?;
        }
        Ok(Outcome::Dispatched(ctx.path.clone()))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("options", &self.options)
            .field("args", &self.args)
            .field("subcommands", &self.subcommands)
            .field("externals", &self.externals)
            .field("default_external", &self.default_external)
            .field("listeners", &self.listeners)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

fn lookup<'a>(values: &'a BTreeMap<String, Value>, key: &str) -> Option<&'a Value> {
    values.get(key).or_else(|| values.get(&camel(key)))
}

/// Binds positional tokens to specs in order.
fn bind(specs: &[Arg], args: Vec<String>) -> Vec<Bound> {
    let mut args = args.into_iter();
    let last = specs.len().saturating_sub(1);
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            if spec.is_variadic() && i == last {
                let rest = args.by_ref().collect::<Vec<_>>();
                if rest.is_empty() {
                    Bound::Absent
                } else {
                    Bound::Many(rest)
                }
            } else {
                args.next().map_or(Bound::Absent, Bound::One)
            }
        })
        .collect()
}

/// State threaded down the command tree during one parse.
struct Ctx<'a> {
    raw: &'a [String],
    program: String,
    path: Vec<String>,
}

impl Ctx<'_> {
    fn enter(&mut self, name: &str) {
        self.program = format!("{}-{name}", self.program);
        self.path.push(name.to_string());
    }

    fn delegate(&self, command: String, rest: &Rest) -> Outcome {
        tracing::debug!(program = %self.program, %command, "delegating to external command");
        Outcome::Delegated(Delegation {
            program: self.program.clone(),
            command,
            args: rest.args(),
            unknown: rest.unknown(),
            raw: self.raw.to_vec(),
        })
    }
}

static ABSENT: Bound = Bound::Absent;

/// What an action gets to look at.
pub struct Invocation<'a> {
    name: &'a str,
    specs: &'a [Arg],
    bound: Vec<Bound>,
    values: &'a BTreeMap<String, Value>,
}

impl<'a> Invocation<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// One entry per declared positional argument, in declaration order.
    pub fn args(&self) -> &[Bound] {
        &self.bound
    }

    pub fn arg(&self, name: &str) -> &Bound {
        match self.specs.iter().position(|it| it.name() == name) {
            Some(idx) => &self.bound[idx],
            None => &ABSENT,
        }
    }

    /// Option values of the command the action belongs to.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        lookup(self.values, key)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.value(key).is_some()
    }
}
