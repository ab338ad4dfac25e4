//! Plain text help for a [`Command`].
//!
//! `-h` is answered by the command that scans it: `git commit -h` shows
//! the help of `commit` when `commit` is routable, the root's otherwise.

use std::fmt::Write;

use crate::Command;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

/// Renders usage, description, sub-commands and options.
///
/// Sub-commands are listed with their alias and argument placeholders,
/// options with their flags as written at registration.
pub fn render(cmd: &Command) -> String {
    let mut buf = String::new();

    match cmd.get_name() {
        "" => w!(buf, "Usage: {}\n", cmd.get_usage()),
        name => w!(buf, "Usage: {name} {}\n", cmd.get_usage()),
    }

    if !cmd.get_description().is_empty() {
        blank_line(&mut buf);
        write_lines(&mut buf, cmd.get_description());
    }

    let commands = cmd.get_subcommands().iter().map(|sub| (command_line(sub), sub.get_description())).collect::<Vec<_>>();
    if !commands.is_empty() {
        blank_line(&mut buf);
        w!(buf, "Commands:\n");
        table(&mut buf, &commands);
    }

    let options = cmd.get_options().iter().map(|opt| (opt.flags().to_string(), opt.description())).collect::<Vec<_>>();
    blank_line(&mut buf);
    w!(buf, "Options:\n");
    table(&mut buf, &options);

    buf
}

fn command_line(cmd: &Command) -> String {
    let mut res = cmd.get_name().to_string();
    if let Some(alias) = cmd.get_alias() {
        w!(res, "|{alias}");
    }
    for arg in cmd.get_args() {
        w!(res, " {arg}");
    }
    res
}

fn table(buf: &mut String, rows: &[(String, &str)]) {
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (l, r) in rows {
        if r.is_empty() {
            w!(buf, "  {l}\n");
        } else {
            w!(buf, "  {l:width$}  {r}\n");
        }
    }
}

fn write_lines(buf: &mut String, text: &str) {
    for line in text.split('\n').map(str::trim_end) {
        w!(buf, "{line}\n");
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
