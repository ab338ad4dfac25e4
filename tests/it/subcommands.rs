use std::{cell::RefCell, rc::Rc};

use expect_test::expect;
use lightcmd::{Command, Outcome, Value};

use crate::{check, log, record, Log};

fn git(log: &Log) -> Command {
    let mut git = Command::new("git");
    git.version("2.0.0").option("-C, --dir <path>", "run as if started in <path>");

    git.command("init [target]")
        .description("create an empty repository")
        .option("-q, --quiet", "only print errors")
        .action(record(log));
    git.command("copy <src> <dst...>").action(record(log));
    git.command("clone <url> [dir]")
        .option_with("--depth <n>", "truncate history", lightcmd::value::parse::<i64>())
        .action(record(log));

    let remote = git.command("remote").description("manage remotes");
    remote.option("--verbose", "be verbose").action(record(log));
    remote.command("add <name> <url>").option("-f, --fetch", "fetch after adding").action(record(log));
    remote.command("remove <name>").action(record(log));
    git
}

#[test]
fn subcommands() {
    let log = log();
    let mut git = git(&log);
    check(
        &mut git,
        "init",
        expect![[r#"
            Dispatched(
                [
                    "init",
                ],
            )
        "#]],
    );
    check(
        &mut git,
        "copy a b c",
        expect![[r#"
            Dispatched(
                [
                    "copy",
                ],
            )
        "#]],
    );
    check(
        &mut git,
        "remote add origin https://example.com",
        expect![[r#"
            Dispatched(
                [
                    "remote",
                    "add",
                ],
            )
        "#]],
    );
    assert_eq!(
        *log.borrow(),
        [
            "init Absent",
            r#"copy One("a") Many(["b", "c"])"#,
            r#"add One("origin") One("https://example.com")"#,
        ]
    );
}

#[test]
fn optional_and_variadic() {
    let log = log();
    let mut git = git(&log);
    git.parse(["init", "repo"]).unwrap();
    git.parse(["clone", "url"]).unwrap();
    git.parse(["clone", "url", "dir", "extra", "ignored"]).unwrap();
    git.parse(["copy", "a", "b"]).unwrap();
    assert_eq!(
        *log.borrow(),
        [
            r#"init One("repo")"#,
            r#"clone One("url") Absent"#,
            r#"clone One("url") One("dir")"#,
            r#"copy One("a") Many(["b"])"#,
        ]
    );
}

#[test]
fn missing_required_argument() {
    let log = log();
    let mut git = git(&log);
    check(&mut git, "copy a", expect!["missing required argument `dst`"]);
    check(&mut git, "copy", expect!["missing required argument `src`"]);
    check(&mut git, "remote add origin", expect!["missing required argument `url`"]);
    assert!(log.borrow().is_empty());
}

#[test]
fn options_belong_to_their_command() {
    let log = log();
    let mut git = git(&log);
    git.parse(["-C", "/tmp", "clone", "--depth", "1", "url"]).unwrap();
    assert_eq!(git.value("dir"), Some(&Value::Str("/tmp".to_string())));
    let clone = git.find_subcommand("clone").unwrap();
    assert_eq!(clone.value("depth"), Some(&Value::Int(1)));

    git.parse(["init", "-q"]).unwrap();
    assert_eq!(git.find_subcommand("init").unwrap().value("quiet"), Some(&Value::Bool(true)));
    assert_eq!(git.value("quiet"), None);

    check(&mut git, "init --depth 1", expect!["unknown option `--depth`"]);
    check(&mut git, "clone --depth lol url", expect!["can't parse `--depth`, invalid digit found in string"]);
    check(&mut git, "--quiet init", expect!["unknown option `--quiet`"]);
}

#[test]
fn values_of_nested_options_stay_whole() {
    let mut app = Command::new("app");
    app.version("1.0.0").option("-q, --quiet", "");
    app.command("commit").option("-m, --message <msg>", "").option("-a, --all", "").action(|_| Ok(()));

    let message = |app: &Command| app.find_subcommand("commit").and_then(|it| it.value("message")).cloned();
    for value in ["-ab", "-v", "-q", "--", "--all", "--message=x"] {
        app.parse(["commit", "-m", value]).unwrap();
        assert_eq!(message(&app), Some(Value::Str(value.to_string())));
    }
    assert_eq!(app.value("quiet"), None);

    app.parse(["-q", "commit", "--message", "--quiet", "-a"]).unwrap();
    assert_eq!(message(&app), Some(Value::Str("--quiet".to_string())));
    assert_eq!(app.value("quiet"), Some(&Value::Bool(true)));
    assert_eq!(app.find_subcommand("commit").unwrap().value("all"), Some(&Value::Bool(true)));

    check(&mut app, "commit -m", expect!["option `-m, --message <msg>` argument missing"]);
    check(&mut app, "commit -v", expect!["unknown option `-v`"]);
}

#[test]
fn nested_dir_takes_flag_shaped_value() {
    let log = log();
    let mut git = git(&log);
    git.command("server").option("--dir <path>", "").option("--log", "").action(record(&log));

    git.parse(["server", "--dir", "--log"]).unwrap();
    let server = git.find_subcommand("server").unwrap();
    assert_eq!(server.value("dir"), Some(&Value::Str("--log".to_string())));
    assert_eq!(server.value("log"), None);

    git.parse(["server", "--dir=--log", "--log"]).unwrap();
    let server = git.find_subcommand("server").unwrap();
    assert_eq!(server.value("dir"), Some(&Value::Str("--log".to_string())));
    assert_eq!(server.value("log"), Some(&Value::Bool(true)));
    assert_eq!(git.value("dir"), None);
    assert_eq!(*log.borrow(), ["server", "server"]);
}

#[test]
fn nested_subcommands() {
    let log = log();
    let mut git = git(&log);
    check(
        &mut git,
        "remote --verbose",
        expect![[r#"
            Dispatched(
                [
                    "remote",
                ],
            )
        "#]],
    );
    assert_eq!(git.find_subcommand("remote").unwrap().value("verbose"), Some(&Value::Bool(true)));

    // Unknown options are handed down in order, so positionals keep their
    // places around them.
    git.parse(["remote", "add", "-f", "origin", "url"]).unwrap();
    git.parse(["remote", "add", "origin", "-f", "url"]).unwrap();
    git.parse(["remote", "add", "origin", "url", "-f"]).unwrap();
    git.parse(["remote", "--verbose", "remove", "origin"]).unwrap();
    assert_eq!(
        *log.borrow(),
        [
            "remote",
            r#"add One("origin") One("url")"#,
            r#"add One("origin") One("url")"#,
            r#"add One("origin") One("url")"#,
            r#"remove One("origin")"#,
        ]
    );

    check(&mut git, "remote add --werbose origin url", expect!["unknown option `--werbose`"]);
}

#[test]
fn literal_arguments_reach_the_action() {
    let log = log();
    let mut git = git(&log);
    git.parse(["copy", "--", "-a", "--b"]).unwrap();
    git.parse(["copy", "x", "--", "-q"]).unwrap();
    assert_eq!(*log.borrow(), [r#"copy One("-a") Many(["--b"])"#, r#"copy One("x") Many(["-q"])"#]);
}

#[test]
fn unmatched_commands() {
    let log = log();
    let mut git = git(&log);
    check(
        &mut git,
        "push origin",
        expect![[r#"
            Wildcard(
                [
                    "push",
                    "origin",
                ],
            )
        "#]],
    );
    check(&mut git, "", expect!["NoCommand\n"]);
    check(&mut git, "-C .", expect!["NoCommand\n"]);
    check(&mut git, "--werbose", expect!["unknown option `--werbose`"]);

    let seen = Rc::new(RefCell::new(Vec::new()));
    git.on("command:*", {
        let seen = seen.clone();
        move |event| {
            seen.borrow_mut().push(format!("{event:?}"));
            Ok(())
        }
    });
    git.parse(["push", "--force", "origin"]).unwrap();
    assert_eq!(*seen.borrow(), [r#"Command { name: "*", args: ["push"], unknown: ["--force", "origin"] }"#]);
    assert!(log.borrow().is_empty());
}

#[test]
fn command_listeners() {
    let log = log();
    let mut git = git(&log);
    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in ["command:init", "command:status"] {
        let seen = seen.clone();
        git.on(event, move |event| {
            seen.borrow_mut().push(format!("{event:?}"));
            Ok(())
        });
    }
    // A listener is enough to make a command without an action routable,
    // and it counts as handling it.
    git.command("status");

    assert_eq!(git.parse(["init", "x"]).unwrap(), Outcome::Dispatched(vec!["init".to_string()]));
    assert_eq!(git.parse(["status", "-s"]).unwrap_err().to_string(), "unknown option `-s`");
    assert_eq!(git.parse(["status"]).unwrap(), Outcome::Dispatched(vec!["status".to_string()]));
    assert_eq!(
        *seen.borrow(),
        [
            r#"Command { name: "init", args: ["x"], unknown: [] }"#,
            r#"Command { name: "status", args: [], unknown: [] }"#,
        ]
    );
    assert_eq!(*log.borrow(), [r#"init One("x")"#]);
}

#[test]
fn failing_action() {
    let mut cmd = Command::new("app");
    cmd.command("boom").action(|_| anyhow::bail!("it broke"));
    let err = cmd.parse(["boom"]).unwrap_err();
    assert_eq!(err.to_string(), "it broke");
    assert!(matches!(err, lightcmd::Error::Action(_)));
}
