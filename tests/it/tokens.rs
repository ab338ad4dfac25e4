use std::{cell::RefCell, rc::Rc};

use lightcmd::{Command, Outcome};

type Events = Rc<RefCell<Vec<String>>>;

fn ls(events: &Events) -> Command {
    let mut cmd = Command::new("ls");
    cmd.option("-a, --all", "").option("-b, --brief", "").option("-w, --width <n>", "");
    for event in ["all", "brief", "width", "command:*"] {
        let events = events.clone();
        cmd.on(event, move |event| {
            events.borrow_mut().push(format!("{event:?}"));
            Ok(())
        });
    }
    cmd
}

fn run(args: &str) -> (String, Vec<String>) {
    let events = Events::default();
    let res = ls(&events).parse(args.split_ascii_whitespace());
    let res = match res {
        Ok(it) => format!("{it:?}"),
        Err(err) => err.to_string(),
    };
    let events = events.borrow().clone();
    (res, events)
}

#[test]
fn short_clusters() {
    assert_eq!(run("-abc x"), run("-a -b -c x"));
    assert_eq!(run("-abc x").0, "unknown option `-c`");

    let (res, events) = run("-ba x");
    assert_eq!(res, r#"Wildcard(["x"])"#);
    assert_eq!(
        events,
        [
            r#"Option { name: "brief", value: None }"#,
            r#"Option { name: "all", value: None }"#,
            r#"Command { name: "*", args: ["x"], unknown: [] }"#,
        ]
    );
    assert_eq!(run("-ba x"), run("-b -a x"));
}

#[test]
fn long_with_equals() {
    assert_eq!(run("--width=80 x"), run("--width 80 x"));
    let (_, events) = run("--width=80");
    assert_eq!(events[0], r#"Option { name: "width", value: Some("80") }"#);
}

#[test]
fn value_after_required_option_is_kept_whole() {
    let (_, events) = run("-w -ab");
    assert_eq!(events[0], r#"Option { name: "width", value: Some("-ab") }"#);
    assert_eq!(events.len(), 2);
}

#[test]
fn double_dash() {
    let (res, events) = run("-a -- -b --width -- x");
    assert_eq!(res, r#"Wildcard(["-b", "--width", "--", "x"])"#);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], r#"Option { name: "all", value: None }"#);

    let events = Events::default();
    let outcome = ls(&events).parse(["--", "--", "-a"]).unwrap();
    assert_eq!(outcome, Outcome::Wildcard(vec!["--".to_string(), "-a".to_string()]));
}

#[test]
fn nothing_to_do() {
    let (res, events) = run("");
    assert_eq!(res, r#"Wildcard([])"#);
    assert_eq!(events, [r#"Command { name: "*", args: [], unknown: [] }"#]);
}
