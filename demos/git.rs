//! A pretend `git`: nested commands run in process, `status` and `log` are
//! delegated to `git-status` and `git-log` executables.

use lightcmd::{Command, CommandOpts, Outcome};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let mut git = Command::new("git");
    git.version("2.0.0")
        .option("-C, --dir <path>", "run as if started in <path>")
        .external_command("status", "show the working tree status", CommandOpts::default())
        .external_command("log", "show commit logs", CommandOpts::default());

    git.command("clone <url> [dir]").description("clone a repository").action(|inv| {
        let url = inv.arg("url").as_str().unwrap_or_default();
        let dir = inv.arg("dir").as_str().unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url));
        println!("cloning {url} into {dir}");
        Ok(())
    });

    let remote = git.command("remote").description("manage remotes");
    remote.option("--verbose", "show urls").action(|inv| {
        println!("origin{}", if inv.is_set("verbose") { "\thttps://example.com" } else { "" });
        Ok(())
    });
    remote.command("add <name> <url>").option("-f, --fetch", "fetch right away").action(|inv| {
        let (name, url) = (inv.arg("name").as_str().unwrap_or_default(), inv.arg("url").as_str().unwrap_or_default());
        println!("added {name} -> {url}");
        if inv.is_set("fetch") {
            println!("fetching {name}");
        }
        Ok(())
    });
    remote.command("remove <name>").alias("rm").action(|inv| {
        println!("removed {}", inv.arg("name").as_str().unwrap_or_default());
        Ok(())
    });

    git.on("command:*", |event| {
        tracing::debug!(?event, "no such command");
        Ok(())
    });

    match git.parse_env_or_exit() {
        Outcome::Dispatched(path) => tracing::debug!(?path, "done"),
        Outcome::Delegated(delegation) => delegation.exec_or_exit(),
        Outcome::Wildcard(args) => {
            eprintln!("error: `{}` is not a git command, see --help", args.join(" "));
            std::process::exit(1)
        }
        Outcome::NoCommand => print!("{}", lightcmd::help::render(&git)),
    }
}
