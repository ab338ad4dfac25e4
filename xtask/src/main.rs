
use std::time::Instant;

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = Section::new("BUILD");
        cmd!(sh, "cargo test --workspace --all-targets --no-run").run()?;
    }

    {
        let _s = Section::new("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
        cmd!(sh, "cargo test --doc -p lightcmd").run()?;
    }

    {
        let _s = Section::new("DEMOS");
        let greeting = cmd!(sh, "cargo run -q --example hello -- greet -s -n 2 ci").read()?;
        assert_eq!(greeting, "HELLO, CI!\nHELLO, CI!");

        let added = cmd!(sh, "cargo run -q --example git -- remote add -f origin https://example.com").read()?;
        assert_eq!(added, "added origin -> https://example.com\nfetching origin");
    }

    {
        let _s = Section::new("PUBLISH");

        // `path+file:///..#0.1.0` or `..#lightcmd@0.1.0`, depending on cargo
        let pkgid = cmd!(sh, "cargo pkgid -p lightcmd").read()?;
        let version = pkgid.rsplit(['#', '@']).next().unwrap_or_default().to_string();
        let tag = format!("v{version}");

        let current_branch = cmd!(sh, "git branch --show-current").read()?;
        let tag_exists =
            cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);

        if current_branch == "master" && !tag_exists && !version.is_empty() {
            cmd!(sh, "git tag {tag}").run()?;
            cmd!(sh, "cargo publish -p lightcmd").run()?;
            cmd!(sh, "git push --tags").run()?;
        }
    }

    Ok(())
}

/// A collapsible CI log group, timed and closed on drop.
struct Section {
    name: &'static str,
    start: Instant,
}

impl Section {
    fn new(name: &'static str) -> Section {
        println!("::group::{name}");
        Section { name, start: Instant::now() }
    }
}

impl Drop for Section {
    fn drop(&mut self) {
        eprintln!("{}: {:.2?}", self.name, self.start.elapsed());
        println!("::endgroup::");
    }
}
