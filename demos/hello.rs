use lightcmd::{value, Command, Outcome};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let mut cmd = Command::default();
    cmd.version("0.1.0").description("prints greetings");
    cmd.command("greet [name]")
        .description("greet somebody, or the world")
        .option("-s, --shout", "greet loudly")
        .option("-g, --greeting <word>", "what to say instead of hello")
        .option_with("-n, --times <n>", "how many times to greet", value::parse::<i64>())
        .action(|inv| {
            let greeting = inv.value("greeting").map_or_else(|| "hello".to_string(), ToString::to_string);
            let name = inv.arg("name").as_str().unwrap_or("world");
            let mut line = format!("{greeting}, {name}!");
            if inv.is_set("shout") {
                line = line.to_uppercase();
            }
            let times = inv.value("times").and_then(|it| it.as_int()).unwrap_or(1);
            anyhow::ensure!(times >= 0, "can't greet {times} times");
            for _ in 0..times {
                println!("{line}");
            }
            Ok(())
        });

    match cmd.parse_env_or_exit() {
        Outcome::Dispatched(_) => (),
        Outcome::Wildcard(args) => {
            eprintln!("error: unknown command `{}`", args.join(" "));
            std::process::exit(1)
        }
        Outcome::NoCommand | Outcome::Delegated(_) => print!("{}", lightcmd::help::render(&cmd)),
    }
}
