use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;
use qrand::cmd::{BytesCmd, Cmd, NumbersCmd, PasswordCmd};
use std::path::PathBuf;

const ABOUT: &str = "Queries the Australian National University Quantum Numbers (AQN) API for random bytes.

The program expects to read a valid API key from the environment variable AQN_API_KEY,
or from `api_key` in the config file. See https://quantumnumbers.anu.edu.au/documentation
for details about the API.";

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("QRAND_VERSION_INFO");
    let app = Command::new("qrand")
        .version(version)
        .about(ABOUT)
        .arg(
            Arg::new("config")
                .value_name("FILE")
                .long("config")
                .short('c')
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .required(false)
                .global(true)
                .help("config file, default is ~/.config/qrand/config.json"),
        )
        .subcommand(BytesCmd::cmd())
        .subcommand(NumbersCmd::cmd())
        .subcommand(PasswordCmd::cmd())
        .get_matches();

    let Some((s, m)) = app.subcommand() else {
        println!("{} {} {}", env!("CARGO_PKG_NAME"), version, env!("QRAND_GIT_INFO"));
        return;
    };

    let res = qrand::cmd::client(app.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .and_then(|client| match s {
            BytesCmd::NAME => BytesCmd::new(client).run(m),
            NumbersCmd::NAME => NumbersCmd::new(client).run(m),
            PasswordCmd::NAME => PasswordCmd::new(client).run(m),
            name => anyhow::bail!("unsupport for {}", name),
        });

    if let Err(e) = res {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
