use crate::cmd::{fill, Cmd};
use crate::Client;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub struct NumbersCmd {
    client: Client,
}

impl NumbersCmd {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn format_numbers(s: &[u8]) -> String {
    let nums = s.iter().map(|b| b.to_string()).collect::<Vec<_>>();
    format!("[{}]", nums.join(" "))
}

impl Cmd for NumbersCmd {
    const NAME: &'static str = "numbers";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Print random bytes as decimal numbers in [0, 255]")
            .arg(
                Arg::new("num")
                    .value_name("COUNT")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(usize))
                    .default_value("10")
                    .help("How many numbers to print"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let num = m.get_one::<usize>("num").copied().unwrap_or(10);
        let mut buf = vec![0u8; num];
        fill(&self.client, buf.as_mut_slice())?;

        println!("{}", format_numbers(buf.as_slice()));
        Ok(())
    }
}
