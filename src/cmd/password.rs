use crate::cmd::Cmd;
use crate::{Client, Rand, Source, SourceError};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

const CHARS: &[u8] =
    br#"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789~!@#$%^&*()_+-={}|[]\:"<>?,./"#;

pub struct PasswordCmd {
    client: Client,
}

impl PasswordCmd {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// 均匀选取`[0, n)`中的下标, 丢弃落在最后不完整区间内的值
fn gen_index<R: Rand>(rng: &mut Source<R>, n: usize) -> Result<usize, SourceError<R::Error>> {
    let n = n as u64;
    let zone = u64::MAX - (u64::MAX % n + 1) % n;

    loop {
        let v = rng.try_next_u64()?;
        if v <= zone {
            return Ok((v % n) as usize);
        }
    }
}

fn password<R: Rand>(rng: &mut Source<R>, len: usize) -> Result<String, SourceError<R::Error>> {
    let mut s = String::with_capacity(len);
    for _ in 0..len {
        s.push(CHARS[gen_index(rng, CHARS.len())?] as char);
    }

    Ok(s)
}

impl Cmd for PasswordCmd {
    const NAME: &'static str = "password";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Generate a password with the quantum random source")
            .arg(
                Arg::new("len")
                    .long("len")
                    .short('l')
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(usize))
                    .default_value("32")
                    .help("the password length, every character costs one API call"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let len = m.get_one::<usize>("len").copied().unwrap_or(32);
        let mut rng = crate::new_source(&self.client);

        println!("{}", password(&mut rng, len)?);
        Ok(())
    }
}
