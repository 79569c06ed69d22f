//! 获取随机字节并输出Hex串
//!

use crate::cmd::{fill, Cmd};
use crate::Client;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;

pub struct BytesCmd {
    client: Client,
}

impl BytesCmd {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub(super) fn write_hex<W: Write>(stream: &mut W, s: &[u8], is_0x: bool) -> std::io::Result<()> {
    if is_0x && !s.is_empty() {
        write!(stream, "0x")?;
    }

    for &b in s.iter() {
        write!(stream, "{:02x}", b)?;
    }

    writeln!(stream)
}

impl Cmd for BytesCmd {
    const NAME: &'static str = "bytes";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Get random bytes from the ANU quantum random number generator and print them as a hex string")
            .arg(
                Arg::new("num")
                    .value_name("NUM_BYTES")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(usize))
                    .required(true)
                    .help("Number of random bytes, requests above 1024 bytes are split into several API calls"),
            )
            .arg(
                Arg::new("output")
                    .value_name("FILE")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(false)
                    .help("To specified the file to save the hex string"),
            )
            .arg(
                Arg::new("0x")
                    .long("0x")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("Output hex string with prefix `0x`"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let num = m.get_one::<usize>("num").copied().unwrap_or_default();
        let mut buf = vec![0u8; num];
        fill(&self.client, buf.as_mut_slice())?;

        let mut ostream: Box<dyn Write> = match m.get_one::<PathBuf>("output") {
            Some(x) => Box::new(BufWriter::new(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(x)?,
            )),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        };

        let res = write_hex(&mut ostream, buf.as_slice(), m.get_flag("0x")).and_then(|_| ostream.flush());
        match res {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log::info!("{e}");
                Ok(())
            }
            x => Ok(x?),
        }
    }
}
