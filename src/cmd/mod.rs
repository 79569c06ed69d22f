use std::path::Path;

use anyhow::Context;
use clap::{ArgMatches, Command};

use crate::{client::Requester, config::API_KEY_ENV, Client, ClientConfig, QrandError};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

/// 按配置创建客户端, 没有密钥时给出提示
pub fn client(config: Option<&Path>) -> anyhow::Result<Client> {
    let cfg = ClientConfig::load(config).context("load config failed")?;

    match Client::with_config(&cfg) {
        Err(QrandError::MissingApiKey) => anyhow::bail!(
            "Please set {API_KEY_ENV} to a valid API key: see https://quantumnumbers.anu.edu.au/documentation for details."
        ),
        x => Ok(x?),
    }
}

/// 以不超过`MAX_BYTES_PER_REQUEST`的分块填满`buf`
pub fn fill<Q: Requester>(client: &Client<Q>, buf: &mut [u8]) -> anyhow::Result<()> {
    crate::new_source(client)
        .try_fill(buf)
        .with_context(|| format!("fetch {} random bytes failed", buf.len()))
}

mod bytes;
pub use bytes::BytesCmd;

mod numbers;
pub use numbers::NumbersCmd;

mod password;
pub use password::PasswordCmd;
