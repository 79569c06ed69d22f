use std::fmt::{self, Debug, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::Config;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// 未配置密钥时读取的环境变量
pub const API_KEY_ENV: &str = "AQN_API_KEY";

/// 客户端配置, 释放时清零
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ClientConfig {
    pub base_url: String,

    // empty means unset
    pub api_key: String,

    // milliseconds
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    /// `~/.config/qrand/config.json`
    pub fn default_file() -> Option<PathBuf> {
        let mut path = home::home_dir()?;
        path.push(".config");
        path.push("qrand");
        path.push("config.json");
        Some(path)
    }

    /// 依次叠加: 默认值, 配置文件`f`(缺省为`default_file`), `QRAND_`前缀的环境变量 <br>
    ///
    /// 最终密钥为空时使用`AQN_API_KEY`.
    pub fn load(f: Option<&Path>) -> anyhow::Result<Self> {
        let default_config = Config::try_from(&ClientConfig::default())?;
        let mut config = Config::builder().add_source(default_config);

        let file = f.map(Path::to_path_buf).or_else(Self::default_file);
        if let Some(file) = file {
            log::trace!("config file {}", file.display());
            config = config.add_source(
                config::File::from(file.as_path())
                    .format(config::FileFormat::Json)
                    .required(f.is_some()),
            );
        }

        let config = config
            .add_source(
                config::Environment::with_prefix("QRAND")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?;

        let mut cfg: ClientConfig = config.try_deserialize()?;
        if cfg.api_key.is_empty() {
            cfg.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        }
        cfg.timeout_ms = cfg.timeout_ms.max(1);

        log::trace!("{:?}", cfg);

        Ok(cfg)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
