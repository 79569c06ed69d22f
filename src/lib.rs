//! ANU量子随机数发生器客户端 <br>
//!
//! `Client`每次调用发出一个请求填充缓冲区, `new_source`把任意按字节读取的客户端包装为`rand`熵源.

pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod response;

pub use client::{ApiKey, Client, HttpRequester, HttpResponse, Requester, MAX_BYTES_PER_REQUEST};
pub use config::ClientConfig;
pub use error::{DecodeError, QrandError};
pub use rand::{Rand, ReadRand, Source, SourceError};
pub use response::RandomResponse;

/// 以客户端为熵源构造随机数生成器
pub fn new_source<R: Rand>(client: R) -> Source<R> {
    Source::new(client)
}
