//! ANU Quantum Numbers API客户端 <br>
//!
//! 每次读取发起一次`GET <base_url>?length=<n>&type=uint8`请求, 不重试, 不分块, 不缓存.

use crate::config::ClientConfig;
use crate::error::{BoxError, QrandError};
use crate::response::RandomResponse;
use std::fmt::{self, Debug, Formatter};
use std::io::{self, ErrorKind, Read};
use std::time::Duration;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// API单次请求的最大字节数
pub const MAX_BYTES_PER_REQUEST: usize = 1024;

pub const DEFAULT_BASE_URL: &str = "https://api.quantumnumbers.anu.edu.au";

pub const API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 发送HTTP GET请求 <br>
///
/// 实现只应返回`QrandError::Transport`(连接失败, 任何阶段的超时)或`QrandError::BodyRead`(响应体读取失败),
/// 状态码由`Client`处理.
pub trait Requester {
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, QrandError>;
}

impl<T: Requester + ?Sized> Requester for &T {
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, QrandError> {
        (**self).get(url, headers)
    }
}

#[derive(Clone, Debug)]
pub struct HttpRequester {
    client: reqwest::blocking::Client,
}

impl HttpRequester {
    pub fn new(timeout: Duration) -> Result<Self, QrandError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QrandError::Transport(e.into()))?;

        Ok(Self { client })
    }
}

impl Requester for HttpRequester {
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, QrandError> {
        let mut req = self.client.get(url.clone());
        for &(k, v) in headers {
            req = req.header(k, v);
        }

        let resp = req
            .send()
            .map_err(|e| QrandError::Transport(BoxError::from(e)))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(|e| {
            // the timeout covers the whole exchange, including the body
            if e.is_timeout() {
                QrandError::Transport(BoxError::from(e))
            } else {
                QrandError::BodyRead(BoxError::from(e))
            }
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// API密钥, 释放时清零
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    key: String,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, QrandError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(QrandError::MissingApiKey);
        }

        Ok(Self { key })
    }

    pub fn as_str(&self) -> &str {
        self.key.as_str()
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Clone, Debug)]
pub struct Client<Q = HttpRequester> {
    base_url: Url,
    api_key: ApiKey,
    requester: Q,
}

impl Client<HttpRequester> {
    /// 使用默认服务地址和5秒超时
    pub fn new(api_key: impl Into<String>) -> Result<Self, QrandError> {
        Self::with_requester(
            DEFAULT_BASE_URL,
            ApiKey::new(api_key)?,
            HttpRequester::new(DEFAULT_TIMEOUT)?,
        )
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self, QrandError> {
        Self::with_requester(
            config.base_url.as_str(),
            ApiKey::new(config.api_key.as_str())?,
            HttpRequester::new(config.timeout())?,
        )
    }
}

impl<Q: Requester> Client<Q> {
    pub fn with_requester(base_url: &str, api_key: ApiKey, requester: Q) -> Result<Self, QrandError> {
        let base_url = Url::parse(base_url).map_err(|source| QrandError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            base_url,
            api_key,
            requester,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn requester(&self) -> &Q {
        &self.requester
    }

    pub fn request_url(&self, len: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("length", len.to_string().as_str())
            .append_pair("type", "uint8");
        url
    }

    /// 请求`buf.len()`个随机字节写入`buf`, 返回实际写入的字节数 <br>
    ///
    /// 服务端返回的字节少于请求数时只填充前缀, 不报错; `buf`为空时不发请求.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, QrandError> {
        if buf.len() > MAX_BYTES_PER_REQUEST {
            return Err(QrandError::SizeLimitExceeded {
                limit: MAX_BYTES_PER_REQUEST,
                requested: buf.len(),
            });
        }

        if buf.is_empty() {
            return Ok(0);
        }

        let url = self.request_url(buf.len());
        log::debug!("GET {url}");

        let resp = self
            .requester
            .get(&url, &[(API_KEY_HEADER, self.api_key.as_str())])?;
        log::trace!("status {}, {} bytes body", resp.status, resp.body.len());

        match resp.status {
            200 => {}
            403 => return Err(QrandError::Unauthorized),
            status => return Err(QrandError::unexpected_status(status, &resp.body)),
        }

        let data = RandomResponse::decode(&resp.body)
            .map_err(|e| QrandError::invalid_response(&resp.body, e))?;
        let n = buf.len().min(data.data().len());
        buf[..n].copy_from_slice(&data.data()[..n]);

        Ok(n)
    }
}

fn io_error(e: QrandError) -> io::Error {
    let kind = match &e {
        QrandError::SizeLimitExceeded { .. } => ErrorKind::InvalidInput,
        QrandError::Unauthorized => ErrorKind::PermissionDenied,
        QrandError::InvalidResponse { .. } => ErrorKind::InvalidData,
        _ => ErrorKind::Other,
    };

    io::Error::new(kind, e)
}

impl<Q: Requester> Read for Client<Q> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Client::<Q>::read(self, buf).map_err(io_error)
    }
}

impl<Q: Requester> Read for &Client<Q> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Client::<Q>::read(*self, buf).map_err(io_error)
    }
}

impl<Q: Requester> rand::Rand for Client<Q> {
    type Error = QrandError;

    const MAX_LEN: usize = MAX_BYTES_PER_REQUEST;

    fn rand(&mut self, random: &mut [u8]) -> Result<usize, Self::Error> {
        Client::<Q>::read(self, random)
    }
}

impl<Q: Requester> rand::Rand for &Client<Q> {
    type Error = QrandError;

    const MAX_LEN: usize = MAX_BYTES_PER_REQUEST;

    fn rand(&mut self, random: &mut [u8]) -> Result<usize, Self::Error> {
        Client::<Q>::read(*self, random)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiKey, Client, HttpResponse, Requester, API_KEY_HEADER, MAX_BYTES_PER_REQUEST};
    use crate::error::{DecodeError, QrandError};
    use std::cell::RefCell;
    use std::io::{ErrorKind, Read};
    use url::Url;

    /// 记录请求并返回固定响应
    #[derive(Debug)]
    struct StubRequester {
        status: u16,
        body: String,
        requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubRequester {
        fn new(status: u16, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                requests: RefCell::new(vec![]),
            }
        }

        fn with_bytes(n: usize) -> Self {
            let data = (0..n).map(|i| (i % 256).to_string()).collect::<Vec<_>>();
            Self::new(200, format!(r#"{{"data":[{}]}}"#, data.join(",")))
        }

        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Requester for StubRequester {
        fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, QrandError> {
            self.requests.borrow_mut().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|&(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));

            Ok(HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn client(stub: StubRequester) -> Client<StubRequester> {
        Client::with_requester(
            "https://qrng.example.com/API",
            ApiKey::new("secret").unwrap(),
            stub,
        )
        .unwrap()
    }

    #[test]
    fn request_shape() {
        let c = client(StubRequester::new(200, r#"{"data":[99,100,101]}"#));
        let mut buf = [0u8; 3];
        assert_eq!(c.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [99, 100, 101]);

        let reqs = c.requester().requests.borrow();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].0, "https://qrng.example.com/API?length=3&type=uint8");
        assert_eq!(
            reqs[0].1,
            vec![(API_KEY_HEADER.to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn full_reads_up_to_limit() {
        for n in [1, 2, 8, 63, 512, MAX_BYTES_PER_REQUEST] {
            let c = client(StubRequester::with_bytes(MAX_BYTES_PER_REQUEST));
            let mut buf = vec![0u8; n];
            assert_eq!(c.read(&mut buf).unwrap(), n, "case {n} failed");
            assert_eq!(buf[n - 1], ((n - 1) % 256) as u8, "case {n} failed");
        }
    }

    #[test]
    fn empty_buffer_skips_request() {
        let c = client(StubRequester::with_bytes(4));
        assert_eq!(c.read(&mut []).unwrap(), 0);
        assert_eq!(c.requester().calls(), 0);
    }

    #[test]
    fn size_limit() {
        let c = client(StubRequester::with_bytes(4));
        let mut buf = vec![0u8; MAX_BYTES_PER_REQUEST + 1];
        match c.read(&mut buf) {
            Err(QrandError::SizeLimitExceeded { limit, requested }) => {
                assert_eq!(limit, 1024);
                assert_eq!(requested, 1025);
            }
            x => panic!("want size limit error, got {x:?}"),
        }
        assert_eq!(c.requester().calls(), 0);
    }

    #[test]
    fn short_response_is_partial_fill() {
        let c = client(StubRequester::new(200, r#"{"data":[7,8]}"#));
        let mut buf = [0xffu8; 5];
        assert_eq!(c.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [7, 8, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn status_mapping() {
        let c = client(StubRequester::new(403, "Forbidden"));
        assert!(matches!(c.read(&mut [0u8; 4]), Err(QrandError::Unauthorized)));

        let c = client(StubRequester::new(418, "I'm a teapot"));
        match c.read(&mut [0u8; 4]) {
            Err(QrandError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, 418);
                assert_eq!(body, "I'm a teapot");
            }
            x => panic!("want unexpected status, got {x:?}"),
        }
    }

    #[test]
    fn invalid_body() {
        let c = client(StubRequester::new(200, r#"{"data":[256]}"#));
        match c.read(&mut [0u8; 1]) {
            Err(QrandError::InvalidResponse { body, source }) => {
                assert_eq!(body, r#"{"data":[256]}"#);
                assert!(matches!(source, DecodeError::ByteOutOfRange { .. }));
            }
            x => panic!("want invalid response, got {x:?}"),
        }
    }

    #[test]
    fn io_read_and_error_kinds() {
        let mut c = client(StubRequester::with_bytes(16));
        let mut buf = [0u8; 16];
        (&c).read_exact(&mut buf).unwrap();
        assert_eq!(buf[15], 15);

        let mut big = vec![0u8; 2048];
        let e = Read::read(&mut c, &mut big).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);

        let mut c = client(StubRequester::new(403, ""));
        let e = Read::read(&mut c, &mut buf).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn source_over_client() {
        let c = client(StubRequester::new(200, r#"{"data":[0,0,0,0,0,0,0,0]}"#));
        let mut s = crate::new_source(c);
        assert_eq!(s.try_next_u64().unwrap(), 0);
        assert_eq!(s.try_next_i63().unwrap(), 0);

        let c = client(StubRequester::new(
            200,
            r#"{"data":[255,255,255,255,255,255,255,255]}"#,
        ));
        let mut s = crate::new_source(&c);
        assert_eq!(s.try_next_i63().unwrap(), i64::MAX);
        assert_eq!(c.requester().calls(), 1);
        assert!(c.requester().requests.borrow()[0].0.ends_with("?length=8&type=uint8"));
    }

    #[test]
    fn source_fails_on_short_response() {
        let c = client(StubRequester::new(200, r#"{"data":[1,2,3]}"#));
        let mut s = crate::new_source(c);
        assert!(matches!(
            s.try_next_u64(),
            Err(rand::SourceError::ShortRead { target: 8, real: 3 })
        ));
    }

    #[test]
    fn api_key() {
        assert!(matches!(ApiKey::new("  "), Err(QrandError::MissingApiKey)));
        let k = ApiKey::new("secret").unwrap();
        assert_eq!(k.as_str(), "secret");
        assert!(!format!("{k:?}").contains("secret"));
    }

    #[test]
    fn invalid_base_url() {
        let e = Client::with_requester(
            "not a url",
            ApiKey::new("k").unwrap(),
            StubRequester::with_bytes(1),
        )
        .unwrap_err();
        assert!(matches!(e, QrandError::InvalidBaseUrl { .. }));
    }
}
