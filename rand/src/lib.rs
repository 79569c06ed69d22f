//! 外部熵源适配 <br>
//!
//! `Rand` 描述一个按需填充字节的客户端, `Source` 把它包装成 `xrand::RngCore`,
//! 使远程熵可以驱动 `rand` 生态中的算法.

use std::io::Read;

pub trait Rand {
    type Error;

    /// 单次调用可请求的最大字节数
    const MAX_LEN: usize = usize::MAX;

    /// 填充`random`的前缀, 返回实际写入的字节数
    fn rand(&mut self, random: &mut [u8]) -> Result<usize, Self::Error>;
}

mod source;
pub use source::{Source, SourceError};

/// 将任意`Read`当作字节源
#[derive(Clone, Debug, Default)]
pub struct ReadRand<R> {
    inner: R,
}

impl<R: Read> ReadRand<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Rand for ReadRand<R> {
    type Error = std::io::Error;

    fn rand(&mut self, random: &mut [u8]) -> Result<usize, Self::Error> {
        self.inner.read(random)
    }
}

impl<T: Rand + ?Sized> Rand for &mut T {
    type Error = T::Error;

    const MAX_LEN: usize = T::MAX_LEN;

    fn rand(&mut self, random: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).rand(random)
    }
}
