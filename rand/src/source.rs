use crate::Rand;
use thiserror::Error;
use xrand::RngCore;

#[derive(Debug, Error)]
pub enum SourceError<E> {
    #[error("{0}")]
    Read(E),

    /// 实际读取字节数`real`小于目标字节数`target`
    #[error("short read: want {target} bytes, got {real}")]
    ShortRead { target: usize, real: usize },
}

/// 把字节源包装成随机数生成器 <br>
///
/// 熵来自外部, 因此没有种子可言: `seed`只为兼容接口而存在. 读取失败或读取字节不足时
/// 直接返回错误, 不会用零补齐.
#[derive(Clone, Debug, Default)]
pub struct Source<R> {
    inner: R,
}

impl<R: Rand> Source<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// 忽略种子
    pub fn seed(&mut self, _seed: i64) {}

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SourceError<R::Error>> {
        let mut buf = [0u8; N];
        let real = self.inner.rand(&mut buf).map_err(SourceError::Read)?;
        if real < N {
            return Err(SourceError::ShortRead { target: N, real });
        }

        Ok(buf)
    }

    pub fn try_next_u32(&mut self) -> Result<u32, SourceError<R::Error>> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// 一次读取8个字节, 按大端序组成`u64`
    pub fn try_next_u64(&mut self) -> Result<u64, SourceError<R::Error>> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// 清除最高位, 结果总在`[0, 2^63 - 1]`内
    pub fn try_next_i63(&mut self) -> Result<i64, SourceError<R::Error>> {
        self.try_next_u64().map(|x| (x & !(1u64 << 63)) as i64)
    }

    /// 按`R::MAX_LEN`分块填满`dst`
    pub fn try_fill(&mut self, dst: &mut [u8]) -> Result<(), SourceError<R::Error>> {
        let max_len = R::MAX_LEN.max(1);
        let target = dst.len();
        let mut filled = 0;

        while filled < target {
            let end = filled + max_len.min(target - filled);
            let n = self
                .inner
                .rand(&mut dst[filled..end])
                .map_err(SourceError::Read)?;
            if n == 0 {
                return Err(SourceError::ShortRead {
                    target,
                    real: filled,
                });
            }
            filled += n;
        }

        Ok(())
    }
}

impl<R> RngCore for Source<R>
where
    R: Rand,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    fn next_u32(&mut self) -> u32 {
        match self.try_next_u32() {
            Ok(x) => x,
            Err(e) => panic!("entropy source failed: {e}"),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self.try_next_u64() {
            Ok(x) => x,
            Err(e) => panic!("entropy source failed: {e}"),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.try_fill(dest) {
            panic!("entropy source failed: {e}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), xrand::Error> {
        self.try_fill(dest).map_err(xrand::Error::new)
    }
}
