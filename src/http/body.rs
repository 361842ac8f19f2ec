//! Response body types
//!
//! A response body is either a buffer that is already in memory or a file
//! that is copied to the connection in fixed-size chunks.

use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Chunk size used when copying a file to the connection (8 KiB).
pub const STREAM_CHUNK_SIZE: usize = 8 * 1024;

/// Body of every response produced by the handlers
pub enum ResponseBody {
    /// Fixed buffer, yielded as a single frame
    Full(Option<Bytes>),
    /// Lazy file source
    File(FileChunks),
}

impl ResponseBody {
    pub const fn empty() -> Self {
        Self::Full(None)
    }

    pub fn full(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        if data.is_empty() {
            Self::empty()
        } else {
            Self::Full(Some(data))
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(data) => f
                .debug_tuple("Full")
                .field(&data.as_ref().map_or(0, Bytes::len))
                .finish(),
            Self::File(chunks) => f.debug_tuple("File").field(&chunks.remaining).finish(),
        }
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Full(data) => Poll::Ready(data.take().map(|bytes| Ok(Frame::data(bytes)))),
            Self::File(chunks) => chunks.poll_chunk(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Full(data) => data.is_none(),
            Self::File(chunks) => chunks.remaining == 0,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Full(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Self::Full(None) => SizeHint::with_exact(0),
            Self::File(chunks) => SizeHint::with_exact(chunks.remaining),
        }
    }
}

/// Reads an open file in `STREAM_CHUNK_SIZE` pieces until `len` bytes are sent.
///
/// The file handle is owned here, so it is closed whenever the body is
/// dropped: after the last chunk, on a read error, or when the client goes
/// away mid-transfer and hyper drops the response.
pub struct FileChunks {
    file: File,
    remaining: u64,
    buf: Box<[u8]>,
}

impl FileChunks {
    pub fn new(file: File, len: u64) -> Self {
        Self {
            file,
            remaining: len,
            buf: vec![0; STREAM_CHUNK_SIZE].into_boxed_slice(),
        }
    }

    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<Option<io::Result<Frame<Bytes>>>> {
        if self.remaining == 0 {
            return Poll::Ready(None);
        }

        // Never read past the length already promised in Content-Length
        let limit = usize::try_from(self.remaining).map_or(self.buf.len(), |r| r.min(self.buf.len()));
        let mut read_buf = ReadBuf::new(&mut self.buf[..limit]);
        ready!(Pin::new(&mut self.file).poll_read(cx, &mut read_buf))?;

        let chunk = Bytes::copy_from_slice(read_buf.filled());
        if chunk.is_empty() {
            return Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended with {} bytes still expected", self.remaining),
            ))));
        }

        self.remaining -= chunk.len() as u64;
        Poll::Ready(Some(Ok(Frame::data(chunk))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mediaserve-body-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_full_body_single_frame() {
        let body = ResponseBody::full("hello");
        assert_eq!(body.size_hint().exact(), Some(5));
        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(&collected[..], b"hello");
    }

    #[tokio::test]
    async fn test_empty_body_is_end_stream() {
        let body = ResponseBody::full(Vec::new());
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }

    #[tokio::test]
    async fn test_file_chunks_preserve_bytes_across_chunks() {
        let contents: Vec<u8> = (0..(STREAM_CHUNK_SIZE * 3 + 123)).map(|i| (i % 251) as u8).collect();
        let path = temp_file("chunks", &contents);
        let file = File::open(&path).await.unwrap();

        let mut body = ResponseBody::File(FileChunks::new(file, contents.len() as u64));
        let mut received = Vec::new();
        let mut frames = 0;
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(data.len() <= STREAM_CHUNK_SIZE);
            received.extend_from_slice(&data);
            frames += 1;
        }

        assert_eq!(received, contents);
        assert!(frames >= 4);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_truncated_file_reports_error() {
        let path = temp_file("short", b"abc");
        let file = File::open(&path).await.unwrap();

        let body = ResponseBody::File(FileChunks::new(file, 10));
        let err = body.collect().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        std::fs::remove_file(path).unwrap();
    }
}
