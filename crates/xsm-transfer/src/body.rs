use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Where the bytes of a [`RetryableBody`] currently live.
///
/// ```text
///   Pending(R) ──first read / first seek──▶ Materialized(Cursor<Vec<u8>>)
/// ```
///
/// The transition is one-way. Once materialized the inner source has been
/// drained and dropped, and the buffer is the sole owner of the bytes.
#[derive(Debug)]
enum BodyState<R> {
    Pending(R),
    Materialized(Cursor<Vec<u8>>),
}

/// A request or response body the transport can rewind and close.
///
/// Transports that retry need to seek a body back to the start and close
/// it more than once without failing. The encoder and decoder adapters only
/// stream forward, so this wrapper drains them into a seekable buffer the
/// first time the body is read or seeked.
///
/// After [`close`](Self::close), reads return end-of-stream instead of an
/// error and further closes do nothing. Seeking still repositions the
/// buffer.
///
/// # Example
///
/// ```rust
/// use std::io::{Read, Seek, SeekFrom};
/// use xsm_transfer::RetryableBody;
///
/// let mut body = RetryableBody::new(&b"retry me"[..]);
/// let mut first = String::new();
/// body.read_to_string(&mut first).unwrap();
///
/// body.seek(SeekFrom::Start(0)).unwrap();
/// let mut second = String::new();
/// body.read_to_string(&mut second).unwrap();
/// assert_eq!(first, second);
///
/// body.close();
/// body.close();
/// assert_eq!(body.read(&mut [0u8; 4]).unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct RetryableBody<R> {
    state: BodyState<R>,
    closed: bool,
}

impl<R: Read> RetryableBody<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            state: BodyState::Pending(inner),
            closed: false,
        }
    }

    /// Wrap bytes that are already in memory; no materialization needed.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            state: BodyState::Materialized(Cursor::new(bytes)),
            closed: false,
        }
    }

    /// Drain the pending source into the seekable buffer, if not done yet.
    fn materialize(&mut self) -> io::Result<&mut Cursor<Vec<u8>>> {
        if let BodyState::Pending(inner) = &mut self.state {
            let mut bytes = Vec::new();
            inner.read_to_end(&mut bytes)?;
            tracing::debug!(len = bytes.len(), "materialized transfer body");
            self.state = BodyState::Materialized(Cursor::new(bytes));
        }

        match &mut self.state {
            BodyState::Materialized(cursor) => Ok(cursor),
            BodyState::Pending(_) => unreachable!("pending body was just materialized"),
        }
    }

    /// Total body length, materializing if needed.
    ///
    /// # Errors
    ///
    /// Read errors from the pending source.
    pub fn len(&mut self) -> io::Result<u64> {
        Ok(self.materialize()?.get_ref().len() as u64)
    }

    /// # Errors
    ///
    /// Read errors from the pending source.
    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    #[must_use]
    pub fn is_materialized(&self) -> bool {
        matches!(self.state, BodyState::Materialized(_))
    }

    /// Mark the body closed. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<R: Read> Read for RetryableBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Ok(0);
        }
        self.materialize()?.read(buf)
    }
}

impl<R: Read> Seek for RetryableBody<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.materialize()?.seek(pos)
    }
}
