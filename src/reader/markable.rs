use std::iter::Peekable;

use crate::{Error, Result, cold_path};

/// A forward-only cursor that can replay what it handed out since a mark.
///
/// While a mark is active every element pulled from the source is also
/// appended to a buffer. [`reset`](Self::reset) rewinds to the start of that
/// buffer, so the elements consumed since [`mark`](Self::mark), the first one
/// included, come out again in their original order before the source is
/// touched again. The source itself is never rewound.
///
/// `S` is an opaque snapshot stored with the mark and handed back on reset.
///
/// # Example
///
/// ```
/// use na_bson::MarkableCursor;
///
/// let mut cursor = MarkableCursor::<_>::new([1, 2, 3, 4].into_iter());
/// assert_eq!(cursor.next().unwrap(), 1);
///
/// cursor.mark(()).unwrap();
/// assert_eq!(cursor.next().unwrap(), 2);
/// assert_eq!(cursor.next().unwrap(), 3);
///
/// cursor.reset().unwrap();
/// assert_eq!(cursor.next().unwrap(), 2);
/// assert_eq!(cursor.next().unwrap(), 3);
/// assert_eq!(cursor.next().unwrap(), 4);
/// assert!(!cursor.has_next());
/// ```
pub struct MarkableCursor<I: Iterator, S = ()> {
    source: Peekable<I>,
    /// Elements consumed since the mark, followed by elements still pending
    /// replay from an earlier reset.
    buffer: Vec<I::Item>,
    /// Number of buffered elements already handed out.
    index: usize,
    saved: Option<S>,
}

impl<I: Iterator, S> MarkableCursor<I, S>
where
    I::Item: Clone,
{
    #[inline]
    pub fn new(source: I) -> Self {
        Self {
            source: source.peekable(),
            buffer: Vec::new(),
            index: 0,
            saved: None,
        }
    }

    /// Returns `true` if a buffered element is pending replay or the source
    /// has more elements.
    #[inline]
    pub fn has_next(&mut self) -> bool {
        self.index < self.buffer.len() || self.source.peek().is_some()
    }

    /// Returns the next element, replaying buffered elements first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<I::Item> {
        if self.index < self.buffer.len() {
            let value = self.buffer[self.index].clone();
            self.index += 1;
            if self.saved.is_none() && self.index == self.buffer.len() {
                self.buffer.clear();
                self.index = 0;
            }
            return Ok(value);
        }

        let Some(value) = self.source.next() else {
            cold_path();
            return Err(Error::Exhausted);
        };
        if self.saved.is_some() {
            self.buffer.push(value.clone());
            self.index += 1;
        }
        Ok(value)
    }

    /// Starts buffering from the current position.
    ///
    /// Fails with [`Error::MarkAlreadySet`] and changes nothing if a mark is
    /// already outstanding.
    pub fn mark(&mut self, snapshot: S) -> Result<()> {
        if self.saved.is_some() {
            cold_path();
            return Err(Error::MarkAlreadySet);
        }
        // Pending replay elements stay: they now belong to the new mark.
        self.buffer.drain(..self.index);
        self.index = 0;
        self.saved = Some(snapshot);
        Ok(())
    }

    /// Rewinds to the mark and returns its snapshot.
    ///
    /// Everything buffered is replayed from the first element. The mark is
    /// spent: nothing more is buffered until the next [`mark`](Self::mark).
    pub fn reset(&mut self) -> Result<S> {
        let Some(snapshot) = self.saved.take() else {
            cold_path();
            return Err(Error::NoMark);
        };
        self.index = 0;
        Ok(snapshot)
    }

    /// Drops the mark without moving.
    ///
    /// Elements already replayed are released; elements still pending replay
    /// after an earlier reset are kept, so the next element is the same one
    /// it would have been.
    pub fn clear_mark(&mut self) {
        self.saved = None;
        self.buffer.drain(..self.index);
        self.index = 0;
    }

    /// Returns `true` while a mark is outstanding.
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.saved.is_some()
    }

    /// Number of buffered elements, replayed or not.
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
