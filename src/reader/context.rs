use std::{mem, slice};

use crate::{
    BsonValue, ContextType, Document, DocumentIter, MarkableCursor, Result,
    reader::state::ReaderSnapshot,
};

type DocumentCursor<'a> = MarkableCursor<DocumentIter<'a>, ReaderSnapshot<'a>>;
type ArrayCursor<'a> = MarkableCursor<slice::Iter<'a, BsonValue>, ReaderSnapshot<'a>>;

pub(crate) enum Cursor<'a> {
    Document(DocumentCursor<'a>),
    Array(ArrayCursor<'a>),
}

/// One traversal frame: the container being read and how far into it we are.
pub(crate) struct Context<'a> {
    kind: ContextType,
    cursor: Cursor<'a>,
}

impl<'a> Context<'a> {
    #[inline]
    pub(crate) fn document(kind: ContextType, document: &'a Document) -> Self {
        debug_assert!(kind != ContextType::Array);
        Self {
            kind,
            cursor: Cursor::Document(MarkableCursor::new(document.iter())),
        }
    }

    #[inline]
    pub(crate) fn array(values: &'a [BsonValue]) -> Self {
        Self {
            kind: ContextType::Array,
            cursor: Cursor::Array(MarkableCursor::new(values.iter())),
        }
    }

    #[inline]
    pub(crate) fn kind(&self) -> ContextType {
        self.kind
    }

    /// Next `(name, value)` pair, `None` once the document is exhausted.
    ///
    /// An array frame has no names and yields `None`.
    pub(crate) fn next_element(&mut self) -> Result<Option<(&'a str, &'a BsonValue)>> {
        match &mut self.cursor {
            Cursor::Document(cursor) => {
                if cursor.has_next() {
                    cursor.next().map(Some)
                } else {
                    Ok(None)
                }
            }
            Cursor::Array(_) => Ok(None),
        }
    }

    /// Next array value, `None` once the array is exhausted.
    pub(crate) fn next_value(&mut self) -> Result<Option<&'a BsonValue>> {
        match &mut self.cursor {
            Cursor::Array(cursor) => {
                if cursor.has_next() {
                    cursor.next().map(Some)
                } else {
                    Ok(None)
                }
            }
            Cursor::Document(_) => Ok(None),
        }
    }

    #[inline]
    pub(crate) fn mark(&mut self, snapshot: ReaderSnapshot<'a>) -> Result<()> {
        match &mut self.cursor {
            Cursor::Document(cursor) => cursor.mark(snapshot),
            Cursor::Array(cursor) => cursor.mark(snapshot),
        }
    }

    #[inline]
    pub(crate) fn reset(&mut self) -> Result<ReaderSnapshot<'a>> {
        match &mut self.cursor {
            Cursor::Document(cursor) => cursor.reset(),
            Cursor::Array(cursor) => cursor.reset(),
        }
    }

    #[inline]
    pub(crate) fn clear_mark(&mut self) {
        match &mut self.cursor {
            Cursor::Document(cursor) => cursor.clear_mark(),
            Cursor::Array(cursor) => cursor.clear_mark(),
        }
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        match &self.cursor {
            Cursor::Document(cursor) => cursor.is_marked(),
            Cursor::Array(cursor) => cursor.is_marked(),
        }
    }
}

/// The frames from the top-level context up to the one being read.
///
/// The top frame is held apart so the stack is never empty; a frame's parent
/// is the frame one index below it.
pub(crate) struct ContextStack<'a> {
    top: Context<'a>,
    parents: Vec<Context<'a>>,
}

impl<'a> ContextStack<'a> {
    #[inline]
    pub(crate) fn new(root: Context<'a>) -> Self {
        Self {
            top: root,
            parents: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn top(&self) -> &Context<'a> {
        &self.top
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> &mut Context<'a> {
        &mut self.top
    }

    /// Index of the top frame; the root frame is at 0.
    #[inline]
    pub(crate) fn top_index(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Context<'a>> {
        if index == self.parents.len() {
            Some(&mut self.top)
        } else {
            self.parents.get_mut(index)
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, context: Context<'a>) {
        let parent = mem::replace(&mut self.top, context);
        self.parents.push(parent);
    }

    /// Removes the top frame and returns it; `None` when only the root is left.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Context<'a>> {
        let parent = self.parents.pop()?;
        Some(mem::replace(&mut self.top, parent))
    }

    /// Swaps the top frame for `context`, returning the old one.
    #[inline]
    pub(crate) fn replace_top(&mut self, context: Context<'a>) -> Context<'a> {
        mem::replace(&mut self.top, context)
    }
}
