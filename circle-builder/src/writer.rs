//! # Table Writer
//!
//! Enforces the builder contract on top of `FlatBufferBuilder`:
//!
//! - a table is opened by [`TableWriter::start`] and closed by
//!   [`TableWriter::finish`], which consumes the writer;
//! - while a writer is alive it holds the builder mutably, so no string,
//!   vector or nested table can be created mid-table;
//! - each slot is written at most once.

use crate::error::{BuilderError, Result};
use circle_schema::slots::slot_of;
use circle_schema::VOffset;
use flatbuffers::{FlatBufferBuilder, Push, TableFinishedWIPOffset, TableUnfinishedWIPOffset, WIPOffset};
use std::collections::BTreeSet;

/// Finished table offset
pub type TableOffset = WIPOffset<TableFinishedWIPOffset>;

/// An open table
pub struct TableWriter<'b, 'fbb> {
    fbb: &'b mut FlatBufferBuilder<'fbb>,
    start: WIPOffset<TableUnfinishedWIPOffset>,
    written: BTreeSet<VOffset>,
}

impl<'b, 'fbb> TableWriter<'b, 'fbb> {
    pub fn start(fbb: &'b mut FlatBufferBuilder<'fbb>) -> Self {
        let start = fbb.start_table();
        Self {
            fbb,
            start,
            written: BTreeSet::new(),
        }
    }

    /// Reserve a slot before writing it
    pub(crate) fn claim(&mut self, voffset: VOffset) -> Result<()> {
        let slot = slot_of(voffset).ok_or(BuilderError::InvalidVOffset { voffset })?;
        if !self.written.insert(voffset) {
            return Err(BuilderError::DuplicateField { slot });
        }
        Ok(())
    }

    /// Inline scalar; skipped on the wire when equal to `default`
    pub fn scalar<X: Push + PartialEq>(&mut self, voffset: VOffset, value: X, default: X) -> Result<()> {
        self.claim(voffset)?;
        self.fbb.push_slot(voffset, value, default);
        Ok(())
    }

    /// Offset to a string, vector or table created before `start`
    pub fn offset<T>(&mut self, voffset: VOffset, target: WIPOffset<T>) -> Result<()> {
        self.claim(voffset)?;
        self.fbb.push_slot_always(voffset, target);
        Ok(())
    }

    /// Offset field that may be absent
    pub fn optional_offset<T>(&mut self, voffset: VOffset, target: Option<WIPOffset<T>>) -> Result<()> {
        match target {
            Some(target) => self.offset(voffset, target),
            None => Ok(()),
        }
    }

    /// Number of slots written so far
    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Close the table and emit its vtable
    pub fn finish(self) -> TableOffset {
        self.fbb.end_table(self.start)
    }
}
