// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Block Regions
//!
//! `-- @block <name>` comments divide a script into regions that editors run
//! as a unit. A block runs from its marker to the next marker or the end of
//! the script; text before the first marker belongs to no block.

use std::ops::Range;

use serde::Serialize;
use sqltools_dialect::Dialect;

use crate::scanner::{Scanner, TokenKind, block_marker_name};

/// A `@block` region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Text after `@block`, `None` when the marker has no name
    pub name: Option<String>,

    /// Byte range of the marker comment
    pub marker: Range<usize>,

    /// Byte range of the block body (after the marker line), trimmed
    pub body: Range<usize>,
}

impl Block {
    /// Marker start to body end
    pub fn full_range(&self) -> Range<usize> {
        self.marker.start..self.body.end.max(self.marker.end)
    }

    /// Body text within `script`
    pub fn text<'a>(&self, script: &'a str) -> &'a str {
        &script[self.body.clone()]
    }
}

/// All `@block` regions in `script`
pub fn blocks(script: &str, dialect: Dialect) -> Vec<Block> {
    let markers: Vec<_> = Scanner::new(script, dialect.rules())
        .filter(|token| token.kind == TokenKind::BlockMarker)
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers
                .get(i + 1)
                .map_or(script.len(), |next| next.span.start);
            let name = block_marker_name(marker.text(script))
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            Block {
                name,
                marker: marker.span.clone(),
                body: trimmed(script, marker.span.end..end),
            }
        })
        .collect()
}

/// The block around byte `offset`, if the cursor is inside one
pub fn block_at(script: &str, dialect: Dialect, offset: usize) -> Option<Block> {
    let mut found = None;
    for block in blocks(script, dialect) {
        if block.marker.start > offset {
            break;
        }
        found = Some(block);
    }
    found
}

fn trimmed(script: &str, range: Range<usize>) -> Range<usize> {
    let raw = &script[range.clone()];
    let start = range.start + (raw.len() - raw.trim_start().len());
    start..start + raw.trim().len()
}
