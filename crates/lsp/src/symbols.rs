// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Symbols and Folding
//!
//! The outline shows one symbol per statement. Statements that sit under a
//! named `-- @block` marker are nested under a namespace symbol carrying the
//! block name:
//!
//! ```sql
//! -- @block Users
//! SELECT * FROM users;
//! DELETE FROM users WHERE id = 1;
//!
//! SELECT now();
//! ```
//!
//! ```text
//! Users
//!   SELECT * FROM users
//!   DELETE FROM users WHERE id = 1
//! SELECT now()
//! ```
//!
//! Every `@block` region, named or not, is also a folding range.

use sqltools_dialect::Dialect;
use sqltools_splitter::{Block, Statement, blocks, split_statements};
use tower_lsp::lsp_types::{DocumentSymbol, FoldingRange, FoldingRangeKind, SymbolKind};
use tracing::debug;

use crate::document::Document;

const ELLIPSIS: &str = "...";

/// Outline of `doc` under `dialect`
pub fn document_symbols(doc: &Document, dialect: Dialect, label_length: usize) -> Vec<DocumentSymbol> {
    let text = doc.text();
    let statements = split_statements(&text, dialect);
    let regions = blocks(&text, dialect);

    let mut symbols = Vec::new();
    let mut group: Option<(usize, DocumentSymbol)> = None;

    for statement in &statements {
        let symbol = statement_symbol(doc, statement, label_length);
        let region = statement.block.as_ref().and_then(|_| {
            regions
                .iter()
                .rposition(|block| block.marker.start <= statement.range.start)
        });

        let Some(index) = region else {
            symbols.extend(group.take().map(|(_, parent)| parent));
            symbols.push(symbol);
            continue;
        };

        if group.as_ref().map(|(open, _)| *open) != Some(index) {
            symbols.extend(group.take().map(|(_, parent)| parent));
            group = Some((index, block_symbol(doc, &regions[index])));
        }
        if let Some((_, parent)) = group.as_mut() {
            parent.children.get_or_insert_with(Vec::new).push(symbol);
        }
    }
    symbols.extend(group.map(|(_, parent)| parent));

    debug!(
        "Built {} symbols from {} statements for {}",
        symbols.len(),
        statements.len(),
        doc.uri()
    );
    symbols
}

/// One folding range per multi-line `@block` region
pub fn folding_ranges(doc: &Document, dialect: Dialect) -> Vec<FoldingRange> {
    blocks(&doc.text(), dialect)
        .iter()
        .filter_map(|block| {
            let range = doc.range_of(&block.full_range());
            (range.end.line > range.start.line).then(|| FoldingRange {
                start_line: range.start.line,
                end_line: range.end.line,
                kind: Some(FoldingRangeKind::Region),
                collapsed_text: block.name.clone(),
                ..Default::default()
            })
        })
        .collect()
}

/// First line of the statement, cut to `max_chars` characters
pub fn statement_label(statement: &Statement, max_chars: usize) -> String {
    let first_line = statement.text.lines().next().unwrap_or_default().trim();
    let multi_line = statement.text.contains('\n');

    if first_line.chars().count() > max_chars {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}{ELLIPSIS}", cut.trim_end())
    } else if multi_line {
        format!("{first_line} {ELLIPSIS}")
    } else {
        first_line.to_string()
    }
}

/// Leading keyword, upper-cased
fn statement_keyword(statement: &Statement) -> Option<String> {
    let word: String = statement
        .text
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    (!word.is_empty()).then(|| word.to_ascii_uppercase())
}

fn statement_kind(keyword: Option<&str>) -> SymbolKind {
    match keyword {
        Some("CREATE" | "ALTER" | "DROP" | "TRUNCATE") => SymbolKind::STRUCT,
        Some("INSERT" | "UPDATE" | "DELETE" | "MERGE" | "UPSERT") => SymbolKind::EVENT,
        Some("SELECT" | "WITH" | "VALUES" | "SHOW" | "DESCRIBE" | "EXPLAIN") => {
            SymbolKind::FUNCTION
        }
        _ => SymbolKind::OBJECT,
    }
}

#[allow(deprecated)]
fn statement_symbol(doc: &Document, statement: &Statement, label_length: usize) -> DocumentSymbol {
    let keyword = statement_keyword(statement);
    let range = doc.range_of(&statement.range);

    DocumentSymbol {
        name: statement_label(statement, label_length),
        kind: statement_kind(keyword.as_deref()),
        detail: keyword,
        tags: None,
        deprecated: None,
        range,
        selection_range: range,
        children: None,
    }
}

#[allow(deprecated)]
fn block_symbol(doc: &Document, block: &Block) -> DocumentSymbol {
    DocumentSymbol {
        name: block.name.clone().unwrap_or_default(),
        detail: Some("@block".to_string()),
        kind: SymbolKind::NAMESPACE,
        tags: None,
        deprecated: None,
        range: doc.range_of(&block.full_range()),
        selection_range: doc.range_of(&block.marker),
        children: None,
    }
}
