/*
 * ISC License
 *
 * Copyright (c) 2021 Mitama Lab
 *
 * Permission to use, copy, modify, and/or distribute this software for any
 * purpose with or without fee is hereby granted, provided that the above
 * copyright notice and this permission notice appear in all copies.
 *
 * THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
 * WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
 * MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
 * ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
 * WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
 * ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
 * OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
 *
 */

use crate::regex::{Metacharacter, Symbol};
use indexmap::IndexSet;
use strum::IntoEnumIterator;
use thiserror::Error;

struct ReservedSymbols();

impl std::fmt::Display for ReservedSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let set = Metacharacter::iter().collect::<IndexSet<_>>();
        write!(f, "{:?} and ε", set)
    }
}

/// Everything that can go wrong while turning a regular expression into an
/// automaton. Positions are zero-based indices into the expression.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(
        r#"
Reserved symbol used as a literal: {symbol}.
=> Hint: the reserved symbols are {}.
"#,
        ReservedSymbols()
    )]
    ReservedSymbol { symbol: Symbol },
    #[error("no group is open for ')' at position {position}")]
    UnbalancedParenthesis { position: usize },
    #[error("the group opened at position {position} is never closed")]
    UnclosedGroup { position: usize },
    #[error("'*' at position {position} has no preceding expression to repeat")]
    DanglingStar { position: usize },
}
