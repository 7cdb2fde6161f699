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

use anyhow::anyhow;
use std::fmt::{Display, Formatter};
use strum_macros::EnumIter;

/// A symbol as it occurs in regular expressions, input words and
/// transition labels.
///
/// Any character is an ordinary letter; the character `ε` is unwritable
/// because it denotes the distinguished empty-word label. The four
/// operator characters are letters too as far as this type is concerned,
/// their special role in the surface syntax is captured by
/// [Metacharacter].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// The label of transitions that consume no input. Never part of an
    /// automaton's alphabet.
    Epsilon,
    /// An ordinary alphabet letter.
    Letter(char),
}

impl Symbol {
    fn from_char(input: &char) -> anyhow::Result<Symbol> {
        match input {
            'ε' => Err(anyhow!(
                "Character ε is reserved for the empty-word transition label"
            )),
            c => Ok(Symbol::Letter(*c)),
        }
    }

    pub fn vec_from_str(string: &str) -> anyhow::Result<Vec<Symbol>> {
        string.chars().map(|c| Self::from_char(&c)).collect::<anyhow::Result<Vec<_>>>()
    }

    pub fn is_metacharacter(&self) -> bool {
        Metacharacter::of(*self).is_some()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Letter(c) => write!(f, "{}", c),
        }
    }
}

/// The four operator symbols of the surface syntax: grouping, alternation
/// and iteration. They structure an expression but never label a
/// transition, so none of them can be matched literally.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Metacharacter {
    GroupOpen,
    GroupClose,
    Alternation,
    KleeneStar,
}

impl Metacharacter {
    /// The operator role of `symbol`, or [None] for ordinary letters
    /// and ε.
    pub fn of(symbol: Symbol) -> Option<Metacharacter> {
        match symbol {
            Symbol::Letter('(') => Some(Metacharacter::GroupOpen),
            Symbol::Letter(')') => Some(Metacharacter::GroupClose),
            Symbol::Letter('|') => Some(Metacharacter::Alternation),
            Symbol::Letter('*') => Some(Metacharacter::KleeneStar),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Metacharacter::GroupOpen => '(',
            Metacharacter::GroupClose => ')',
            Metacharacter::Alternation => '|',
            Metacharacter::KleeneStar => '*',
        }
    }
}

impl Display for Metacharacter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
