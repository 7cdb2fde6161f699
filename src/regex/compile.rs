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

use crate::errors::CompileError;
use crate::nfa::Nfa;
use crate::regex::{Metacharacter, Symbol};

/// Compile a regular expression, given as a word over the surface syntax,
/// into an NFA with ε-transitions by the Thompson construction.
///
/// Juxtaposition concatenates, `|` is alternation with the lowest
/// precedence, the postfix `*` binds tightest and parentheses group.
/// An alternative without any atom denotes the empty word, so `a||b`
/// accepts `a`, ε and `b`, and the empty expression accepts exactly ε.
pub fn compile(regex: &[Symbol]) -> Result<Nfa, CompileError> {
    let (nfa, consumed) = compile_group(regex, 0, false)?;
    debug_assert_eq!(consumed, regex.len());
    Ok(nfa)
}

/// Convenience over [compile] for expressions given as strings.
pub fn compile_str(string: &str) -> anyhow::Result<Nfa> {
    let regex = Symbol::vec_from_str(string)?;
    Ok(compile(&regex)?)
}

/// One group scan with the three accumulator slots.
///
/// `current` holds the most recently finished atom (the target a `*`
/// would apply to), `sequence` the concatenation built so far within the
/// current alternative, and `alternatives` the union over the `|`-parts
/// already closed. At every symbol boundary the consumed prefix denotes
/// the language union(alternatives, concat(sequence, current)); each
/// match arm below preserves that invariant. ∅, the "no automaton yet"
/// slot value, is [None].
///
/// Returns the group's automaton together with the number of symbols
/// consumed from `symbols`, including the closing parenthesis when
/// `nested`, so that the caller advances its own cursor past the group
/// deterministically. `offset` is the position of `symbols[0]` within
/// the whole expression and only feeds error positions.
fn compile_group(
    symbols: &[Symbol],
    offset: usize,
    nested: bool,
) -> Result<(Nfa, usize), CompileError> {
    let mut current: Option<Nfa> = None;
    let mut sequence: Option<Nfa> = None;
    let mut alternatives: Option<Nfa> = None;

    let mut i = 0;
    while i < symbols.len() {
        match Metacharacter::of(symbols[i]) {
            Some(Metacharacter::GroupClose) => {
                if !nested {
                    return Err(CompileError::UnbalancedParenthesis {
                        position: offset + i,
                    });
                }
                return Ok((flush_alternative(alternatives, sequence, current), i + 1));
            }
            Some(Metacharacter::GroupOpen) => {
                sequence = concat_opt(sequence, current.take());
                let (group, consumed) = compile_group(&symbols[i + 1..], offset + i + 1, true)?;
                current = Some(group);
                i += consumed + 1;
                continue;
            }
            Some(Metacharacter::KleeneStar) => match current.take() {
                Some(atom) => current = Some(atom.iterate()),
                None => {
                    return Err(CompileError::DanglingStar {
                        position: offset + i,
                    })
                }
            },
            Some(Metacharacter::Alternation) => {
                let closed = flush_alternative(alternatives.take(), sequence.take(), current.take());
                alternatives = Some(closed);
            }
            None => {
                sequence = concat_opt(sequence, current.take());
                current = Some(Nfa::literal(symbols[i])?);
            }
        }
        i += 1;
    }

    if nested {
        // offset points right behind the '(' that opened this group
        return Err(CompileError::UnclosedGroup {
            position: offset - 1,
        });
    }
    Ok((
        flush_alternative(alternatives, sequence, current),
        symbols.len(),
    ))
}

/// The null-operand concatenation: ∅ acts as the identity.
fn concat_opt(left: Option<Nfa>, right: Option<Nfa>) -> Option<Nfa> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => Some(left.concat(&right)),
    }
}

/// Close the alternative held in `sequence` / `current` and fold it into
/// the union accumulator. An alternative with no atoms denotes the empty
/// word and contributes the ε-automaton; ∅ is the identity of the union.
fn flush_alternative(
    alternatives: Option<Nfa>,
    sequence: Option<Nfa>,
    current: Option<Nfa>,
) -> Nfa {
    let alternative = concat_opt(sequence, current).unwrap_or_else(Nfa::epsilon);
    match alternatives {
        Some(existing) => existing.union(&alternative),
        None => alternative,
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::CompileError;
    use crate::regex::{compile, compile_str, Symbol};
    use rand::Rng;

    fn word(input: &str) -> Vec<Symbol> {
        Symbol::vec_from_str(input).unwrap()
    }

    fn assert_scenario(regex: &str, accepted: &[&str], rejected: &[&str]) {
        let nfa = compile_str(regex).unwrap();

        for input in accepted {
            assert!(
                nfa.accepts(&word(input)),
                "{:?} should accept {:?}",
                regex,
                input
            );
        }
        for input in rejected {
            assert!(
                !nfa.accepts(&word(input)),
                "{:?} should reject {:?}",
                regex,
                input
            );
        }
    }

    #[test]
    fn single_letter() {
        assert_scenario("a", &["a"], &["", "b", "aa"]);
    }

    #[test]
    fn concatenation() {
        assert_scenario("ab", &["ab"], &["a", "b", "ba", "abb"]);
    }

    #[test]
    fn alternation() {
        assert_scenario("a|b", &["a", "b"], &["", "ab", "ba"]);
    }

    #[test]
    fn iteration() {
        assert_scenario("a*", &["", "a", "aa", "aaa"], &["b", "ab"]);
    }

    #[test]
    fn iterated_group_of_alternatives() {
        assert_scenario("(a|b)*", &["", "a", "b", "abba", "bbbb"], &["c", "aabc"]);
    }

    #[test]
    fn group_under_concatenation() {
        assert_scenario(
            "a(b|c)*d",
            &["ad", "abd", "acbd", "abcbd"],
            &["a", "d", "abc", "abce"],
        );
    }

    #[test]
    fn empty_alternative_accepts_the_empty_word() {
        assert_scenario("a||b", &["a", "", "b"], &["ab", "c"]);
        assert_scenario("a|", &["a", ""], &["b", "aa"]);
    }

    #[test]
    fn empty_expression_accepts_exactly_the_empty_word() {
        assert_scenario("", &[""], &["a"]);
        assert_scenario("()", &[""], &["a"]);
    }

    #[test]
    fn nested_groups_resume_behind_the_matching_parenthesis() {
        assert_scenario("((a|b)c)d", &["acd", "bcd"], &["ad", "abcd", "acdd"]);
        assert_scenario("(a(b)c)(d)", &["abcd"], &["abc", "abd", "abcdd"]);
        assert_scenario("(a*(b|c))*", &["", "b", "aab", "baac"], &["a", "ba"]);
    }

    #[test]
    fn unbalanced_parentheses_are_reported() {
        assert!(matches!(
            compile(&word("a)b")),
            Err(CompileError::UnbalancedParenthesis { position: 1 })
        ));
        assert!(matches!(
            compile(&word("a(b")),
            Err(CompileError::UnclosedGroup { position: 1 })
        ));
        assert!(matches!(
            compile(&word("((a)")),
            Err(CompileError::UnclosedGroup { position: 0 })
        ));
    }

    #[test]
    fn dangling_star_is_reported() {
        assert!(matches!(
            compile(&word("*a")),
            Err(CompileError::DanglingStar { position: 0 })
        ));
        assert!(matches!(
            compile(&word("a|*")),
            Err(CompileError::DanglingStar { position: 2 })
        ));
        assert!(matches!(
            compile(&word("(*)")),
            Err(CompileError::DanglingStar { position: 1 })
        ));
    }

    #[test]
    fn random_words_agree_with_the_alphabet_closure() {
        let closure = compile_str("(a|b)*").unwrap();
        let only_a = compile_str("a*").unwrap();

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let length = rng.gen_range(0..16);
            let input = std::iter::repeat_with(|| if rng.gen_bool(0.5) { 'a' } else { 'b' })
                .take(length)
                .collect::<String>();
            let input = Symbol::vec_from_str(&input).unwrap();

            assert!(closure.accepts(&input), "input {:?}", input);
            assert_eq!(
                only_a.accepts(&input),
                input.iter().all(|symbol| *symbol == Symbol::Letter('a')),
                "input {:?}",
                input
            );
        }
    }
}
