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
use crate::regex::Symbol;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Renaming markers applied to operand states by the combinators:
/// `Left` and `Right` for the two operands of [Nfa::concat] and
/// [Nfa::union], `Iter` for the operand of [Nfa::iterate].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Left,
    Right,
    Iter,
}

impl Tag {
    fn glyph(&self) -> char {
        match self {
            Tag::Left => 'l',
            Tag::Right => 'r',
            Tag::Iter => 'i',
        }
    }
}

/// An opaque state identifier.
///
/// Every combinator renames the states of its operands by wrapping them
/// with a [Tag] and then mints two untagged states `q0` / `q1` of its own.
/// An untagged state can never equal a tagged one and states tagged
/// differently can never equal each other, so the states of combined
/// sub-automata stay disjoint without a global ID allocator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateId {
    root: Root,
    /// Tags applied by enclosing combinators, innermost first.
    tags: Vec<Tag>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Root {
    Start,
    Accept,
}

impl StateId {
    /// The untagged start state `q0`.
    pub fn start() -> StateId {
        StateId {
            root: Root::Start,
            tags: Vec::new(),
        }
    }

    /// The untagged accepting state `q1`.
    pub fn accept() -> StateId {
        StateId {
            root: Root::Accept,
            tags: Vec::new(),
        }
    }

    /// The renaming constructor: this state as seen from inside an
    /// enclosing combinator. The result equals exactly the renamings of
    /// equal states by the same marker.
    pub fn tagged(&self, tag: Tag) -> StateId {
        let mut tags = self.tags.clone();
        tags.push(tag);
        StateId {
            root: self.root,
            tags,
        }
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let base = match self.root {
            Root::Start => "q0",
            Root::Accept => "q1",
        };
        let rendered = self
            .tags
            .iter()
            .fold(base.to_string(), |inner, tag| {
                format!("({}, {})", inner, tag.glyph())
            });
        write!(f, "{}", rendered)
    }
}

pub type StateSet = IndexSet<StateId>;
pub type SymbolSet = IndexSet<Symbol>;

/// The transition relation. An absent key means the empty image; the
/// symbol component of a key is either ε or a member of the alphabet.
pub type DeltaFunction = IndexMap<(StateId, Symbol), StateSet>;

fn add_epsilon(delta: &mut DeltaFunction, from: StateId, to: StateId) {
    delta
        .entry((from, Symbol::Epsilon))
        .or_insert_with(StateSet::new)
        .insert(to);
}

/// A nondeterministic finite automaton with ε-transitions, the five-tuple
/// (Q, Σ, δ, q0, F).
///
/// Values are immutable once constructed. Combinators build new automata
/// out of renamed copies of their operands and never touch the operands
/// themselves; every automaton a combinator returns has exactly one
/// accepting state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    states: StateSet,
    alphabet: SymbolSet,
    delta: DeltaFunction,
    start: StateId,
    finals: StateSet,
}

impl Nfa {
    /// The guarded five-tuple constructor.
    ///
    /// # Panics
    ///
    /// Panics when the tuple is inconsistent: the start state or a final
    /// state outside `states`, a transition endpoint outside `states`, a
    /// transition label that is neither ε nor in `alphabet`, or ε inside
    /// `alphabet`. Such a call is a programmer error.
    pub fn new(
        states: StateSet,
        alphabet: SymbolSet,
        delta: DeltaFunction,
        start: StateId,
        finals: StateSet,
    ) -> Nfa {
        assert!(
            !alphabet.contains(&Symbol::Epsilon),
            "ε must not be a member of the alphabet"
        );
        assert!(states.contains(&start), "the start state must be in Q");
        assert!(
            finals.iter().all(|state| states.contains(state)),
            "every final state must be in Q"
        );
        for ((from, label), targets) in &delta {
            assert!(states.contains(from), "transition source must be in Q");
            assert!(
                *label == Symbol::Epsilon || alphabet.contains(label),
                "transition label must be ε or in Σ"
            );
            assert!(
                targets.iter().all(|state| states.contains(state)),
                "every transition target must be in Q"
            );
        }

        Nfa {
            states,
            alphabet,
            delta,
            start,
            finals,
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn alphabet(&self) -> &SymbolSet {
        &self.alphabet
    }

    pub fn delta(&self) -> &DeltaFunction {
        &self.delta
    }

    pub fn start(&self) -> &StateId {
        &self.start
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    /// The automaton that accepts exactly the empty word.
    pub fn epsilon() -> Nfa {
        let start = StateId::start();
        let states = vec![start.clone()].into_iter().collect::<StateSet>();
        let finals = states.clone();
        Nfa::new(states, SymbolSet::new(), DeltaFunction::new(), start, finals)
    }

    /// The automaton that accepts exactly the one-letter word `symbol`:
    /// `q0 --symbol--> q1`.
    ///
    /// ε and the metacharacters are reserved and rejected with
    /// [CompileError::ReservedSymbol].
    pub fn literal(symbol: Symbol) -> Result<Nfa, CompileError> {
        if symbol == Symbol::Epsilon || symbol.is_metacharacter() {
            return Err(CompileError::ReservedSymbol { symbol });
        }

        let start = StateId::start();
        let accept = StateId::accept();

        let states = vec![start.clone(), accept.clone()]
            .into_iter()
            .collect::<StateSet>();
        let alphabet = vec![symbol].into_iter().collect::<SymbolSet>();

        let mut delta = DeltaFunction::new();
        delta.insert(
            (start.clone(), symbol),
            vec![accept.clone()].into_iter().collect::<StateSet>(),
        );

        let finals = vec![accept].into_iter().collect::<StateSet>();

        Ok(Nfa::new(states, alphabet, delta, start, finals))
    }

    /// The same automaton with every state renamed by `tag`.
    fn retagged(&self, tag: Tag) -> Nfa {
        let states = self
            .states
            .iter()
            .map(|state| state.tagged(tag))
            .collect::<StateSet>();
        let delta = self
            .delta
            .iter()
            .map(|((from, label), targets)| {
                (
                    (from.tagged(tag), *label),
                    targets
                        .iter()
                        .map(|target| target.tagged(tag))
                        .collect::<StateSet>(),
                )
            })
            .collect::<DeltaFunction>();
        let finals = self
            .finals
            .iter()
            .map(|state| state.tagged(tag))
            .collect::<StateSet>();

        Nfa {
            states,
            alphabet: self.alphabet.clone(),
            delta,
            start: self.start.tagged(tag),
            finals,
        }
    }

    /// An automaton that recognizes the concatenation of the two
    /// languages.
    ///
    /// The left operand is renamed by [Tag::Left], the right one by
    /// [Tag::Right], and the copies are glued together with ε-transitions
    /// through a fresh start and a fresh accepting state.
    /// See https://www.cs.odu.edu/~toida/nerzic/390teched/regular/fa/kleene-1.html for details.
    pub fn concat(&self, other: &Nfa) -> Nfa {
        let left = self.retagged(Tag::Left);
        let right = other.retagged(Tag::Right);

        let start = StateId::start();
        let accept = StateId::accept();

        let mut states = left.states;
        states.extend(right.states);
        states.insert(start.clone());
        states.insert(accept.clone());

        let mut alphabet = left.alphabet;
        alphabet.extend(right.alphabet);

        let mut delta = left.delta;
        delta.extend(right.delta);
        add_epsilon(&mut delta, start.clone(), left.start);
        for state in &left.finals {
            add_epsilon(&mut delta, state.clone(), right.start.clone());
        }
        for state in &right.finals {
            add_epsilon(&mut delta, state.clone(), accept.clone());
        }

        let finals = vec![accept].into_iter().collect::<StateSet>();
        Nfa::new(states, alphabet, delta, start, finals)
    }

    /// An automaton that recognizes the union of the two languages: the
    /// fresh start branches into both renamed operands by ε, and all of
    /// their accepting states lead to the fresh accepting state by ε.
    pub fn union(&self, other: &Nfa) -> Nfa {
        let left = self.retagged(Tag::Left);
        let right = other.retagged(Tag::Right);

        let start = StateId::start();
        let accept = StateId::accept();

        let mut states = left.states;
        states.extend(right.states);
        states.insert(start.clone());
        states.insert(accept.clone());

        let mut alphabet = left.alphabet;
        alphabet.extend(right.alphabet);

        let mut delta = left.delta;
        delta.extend(right.delta);
        add_epsilon(&mut delta, start.clone(), left.start);
        add_epsilon(&mut delta, start.clone(), right.start);
        for state in left.finals.iter().chain(right.finals.iter()) {
            add_epsilon(&mut delta, state.clone(), accept.clone());
        }

        let finals = vec![accept].into_iter().collect::<StateSet>();
        Nfa::new(states, alphabet, delta, start, finals)
    }

    /// An automaton that recognizes zero or more repetitions of the
    /// language: the fresh start reaches the renamed operand and the
    /// fresh accepting state by ε, and every accepting state of the
    /// operand loops back to the operand's start as well as out to the
    /// fresh accepting state.
    pub fn iterate(&self) -> Nfa {
        let inner = self.retagged(Tag::Iter);

        let start = StateId::start();
        let accept = StateId::accept();

        let mut states = inner.states;
        states.insert(start.clone());
        states.insert(accept.clone());

        let mut delta = inner.delta;
        add_epsilon(&mut delta, start.clone(), inner.start.clone());
        add_epsilon(&mut delta, start.clone(), accept.clone());
        for state in &inner.finals {
            add_epsilon(&mut delta, state.clone(), inner.start.clone());
            add_epsilon(&mut delta, state.clone(), accept.clone());
        }

        let finals = vec![accept].into_iter().collect::<StateSet>();
        Nfa::new(states, inner.alphabet, delta, start, finals)
    }
}

/// Diagnostic rendering of the five-tuple, section by section. Element
/// order follows the insertion order of the underlying sets and is not
/// part of any contract.
impl Display for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Q = {{{}}}", self.states.iter().join(", "))?;
        writeln!(f, "Σ = {{{}}}", self.alphabet.iter().join(", "))?;
        writeln!(f, "δ = {{")?;
        let transitions = self
            .delta
            .iter()
            .map(|((from, label), targets)| {
                format!(
                    "    (({}, {}), {{{}}})",
                    from,
                    label,
                    targets.iter().join(", ")
                )
            })
            .join(",\n");
        writeln!(f, "{}", transitions)?;
        writeln!(f, "}}")?;
        writeln!(f, "q0 = {}", self.start)?;
        write!(f, "F = {{{}}}", self.finals.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use crate::nfa::{Nfa, StateId, Tag};
    use crate::regex::Symbol;

    fn letter(c: char) -> Nfa {
        Nfa::literal(Symbol::Letter(c)).unwrap()
    }

    #[test]
    fn literal_is_the_two_state_automaton() {
        let a = letter('a');

        assert_eq!(a.states().len(), 2);
        assert_eq!(a.alphabet().len(), 1);
        assert_eq!(a.finals().len(), 1);
        assert!(a.states().contains(a.start()));
        assert!(!a.finals().contains(a.start()));
    }

    #[test]
    fn literal_rejects_reserved_symbols() {
        assert!(Nfa::literal(Symbol::Epsilon).is_err());
        assert!(Nfa::literal(Symbol::Letter('(')).is_err());
        assert!(Nfa::literal(Symbol::Letter(')')).is_err());
        assert!(Nfa::literal(Symbol::Letter('|')).is_err());
        assert!(Nfa::literal(Symbol::Letter('*')).is_err());
    }

    #[test]
    fn combinators_produce_well_formed_automata() {
        let a = letter('a');
        let b = letter('b');

        for nfa in vec![a.concat(&b), a.union(&b), a.iterate()] {
            assert!(nfa.states().contains(nfa.start()));
            assert_eq!(nfa.finals().len(), 1);
            assert!(nfa.finals().iter().all(|state| nfa.states().contains(state)));
            assert!(!nfa.alphabet().contains(&Symbol::Epsilon));

            for ((from, label), targets) in nfa.delta() {
                assert!(nfa.states().contains(from));
                assert!(*label == Symbol::Epsilon || nfa.alphabet().contains(label));
                assert!(targets.iter().all(|state| nfa.states().contains(state)));
            }
        }
    }

    #[test]
    fn operand_copies_stay_disjoint() {
        let a = letter('a');
        let b = letter('b');
        let combined = a.concat(&b);

        // two tagged copies plus the two fresh states, nothing collapsed
        assert_eq!(
            combined.states().len(),
            a.states().len() + b.states().len() + 2
        );
        assert!(combined.states().contains(&a.start().tagged(Tag::Left)));
        assert!(combined.states().contains(&b.start().tagged(Tag::Right)));
        assert_ne!(a.start().tagged(Tag::Left), b.start().tagged(Tag::Right));
        assert!(!combined.states().contains(&a.start().tagged(Tag::Iter)));
    }

    #[test]
    fn tagging_distinguishes_equal_roots() {
        let q0 = StateId::start();

        assert_eq!(q0, StateId::start());
        assert_ne!(q0, StateId::accept());
        assert_ne!(q0, q0.tagged(Tag::Left));
        assert_ne!(q0.tagged(Tag::Left), q0.tagged(Tag::Right));
        assert_eq!(q0.tagged(Tag::Left), StateId::start().tagged(Tag::Left));
        assert_ne!(
            q0.tagged(Tag::Left).tagged(Tag::Iter),
            q0.tagged(Tag::Iter).tagged(Tag::Left)
        );
    }

    #[test]
    fn states_render_as_nested_pairs() {
        assert_eq!(format!("{}", StateId::start()), "q0");
        assert_eq!(format!("{}", StateId::accept().tagged(Tag::Left)), "(q1, l)");
        assert_eq!(
            format!("{}", StateId::start().tagged(Tag::Right).tagged(Tag::Iter)),
            "((q0, r), i)"
        );
    }

    #[test]
    fn printer_renders_every_section() {
        let rendered = format!("{}", letter('a').union(&letter('b')));

        assert!(rendered.contains("Q = {"));
        assert!(rendered.contains("Σ = {"));
        assert!(rendered.contains("δ = {"));
        assert!(rendered.contains("q0 = q0"));
        assert!(rendered.contains("F = {q1}"));
        assert!(rendered.contains("ε"));
    }

    #[test]
    #[should_panic]
    fn epsilon_in_the_alphabet_is_refused() {
        let nfa = Nfa::epsilon();
        Nfa::new(
            nfa.states().clone(),
            vec![Symbol::Epsilon].into_iter().collect(),
            nfa.delta().clone(),
            nfa.start().clone(),
            nfa.finals().clone(),
        );
    }
}
