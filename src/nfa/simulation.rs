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

use crate::nfa::{Nfa, StateSet};
use crate::regex::Symbol;

impl Nfa {
    /// The least superset of `states` that is closed under ε-transitions.
    ///
    /// Worklist saturation: every state is expanded at most once, and
    /// since the closure is a set, the result does not depend on the
    /// order in which states are drawn.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut todo = states.iter().cloned().collect::<Vec<_>>();

        while let Some(state) = todo.pop() {
            if let Some(targets) = self.delta().get(&(state, Symbol::Epsilon)) {
                for target in targets {
                    if closure.insert(target.clone()) {
                        todo.push(target.clone());
                    }
                }
            }
        }

        closure
    }

    /// All states reachable from `states` by consuming `symbol` once.
    fn consume(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        debug_assert!(symbol != Symbol::Epsilon, "ε is not consumable");

        let mut next = StateSet::new();
        for state in states {
            if let Some(targets) = self.delta().get(&(state.clone(), symbol)) {
                next.extend(targets.iter().cloned());
            }
        }

        next
    }

    /// Whether the automaton accepts `word`.
    ///
    /// Subset simulation: start from the ε-closure of `{q0}`, then for
    /// each symbol of the word consume it and close again under ε. The
    /// empty word is accepted exactly when the initial closure already
    /// meets a final state.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let initial = vec![self.start().clone()].into_iter().collect::<StateSet>();
        let mut states = self.epsilon_closure(&initial);

        for &symbol in word {
            states = self.epsilon_closure(&self.consume(&states, symbol));
        }

        self.finals().iter().any(|state| states.contains(state))
    }
}
