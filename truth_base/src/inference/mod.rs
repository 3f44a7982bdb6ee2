//! Inference - forward chaining over fact/rule pairs.
//!
//! The chaining step works as follows:
//! 1. **Match**: Match the fact against the rule's first antecedent
//! 2. **Discharge**: With one antecedent left, instantiate the consequent as
//!    a new fact; otherwise instantiate the remaining antecedents and the
//!    consequent as a new, shorter rule
//! 3. **Justify**: The result is supported by the (fact, rule) pair, and both
//!    producers gain a back-reference to it
//! 4. **Assert**: The result enters the store, which queues its own pairings
//!
//! Pairings are queued on an [`Agenda`] rather than followed recursively, so
//! long derivation chains do not grow the native stack. Every stored
//! (fact, rule) pair is tried exactly once: when the later of the two is
//! stored.

use logic_terms::{instantiate, match_statements, Statement};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

use crate::knowledge_base::{Assertion, Fact, FactId, Item, KnowledgeBase, Rule, RuleId, Support};

/// Pending (fact, rule) pairings, processed first in, first out.
#[derive(Debug, Default)]
pub(crate) struct Agenda {
    pending: VecDeque<(FactId, RuleId)>,
}

impl Agenda {
    /// Queue a new fact against every stored rule.
    pub(crate) fn fact_added(&mut self, fact: FactId, rules: &[RuleId]) {
        self.pending.extend(rules.iter().map(|rule| (fact, *rule)));
    }

    /// Queue a new rule against every stored fact.
    pub(crate) fn rule_added(&mut self, rule: RuleId, facts: &[FactId]) {
        self.pending.extend(facts.iter().map(|fact| (*fact, rule)));
    }

    fn next(&mut self) -> Option<(FactId, RuleId)> {
        self.pending.pop_front()
    }
}

/// Drain the agenda, including everything queued while draining it.
pub(crate) fn run(kb: &mut KnowledgeBase, mut agenda: Agenda) {
    let mut steps = 0usize;
    while let Some((fact, rule)) = agenda.next() {
        fc_infer(kb, fact, rule, &mut agenda);
        steps += 1;
    }
    if steps > 0 {
        debug!(steps, facts = kb.fact_count(), rules = kb.rule_count(), "chaining finished");
    }
}

/// One forward-chaining step.
///
/// Does nothing when either item is gone or the fact does not match the
/// rule's first antecedent. Never changes an existing statement; at most it
/// stores a new item or adds a justification pair to an existing one.
pub(crate) fn fc_infer(
    kb: &mut KnowledgeBase,
    fact: FactId,
    rule: RuleId,
    agenda: &mut Agenda,
) -> Option<Assertion> {
    let derived = derive(kb.fact(fact)?, kb.rule(rule)?)?;
    debug!(derived = %derived, from_fact = %fact, from_rule = %rule, "derived");
    Some(kb.add_item(derived, agenda))
}

fn derive(fact: &Fact, rule: &Rule) -> Option<Item> {
    trace!(fact = %fact, rule = %rule, "attempting inference");

    let bindings = match_statements(rule.first_antecedent(), &fact.statement)?;
    let support = Support::new(fact.id, rule.id);
    let rhs = instantiate(rule.rhs(), &bindings);

    if rule.remaining_antecedents().is_empty() {
        if !rhs.is_ground() {
            warn!(statement = %rhs, rule = %rule, "derived fact is not ground");
        }
        return Some(Item::Fact(Fact::derived(rhs, support)));
    }

    let lhs: Vec<Statement> = rule
        .remaining_antecedents()
        .iter()
        .map(|antecedent| instantiate(antecedent, &bindings))
        .collect();
    Rule::derived(lhs, rhs, support).ok().map(Item::Rule)
}
