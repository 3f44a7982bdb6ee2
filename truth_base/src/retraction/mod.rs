//! Retraction - cascading removal over the justification graph.
//!
//! Removing an item works as follows:
//! 1. **Detach**: Take the item out of the store
//! 2. **Scrub**: Drop every pair naming the item from its dependents'
//!    `supported_by`, along with the back-reference the pair's other producer
//!    held on that dependent
//! 3. **Cascade**: Queue each dependent left without support, unless the
//!    retraction policy protects it
//!
//! The cascade runs on an explicit worklist, so arbitrarily long derivation
//! chains are removed without recursion.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::RetractionPolicy;
use crate::knowledge_base::{Fact, FactId, Item, ItemId, KnowledgeBase, Rule};

/// What a call to `kb_retract` removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Retraction {
    /// Removed facts, the retracted fact first.
    pub removed_facts: Vec<Fact>,

    pub removed_rules: Vec<Rule>,

    /// Set when the target was still derived from other knowledge: it stays,
    /// but is no longer marked asserted.
    pub withdrawn: Option<FactId>,
}

impl Retraction {
    /// True when nothing was removed or withdrawn.
    pub fn is_empty(&self) -> bool {
        self.removed_facts.is_empty() && self.removed_rules.is_empty() && self.withdrawn.is_none()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_facts.len() + self.removed_rules.len()
    }

    fn record(&mut self, item: Item) {
        match item {
            Item::Fact(fact) => self.removed_facts.push(fact),
            Item::Rule(rule) => self.removed_rules.push(rule),
        }
    }
}

/// Retract a stored fact and cascade.
///
/// A fact that still has derivation support is not removed; only its
/// asserted flag is cleared.
pub(crate) fn retract(kb: &mut KnowledgeBase, root: FactId) -> Retraction {
    let policy = kb.config().retraction_policy;
    let mut outcome = Retraction::default();

    match kb.provenance_mut(ItemId::Fact(root)) {
        None => return outcome,
        Some(provenance) if provenance.is_supported() => {
            if provenance.asserted {
                provenance.asserted = false;
                outcome.withdrawn = Some(root);
                info!(
                    fact = %root,
                    supports = provenance.supported_by.len(),
                    "fact is still derived; withdrew its assertion"
                );
            } else {
                debug!(fact = %root, "fact is only derived; nothing to retract");
            }
            return outcome;
        }
        Some(_) => {}
    }

    let mut worklist = vec![ItemId::Fact(root)];
    while let Some(id) = worklist.pop() {
        let Some(removed) = kb.detach(id) else {
            continue;
        };
        let provenance = removed.provenance();

        for support in &provenance.supported_by {
            for producer in support.producers() {
                kb.unlink_dependent(producer, id);
            }
        }

        for dependent in provenance.dependents() {
            let Some(dependent_provenance) = kb.provenance_mut(dependent) else {
                continue;
            };
            let dropped = dependent_provenance.remove_supports_from(id);
            if dropped.is_empty() {
                continue;
            }
            let orphaned = !dependent_provenance.is_supported()
                && removable(policy, dependent, dependent_provenance.asserted);

            for support in dropped {
                kb.unlink_dependent(support.counterpart(id), dependent);
            }
            if orphaned {
                worklist.push(dependent);
            }
        }

        debug!(item = %removed, "removed");
        outcome.record(removed);
    }

    info!(
        facts = outcome.removed_facts.len(),
        rules = outcome.removed_rules.len(),
        "retraction finished"
    );
    outcome
}

fn removable(policy: RetractionPolicy, id: ItemId, asserted: bool) -> bool {
    match id {
        ItemId::Fact(_) => policy.removes_fact(asserted),
        ItemId::Rule(_) => policy.removes_rule(asserted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KbConfig;
    use logic_terms::Statement;

    fn stmt(text: &str) -> Statement {
        Statement::from_tokens(text.split_whitespace()).unwrap()
    }

    fn rule(lhs: &[&str], rhs: &str) -> Rule {
        Rule::try_new(lhs.iter().map(|s| stmt(s)).collect(), stmt(rhs)).unwrap()
    }

    fn kb_with(policy: RetractionPolicy) -> KnowledgeBase {
        KnowledgeBase::with_config(KbConfig::verified().with_retraction_policy(policy))
    }

    #[test]
    fn test_retract_removes_sole_dependent() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["p ?x"], "q ?x")).unwrap();

        let retraction = kb.kb_retract(stmt("p a")).unwrap();

        let removed: Vec<String> = retraction.removed_facts.iter().map(|f| f.to_string()).collect();
        assert_eq!(removed, vec!["(p a)", "(q a)"]);
        assert!(retraction.removed_rules.is_empty());
        assert_eq!(kb.fact_count(), 0);

        let r = kb.find_rule(&[stmt("p ?x")], &stmt("q ?x")).unwrap();
        assert!(r.supports_facts().is_empty());
    }

    #[test]
    fn test_retract_removes_residual_rules() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(rule(&["p ?x", "s ?x"], "q ?x")).unwrap();
        kb.kb_assert(stmt("p a")).unwrap();
        assert_eq!(kb.rule_count(), 2);

        let retraction = kb.kb_retract(stmt("p a")).unwrap();
        assert_eq!(retraction.removed_rules.len(), 1);
        assert_eq!(retraction.removed_rules[0].lhs(), &[stmt("s a")]);
        assert_eq!(kb.rule_count(), 1);
        assert_eq!(retraction.removed_count(), 2);
    }

    #[test]
    fn test_shared_rule_keeps_back_reference_for_other_support() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(rule(&["p ?x"], "q c")).unwrap();
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(stmt("p b")).unwrap();

        let q = kb.find_fact(&stmt("q c")).unwrap();
        assert_eq!(q.supported_by().len(), 2);
        let q_id = q.id;

        kb.kb_retract(stmt("p a")).unwrap();

        let q = kb.fact(q_id).unwrap();
        assert_eq!(q.supported_by().len(), 1);
        let r = kb.find_rule(&[stmt("p ?x")], &stmt("q c")).unwrap();
        assert!(r.supports_facts().contains(&q_id));
    }

    #[test]
    fn test_asserted_dependent_is_protected() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["p ?x"], "q ?x")).unwrap();
        kb.kb_assert(stmt("q a")).unwrap();

        let retraction = kb.kb_retract(stmt("p a")).unwrap();
        assert_eq!(retraction.removed_facts.len(), 1);

        let q = kb.find_fact(&stmt("q a")).unwrap();
        assert!(q.is_asserted());
        assert!(q.supported_by().is_empty());
    }

    #[test]
    fn test_cascade_facts_policy_removes_asserted_dependent() {
        let mut kb = kb_with(RetractionPolicy::CascadeFacts);
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["p ?x"], "q ?x")).unwrap();
        kb.kb_assert(stmt("q a")).unwrap();

        let retraction = kb.kb_retract(stmt("p a")).unwrap();
        assert_eq!(retraction.removed_facts.len(), 2);
        assert!(kb.find_fact(&stmt("q a")).is_none());
    }

    #[test]
    fn test_cascade_facts_policy_still_protects_asserted_rules() {
        let mut kb = kb_with(RetractionPolicy::CascadeFacts);
        kb.kb_assert(rule(&["p ?x", "s ?x"], "q ?x")).unwrap();
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["s a"], "q a")).unwrap();

        kb.kb_retract(stmt("p a")).unwrap();

        let residual = kb.find_rule(&[stmt("s a")], &stmt("q a")).unwrap();
        assert!(residual.is_asserted());
        assert!(residual.supported_by().is_empty());
    }

    #[test]
    fn test_retracting_derived_fact_withdraws_assertion_only() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["p ?x"], "q ?x")).unwrap();
        kb.kb_assert(stmt("q a")).unwrap();

        let retraction = kb.kb_retract(stmt("q a")).unwrap();
        let q = kb.find_fact(&stmt("q a")).unwrap();

        assert_eq!(retraction.withdrawn, Some(q.id));
        assert_eq!(retraction.removed_count(), 0);
        assert!(!q.is_asserted());

        // With the assertion withdrawn, losing the derivation removes it.
        kb.kb_retract(stmt("p a")).unwrap();
        assert!(kb.find_fact(&stmt("q a")).is_none());
    }

    #[test]
    fn test_retracting_purely_derived_fact_changes_nothing() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        kb.kb_assert(stmt("p a")).unwrap();
        kb.kb_assert(rule(&["p ?x"], "q ?x")).unwrap();

        let retraction = kb.kb_retract(stmt("q a")).unwrap();
        assert!(retraction.is_empty());
        assert_eq!(retraction.withdrawn, None);

        let q = kb.find_fact(&stmt("q a")).unwrap();
        assert!(!q.is_asserted());
        assert_eq!(q.supported_by().len(), 1);
    }

    #[test]
    fn test_deep_cascade_uses_worklist() {
        let mut kb = kb_with(RetractionPolicy::ProtectAsserted);
        let depth = 300;
        for i in 0..depth {
            let from = format!("step{} ?x", i);
            let to = format!("step{} ?x", i + 1);
            kb.kb_assert(rule(&[from.as_str()], &to)).unwrap();
        }
        kb.kb_assert(stmt("step0 a")).unwrap();
        assert_eq!(kb.fact_count(), depth + 1);

        let retraction = kb.kb_retract(stmt("step0 a")).unwrap();
        assert_eq!(retraction.removed_facts.len(), depth + 1);
        assert_eq!(kb.fact_count(), 0);
        assert_eq!(kb.rule_count(), depth);
    }
}
