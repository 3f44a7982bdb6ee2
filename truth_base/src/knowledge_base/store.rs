//! Knowledge Base - the arena of facts and rules and its public operations.

use logic_terms::{match_statements, Bindings, Statement};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{Fact, FactId, Item, ItemId, Provenance, Rule, RuleId, RuleKey, Support};
use crate::config::KbConfig;
use crate::error::KbError;
use crate::inference::{self, Agenda};
use crate::retraction::{self, Retraction};

/// What `kb_assert` did with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assertion {
    /// The item was new and has been stored under this id.
    Added(ItemId),

    /// The item was already stored; its justification was merged in.
    Merged(ItemId),

    /// The item was already stored and is now marked asserted.
    Reasserted(ItemId),
}

impl Assertion {
    /// Id of the stored item, which may differ from the id of the item passed
    /// in when it was a duplicate.
    pub fn id(&self) -> ItemId {
        match self {
            Assertion::Added(id) | Assertion::Merged(id) | Assertion::Reasserted(id) => *id,
        }
    }
}

/// One successful match of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub bindings: Bindings,

    /// Facts the answer was read from.
    pub facts: Vec<FactId>,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bindings.is_empty() {
            write!(f, "yes")
        } else {
            write!(f, "{}", self.bindings)
        }
    }
}

/// The knowledge base.
///
/// Facts and rules live in id-keyed arenas. Insertion order is kept in a
/// separate list per kind, and a structural index maps each statement (or
/// rule body) to the single stored copy.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    config: KbConfig,

    facts: HashMap<FactId, Fact>,

    rules: HashMap<RuleId, Rule>,

    fact_order: Vec<FactId>,

    rule_order: Vec<RuleId>,

    /// Index: statement -> the stored fact with that statement.
    fact_index: HashMap<Statement, FactId>,

    /// Index: (lhs, rhs) -> the stored rule with that body.
    rule_index: HashMap<RuleKey, RuleId>,
}

impl KnowledgeBase {
    /// Create a new empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty knowledge base with the given configuration.
    pub fn with_config(config: KbConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a knowledge base seeded with caller-supplied facts and rules.
    ///
    /// Every seed is asserted (support is discarded) and chained, facts first.
    pub fn from_items(
        facts: impl IntoIterator<Item = Fact>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<Self, KbError> {
        let mut kb = Self::new();
        for mut fact in facts {
            fact.provenance = Provenance::asserted();
            kb.kb_assert(fact)?;
        }
        for mut rule in rules {
            rule.provenance = Provenance::asserted();
            kb.kb_assert(rule)?;
        }
        Ok(kb)
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    /// Assert a fact or rule.
    ///
    /// A new item is stored and chained against every stored counterpart. A
    /// duplicate either merges the incoming justification pairs into the
    /// stored copy or, when it carries none, marks the stored copy asserted.
    pub fn kb_assert(&mut self, item: impl Into<Item>) -> Result<Assertion, KbError> {
        let item = item.into();
        debug!(item = %item, "asserting");

        let mut agenda = Agenda::default();
        let outcome = self.add_item(item, &mut agenda);
        inference::run(self, agenda);

        self.audit()?;
        Ok(outcome)
    }

    /// Ask which stored facts match `query`.
    ///
    /// A malformed query (anything but a fact) is logged and answered with an
    /// empty list; use [`KnowledgeBase::try_ask`] to observe the error.
    pub fn kb_ask(&self, query: impl Into<Item>) -> Vec<Answer> {
        match self.try_ask(query) {
            Ok(answers) => answers,
            Err(err) => {
                warn!(%err, "invalid ask");
                Vec::new()
            }
        }
    }

    /// Ask which stored facts match `query`, in insertion order.
    pub fn try_ask(&self, query: impl Into<Item>) -> Result<Vec<Answer>, KbError> {
        let query = match query.into() {
            Item::Fact(fact) => fact,
            other => {
                return Err(KbError::MalformedQuery {
                    found: other.to_string(),
                })
            }
        };
        debug!(query = %query.statement, "asking");

        Ok(self
            .facts()
            .filter_map(|fact| {
                match_statements(&query.statement, &fact.statement).map(|bindings| Answer {
                    bindings,
                    facts: vec![fact.id],
                })
            })
            .collect())
    }

    /// Retract a fact and everything that depended on it alone.
    ///
    /// Rules cannot be retracted directly. Retracting a fact that is not
    /// stored does nothing.
    pub fn kb_retract(&mut self, item: impl Into<Item>) -> Result<Retraction, KbError> {
        let fact = match item.into() {
            Item::Fact(fact) => fact,
            other => {
                warn!(item = %other, "refusing to retract a rule");
                return Err(KbError::NotRetractable {
                    item: other.to_string(),
                });
            }
        };

        let Some(id) = self.fact_index.get(&fact.statement).copied() else {
            warn!(fact = %fact, "retracting a fact that is not in the knowledge base");
            return Ok(Retraction::default());
        };

        let outcome = retraction::retract(self, id);
        self.audit()?;
        Ok(outcome)
    }

    /// Run one forward-chaining step on two stored items and chain whatever
    /// it produces. Returns `None` when the fact does not match the rule's
    /// first antecedent or either id is unknown.
    pub fn fc_infer(&mut self, fact: FactId, rule: RuleId) -> Option<Assertion> {
        let mut agenda = Agenda::default();
        let outcome = inference::fc_infer(self, fact, rule, &mut agenda);
        inference::run(self, agenda);
        outcome
    }

    /// Get fact by ID.
    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    /// Get rule by ID.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// Find the stored fact with this statement.
    pub fn find_fact(&self, statement: &Statement) -> Option<&Fact> {
        self.fact_index.get(statement).and_then(|id| self.facts.get(id))
    }

    /// Find the stored rule with this body.
    pub fn find_rule(&self, lhs: &[Statement], rhs: &Statement) -> Option<&Rule> {
        self.rule_index
            .get(&(lhs.to_vec(), rhs.clone()))
            .and_then(|id| self.rules.get(id))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        match id {
            ItemId::Fact(id) => self.facts.contains_key(&id),
            ItemId::Rule(id) => self.rules.contains_key(&id),
        }
    }

    /// All facts in insertion order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.fact_order.iter().filter_map(|id| self.facts.get(id))
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rule_order.iter().filter_map(|id| self.rules.get(id))
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }

    /// Check that every justification edge is recorded on both ends, that no
    /// edge names a missing item, and that the indexes agree with the arenas.
    pub fn check_consistency(&self) -> Result<(), KbError> {
        let facts_indexed = self.fact_order.len() == self.facts.len()
            && self.fact_index.len() == self.facts.len()
            && self
                .facts()
                .all(|f| self.fact_index.get(&f.statement) == Some(&f.id));
        if !facts_indexed {
            return Err(KbError::IndexMismatch { kind: "fact" });
        }
        let rules_indexed = self.rule_order.len() == self.rules.len()
            && self.rule_index.len() == self.rules.len()
            && self
                .rules()
                .all(|r| self.rule_index.get(&r.key()) == Some(&r.id));
        if !rules_indexed {
            return Err(KbError::IndexMismatch { kind: "rule" });
        }

        let nodes = self
            .facts()
            .map(|f| (ItemId::Fact(f.id), &f.provenance))
            .chain(self.rules().map(|r| (ItemId::Rule(r.id), &r.provenance)));

        for (id, provenance) in nodes {
            for support in &provenance.supported_by {
                for producer in support.producers() {
                    let Some(producer_provenance) = self.provenance(producer) else {
                        return Err(KbError::DanglingReference {
                            from: id,
                            to: producer,
                        });
                    };
                    if !producer_provenance.has_dependent(id) {
                        return Err(KbError::AsymmetricEdge {
                            producer,
                            dependent: id,
                        });
                    }
                }
            }
            for dependent in provenance.dependents() {
                let Some(dependent_provenance) = self.provenance(dependent) else {
                    return Err(KbError::DanglingReference {
                        from: id,
                        to: dependent,
                    });
                };
                if !dependent_provenance.has_support_from(id) {
                    return Err(KbError::AsymmetricEdge {
                        producer: id,
                        dependent,
                    });
                }
            }
        }
        Ok(())
    }

    fn audit(&self) -> Result<(), KbError> {
        if self.config.verify_graph {
            self.check_consistency()?;
        }
        Ok(())
    }

    pub(crate) fn provenance(&self, id: ItemId) -> Option<&Provenance> {
        match id {
            ItemId::Fact(id) => self.facts.get(&id).map(|f| &f.provenance),
            ItemId::Rule(id) => self.rules.get(&id).map(|r| &r.provenance),
        }
    }

    pub(crate) fn provenance_mut(&mut self, id: ItemId) -> Option<&mut Provenance> {
        match id {
            ItemId::Fact(id) => self.facts.get_mut(&id).map(|f| &mut f.provenance),
            ItemId::Rule(id) => self.rules.get_mut(&id).map(|r| &mut r.provenance),
        }
    }

    /// Store or merge an item, queueing the chaining work a new item causes.
    pub(crate) fn add_item(&mut self, item: Item, agenda: &mut Agenda) -> Assertion {
        match item {
            Item::Fact(fact) => self.add_fact(fact, agenda),
            Item::Rule(rule) => self.add_rule(rule, agenda),
        }
    }

    fn add_fact(&mut self, fact: Fact, agenda: &mut Agenda) -> Assertion {
        if let Some(existing) = self.fact_index.get(&fact.statement).copied() {
            return self.merge(ItemId::Fact(existing), fact.provenance.supported_by);
        }

        let Fact {
            mut id,
            statement,
            provenance,
        } = fact;
        if self.facts.contains_key(&id) {
            id = FactId::new();
        }
        let supports = provenance.supported_by;
        let stored = Fact {
            id,
            statement: statement.clone(),
            provenance: Provenance {
                asserted: provenance.asserted,
                ..Provenance::default()
            },
        };

        debug!(fact = %stored, supports = supports.len(), "adding fact");
        self.facts.insert(id, stored);
        self.fact_order.push(id);
        self.fact_index.insert(statement, id);
        self.justify(ItemId::Fact(id), supports);

        agenda.fact_added(id, &self.rule_order);
        Assertion::Added(ItemId::Fact(id))
    }

    fn add_rule(&mut self, rule: Rule, agenda: &mut Agenda) -> Assertion {
        let key = rule.key();
        if let Some(existing) = self.rule_index.get(&key).copied() {
            return self.merge(ItemId::Rule(existing), rule.provenance.supported_by);
        }

        let mut stored = rule;
        let supports = std::mem::take(&mut stored.provenance.supported_by);
        stored.provenance = Provenance {
            asserted: stored.provenance.asserted,
            ..Provenance::default()
        };
        if self.rules.contains_key(&stored.id) {
            stored.id = RuleId::new();
        }
        let id = stored.id;

        debug!(rule = %stored, supports = supports.len(), "adding rule");
        self.rules.insert(id, stored);
        self.rule_order.push(id);
        self.rule_index.insert(key, id);
        self.justify(ItemId::Rule(id), supports);

        agenda.rule_added(id, &self.fact_order);
        Assertion::Added(ItemId::Rule(id))
    }

    /// Link the pairs an incoming duplicate carries. A copy with no usable
    /// pair counts as a fresh assertion of the stored item.
    fn merge(&mut self, existing: ItemId, supports: Vec<Support>) -> Assertion {
        let offered = supports.len();
        if self.link_all(supports, existing) > 0 {
            debug!(item = %existing, "merged justification");
            return Assertion::Merged(existing);
        }

        if offered > 0 {
            warn!(item = %existing, offered, "no usable justification; treating as an assertion");
        }
        self.mark_asserted(existing);
        debug!(item = %existing, "re-asserted");
        Assertion::Reasserted(existing)
    }

    /// Link the pairs a newly stored item carries. An item left without any
    /// recorded pair is kept as asserted, so it is never stored unsupported
    /// and unasserted.
    fn justify(&mut self, dependent: ItemId, supports: Vec<Support>) {
        let offered = supports.len();
        if self.link_all(supports, dependent) > 0 {
            return;
        }
        if offered > 0 {
            warn!(item = %dependent, offered, "no usable justification; storing as asserted");
        }
        self.mark_asserted(dependent);
    }

    fn link_all(&mut self, supports: Vec<Support>, dependent: ItemId) -> usize {
        supports
            .into_iter()
            .filter(|support| self.link(*support, dependent))
            .count()
    }

    fn mark_asserted(&mut self, id: ItemId) {
        if let Some(provenance) = self.provenance_mut(id) {
            provenance.asserted = true;
        }
    }

    /// Record `support` on `dependent` and the matching back-reference on both
    /// producers. Returns whether the pair is recorded afterwards; nothing is
    /// recorded if any end is missing.
    pub(crate) fn link(&mut self, support: Support, dependent: ItemId) -> bool {
        let ends_present = support.producers().iter().all(|p| self.contains(*p));
        if !ends_present || !self.contains(dependent) {
            warn!(item = %dependent, "dropping justification that names a missing producer");
            return false;
        }

        if let Some(provenance) = self.provenance_mut(dependent) {
            provenance.add_support(support);
        }
        for producer in support.producers() {
            if let Some(provenance) = self.provenance_mut(producer) {
                provenance.add_dependent(dependent);
            }
        }
        true
    }

    /// Remove a back-reference from `producer` unless `dependent` still holds
    /// another pair naming it.
    pub(crate) fn unlink_dependent(&mut self, producer: ItemId, dependent: ItemId) {
        let still_supported = self
            .provenance(dependent)
            .map(|p| p.has_support_from(producer))
            .unwrap_or(false);
        if still_supported {
            return;
        }
        if let Some(provenance) = self.provenance_mut(producer) {
            provenance.remove_dependent(dependent);
        }
    }

    /// Take an item out of the arena, the order list and the index.
    pub(crate) fn detach(&mut self, id: ItemId) -> Option<Item> {
        match id {
            ItemId::Fact(fact_id) => {
                let fact = self.facts.remove(&fact_id)?;
                self.fact_order.retain(|f| *f != fact_id);
                self.fact_index.remove(&fact.statement);
                Some(Item::Fact(fact))
            }
            ItemId::Rule(rule_id) => {
                let rule = self.rules.remove(&rule_id)?;
                self.rule_order.retain(|r| *r != rule_id);
                self.rule_index.remove(&rule.key());
                Some(Item::Rule(rule))
            }
        }
    }
}

impl std::fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Knowledge Base:")?;
        for fact in self.facts() {
            writeln!(f, "{}", fact)?;
        }
        for rule in self.rules() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
