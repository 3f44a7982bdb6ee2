//! Provenance - the justification metadata shared by facts and rules.

use serde::{Deserialize, Serialize};

use super::{FactId, ItemId, RuleId};

/// One forward-chaining derivation: `fact` matched the first antecedent of
/// `rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Support {
    pub fact: FactId,
    pub rule: RuleId,
}

impl Support {
    pub fn new(fact: FactId, rule: RuleId) -> Self {
        Self { fact, rule }
    }

    /// Check whether `producer` occupies its slot in this pair: the fact slot
    /// for a fact, the rule slot for a rule.
    pub fn references(&self, producer: ItemId) -> bool {
        match producer {
            ItemId::Fact(id) => self.fact == id,
            ItemId::Rule(id) => self.rule == id,
        }
    }

    /// The producer in the slot opposite to `producer`'s kind.
    pub fn counterpart(&self, producer: ItemId) -> ItemId {
        match producer {
            ItemId::Fact(_) => ItemId::Rule(self.rule),
            ItemId::Rule(_) => ItemId::Fact(self.fact),
        }
    }

    /// Both producers, fact first.
    pub fn producers(&self) -> [ItemId; 2] {
        [ItemId::Fact(self.fact), ItemId::Rule(self.rule)]
    }
}

/// Why an item is believed, and what it helps justify.
///
/// `supports_facts` and `supports_rules` are lookup links only: they mirror
/// the `supported_by` entries of other items and never keep anything alive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Supplied directly by a caller at least once.
    pub asserted: bool,

    pub supported_by: Vec<Support>,

    pub supports_facts: Vec<FactId>,

    pub supports_rules: Vec<RuleId>,
}

impl Provenance {
    /// Provenance of a caller-supplied item.
    pub fn asserted() -> Self {
        Self {
            asserted: true,
            ..Self::default()
        }
    }

    /// Provenance of an item produced by one derivation.
    pub fn derived(support: Support) -> Self {
        Self {
            supported_by: vec![support],
            ..Self::default()
        }
    }

    pub fn is_supported(&self) -> bool {
        !self.supported_by.is_empty()
    }

    pub fn has_support_from(&self, producer: ItemId) -> bool {
        self.supported_by.iter().any(|s| s.references(producer))
    }

    /// Record a derivation. Returns `false` if it was already recorded.
    pub fn add_support(&mut self, support: Support) -> bool {
        if self.supported_by.contains(&support) {
            return false;
        }
        self.supported_by.push(support);
        true
    }

    /// Drop every pair that names `producer` and return the dropped pairs.
    pub fn remove_supports_from(&mut self, producer: ItemId) -> Vec<Support> {
        let (dropped, kept): (Vec<Support>, Vec<Support>) = self
            .supported_by
            .drain(..)
            .partition(|s| s.references(producer));
        self.supported_by = kept;
        dropped
    }

    pub fn add_dependent(&mut self, dependent: ItemId) {
        match dependent {
            ItemId::Fact(id) if !self.supports_facts.contains(&id) => self.supports_facts.push(id),
            ItemId::Rule(id) if !self.supports_rules.contains(&id) => self.supports_rules.push(id),
            _ => {}
        }
    }

    pub fn remove_dependent(&mut self, dependent: ItemId) {
        match dependent {
            ItemId::Fact(id) => self.supports_facts.retain(|f| *f != id),
            ItemId::Rule(id) => self.supports_rules.retain(|r| *r != id),
        }
    }

    pub fn has_dependent(&self, dependent: ItemId) -> bool {
        match dependent {
            ItemId::Fact(id) => self.supports_facts.contains(&id),
            ItemId::Rule(id) => self.supports_rules.contains(&id),
        }
    }

    /// Dependents in back-reference order, facts first.
    pub fn dependents(&self) -> Vec<ItemId> {
        self.supports_facts
            .iter()
            .map(|id| ItemId::Fact(*id))
            .chain(self.supports_rules.iter().map(|id| ItemId::Rule(*id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_slots() {
        let fact = FactId::new();
        let rule = RuleId::new();
        let support = Support::new(fact, rule);

        assert!(support.references(ItemId::Fact(fact)));
        assert!(support.references(ItemId::Rule(rule)));
        assert!(!support.references(ItemId::Fact(FactId::new())));
        assert_eq!(support.counterpart(ItemId::Fact(fact)), ItemId::Rule(rule));
        assert_eq!(support.counterpart(ItemId::Rule(rule)), ItemId::Fact(fact));
    }

    #[test]
    fn test_slot_check_uses_the_matching_kind() {
        // Same UUID in both slots must still be distinguished by kind.
        let shared = uuid::Uuid::new_v4();
        let support = Support::new(FactId(shared), RuleId::new());

        assert!(support.references(ItemId::Fact(FactId(shared))));
        assert!(!support.references(ItemId::Rule(RuleId(shared))));
    }

    #[test]
    fn test_add_support_dedups() {
        let support = Support::new(FactId::new(), RuleId::new());
        let mut provenance = Provenance::derived(support);

        assert!(!provenance.add_support(support));
        assert_eq!(provenance.supported_by.len(), 1);
        assert!(!provenance.asserted);
    }

    #[test]
    fn test_remove_supports_from() {
        let fact_a = FactId::new();
        let fact_b = FactId::new();
        let rule = RuleId::new();

        let mut provenance = Provenance::derived(Support::new(fact_a, rule));
        provenance.add_support(Support::new(fact_b, rule));

        let dropped = provenance.remove_supports_from(ItemId::Fact(fact_a));
        assert_eq!(dropped, vec![Support::new(fact_a, rule)]);
        assert!(provenance.is_supported());
        assert!(provenance.has_support_from(ItemId::Rule(rule)));
        assert!(!provenance.has_support_from(ItemId::Fact(fact_a)));

        let dropped = provenance.remove_supports_from(ItemId::Rule(rule));
        assert_eq!(dropped.len(), 1);
        assert!(!provenance.is_supported());
    }

    #[test]
    fn test_dependents() {
        let mut provenance = Provenance::asserted();
        let fact = ItemId::Fact(FactId::new());
        let rule = ItemId::Rule(RuleId::new());

        provenance.add_dependent(rule);
        provenance.add_dependent(fact);
        provenance.add_dependent(fact);

        assert_eq!(provenance.dependents(), vec![fact, rule]);
        assert!(provenance.has_dependent(rule));

        provenance.remove_dependent(rule);
        assert!(!provenance.has_dependent(rule));
        assert_eq!(provenance.dependents(), vec![fact]);
    }
}
