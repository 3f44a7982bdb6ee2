//! Item definitions - the fact-or-rule union passed across the public surface.

use logic_terms::Statement;
use serde::{Deserialize, Serialize};

use super::{Fact, FactId, Provenance, Rule, RuleId};

/// Either kind of stored knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Item {
    Fact(Fact),
    Rule(Rule),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Fact(fact) => ItemId::Fact(fact.id),
            Item::Rule(rule) => ItemId::Rule(rule.id),
        }
    }

    pub fn provenance(&self) -> &Provenance {
        match self {
            Item::Fact(fact) => &fact.provenance,
            Item::Rule(rule) => &rule.provenance,
        }
    }

    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Item::Fact(fact) => Some(fact),
            Item::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Item::Rule(rule) => Some(rule),
            Item::Fact(_) => None,
        }
    }
}

impl From<Fact> for Item {
    fn from(fact: Fact) -> Self {
        Item::Fact(fact)
    }
}

impl From<Rule> for Item {
    fn from(rule: Rule) -> Self {
        Item::Rule(rule)
    }
}

/// A bare statement is taken as an asserted fact.
impl From<Statement> for Item {
    fn from(statement: Statement) -> Self {
        Item::Fact(Fact::new(statement))
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::Fact(fact) => write!(f, "fact {}", fact),
            Item::Rule(rule) => write!(f, "rule {}", rule),
        }
    }
}

/// Arena key of a stored fact or rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Fact(FactId),
    Rule(RuleId),
}

impl ItemId {
    pub fn is_fact(&self) -> bool {
        matches!(self, ItemId::Fact(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, ItemId::Rule(_))
    }
}

impl From<FactId> for ItemId {
    fn from(id: FactId) -> Self {
        ItemId::Fact(id)
    }
}

impl From<RuleId> for ItemId {
    fn from(id: RuleId) -> Self {
        ItemId::Rule(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Fact(id) => write!(f, "fact:{}", id),
            ItemId::Rule(id) => write!(f, "rule:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(text: &str) -> Statement {
        Statement::from_tokens(text.split_whitespace()).unwrap()
    }

    #[test]
    fn test_statement_converts_to_asserted_fact() {
        let item: Item = stmt("on a b").into();
        let fact = item.as_fact().unwrap();
        assert!(fact.is_asserted());
        assert!(item.as_rule().is_none());
        assert!(item.id().is_fact());
    }

    #[test]
    fn test_item_display() {
        let fact: Item = Fact::new(stmt("on a b")).into();
        assert_eq!(fact.to_string(), "fact (on a b)");

        let rule: Item = Rule::try_new(vec![stmt("on ?x ?y")], stmt("above ?x ?y"))
            .unwrap()
            .into();
        assert_eq!(rule.to_string(), "rule ((on ?x ?y)) -> (above ?x ?y)");
        assert!(rule.id().is_rule());
    }

    #[test]
    fn test_item_id_display_names_kind() {
        let id = FactId::new();
        assert_eq!(ItemId::from(id).to_string(), format!("fact:{}", id));
    }
}
