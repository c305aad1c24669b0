//! Pattern Detector.
//!
//! A registry of independent [`PatternRule`]s, each looking at the class
//! facts on its own. Rules can be added or removed without touching the
//! others, and several rules may fire on the same class.
//!
//! Rule confidences are fixed constants per rule.

mod factory;
mod observer;
mod singleton;

pub use factory::FactoryRule;
pub use observer::ObserverRule;
pub use singleton::SingletonRule;

use crate::core::{ClassDefinition, DesignPattern, PatternType};
use tracing::debug;

/// A single heuristic design-pattern rule.
pub trait PatternRule: Send + Sync {
    fn pattern_type(&self) -> PatternType;

    fn detect(&self, classes: &[ClassDefinition]) -> Vec<DesignPattern>;
}

pub struct PatternDetector {
    rules: Vec<Box<dyn PatternRule>>,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
            .with_rule(SingletonRule)
            .with_rule(FactoryRule)
            .with_rule(ObserverRule)
    }
}

impl PatternDetector {
    /// A detector with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl PatternRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Drop every rule producing `pattern_type`.
    pub fn without(mut self, pattern_type: PatternType) -> Self {
        self.rules.retain(|rule| rule.pattern_type() != pattern_type);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every rule; results are ordered by class, then pattern type.
    pub fn detect(&self, classes: &[ClassDefinition]) -> Vec<DesignPattern> {
        let mut patterns: Vec<DesignPattern> = self
            .rules
            .iter()
            .flat_map(|rule| rule.detect(classes))
            .collect();
        patterns.sort_by(|a, b| {
            (&a.classes, a.pattern_type).cmp(&(&b.classes, b.pattern_type))
        });
        debug!(patterns = patterns.len(), "pattern detection finished");
        patterns
    }
}

/// Simple name of a type expression: `Game.Manager<T>?` → `Manager`.
pub(crate) fn simple_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name).trim();
    base.rsplit('.')
        .next()
        .unwrap_or(base)
        .trim_end_matches('?')
}

pub(crate) fn pattern(
    pattern_type: PatternType,
    class: &ClassDefinition,
    confidence: f64,
    evidence: String,
) -> DesignPattern {
    DesignPattern {
        pattern_type,
        name: format!("{} ({})", class.name, pattern_type),
        confidence,
        classes: vec![class.full_name()],
        evidence,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::AccessModifier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_inheritance_chain_has_no_patterns() {
        let mut a = class("ClassA");
        a.base_types.insert("ClassB".to_string());
        let mut b = class("ClassB");
        b.base_types.insert("ClassC".to_string());
        let c = class("ClassC");

        let patterns = PatternDetector::default().detect(&[a, b, c]);
        assert!(patterns
            .iter()
            .all(|p| !matches!(p.pattern_type, PatternType::Singleton | PatternType::Factory)));
    }

    #[test]
    fn test_rules_fire_independently_on_same_class() {
        let mut class = class("EnemyFactory");
        class.fields.push(field("instance", "EnemyFactory", true));
        class
            .methods
            .push(constructor("EnemyFactory", AccessModifier::Private));
        class.methods.push(method("CreateEnemy"));

        let patterns = PatternDetector::default().detect(&[class]);
        let types: Vec<_> = patterns.iter().map(|p| p.pattern_type).collect();
        assert_eq!(types, vec![PatternType::Singleton, PatternType::Factory]);
    }

    #[test]
    fn test_rules_can_be_removed() {
        let detector = PatternDetector::default().without(PatternType::Factory);
        assert_eq!(detector.rule_count(), 2);

        let mut class = class("EnemyFactory");
        class.methods.push(method("CreateEnemy"));
        assert!(detector.detect(&[class]).is_empty());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("Game.Manager<int>"), "Manager");
        assert_eq!(simple_name("Player?"), "Player");
    }
}
