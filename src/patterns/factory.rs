use super::{pattern, PatternRule};
use crate::core::{ClassDefinition, DesignPattern, PatternType};

const CONFIDENCE: f64 = 0.8;

/// Class named `*Factory*` with at least one `Create*` method.
pub struct FactoryRule;

impl PatternRule for FactoryRule {
    fn pattern_type(&self) -> PatternType {
        PatternType::Factory
    }

    fn detect(&self, classes: &[ClassDefinition]) -> Vec<DesignPattern> {
        classes
            .iter()
            .filter(|class| class.name.contains("Factory"))
            .filter_map(|class| {
                let creators: Vec<&str> = class
                    .regular_methods()
                    .filter(|m| m.name.starts_with("Create"))
                    .map(|m| m.name.as_str())
                    .collect();
                (!creators.is_empty()).then(|| {
                    pattern(
                        PatternType::Factory,
                        class,
                        CONFIDENCE,
                        format!("creation methods: {}", creators.join(", ")),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::*;

    #[test]
    fn test_factory_with_create_method() {
        let mut factory = class("WeaponFactory");
        factory.methods.push(method("CreateSword"));
        factory.methods.push(method("Reset"));

        let found = FactoryRule.detect(&[factory]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].confidence, CONFIDENCE);
        assert_eq!(found[0].evidence, "creation methods: CreateSword");
    }

    #[test]
    fn test_name_without_create_method() {
        let mut factory = class("WeaponFactory");
        factory.methods.push(method("Build"));
        assert!(FactoryRule.detect(&[factory]).is_empty());
    }

    #[test]
    fn test_create_method_without_factory_name() {
        let mut spawner = class("Spawner");
        spawner.methods.push(method("CreateEnemy"));
        assert!(FactoryRule.detect(&[spawner]).is_empty());
    }
}
