use super::{pattern, simple_name, PatternRule};
use crate::core::{ClassDefinition, DesignPattern, PatternType};

const CONFIDENCE: f64 = 0.9;

pub struct SingletonRule;

impl PatternRule for SingletonRule {
    fn pattern_type(&self) -> PatternType {
        PatternType::Singleton
    }

    fn detect(&self, classes: &[ClassDefinition]) -> Vec<DesignPattern> {
        classes.iter().filter_map(detect_singleton).collect()
    }
}

/// A static field typed as the class itself plus a private constructor.
fn detect_singleton(class: &ClassDefinition) -> Option<DesignPattern> {
    let field = class
        .fields
        .iter()
        .find(|f| f.is_static && simple_name(&f.type_name) == class.name)?;
    let private_ctor = class
        .constructors()
        .any(|ctor| ctor.name == class.name && ctor.access.is_private());
    if !private_ctor {
        return None;
    }
    Some(pattern(
        PatternType::Singleton,
        class,
        CONFIDENCE,
        format!(
            "static field '{}' of type {} and a private constructor",
            field.name, class.name
        ),
    ))
}
