use super::{pattern, PatternRule};
use crate::core::{ClassDefinition, DesignPattern, PatternType};

const CONFIDENCE: f64 = 0.7;

/// An event or delegate-typed field plus a `Notify*` or `Update*` method.
pub struct ObserverRule;

impl PatternRule for ObserverRule {
    fn pattern_type(&self) -> PatternType {
        PatternType::Observer
    }

    fn detect(&self, classes: &[ClassDefinition]) -> Vec<DesignPattern> {
        classes.iter().filter_map(detect_observer).collect()
    }
}

fn detect_observer(class: &ClassDefinition) -> Option<DesignPattern> {
    let channel = class.fields.iter().find(|f| f.is_event || f.is_delegate)?;
    let notifier = class
        .regular_methods()
        .find(|m| m.name.starts_with("Notify") || m.name.starts_with("Update"))?;
    Some(pattern(
        PatternType::Observer,
        class,
        CONFIDENCE,
        format!(
            "{} '{}' raised from '{}'",
            if channel.is_event { "event" } else { "delegate field" },
            channel.name,
            notifier.name
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::*;

    #[test]
    fn test_event_with_notify_method() {
        let mut subject = class("ScoreBoard");
        let mut on_changed = field("OnScoreChanged", "Action<int>", false);
        on_changed.is_event = true;
        on_changed.is_delegate = true;
        subject.fields.push(on_changed);
        subject.methods.push(method("NotifyScore"));

        let found = ObserverRule.detect(&[subject]);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].evidence,
            "event 'OnScoreChanged' raised from 'NotifyScore'"
        );
    }

    #[test]
    fn test_delegate_without_notifier() {
        let mut subject = class("Door");
        let mut callback = field("opened", "UnityAction", false);
        callback.is_delegate = true;
        subject.fields.push(callback);
        subject.methods.push(method("Open"));
        assert!(ObserverRule.detect(&[subject]).is_empty());
    }

    #[test]
    fn test_update_without_event() {
        let mut mover = class("Mover");
        mover.fields.push(field("speed", "float", false));
        mover.methods.push(method("Update"));
        assert!(ObserverRule.detect(&[mover]).is_empty());
    }
}
