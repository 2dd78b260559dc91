use std::time::Duration;

use idcheck_core_types::ViewClass;
use serde::{Deserialize, Serialize};

use crate::errors::CheckerError;

/// Interactive and informational classes that always need an identifier.
pub static STANDARD_CHECKABLE: [ViewClass; 6] = [
    ViewClass::CONTROL,
    ViewClass::TEXT_VIEW,
    ViewClass::NAVIGATION_BAR,
    ViewClass::SEARCH_BAR,
    ViewClass::TOOLBAR,
    ViewClass::TAB_BAR,
];

/// Classes whose children are toolkit internals and are never visited.
pub static NON_TRAVERSABLE: [ViewClass; 2] = [ViewClass::STEPPER, ViewClass::SEARCH_BAR];

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Delay between two passes. Always strictly positive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Interval(Duration);

impl Interval {
    pub fn new(duration: Duration) -> Result<Self, CheckerError> {
        if duration.is_zero() {
            return Err(CheckerError::invalid_interval("interval must be positive"));
        }
        Ok(Self(duration))
    }

    pub fn from_secs_f64(secs: f64) -> Result<Self, CheckerError> {
        if !secs.is_finite() {
            return Err(CheckerError::invalid_interval(format!(
                "interval must be finite, got {secs}"
            )));
        }
        if secs <= 0.0 {
            return Err(CheckerError::invalid_interval(format!(
                "interval must be positive, got {secs}"
            )));
        }
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(|err| CheckerError::invalid_interval(format!("{secs}: {err}")))?;
        Self::new(duration)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL)
    }
}

impl TryFrom<Duration> for Interval {
    type Error = CheckerError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct TraversalOptions {
    /// Skip nodes already visited in the current pass, so a cyclic host tree
    /// cannot loop forever.
    pub guard_cycles: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self { guard_cycles: true }
    }
}

/// The three class lists the classifier consults. Immutable once built.
#[derive(Clone, Debug)]
pub struct ClassificationRules {
    custom_checkable: Vec<ViewClass>,
    standard_checkable: &'static [ViewClass],
    non_traversable: &'static [ViewClass],
}

impl ClassificationRules {
    pub fn new(custom_checkable: Vec<ViewClass>) -> Self {
        Self {
            custom_checkable,
            standard_checkable: &STANDARD_CHECKABLE,
            non_traversable: &NON_TRAVERSABLE,
        }
    }

    pub fn custom_checkable(&self) -> &[ViewClass] {
        &self.custom_checkable
    }

    pub fn standard_checkable(&self) -> &[ViewClass] {
        self.standard_checkable
    }

    pub fn non_traversable(&self) -> &[ViewClass] {
        self.non_traversable
    }

    /// Custom classes first, then the standard ones.
    pub fn checkable(&self) -> impl Iterator<Item = &ViewClass> {
        self.custom_checkable
            .iter()
            .chain(self.standard_checkable.iter())
    }
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Clone, Debug, Default)]
pub struct CheckerConfig {
    pub interval: Interval,
    pub custom_checkable: Vec<ViewClass>,
    pub traversal: TraversalOptions,
}

impl CheckerConfig {
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_custom_checkable<I>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = ViewClass>,
    {
        for class in classes {
            if !self.custom_checkable.contains(&class) {
                self.custom_checkable.push(class);
            }
        }
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalOptions) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn rules(&self) -> ClassificationRules {
        ClassificationRules::new(self.custom_checkable.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_five_seconds() {
        assert_eq!(
            CheckerConfig::default().interval.as_duration(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn rejects_non_positive_intervals() {
        assert!(matches!(
            Interval::from_secs_f64(-1.0),
            Err(CheckerError::InvalidInterval(_))
        ));
        assert!(Interval::from_secs_f64(0.0).is_err());
        assert!(Interval::from_secs_f64(f64::NAN).is_err());
        assert!(Interval::from_secs_f64(f64::INFINITY).is_err());
        assert!(Interval::new(Duration::ZERO).is_err());
        assert_eq!(
            Interval::from_secs_f64(2.5).unwrap().as_duration(),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn custom_classes_keep_order_without_duplicates() {
        let a = ViewClass::new("RatingView").unwrap();
        let b = ViewClass::new("ChipView").unwrap();
        let config = CheckerConfig::default()
            .with_custom_checkable([a.clone(), b.clone()])
            .with_custom_checkable([a.clone()]);
        assert_eq!(config.custom_checkable, vec![a.clone(), b]);

        let rules = config.rules();
        assert_eq!(rules.checkable().next(), Some(&a));
        assert_eq!(rules.checkable().count(), 2 + STANDARD_CHECKABLE.len());
    }

    #[test]
    fn search_bar_is_both_checkable_and_opaque() {
        let rules = ClassificationRules::default();
        assert!(rules.standard_checkable().contains(&ViewClass::SEARCH_BAR));
        assert!(rules.non_traversable().contains(&ViewClass::SEARCH_BAR));
        assert!(!rules.standard_checkable().contains(&ViewClass::STEPPER));
    }

    #[test]
    fn traversal_options_deserialize_with_defaults() {
        let opts: TraversalOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.guard_cycles);
        let opts: TraversalOptions = serde_json::from_str(r#"{"guard_cycles":false}"#).unwrap();
        assert!(!opts.guard_cycles);
    }
}
