//! Field and group definitions: the declarative unit of a basket catalogue.

use super::formula::Calc;
use super::types::{Bounds, FieldValue, Format, Tier, TierText, ValueType};

/// One named, typed value description within a basket.
///
/// Built through the constructor/builder methods so catalogue data reads
/// declaratively; all fields stay readable for the engine and the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub key: &'static str,
    pub label: TierText,
    pub help: TierText,
    pub value_type: ValueType,
    /// Minimum tier at which the field is shown.
    pub tier: Tier,
    /// Enforced only once the field is visible at the requested tier.
    pub required: bool,
    pub format: Format,
    pub bounds: Option<Bounds>,
    /// Seeded into an empty slot when a basket session opens. One source of
    /// truth for defaults; the UI never hard-codes its own.
    pub default: Option<FieldValue>,
    /// Present iff the field is derived rather than entered.
    pub calc: Option<Calc>,
}

impl FieldDefinition {
    /// A plain input field.
    pub fn input(key: &'static str, label: &str, value_type: ValueType, tier: Tier) -> Self {
        Self {
            key,
            label: TierText::at(tier, label),
            help: TierText::default(),
            value_type,
            tier,
            required: false,
            format: Format::default(),
            bounds: None,
            default: None,
            calc: None,
        }
    }

    /// A derived field, auto-calculated from other fields of the basket.
    pub fn derived(
        key: &'static str,
        label: &str,
        value_type: ValueType,
        tier: Tier,
        calc: Calc,
    ) -> Self {
        let mut f = Self::input(key, label, value_type, tier);
        f.calc = Some(calc);
        f
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = self.help.with(self.tier, text);
        self
    }

    pub fn help_at(mut self, tier: Tier, text: &str) -> Self {
        self.help = self.help.with(tier, text);
        self
    }

    pub fn label_at(mut self, tier: Tier, text: &str) -> Self {
        self.label = self.label.with(tier, text);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some(Bounds { min, max });
        self
    }

    pub fn default_value(mut self, v: FieldValue) -> Self {
        self.default = Some(v);
        self
    }

    /// Whether the field is an input (no formula).
    pub fn is_input(&self) -> bool {
        self.calc.is_none()
    }
}

/// A named, ordered cluster of fields used for UI sectioning.
/// Carries no computation semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub key: &'static str,
    pub title: &'static str,
    pub tier: Tier,
    pub members: Vec<&'static str>,
}

impl FieldGroup {
    pub fn new(key: &'static str, title: &'static str, tier: Tier, members: &[&'static str]) -> Self {
        Self {
            key,
            title,
            tier,
            members: members.to_vec(),
        }
    }
}
