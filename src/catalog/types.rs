//! Primitive value and identifier types for basket catalogues.

use serde::{Deserialize, Serialize};
use time::Date;

/// A dense, per-basket field index. String keys appear only at the API
/// boundary; all hot paths run on ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FieldId(pub u32);

impl FieldId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn new(idx: usize) -> Self {
        Self(idx as u32)
    }
}

/// Progressive-disclosure level. Total order: anything visible at `Napkin`
/// is also visible at `Mid` and `Pro`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tier {
    #[default]
    Napkin = 0,
    Mid = 1,
    Pro = 2,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Napkin, Tier::Mid, Tier::Pro];

    #[inline(always)]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The declared type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Currency,
    Percentage,
    Number,
    Date,
    Text,
    Toggle,
    Choice,
}

/// A single field value. A closed union rather than a dynamic map value,
/// so type mismatches are a checked construction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Currency(f64),
    Percentage(f64),
    Number(f64),
    #[serde(with = "serde_date")]
    Date(Date),
    Text(String),
    Toggle(bool),
    Choice(String),
}

impl FieldValue {
    /// Numeric coercion for the three numeric variants.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Currency(v) | FieldValue::Percentage(v) | FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this value is an inhabitant of the declared type.
    pub fn matches_type(&self, vt: ValueType) -> bool {
        matches!(
            (self, vt),
            (FieldValue::Currency(_), ValueType::Currency)
                | (FieldValue::Percentage(_), ValueType::Percentage)
                | (FieldValue::Number(_), ValueType::Number)
                | (FieldValue::Date(_), ValueType::Date)
                | (FieldValue::Text(_), ValueType::Text)
                | (FieldValue::Toggle(_), ValueType::Toggle)
                | (FieldValue::Choice(_), ValueType::Choice)
        )
    }

    /// Wraps a computed number in the variant matching the declared type.
    /// Returns `None` for non-numeric declared types.
    pub fn from_number(vt: ValueType, v: f64) -> Option<FieldValue> {
        match vt {
            ValueType::Currency => Some(FieldValue::Currency(v)),
            ValueType::Percentage => Some(FieldValue::Percentage(v)),
            ValueType::Number => Some(FieldValue::Number(v)),
            _ => None,
        }
    }
}

/// ISO-8601 calendar dates (`2025-01-15`) on the wire.
mod serde_date {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::format_description::FormatItem;
    use time::macros::format_description;
    use time::Date;

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = d.format(FORMAT).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Date, D::Error> {
        let text = String::deserialize(de)?;
        Date::parse(&text, FORMAT).map_err(Error::custom)
    }
}

/// Display hints. Presentation-only; the engine never branches on these.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Format {
    pub prefix: Option<&'static str>,
    pub suffix: Option<&'static str>,
    pub decimals: u8,
}

impl Format {
    pub fn currency() -> Self {
        Self { prefix: Some("$"), suffix: None, decimals: 0 }
    }

    pub fn percent() -> Self {
        Self { prefix: None, suffix: Some("%"), decimals: 2 }
    }

    pub fn number() -> Self {
        Self { prefix: None, suffix: None, decimals: 0 }
    }

    /// Renders a numeric value with this format's affixes.
    pub fn render(&self, v: f64) -> String {
        format!(
            "{}{:.*}{}",
            self.prefix.unwrap_or(""),
            self.decimals as usize,
            v,
            self.suffix.unwrap_or("")
        )
    }
}

/// Inclusive numeric range constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Per-tier wording for labels and help text. A tier without its own text
/// falls back to the closest lower tier that has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierText {
    texts: [Option<String>; 3],
}

impl TierText {
    pub fn at(tier: Tier, text: &str) -> Self {
        let mut t = Self::default();
        t.texts[tier.index()] = Some(text.to_string());
        t
    }

    pub fn with(mut self, tier: Tier, text: &str) -> Self {
        self.texts[tier.index()] = Some(text.to_string());
        self
    }

    pub fn get(&self, tier: Tier) -> Option<&str> {
        self.texts[..=tier.index()]
            .iter()
            .rev()
            .find_map(|t| t.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn tier_order_is_total() {
        assert!(Tier::Napkin < Tier::Mid);
        assert!(Tier::Mid < Tier::Pro);
    }

    #[test]
    fn value_round_trips_as_json() {
        let cases = vec![
            FieldValue::Currency(1_000_000.0),
            FieldValue::Percentage(20.0),
            FieldValue::Number(48.0),
            FieldValue::Date(date!(2025 - 01 - 15)),
            FieldValue::Text("Main St Apartments".into()),
            FieldValue::Toggle(true),
            FieldValue::Choice("monthly".into()),
        ];
        for v in cases {
            let json = serde_json::to_string(&v).unwrap();
            let back: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v, "json: {}", json);
        }
    }

    #[test]
    fn date_serializes_as_iso_string() {
        let json = serde_json::to_string(&FieldValue::Date(date!(2030 - 01 - 15))).unwrap();
        assert!(json.contains("\"2030-01-15\""), "json: {}", json);
    }

    #[test]
    fn tier_text_falls_back_downward() {
        let t = TierText::at(Tier::Napkin, "Price").with(Tier::Pro, "Gross Purchase Price");
        assert_eq!(t.get(Tier::Napkin), Some("Price"));
        assert_eq!(t.get(Tier::Mid), Some("Price"));
        assert_eq!(t.get(Tier::Pro), Some("Gross Purchase Price"));
    }

    #[test]
    fn number_wrapping_respects_declared_type() {
        assert_eq!(
            FieldValue::from_number(ValueType::Currency, 5.0),
            Some(FieldValue::Currency(5.0))
        );
        assert_eq!(FieldValue::from_number(ValueType::Text, 5.0), None);
        assert!(!FieldValue::Number(1.0).matches_type(ValueType::Currency));
    }
}
