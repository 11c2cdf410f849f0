use crate::constants::BUS_EVENT_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw criteria as provided by the caller, criterion name to expected value
pub type Criteria = BTreeMap<String, String>;

/// Sentinel matcher values describing a structural test instead of a literal comparison
///
/// The values are interpreted by the ResqueBus driver, this crate passes them through unchanged.
/// For their exact semantics, consult the drivers matcher implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialValue {
    /// Key has to exist, regardless of its value
    Key,
    /// Value has to be blank
    Blank,
    /// Value has to be nil
    Nil,
    /// Value has to be present
    Present,
    /// Value has to be empty
    Empty,
    /// Value has to equal the expected value
    Value,
}

impl SpecialValue {
    /// Every sentinel
    pub const ALL: [SpecialValue; 6] = [
        SpecialValue::Key,
        SpecialValue::Blank,
        SpecialValue::Nil,
        SpecialValue::Present,
        SpecialValue::Empty,
        SpecialValue::Value,
    ];

    /// Wire representation expected by the driver
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialValue::Key => "bus_special_value_key",
            SpecialValue::Blank => "bus_special_value_blank",
            SpecialValue::Nil => "bus_special_value_nil",
            SpecialValue::Present => "bus_special_value_present",
            SpecialValue::Empty => "bus_special_value_empty",
            SpecialValue::Value => "bus_special_value_value",
        }
    }

    /// Parses a wire representation
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|special| special.as_str() == value)
    }
}

impl fmt::Display for SpecialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SpecialValue> for String {
    fn from(value: SpecialValue) -> Self {
        value.as_str().to_string()
    }
}

/// Canonical set of criteria an event has to satisfy, always containing an event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matcher {
    criteria: Criteria,
}

impl Matcher {
    /// Normalises raw criteria, using `default_event_type` if no or an empty event type is set.
    /// All other criteria are retained as-is.
    pub fn encode(raw: Option<Criteria>, default_event_type: &str) -> Self {
        let mut criteria = raw.unwrap_or_default();

        let has_event_type = criteria
            .get(BUS_EVENT_TYPE)
            .map(|event_type| !event_type.is_empty())
            .unwrap_or(false);

        if !has_event_type {
            criteria.insert(BUS_EVENT_TYPE.to_string(), default_event_type.to_string());
        }

        Self { criteria }
    }

    /// Event type this matcher listens for
    pub fn event_type(&self) -> &str {
        self.criteria
            .get(BUS_EVENT_TYPE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Expected value of a criterion
    pub fn get(&self, name: &str) -> Option<&str> {
        self.criteria.get(name).map(String::as_str)
    }

    /// All criteria including the event type
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Unwraps the criteria
    pub fn into_criteria(self) -> Criteria {
        self.criteria
    }
}
