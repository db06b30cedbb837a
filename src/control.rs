//! Control types and visibility capture state
//!
//! A control is an editable field rendered in the node body. Hiding a
//! control swaps its kind for the `Hidden` sentinel and zeroes its height
//! contribution; the original kind and height are captured once so a
//! later show restores the control exactly as it was.

use crate::defaults::LayoutDefaults;
use crate::observable::ValueCell;
use serde::{Deserialize, Serialize};

/// Value stored by a control
///
/// Serialized untagged so saved control values stay plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Null,
    Int(i64),
    Text(String),
}

impl ControlValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ControlValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ControlValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        ControlValue::Int(value)
    }
}

impl From<i32> for ControlValue {
    fn from(value: i32) -> Self {
        ControlValue::Int(value as i64)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        ControlValue::Text(value.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        ControlValue::Text(value)
    }
}

/// Widget kind a control is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Number,
    Combo,
    Text,
    TextArea,
    Button,
    /// Sentinel kind for controls removed from layout
    Hidden,
}

impl ControlKind {
    /// Height this kind contributes to the node body
    pub fn default_height(&self) -> f32 {
        match self {
            ControlKind::Number => LayoutDefaults::NUMBER_HEIGHT,
            ControlKind::Combo => LayoutDefaults::COMBO_HEIGHT,
            ControlKind::Text => LayoutDefaults::TEXT_HEIGHT,
            ControlKind::TextArea => LayoutDefaults::TEXT_AREA_HEIGHT,
            ControlKind::Button => LayoutDefaults::BUTTON_HEIGHT,
            ControlKind::Hidden => LayoutDefaults::HIDDEN_HEIGHT,
        }
    }

    /// Checks if this kind holds editable text
    pub fn is_text(&self) -> bool {
        matches!(self, ControlKind::Text | ControlKind::TextArea)
    }
}

/// An editable field in the node body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    pub kind: ControlKind,
    pub value: ValueCell,
    /// Current height contribution; zero while hidden
    pub height: f32,
    /// Companion controls shown and hidden in lock-step with this one
    pub linked: Vec<String>,
    orig_kind: Option<ControlKind>,
    orig_height: Option<f32>,
    /// Set once a reactive driver binding watches this control
    #[serde(skip)]
    pub(crate) watched: bool,
}

impl Control {
    /// Creates a control of the given kind
    pub fn new(name: impl Into<String>, kind: ControlKind, value: impl Into<ControlValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: ValueCell::new(value),
            height: kind.default_height(),
            linked: Vec::new(),
            orig_kind: None,
            orig_height: None,
            watched: false,
        }
    }

    /// Creates a numeric field
    pub fn number(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, ControlKind::Number, value)
    }

    /// Creates a dropdown field
    pub fn combo(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Combo, value.into())
    }

    /// Creates a single-line text field
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Text, value.into())
    }

    /// Creates a multiline text field
    pub fn text_area(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ControlKind::TextArea, value.into())
    }

    /// Creates a push button; presses dispatch through node behaviors
    pub fn button(name: impl Into<String>) -> Self {
        Self::new(name, ControlKind::Button, ControlValue::Null)
    }

    /// Declares companion controls toggled in lock-step
    pub fn with_linked(mut self, names: &[&str]) -> Self {
        self.linked = names.iter().map(|name| name.to_string()).collect();
        self
    }

    /// Overrides the height contribution
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.kind == ControlKind::Hidden
    }

    pub fn is_visible(&self) -> bool {
        !self.is_hidden()
    }

    /// Kind the control had before it was first hidden
    pub fn original_kind(&self) -> Option<ControlKind> {
        self.orig_kind
    }

    /// Captures the current kind and height, once.
    ///
    /// Controls already carrying the hidden sentinel are skipped so a
    /// hidden state never poisons the restore target.
    pub fn capture_original(&mut self) {
        if self.orig_kind.is_none() && self.kind != ControlKind::Hidden {
            self.orig_kind = Some(self.kind);
            self.orig_height = Some(self.height);
        }
    }

    /// Swaps in the hidden sentinel, capturing the original state first
    pub fn hide(&mut self) {
        self.capture_original();
        self.kind = ControlKind::Hidden;
        self.height = LayoutDefaults::HIDDEN_HEIGHT;
    }

    /// Restores the captured kind and height.
    ///
    /// A control shown before anything was captured falls back to the
    /// numeric kind.
    pub fn show(&mut self) {
        let kind = self.orig_kind.unwrap_or(ControlKind::Number);
        self.kind = kind;
        self.height = self.orig_height.unwrap_or_else(|| kind.default_height());
    }
}
