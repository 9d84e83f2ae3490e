//! Dual-field form
//!
//! Two fields hold the same quantity in two units of the active converter.
//! Editing one side recomputes the other. Each operation computes the derived
//! text before assigning anything, so a rejected operation leaves the form
//! exactly as it was.

use crate::field::{FieldState, Side};
use crate::FormConfig;
use serde::Serialize;
use std::sync::Arc;
use tandem_core::{format_number, parse_input, TandemError, Unit, UnitOption};
use tandem_plugin::{ConverterPlugin, ConverterRegistry, ConverterSummary};
use tracing::{debug, warn};

/// Read-only projection of one field for rendering
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub raw_text: String,
    pub unit: Unit,
    pub label: &'static str,
    pub options: Vec<UnitOption>,
}

/// Read-only projection of the whole form for rendering
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub active_converter: &'static str,
    pub converter_name: &'static str,
    pub converters: Vec<ConverterSummary>,
    pub left: FieldView,
    pub right: FieldView,
}

/// Linked pair of unit fields over a converter registry
pub struct Form {
    registry: Arc<ConverterRegistry>,
    active: Arc<dyn ConverterPlugin>,
    left: FieldState,
    right: FieldState,
}

impl Form {
    /// Validate the registry and start on its first converter
    pub fn new(registry: Arc<ConverterRegistry>) -> Result<Self, TandemError> {
        registry.validate()?;
        let first = registry
            .first()
            .ok_or_else(|| TandemError::invalid_registry("no converters registered"))?;
        let (left, right) = initial_fields(first.as_ref())?;
        Ok(Self {
            registry,
            active: first,
            left,
            right,
        })
    }

    /// Like `new`, then apply `config`. An unknown initial converter is an error.
    pub fn with_config(registry: Arc<ConverterRegistry>, config: &FormConfig) -> Result<Self, TandemError> {
        let mut form = Self::new(registry)?;
        if let Some(id) = &config.initial_converter {
            form.select_converter(id)?;
        }
        Ok(form)
    }

    // ========== Operations ==========

    /// Switch converters, replacing both fields
    ///
    /// An unknown id is rejected and the current state kept.
    pub fn select_converter(&mut self, id: &str) -> Result<(), TandemError> {
        let converter = self.registry.lookup(id).map_err(|e| {
            warn!(id, "rejected unknown converter");
            e
        })?;
        let (left, right) = initial_fields(converter.as_ref())?;
        self.active = converter;
        self.left = left;
        self.right = right;
        debug!(converter = self.active_converter_id(), left = %self.left.unit, right = %self.right.unit,
            "converter selected");
        Ok(())
    }

    /// Store `text` verbatim on `side` and rewrite the opposite field
    ///
    /// Text that does not parse clears the opposite field.
    pub fn set_value(&mut self, side: Side, text: &str) -> Result<(), TandemError> {
        let other = side.opposite();
        let derived = match parse_input(text) {
            Some(value) => self.converted(value, self.field(side).unit, self.field(other).unit)?,
            None => String::new(),
        };
        self.field_mut(side).raw_text = text.to_string();
        self.field_mut(other).raw_text = derived;
        debug!(?side, text, derived = %self.field(other).raw_text, "value set");
        Ok(())
    }

    /// Change the unit on `side` and recompute the opposite field
    ///
    /// The opposite field is only rewritten when this side's current text
    /// parses; otherwise it is left as is. Changing the right unit while both
    /// fields are blank also blanks the left text.
    pub fn set_unit(&mut self, side: Side, unit: Unit) -> Result<(), TandemError> {
        if !self.active.offers(unit) {
            warn!(%unit, converter = self.active_converter_id(), "rejected foreign unit");
            return Err(TandemError::unknown_unit(unit.key(), self.active_converter_id()));
        }

        let other = side.opposite();
        let derived = match parse_input(&self.field(side).raw_text) {
            Some(value) => Some(self.converted(value, unit, self.field(other).unit)?),
            None if side == Side::Right && self.left.is_blank() && self.right.is_blank() => {
                Some(String::new())
            }
            None => None,
        };

        self.field_mut(side).unit = unit;
        if let Some(text) = derived {
            self.field_mut(other).raw_text = text;
        }
        debug!(?side, %unit, other = %self.field(other).raw_text, "unit set");
        Ok(())
    }

    pub fn set_left_value(&mut self, text: &str) -> Result<(), TandemError> {
        self.set_value(Side::Left, text)
    }

    pub fn set_right_value(&mut self, text: &str) -> Result<(), TandemError> {
        self.set_value(Side::Right, text)
    }

    pub fn set_left_unit(&mut self, unit: Unit) -> Result<(), TandemError> {
        self.set_unit(Side::Left, unit)
    }

    pub fn set_right_unit(&mut self, unit: Unit) -> Result<(), TandemError> {
        self.set_unit(Side::Right, unit)
    }

    /// Exchange text and unit between the fields, without recomputing
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        debug!(left = %self.left.unit, right = %self.right.unit, "fields swapped");
    }

    // ========== Accessors ==========

    pub fn active_converter_id(&self) -> &'static str {
        self.active.meta().id
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn left(&self) -> &FieldState {
        &self.left
    }

    pub fn right(&self) -> &FieldState {
        &self.right
    }

    pub fn field(&self, side: Side) -> &FieldState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Unit options offered on either side (both sides share the list)
    pub fn unit_options(&self) -> &'static [UnitOption] {
        self.active.units()
    }

    /// Label of the unit selected on `side`
    pub fn label(&self, side: Side) -> &'static str {
        self.active
            .label_for(self.field(side).unit)
            .unwrap_or_else(|| side.fallback_label())
    }

    /// Resolve a unit key against the active converter
    pub fn resolve_unit(&self, key: &str) -> Result<Unit, TandemError> {
        Unit::from_key(key)
            .filter(|unit| self.active.offers(*unit))
            .ok_or_else(|| TandemError::unknown_unit(key, self.active_converter_id()))
    }

    pub fn view(&self) -> FormView {
        let meta = self.active.meta();
        FormView {
            active_converter: meta.id,
            converter_name: meta.name,
            converters: self.registry.summaries(),
            left: self.field_view(Side::Left),
            right: self.field_view(Side::Right),
        }
    }

    // ========== Internals ==========

    fn field_view(&self, side: Side) -> FieldView {
        let field = self.field(side);
        FieldView {
            raw_text: field.raw_text.clone(),
            unit: field.unit,
            label: self.label(side),
            options: self.unit_options().to_vec(),
        }
    }

    fn field_mut(&mut self, side: Side) -> &mut FieldState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn converted(&self, value: f64, from: Unit, to: Unit) -> Result<String, TandemError> {
        let result = self.active.convert(value, from, to)?;
        Ok(format_number(result))
    }
}

/// Empty fields on the converter's first unit and, if any, its second
fn initial_fields(converter: &dyn ConverterPlugin) -> Result<(FieldState, FieldState), TandemError> {
    let units = converter.units();
    let first = units.first().ok_or_else(|| {
        TandemError::invalid_registry(format!("converter '{}' has no units", converter.meta().id))
    })?;
    let second = units.get(1).unwrap_or(first);
    Ok((FieldState::empty(first.value), FieldState::empty(second.value)))
}
