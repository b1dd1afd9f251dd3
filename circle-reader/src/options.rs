//! # Builtin Options
//!
//! One reader for every `BuiltinOptions` union member. The member's field
//! table from `circle_schema::options` says where each field lives and how
//! wide it is; [`OptionsTable`] walks that table against the vtable.

use crate::error::{ReaderError, Result};
use crate::table::Table;
use circle_schema::{FieldDecl, FieldDefault, FieldKind, OptionValue, OptionsKind};
use serde::Serialize;
use std::fmt;

/// Options table of one operator, tagged with its union member
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionsTable<'a> {
    kind: OptionsKind,
    table: Table<'a>,
}

impl<'a> OptionsTable<'a> {
    pub fn new(kind: OptionsKind, table: Table<'a>) -> Self {
        Self { kind, table }
    }

    #[inline]
    pub fn kind(&self) -> OptionsKind {
        self.kind
    }

    #[inline]
    pub fn table(&self) -> Table<'a> {
        self.table
    }

    /// Declaration of `name` in this member
    pub fn field(&self, name: &str) -> Result<&'static FieldDecl> {
        self.kind
            .field(name)
            .ok_or_else(|| ReaderError::UnknownOptionField {
                options: self.kind.name(),
                field: name.to_string(),
            })
    }

    /// Value of `name`, or its declared default when absent
    pub fn get(&self, name: &str) -> Result<OptionValue> {
        self.read_field(self.field(name)?)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let decl = self.field(name)?;
        self.get(name)?
            .as_bool()
            .ok_or_else(|| self.mismatch(decl, "bool"))
    }

    /// Integer or enum field
    pub fn get_int(&self, name: &str) -> Result<i64> {
        let decl = self.field(name)?;
        self.get(name)?
            .as_int()
            .ok_or_else(|| self.mismatch(decl, "integer"))
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        let decl = self.field(name)?;
        self.get(name)?
            .as_float()
            .ok_or_else(|| self.mismatch(decl, "float"))
    }

    pub fn get_int_vector(&self, name: &str) -> Result<Vec<i32>> {
        let decl = self.field(name)?;
        match self.get(name)? {
            OptionValue::IntVector(values) => Ok(values),
            _ => Err(self.mismatch(decl, "int vector")),
        }
    }

    /// Read one declared field
    pub fn read_field(&self, decl: &FieldDecl) -> Result<OptionValue> {
        let voffset = decl.voffset();
        let table = &self.table;

        let value = match decl.kind {
            FieldKind::Bool => OptionValue::Bool(table.get(voffset, default_bool(decl))?),
            FieldKind::Int8 => {
                OptionValue::Int(table.get::<i8>(voffset, default_int(decl) as i8)? as i64)
            }
            FieldKind::Int32 => {
                OptionValue::Int(table.get::<i32>(voffset, default_int(decl) as i32)? as i64)
            }
            FieldKind::UInt32 => {
                OptionValue::Int(table.get::<u32>(voffset, default_int(decl) as u32)? as i64)
            }
            FieldKind::Int64 => OptionValue::Int(table.get::<i64>(voffset, default_int(decl))?),
            FieldKind::Float32 => OptionValue::Float(table.get(voffset, default_float(decl))?),
            FieldKind::Enum(_) => OptionValue::Enum(table.get(voffset, default_int(decl) as i8)?),
            FieldKind::IntVector => {
                OptionValue::IntVector(table.get_vector_or_empty::<i32>(voffset)?.to_vec()?)
            }
        };
        Ok(value)
    }

    /// Every field in declaration order
    pub fn decode(&self) -> Result<DecodedOptions> {
        let fields = self
            .kind
            .fields()
            .iter()
            .map(|decl| Ok((decl.name, self.read_field(decl)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(DecodedOptions {
            kind: self.kind,
            fields,
        })
    }

    fn mismatch(&self, decl: &FieldDecl, expected: &'static str) -> ReaderError {
        ReaderError::OptionTypeMismatch {
            options: self.kind.name(),
            field: decl.name,
            expected,
        }
    }
}

fn default_bool(decl: &FieldDecl) -> bool {
    matches!(decl.default, FieldDefault::Bool(true))
}

fn default_int(decl: &FieldDecl) -> i64 {
    match decl.default {
        FieldDefault::Int(v) => v,
        _ => 0,
    }
}

fn default_float(decl: &FieldDecl) -> f32 {
    match decl.default {
        FieldDefault::Float(v) => v,
        _ => 0.0,
    }
}

/// Render a value, naming enum variants where the domain knows them
pub fn display_value(decl: &FieldDecl, value: &OptionValue) -> String {
    match (decl.kind, value) {
        (FieldKind::Enum(domain), OptionValue::Enum(raw)) => match domain.variant_name(*raw) {
            Some(name) => name.to_string(),
            None => format!("{}({})", domain.name, raw),
        },
        _ => value.to_string(),
    }
}

/// Fully materialized options of one operator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedOptions {
    pub kind: OptionsKind,
    pub fields: Vec<(&'static str, OptionValue)>,
}

impl DecodedOptions {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for DecodedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.fields.is_empty() {
            return Ok(());
        }
        write!(f, " {{ ")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.kind.field(name) {
                Some(decl) => write!(f, "{}: {}", name, display_value(decl, value))?,
                None => write!(f, "{}: {}", name, value)?,
            }
        }
        write!(f, " }}")
    }
}
