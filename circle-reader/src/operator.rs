//! Operator and operator-code readers

use crate::error::{ReaderError, Result};
use crate::options::OptionsTable;
use crate::table::{table_view, Vector};
use circle_schema::slots::{operator, operator_code};
use circle_schema::{BuiltinOperator, OptionsKind};
use std::borrow::Cow;
use tracing::warn;

table_view! {
    /// `Operator` table
    Operator
}

impl<'a> Operator<'a> {
    /// Index into `Model.operator_codes`
    pub fn opcode_index(&self) -> Result<u32> {
        self.table.get(operator::OPCODE_INDEX, 0)
    }

    /// Input tensor indices; `-1` marks an omitted optional input
    pub fn inputs(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(operator::INPUTS)
    }

    pub fn outputs(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(operator::OUTPUTS)
    }

    /// Union discriminant of `builtin_options`
    pub fn builtin_options_type(&self) -> Result<OptionsKind> {
        let raw: u8 = self.table.get(operator::BUILTIN_OPTIONS_TYPE, 0)?;
        OptionsKind::from_u8(raw).ok_or(ReaderError::InvalidEnum {
            what: "BuiltinOptions",
            value: raw as i64,
        })
    }

    /// Options table, `None` when the operator carries no options
    pub fn builtin_options(&self) -> Result<Option<OptionsTable<'a>>> {
        let kind = self.builtin_options_type()?;
        if kind == OptionsKind::None {
            return Ok(None);
        }

        match self.table.get_table(operator::BUILTIN_OPTIONS)? {
            Some(table) => Ok(Some(OptionsTable::new(kind, table))),
            None => {
                warn!(
                    options = kind.name(),
                    table = self.table.position(),
                    "options discriminant set without an options table"
                );
                Ok(None)
            }
        }
    }

    /// Opaque bytes for custom operators
    pub fn custom_options(&self) -> Result<&'a [u8]> {
        Ok(self
            .table
            .get_vector_or_empty::<u8>(operator::CUSTOM_OPTIONS)?
            .bytes())
    }

    /// 0 = FLEXBUFFERS
    pub fn custom_options_format(&self) -> Result<i8> {
        self.table.get(operator::CUSTOM_OPTIONS_FORMAT, 0)
    }

    pub fn mutating_variable_inputs(&self) -> Result<Vector<'a, bool>> {
        self.table
            .get_vector_or_empty(operator::MUTATING_VARIABLE_INPUTS)
    }

    pub fn intermediates(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(operator::INTERMEDIATES)
    }
}

table_view! {
    /// `OperatorCode` table
    OperatorCode
}

impl<'a> OperatorCode<'a> {
    pub fn deprecated_builtin_code(&self) -> Result<i8> {
        self.table.get(operator_code::DEPRECATED_BUILTIN_CODE, 0)
    }

    pub fn custom_code(&self) -> Result<Option<&'a str>> {
        self.table.get_str(operator_code::CUSTOM_CODE)
    }

    /// Operator version, 1 when absent
    pub fn version(&self) -> Result<i32> {
        self.table.get(operator_code::VERSION, 1)
    }

    pub fn builtin_code(&self) -> Result<i32> {
        self.table.get(operator_code::BUILTIN_CODE, 0)
    }

    /// Effective operator, reconciling the narrow and wide code fields
    pub fn builtin_operator(&self) -> Result<BuiltinOperator> {
        Ok(BuiltinOperator::resolve(
            self.deprecated_builtin_code()?,
            self.builtin_code()?,
        ))
    }

    pub fn is_custom(&self) -> Result<bool> {
        Ok(self.builtin_operator()? == BuiltinOperator::CUSTOM)
    }

    /// Display name: the custom code for custom operators, else the builtin name
    pub fn name(&self) -> Result<Cow<'a, str>> {
        let op = self.builtin_operator()?;
        if op == BuiltinOperator::CUSTOM {
            if let Some(code) = self.custom_code()? {
                return Ok(Cow::Borrowed(code));
            }
        }
        Ok(match op.name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(op.to_string()),
        })
    }
}
