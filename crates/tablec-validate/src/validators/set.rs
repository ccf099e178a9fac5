//! Allowed-values list: `set(A, B, C)` for strings, `set(1, 2, 3)` for integers.

use std::collections::BTreeSet;

use tablec_model::{DataValue, FieldType};

use crate::args::parse_args;
use crate::context::ValidationContext;
use crate::error::{CompileError, FailureKind, ValidationFailure};
use crate::validator::{DataValidator, ValidatorFactory, ValidatorTarget};

pub const TAG: &str = "set";

pub struct SetFactory;

impl ValidatorFactory for SetFactory {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn description(&self) -> &'static str {
        "Value must be one of the listed literals"
    }

    fn compile(
        &self,
        target: &ValidatorTarget<'_>,
        raw_args: &str,
    ) -> Result<Box<dyn DataValidator>, CompileError> {
        let terms = parse_args(raw_args);
        if terms.is_empty() {
            return Err(target.error(TAG, "at least one allowed value is required"));
        }
        let field_type = target.field_type();
        let allowed = if field_type.is_string_like() {
            Allowed::Text(terms.into_iter().collect())
        } else if field_type.is_integer() {
            let numbers = terms
                .iter()
                .map(|term| {
                    term.parse::<i64>()
                        .map_err(|_| target.error(TAG, format!("'{term}' is not an integer")))
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            Allowed::Integer(numbers)
        } else {
            return Err(target.error(
                TAG,
                format!("requires a string or integer field, found {field_type}"),
            ));
        };
        Ok(Box::new(SetValidator { allowed }))
    }
}

#[derive(Debug)]
enum Allowed {
    Text(BTreeSet<String>),
    Integer(BTreeSet<i64>),
}

#[derive(Debug)]
pub struct SetValidator {
    allowed: Allowed,
}

impl SetValidator {
    fn describe(&self) -> String {
        match &self.allowed {
            Allowed::Text(values) => values.iter().cloned().collect::<Vec<_>>().join(", "),
            Allowed::Integer(values) => values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl DataValidator for SetValidator {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        _field_type: &FieldType,
        value: &DataValue,
    ) -> Result<(), ValidationFailure> {
        let found = match (&self.allowed, value) {
            (_, DataValue::Null) => return Ok(()),
            (Allowed::Text(values), DataValue::String(text)) => values.contains(text),
            (Allowed::Integer(values), DataValue::Int(number)) => values.contains(number),
            _ => {
                return Err(ctx.failure(
                    TAG,
                    FailureKind::TypeMismatch,
                    value,
                    "value type does not match the declared set",
                ));
            }
        };
        if found {
            return Ok(());
        }
        Err(ctx.failure(
            TAG,
            FailureKind::NotInSet,
            value,
            format!("expected one of {{{}}}", self.describe()),
        ))
    }
}
