//! Inclusive numeric bounds: `range(0, 100)`, `range(, 10)`, `range[1,]`.

use tablec_model::{DataValue, FieldType};

use crate::args::parse_args;
use crate::context::ValidationContext;
use crate::error::{CompileError, FailureKind, ValidationFailure};
use crate::validator::{DataValidator, ValidatorFactory, ValidatorTarget};

pub const TAG: &str = "range";

pub struct RangeFactory;

impl ValidatorFactory for RangeFactory {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn description(&self) -> &'static str {
        "Numeric value within inclusive bounds"
    }

    fn compile(
        &self,
        target: &ValidatorTarget<'_>,
        raw_args: &str,
    ) -> Result<Box<dyn DataValidator>, CompileError> {
        let field_type = target.field_type();
        if !field_type.is_numeric() {
            return Err(target.error(TAG, format!("requires a numeric field, found {field_type}")));
        }
        let terms = parse_args(raw_args);
        let [min, max] = terms.as_slice() else {
            return Err(target.error(
                TAG,
                format!("expected two bounds 'min, max', got '{raw_args}'"),
            ));
        };
        let parse_bound = |term: &str| -> Result<Option<f64>, CompileError> {
            if term.is_empty() {
                return Ok(None);
            }
            term.parse::<f64>()
                .map(Some)
                .map_err(|_| target.error(TAG, format!("bound '{term}' is not a number")))
        };
        let validator = RangeValidator {
            min: parse_bound(min)?,
            max: parse_bound(max)?,
        };
        if validator.min.is_none() && validator.max.is_none() {
            return Err(target.error(TAG, "at least one bound is required"));
        }
        if let (Some(min), Some(max)) = (validator.min, validator.max)
            && min > max
        {
            return Err(target.error(TAG, format!("lower bound {min} exceeds upper bound {max}")));
        }
        Ok(Box::new(validator))
    }
}

#[derive(Debug)]
pub struct RangeValidator {
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeValidator {
    fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    fn describe(&self) -> String {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
        format!("[{}, {}]", bound(self.min), bound(self.max))
    }
}

impl DataValidator for RangeValidator {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        _field_type: &FieldType,
        value: &DataValue,
    ) -> Result<(), ValidationFailure> {
        let number = match value {
            DataValue::Null => return Ok(()),
            other => other.as_f64().ok_or_else(|| {
                ctx.failure(TAG, FailureKind::TypeMismatch, value, "expected a number")
            })?,
        };
        if self.contains(number) {
            return Ok(());
        }
        Err(ctx.failure(
            TAG,
            FailureKind::OutOfRange,
            value,
            format!("outside {}", self.describe()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use tablec_model::{CompiledTable, FieldDef, Record, RecordType};

    fn table() -> CompiledTable {
        let record_type = RecordType::new(
            "item.Item",
            vec![
                FieldDef::new("id", FieldType::Int),
                FieldDef::new("weight", FieldType::Float),
                FieldDef::new("name", FieldType::String),
            ],
        );
        CompiledTable::new("item", "TbItem", Arc::new(record_type))
    }

    fn compile(table: &CompiledTable, field: usize, args: &str) -> Result<Box<dyn DataValidator>, CompileError> {
        let record_type = table.value_type.as_ref();
        RangeFactory.compile(&ValidatorTarget::new(record_type, &record_type.fields[field]), args)
    }

    fn check(validator: &dyn DataValidator, table: &CompiledTable, weight: DataValue) -> Result<(), ValidationFailure> {
        let record = Record::new(vec![DataValue::Int(1), weight, DataValue::Null], "item.csv");
        let sink = CollectingDiagnostics::new();
        let field = &table.value_type.fields[1];
        let ctx = ValidationContext::new(table, &record, 0, field, &sink);
        validator.validate(&ctx, &field.field_type, &record.values[1])
    }

    #[test]
    fn inclusive_bounds() {
        let table = table();
        let validator = compile(&table, 1, "(0, 10.5)").unwrap();

        assert!(check(validator.as_ref(), &table, DataValue::Float(0.0)).is_ok());
        assert!(check(validator.as_ref(), &table, DataValue::Float(10.5)).is_ok());
        assert!(check(validator.as_ref(), &table, DataValue::Int(3)).is_ok());
        assert!(check(validator.as_ref(), &table, DataValue::Null).is_ok());

        let failure = check(validator.as_ref(), &table, DataValue::Float(11.0)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::OutOfRange);
        assert_eq!(failure.message, "outside [0, 10.5]");
    }

    #[test]
    fn open_bounds() {
        let table = table();
        let validator = compile(&table, 1, "(,5)").unwrap();
        assert!(check(validator.as_ref(), &table, DataValue::Float(-1e9)).is_ok());
        assert!(check(validator.as_ref(), &table, DataValue::Float(5.1)).is_err());

        let validator = compile(&table, 1, "[1,]").unwrap();
        assert!(check(validator.as_ref(), &table, DataValue::Float(1e9)).is_ok());
        assert!(check(validator.as_ref(), &table, DataValue::Float(0.5)).is_err());
    }

    #[test]
    fn compile_errors() {
        let table = table();
        assert!(compile(&table, 2, "(0,1)").unwrap_err().reason.contains("numeric field"));
        assert!(compile(&table, 1, "(1)").is_err());
        assert!(compile(&table, 1, "(,)").is_err());
        assert!(compile(&table, 1, "(a,1)").is_err());
        assert!(compile(&table, 1, "(5,1)").is_err());
    }
}
