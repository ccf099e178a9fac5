//! Codename uniqueness.
//!
//! A codename is a human-authored symbolic name for a record. Normalized with
//! [`format_namespace`], it must map to exactly one primary key within its
//! table. The mapping lives in the table's [`CodenameMap`](tablec_model::CodenameMap)
//! so code emitters can read it after validation.

use tablec_common::format_namespace;
use tablec_model::{DataValue, FieldType};

use crate::args::parse_args;
use crate::context::ValidationContext;
use crate::error::{CompileError, FailureKind, ValidationFailure};
use crate::validator::{DataValidator, ValidatorFactory, ValidatorTarget};

pub const TAG: &str = "codename";

pub struct CodenameFactory;

impl ValidatorFactory for CodenameFactory {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn description(&self) -> &'static str {
        "Normalized value must be unique within the table"
    }

    fn compile(
        &self,
        target: &ValidatorTarget<'_>,
        raw_args: &str,
    ) -> Result<Box<dyn DataValidator>, CompileError> {
        let field_type = target.field_type();
        if !field_type.is_string_like() {
            return Err(target.error(TAG, format!("requires a string field, found {field_type}")));
        }
        Ok(Box::new(CodenameValidator {
            tables: parse_args(raw_args),
        }))
    }
}

#[derive(Debug)]
pub struct CodenameValidator {
    /// Tables the codenames are meant for. Informational only.
    tables: Vec<String>,
}

impl CodenameValidator {
    pub fn tables(&self) -> &[String] {
        &self.tables
    }
}

/// Drop one pair of enclosing double quotes.
fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw)
}

impl DataValidator for CodenameValidator {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        _field_type: &FieldType,
        value: &DataValue,
    ) -> Result<(), ValidationFailure> {
        if matches!(value, DataValue::Null) {
            return Ok(());
        }
        let rendered = value.to_string();
        let raw = strip_quotes(&rendered);
        if raw.trim().is_empty() {
            return Ok(());
        }
        let codename = format_namespace(raw);

        let Some(key) = ctx.primary_key() else {
            return Err(ctx.failure(
                TAG,
                FailureKind::MissingKey,
                value,
                format!("record has no primary key for codename '{codename}'"),
            ));
        };

        match ctx.codenames().try_insert(codename.as_str(), key.as_str()) {
            Ok(()) => {
                ctx.diagnostics().debug(
                    "codename registered",
                    &[
                        ("record", &ctx.record_path()),
                        ("validator", &TAG),
                        ("codename", &codename),
                        ("key", &key),
                    ],
                );
                Ok(())
            }
            Err(conflict) => {
                let mut failure = ctx.failure(
                    TAG,
                    FailureKind::CodenameCollision,
                    value,
                    format!(
                        "codename '{}' already used by record {}",
                        conflict.codename, conflict.existing_key
                    ),
                );
                failure.existing = Some(conflict.existing_key);
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use tablec_model::{CompiledTable, FieldDef, Record, RecordType};

    fn skill_table() -> CompiledTable {
        let record_type = RecordType::new(
            "skill.Skill",
            vec![
                FieldDef::new("id", FieldType::Int),
                FieldDef::new("codename", FieldType::String),
                FieldDef::new("power", FieldType::Int),
            ],
        );
        CompiledTable::new("skill", "TbSkill", Arc::new(record_type))
    }

    fn compile(table: &CompiledTable, field: usize) -> Result<Box<dyn DataValidator>, CompileError> {
        let record_type = table.value_type.as_ref();
        CodenameFactory.compile(
            &ValidatorTarget::new(record_type, &record_type.fields[field]),
            "(TbSkill, TbBuff)",
        )
    }

    fn check(
        validator: &dyn DataValidator,
        table: &CompiledTable,
        record: &Record,
    ) -> Result<(), ValidationFailure> {
        let sink = CollectingDiagnostics::new();
        let field = &table.value_type.fields[1];
        let ctx = ValidationContext::new(table, record, 0, field, &sink);
        validator.validate(&ctx, &field.field_type, &record.values[1])
    }

    fn skill(id: i64, codename: &str) -> Record {
        Record::new(
            vec![
                DataValue::Int(id),
                DataValue::String(codename.to_string()),
                DataValue::Int(1),
            ],
            "skill.xlsx",
        )
    }

    #[test]
    fn requires_string_field() {
        let table = skill_table();
        let err = compile(&table, 2).unwrap_err();
        assert_eq!(err.field, "power");
        assert_eq!(err.tag, "codename");
        assert_eq!(err.reason, "requires a string field, found int");
        assert!(compile(&table, 1).is_ok());
    }

    #[test]
    fn second_normalized_match_collides() {
        let table = skill_table();
        let validator = compile(&table, 1).unwrap();

        assert!(check(validator.as_ref(), &table, &skill(1, "fire_ball")).is_ok());
        let failure = check(validator.as_ref(), &table, &skill(2, "FireBall")).unwrap_err();

        assert_eq!(failure.kind, FailureKind::CodenameCollision);
        assert_eq!(failure.existing.as_deref(), Some("1"));
        assert_eq!(failure.record_path, "skill.TbSkill[2]");
        assert_eq!(failure.value, "\"FireBall\"");
        assert_eq!(table.codenames.get("FireBall").as_deref(), Some("1"));
    }

    #[test]
    fn retry_does_not_overwrite() {
        let table = skill_table();
        let validator = compile(&table, 1).unwrap();
        assert!(check(validator.as_ref(), &table, &skill(1, "ice")).is_ok());

        for _ in 0..3 {
            assert!(check(validator.as_ref(), &table, &skill(9, "Ice")).is_err());
        }
        assert_eq!(table.codenames.len(), 1);
        assert_eq!(table.codenames.get("Ice").as_deref(), Some("1"));
    }

    #[test]
    fn blank_values_are_not_registered() {
        let table = skill_table();
        let validator = compile(&table, 1).unwrap();
        assert!(check(validator.as_ref(), &table, &skill(1, "")).is_ok());
        assert!(check(validator.as_ref(), &table, &skill(2, "  ")).is_ok());
        assert!(table.codenames.is_empty());
    }

    #[test]
    fn quotes_are_stripped_once() {
        assert_eq!(strip_quotes("\"fire\""), "fire");
        assert_eq!(strip_quotes("\"\"fire\"\""), "\"fire\"");
        assert_eq!(strip_quotes("\"fire"), "\"fire");
        assert_eq!(strip_quotes("fire"), "fire");
    }

    #[test]
    fn keeps_table_list() {
        let validator = CodenameValidator {
            tables: parse_args("(TbSkill, TbBuff)"),
        };
        assert_eq!(validator.tables(), ["TbSkill", "TbBuff"]);
    }
}
