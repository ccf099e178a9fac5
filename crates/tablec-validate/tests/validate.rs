//! Engine-level tests: custom validators, shared codename state and messages.

use std::sync::Arc;
use std::thread;

use tablec_model::{
    CompiledTable, DataValue, FieldDef, FieldType, Record, RecordType, ValidatorDecl,
};
use tablec_validate::{
    CollectingDiagnostics, CompileError, DataValidator, FailureKind, ValidationContext,
    ValidationEngine, ValidationFailure, ValidatorFactory, ValidatorRegistry, ValidatorTarget,
    parse_args,
};

fn monster_type() -> Arc<RecordType> {
    Arc::new(RecordType::new(
        "monster.Monster",
        vec![
            FieldDef::new("id", FieldType::Int),
            FieldDef::new("name", FieldType::String)
                .with_validator("codename(TbMonster)".parse::<ValidatorDecl>().unwrap()),
            FieldDef::new("element", FieldType::String)
                .with_validator("set[fire, water, earth]".parse::<ValidatorDecl>().unwrap()),
        ],
    ))
}

fn monster(id: i64, name: &str, element: &str) -> Record {
    Record::new(
        vec![
            DataValue::Int(id),
            DataValue::String(name.to_string()),
            DataValue::String(element.to_string()),
        ],
        "monster/#Monster.xlsx",
    )
}

#[test]
fn codename_collision_is_reported_not_fatal() {
    let record_type = monster_type();
    let table = CompiledTable::new("monster", "TbMonster", Arc::clone(&record_type));
    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::default().with_diagnostics(&sink);
    let compiled = engine.compile_record_type(&record_type).unwrap();

    let records = vec![
        monster(100, "slime_king", "water"),
        monster(101, "Slime King", "fire"),
        monster(102, "goblin", "air"),
    ];
    let report = engine.validate_table(&table, &compiled, &records).unwrap();

    assert_eq!(report.records_checked, 3);
    let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::CodenameCollision, FailureKind::NotInSet]);

    let collision = &report.failures[0];
    insta::assert_snapshot!(collision.to_string(), @r#"monster.TbMonster[101] (monster/#Monster.xlsx) field 'name' value "Slime King": codename 'SlimeKing' already used by record 100"#);

    assert_eq!(
        table.codenames.snapshot().into_iter().collect::<Vec<_>>(),
        vec![
            ("Goblin".to_string(), "102".to_string()),
            ("SlimeKing".to_string(), "100".to_string()),
        ]
    );

    let logged = sink.errors();
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0].field("record"), Some("monster.TbMonster[101]"));
    assert_eq!(logged[0].field("existing"), Some("100"));
}

#[test]
fn blank_index_uses_first_field_and_named_index_is_honored() {
    let record_type = Arc::new(RecordType::new(
        "npc.Npc",
        vec![
            FieldDef::new("alias", FieldType::String)
                .with_validator(ValidatorDecl::new("codename", "")),
            FieldDef::new("uid", FieldType::Int),
        ],
    ));
    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::default().with_diagnostics(&sink);
    let compiled = engine.compile_record_type(&record_type).unwrap();
    let records = vec![Record::new(
        vec![DataValue::String("old_man".to_string()), DataValue::Int(7)],
        "npc.csv",
    )];

    let by_first = CompiledTable::new("npc", "TbNpc", Arc::clone(&record_type));
    engine.validate_table(&by_first, &compiled, &records).unwrap();
    assert_eq!(by_first.codenames.get("OldMan").as_deref(), Some("old_man"));

    let by_uid = CompiledTable::new("npc", "TbNpc", Arc::clone(&record_type)).with_index("uid");
    engine.validate_table(&by_uid, &compiled, &records).unwrap();
    assert_eq!(by_uid.codenames.get("OldMan").as_deref(), Some("7"));
}

#[test]
fn concurrent_validation_has_exactly_one_winner() {
    const THREADS: i64 = 8;

    let record_type = monster_type();
    let table = CompiledTable::new("monster", "TbMonster", Arc::clone(&record_type));
    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::default().with_diagnostics(&sink);
    let compiled = engine.compile_record_type(&record_type).unwrap();

    let batches: Vec<Vec<Record>> = (0..THREADS)
        .map(|i| vec![monster(i, "dragon", "fire")])
        .collect();

    let failures: usize = thread::scope(|scope| {
        let handles: Vec<_> = batches
            .iter()
            .map(|batch| {
                let (engine, table, compiled) = (&engine, &table, &compiled);
                scope.spawn(move || {
                    engine
                        .validate_table(table, compiled, batch)
                        .unwrap()
                        .failures
                        .len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(failures, (THREADS - 1) as usize);
    assert_eq!(table.codenames.len(), 1);
    let winner = table.codenames.get("Dragon").unwrap();
    assert!((0..THREADS).any(|i| i.to_string() == winner));
}

/// Rejects values longer than a limit given as the only argument.
struct MaxLenFactory;

#[derive(Debug)]
struct MaxLen(usize);

impl ValidatorFactory for MaxLenFactory {
    fn tag(&self) -> &'static str {
        "maxlen"
    }

    fn compile(
        &self,
        target: &ValidatorTarget<'_>,
        raw_args: &str,
    ) -> Result<Box<dyn DataValidator>, CompileError> {
        let args = parse_args(raw_args);
        let limit = args
            .first()
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| target.error("maxlen", "expected a length"))?;
        Ok(Box::new(MaxLen(limit)))
    }
}

impl DataValidator for MaxLen {
    fn tag(&self) -> &'static str {
        "maxlen"
    }

    fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        _field_type: &FieldType,
        value: &DataValue,
    ) -> Result<(), ValidationFailure> {
        match value.as_str() {
            Some(text) if text.chars().count() > self.0 => Err(ctx.failure(
                "maxlen",
                FailureKind::OutOfRange,
                value,
                format!("longer than {}", self.0),
            )),
            _ => Ok(()),
        }
    }
}

#[test]
fn custom_validators_plug_into_the_registry() {
    let mut registry = ValidatorRegistry::with_builtins();
    registry.register(Box::new(MaxLenFactory));
    assert_eq!(registry.len(), 4);

    let record_type = Arc::new(RecordType::new(
        "item.Item",
        vec![
            FieldDef::new("id", FieldType::Int),
            FieldDef::new("title", FieldType::String)
                .with_validator(ValidatorDecl::new("maxlen", "(4)")),
        ],
    ));
    let table = CompiledTable::new("item", "TbItem", Arc::clone(&record_type));
    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::new(&registry).with_diagnostics(&sink);
    let compiled = engine.compile_record_type(&record_type).unwrap();

    let records = vec![
        Record::new(vec![DataValue::Int(1), DataValue::String("axe".into())], "item.csv"),
        Record::new(vec![DataValue::Int(2), DataValue::String("halberd".into())], "item.csv"),
    ];
    let report = engine.validate_table(&table, &compiled, &records).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].record_path, "item.TbItem[2]");
    assert_eq!(report.failures[0].message, "longer than 4");
}

#[test]
fn validate_tables_compiles_each_record_type_once() {
    let record_type = monster_type();
    let north = CompiledTable::new("monster", "TbNorth", Arc::clone(&record_type));
    let south = CompiledTable::new("monster", "TbSouth", Arc::clone(&record_type));
    let north_records = vec![monster(1, "yeti", "water")];
    let south_records = vec![monster(1, "yeti", "earth"), monster(2, "Yeti", "earth")];

    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::default().with_diagnostics(&sink);
    let report = engine
        .validate_tables([
            (&north, north_records.as_slice()),
            (&south, south_records.as_slice()),
        ])
        .unwrap();

    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.records_checked(), 3);
    // Codename state is per table.
    assert!(report.tables[0].is_clean());
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.tables[1].table, "monster.TbSouth");
}

fn item_type(fields: Vec<FieldDef>) -> Arc<RecordType> {
    Arc::new(RecordType::new("item.Item", fields))
}

#[test]
fn same_named_record_types_with_other_fields_compile_separately() {
    let wide = item_type(vec![
        FieldDef::new("id", FieldType::Int),
        FieldDef::new("name", FieldType::String),
        FieldDef::new("weight", FieldType::Int).with_validator(ValidatorDecl::new("range", "(0, 10)")),
    ]);
    let narrow = item_type(vec![
        FieldDef::new("id", FieldType::Int),
        FieldDef::new("name", FieldType::String),
    ]);
    let heavy = CompiledTable::new("item", "TbHeavy", Arc::clone(&wide));
    let light = CompiledTable::new("item", "TbLight", Arc::clone(&narrow));
    let heavy_records = vec![Record::new(
        vec![DataValue::Int(1), DataValue::String("anvil".into()), DataValue::Int(50)],
        "item/heavy.csv",
    )];
    let light_records = vec![Record::new(
        vec![DataValue::Int(2), DataValue::String("feather".into())],
        "item/light.csv",
    )];

    let sink = CollectingDiagnostics::new();
    let engine = ValidationEngine::default().with_diagnostics(&sink);
    let report = engine
        .validate_tables([
            (&heavy, heavy_records.as_slice()),
            (&light, light_records.as_slice()),
        ])
        .unwrap();

    assert_eq!(report.records_checked(), 2);
    assert_eq!(report.tables[0].failures.len(), 1);
    assert_eq!(report.tables[0].failures[0].kind, FailureKind::OutOfRange);
    assert!(report.tables[1].is_clean());
}

#[test]
fn validators_compiled_for_another_shape_are_rejected() {
    let wide = item_type(vec![
        FieldDef::new("id", FieldType::Int),
        FieldDef::new("weight", FieldType::Int).with_validator(ValidatorDecl::new("range", "(0, 10)")),
    ]);
    let narrow = item_type(vec![FieldDef::new("id", FieldType::Int)]);
    let table = CompiledTable::new("item", "TbItem", Arc::clone(&narrow));
    let engine = ValidationEngine::default();
    let compiled = engine.compile_record_type(&wide).unwrap();

    let records = vec![Record::new(vec![DataValue::Int(1)], "item.csv")];
    let err = engine.validate_table(&table, &compiled, &records).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"table item.TbItem stores item.Item(id) records, validators were compiled for item.Item(id, weight)");
}
