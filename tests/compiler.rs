//! Tests for template generation.
mod common;
use common::*;
use dankai::compiler::{ALWAYS_TRUE, compile_condition};
use dankai::model::{Condition, ConditionGroup, ConditionOperator, LogicBlock, Stage};
use dankai::prelude::*;

const TEMPERATURE_TEMPLATE: &str = "\
<%_ if (getvar('stat_data.temp') < 50) { _%>
cold
<%_ } else if (getvar('stat_data.temp') >= 50) { _%>
warm
<%_ } else { _%>
unknown
<%_ } _%>";

#[test]
fn test_compile_if_else_chain() {
    let compiler = Compiler::builder().build();
    let compiled = compiler.compile(&[create_temperature_block()]).unwrap();
    assert_eq!(compiled.source, TEMPERATURE_TEMPLATE);
    assert_eq!(compiled.blocks.len(), 1);
    assert_eq!(compiled.blocks[0].block_id, "weather");
}

#[test]
fn test_compilation_is_deterministic() {
    let compiler = Compiler::builder().build();
    let blocks = vec![create_temperature_block(), create_two_group_block()];
    let first = compiler.compile(&blocks).unwrap();
    let second = compiler.compile(&blocks).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_blocks_are_separated_by_blank_line() {
    let compiler = Compiler::builder().build();
    let compiled = compiler
        .compile(&[create_temperature_block(), create_two_group_block()])
        .unwrap();
    assert!(compiled.source.contains("<%_ } _%>\n\n<%_ if ("));
    assert!(!compiled.source.ends_with('\n'));
}

#[test]
fn test_multiple_groups_are_parenthesized() {
    let compiler = Compiler::builder().build();
    let compiled = compiler.compile(&[create_two_group_block()]).unwrap();
    assert!(compiled.source.starts_with(
        "<%_ if ((getvar('stat_data.mood') == 'a') || (getvar('stat_data.mood') === 'b')) { _%>\n"
    ));
}

#[test]
fn test_empty_groups_are_dropped() {
    let block = LogicBlock::new("b", "B").with_stage(
        Stage::new("s", "S", "x")
            .with_group(ConditionGroup::new("empty", vec![]))
            .with_group(ConditionGroup::new(
                "real",
                vec![Condition::new("hp", ConditionOperator::Greater, "3")],
            )),
    );
    let compiled = Compiler::builder().build().compile(&[block]).unwrap();
    assert!(compiled.source.starts_with("<%_ if (getvar('stat_data.hp') > 3) { _%>\n"));
}

#[test]
fn test_stage_without_conditions_is_always_true() {
    let block = LogicBlock::new("b", "B")
        .with_stage(Stage::new("s", "S", "x"))
        .with_default("d");
    let compiled = Compiler::builder().build().compile(&[block]).unwrap();
    assert!(compiled.source.starts_with("<%_ if (true) { _%>\n"));
}

#[test]
fn test_unknown_operator_compiles_to_true() {
    let condition: Condition = serde_json::from_str(
        r#"{"variablePath": "hp", "type": "approximately", "value": "3"}"#,
    )
    .unwrap();
    assert_eq!(condition.operator, ConditionOperator::Unknown);
    assert_eq!(compile_condition(&condition, &TemplateConfig::default()), ALWAYS_TRUE);

    let block = LogicBlock::new("b", "B").with_stage(stage(
        "s",
        "x",
        vec![condition, Condition::new("hp", ConditionOperator::Less, "9")],
    ));
    let compiled = Compiler::builder().build().compile(&[block]).unwrap();
    assert!(compiled.source.starts_with("<%_ if (getvar('stat_data.hp') < 9) { _%>\n"));
}

#[test]
fn test_operator_shapes() {
    let config = TemplateConfig::default();
    let cases = [
        (ConditionOperator::Less, "getvar('stat_data.x') < 5"),
        (ConditionOperator::LessEqual, "getvar('stat_data.x') <= 5"),
        (ConditionOperator::Equal, "getvar('stat_data.x') == 5"),
        (ConditionOperator::Greater, "getvar('stat_data.x') > 5"),
        (ConditionOperator::GreaterEqual, "getvar('stat_data.x') >= 5"),
        (ConditionOperator::Is, "getvar('stat_data.x') === 5"),
        (ConditionOperator::IsNot, "getvar('stat_data.x') !== 5"),
    ];
    for (operator, expected) in cases {
        let condition = Condition::new("x", operator, "5");
        assert_eq!(compile_condition(&condition, &config), expected, "{operator:?}");
    }

    let range = Condition::range("x", "10", "20");
    assert_eq!(
        compile_condition(&range, &config),
        "getvar('stat_data.x') >= 10 && getvar('stat_data.x') < 20"
    );
}

#[test]
fn test_range_without_end_value_uses_empty_string() {
    let mut range = Condition::range("x", "10", "20");
    range.end_value = None;
    assert_eq!(
        compile_condition(&range, &TemplateConfig::default()),
        "getvar('stat_data.x') >= 10 && getvar('stat_data.x') < ''"
    );
}

#[test]
fn test_operands_are_quoted_unless_canonical() {
    let config = TemplateConfig::default();
    let compile = |value: &str| compile_condition(&Condition::new("x", ConditionOperator::Equal, value), &config);
    assert_eq!(compile("007"), "getvar('stat_data.x') == '007'");
    assert_eq!(compile("2.5"), "getvar('stat_data.x') == 2.5");
    assert_eq!(compile("it's"), r"getvar('stat_data.x') == 'it\'s'");
    assert_eq!(compile(""), "getvar('stat_data.x') == ''");
}

#[test]
fn test_non_ascii_operands_compile_as_strings() {
    let block = LogicBlock::new("mood", "心情")
        .with_stage(stage(
            "happy",
            "笑顔",
            vec![Condition::new("心情", ConditionOperator::Is, "开心")],
        ))
        .with_stage(stage(
            "other",
            "…",
            vec![Condition::range("x", "aé", "0é")],
        ))
        .with_default("默认");
    let compiled = Compiler::builder().build().compile(&[block]).unwrap();
    assert_eq!(
        compiled.source,
        "<%_ if (getvar('stat_data.心情') === '开心') { _%>\n笑顔\n\
         <%_ } else if (getvar('stat_data.x') >= 'aé' && getvar('stat_data.x') < '0é') { _%>\n…\n\
         <%_ } else { _%>\n默认\n<%_ } _%>"
    );
}

#[test]
fn test_content_whitespace_is_normalized() {
    let block = LogicBlock::new("b", "B")
        .with_stage(stage("s", "line one\n  line two  \n\n\t", vec![]))
        .with_default("");
    let compiled = Compiler::builder().build().compile(&[block]).unwrap();
    assert_eq!(
        compiled.source,
        "<%_ if (true) { _%>\nline one\n  line two\n<%_ } else { _%>\n<%_ } _%>"
    );
}

#[test]
fn test_empty_content_placeholder() {
    let block = LogicBlock::new("b", "B").with_stage(stage("s", "", vec![]));
    let compiler = Compiler::builder()
        .with_empty_content_placeholder("<!-- empty -->")
        .build();
    let compiled = compiler.compile(&[block]).unwrap();
    assert_eq!(
        compiled.source,
        "<%_ if (true) { _%>\n<!-- empty -->\n<%_ } else { _%>\n<!-- empty -->\n<%_ } _%>"
    );
}

#[test]
fn test_inactive_blocks_contribute_nothing() {
    let compiler = Compiler::builder().build();
    let disabled = create_temperature_block().disabled();
    let empty = LogicBlock::new("empty", "Empty").with_default("never shown");
    let compiled = compiler.compile(&[disabled, empty]).unwrap();
    assert_eq!(compiled.source, "");
    assert!(compiled.blocks.is_empty());

    let compiled = compiler
        .compile(&[LogicBlock::new("empty", "Empty"), create_temperature_block()])
        .unwrap();
    assert_eq!(compiled.source, TEMPERATURE_TEMPLATE);
}

#[test]
fn test_custom_accessor_and_prefix() {
    let compiler = Compiler::builder()
        .with_accessor("state.get")
        .with_path_prefix("")
        .build();
    let compiled = compiler.compile(&[create_temperature_block()]).unwrap();
    assert!(compiled.source.starts_with("<%_ if (state.get('temp') < 50) { _%>"));
}

#[test]
fn test_duplicate_stage_ids_are_rejected() {
    let block = LogicBlock::new("b", "B")
        .with_stage(stage("same", "one", vec![]))
        .with_stage(stage("same", "two", vec![]));
    let err = Compiler::builder().build().compile(&[block]).unwrap_err();
    assert_eq!(
        err,
        CompileError::DuplicateStageId {
            block_id: "b".to_string(),
            stage_id: "same".to_string(),
        }
    );
}
