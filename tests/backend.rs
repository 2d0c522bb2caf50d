//! Tests for the reference template renderer.
mod common;
use ahash::AHashMap;
use common::*;
use dankai::error::BackendError;
use dankai::prelude::*;

fn render(template: &str, values: &[(&str, Value)]) -> std::result::Result<String, BackendError> {
    let context: AHashMap<String, Value> = values
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    ReferenceRenderer::default().render(template, &context)
}

#[test]
fn test_renders_compiled_template() {
    let template = Compiler::builder()
        .build()
        .compile(&[create_temperature_block()])
        .unwrap()
        .source;
    let renderer = ReferenceRenderer::default();

    let rendered = renderer.render(&template, &sample(&[("temp", "30")])).unwrap();
    assert_eq!(rendered, "cold\n");
    let rendered = renderer.render(&template, &sample(&[("temp", "60")])).unwrap();
    assert_eq!(rendered, "warm\n");
    let rendered = renderer.render(&template, &SampleData::new()).unwrap();
    assert_eq!(rendered, "unknown\n");
}

#[test]
fn test_text_outside_directives_is_verbatim() {
    let out = render("Hello\n  <% if (true) { %>there<% } %> !", &[]).unwrap();
    assert_eq!(out, "Hello\n  there !");
}

#[test]
fn test_slurping_tags_trim_lines() {
    let out = render("a\n   <%_ if (true) { _%>   \nb\n<%_ } _%>\nc", &[]).unwrap();
    assert_eq!(out, "a\nb\nc");
}

#[test]
fn test_nested_and_else_if_chains() {
    let template = "\
<%_ if (getvar('x') > 1) { _%>
<%_ if (getvar('y') === 'on') { _%>
both
<%_ } else { _%>
x only
<%_ } _%>
<%_ } else if (getvar('y') === 'on') { _%>
y only
<%_ } else { _%>
none
<%_ } _%>";
    let x = ("x", Value::Number(2.0));
    let on = ("y", Value::Text("on".to_string()));
    assert_eq!(render(template, &[x.clone(), on.clone()]).unwrap(), "both\n");
    assert_eq!(render(template, &[x]).unwrap(), "x only\n");
    assert_eq!(render(template, &[on]).unwrap(), "y only\n");
    assert_eq!(render(template, &[]).unwrap(), "none\n");
}

#[test]
fn test_comparison_semantics() {
    let check = |condition: &str, values: &[(&str, Value)]| {
        let template = format!("<% if ({condition}) {{ %>T<% }} else {{ %>F<% }} %>");
        render(&template, values).unwrap() == "T"
    };
    let n = |v: f64| ("v", Value::Number(v));
    let t = |s: &str| ("v", Value::Text(s.to_string()));

    assert!(check("getvar('v') == '7'", &[n(7.0)]));
    assert!(!check("getvar('v') === '7'", &[n(7.0)]));
    assert!(check("getvar('v') !== '7'", &[n(7.0)]));
    assert!(check("getvar('v') < ''", &[n(-1.0)]));
    assert!(check("getvar('v') > 'a'", &[t("b")]));
    assert!(!check("getvar('v') > 1", &[t("abc")]));
    assert!(!check("getvar('v') < 1", &[]));
    assert!(check("getvar('v') !== 1", &[]));
    assert!(check("getvar('v') >= 1e-7 && getvar('v') < 1e+21", &[n(1.0)]));
    assert!(check("(getvar('v') < 0) || (getvar('v') == 3)", &[n(3.0)]));
}

#[test]
fn test_escaped_paths_and_literals() {
    let template = r"<% if (getvar('it\'s') === 'a\\b') { %>yes<% } %>";
    let out = render(template, &[("it's", Value::Text(r"a\b".to_string()))]).unwrap();
    assert_eq!(out, "yes");
}

#[test]
fn test_unbalanced_directives_are_rejected() {
    assert!(matches!(
        render("<%_ if (true) { _%>open", &[]),
        Err(BackendError::UnbalancedDirective(_))
    ));
    assert!(matches!(
        render("<%_ } _%>", &[]),
        Err(BackendError::UnbalancedDirective(_))
    ));
    assert!(matches!(
        render("<% if (true) { %><% } else { %><% } else { %><% } %>", &[]),
        Err(BackendError::UnbalancedDirective(_))
    ));
}

#[test]
fn test_unsupported_code_is_rejected() {
    assert!(matches!(
        render("<%= getvar('x') %>", &[]),
        Err(BackendError::Syntax { .. })
    ));
    assert!(matches!(
        render("<% if (process.exit()) { %><% } %>", &[]),
        Err(BackendError::Syntax { .. }) | Err(BackendError::UnsupportedExpression(_))
    ));
    assert!(matches!(
        render("<% if (getvar('x') < 1 {", &[]),
        Err(BackendError::Syntax { .. })
    ));
}

#[test]
fn test_custom_accessor() {
    let renderer = ReferenceRenderer::new("state.get");
    let mut context = AHashMap::new();
    context.insert("hp".to_string(), Value::Number(3.0));
    // Dotted accessors are not identifiers, so they are rejected rather than misread.
    assert!(renderer.render("<% if (state.get('hp') > 1) { %>x<% } %>", &context).is_err());

    let renderer = ReferenceRenderer::new("read");
    let out = renderer.render("<% if (read('hp') > 1) { %>x<% } %>", &context).unwrap();
    assert_eq!(out, "x");
}
