//! JavaScript client-call emitters.
//!
//! Both emitters are pure formatting over an already-validated [`Schema`]:
//! [`operation_consts`] renders one GraphQL document constant per operation,
//! [`call_functions`] renders one `sendGQL`-wrapping arrow function per
//! operation. Neither parses nor performs I/O.

use heck::{ToShoutySnakeCase, ToUpperCamelCase};
use indexmap::IndexMap;

use crate::{is_scalar, Operation, Schema, TypeRef};

use super::CodeWriter;

/// One `const <SHOUTY_NAME> = \`...\`;` GraphQL document per operation,
/// queries first, blank lines between.
pub fn operation_consts(schema: &Schema<'_>) -> String {
    let consts: Vec<String> = schema
        .all_operations()
        .map(|op| operation_const(schema, op))
        .collect();
    consts.join("\n")
}

/// One `const <name> = (vars...) => sendGQL({...});` per operation,
/// queries first, blank lines between. Auth-flagged operations take a
/// trailing `auth` parameter and forward it as `auth: auth`.
pub fn call_functions(schema: &Schema<'_>) -> String {
    let funcs: Vec<String> = schema
        .all_operations()
        .map(|op| call_function(schema, op))
        .collect();
    funcs.join("\n")
}

fn operation_const(schema: &Schema<'_>, op: &Operation<'_>) -> String {
    let variables = schema.all_variables_for_operation(op.name);
    let mut w = CodeWriter::new();
    w.open(&format!("const {} = `", op.name.to_shouty_snake_case()));
    w.open(&format!(
        "{} {}{} {{",
        op.kind.as_str(),
        op.name.to_upper_camel_case(),
        variable_params(&variables)
    ));
    let label = format!("{}{}", op.name, forwarded_args(&op.args));
    let mut path = Vec::new();
    write_selection(schema, &mut w, &label, op.stripped_ret, &mut path);
    w.close("}");
    w.close("`;");
    w.finish()
}

fn call_function(schema: &Schema<'_>, op: &Operation<'_>) -> String {
    let variables = schema.all_variables_for_operation(op.name);
    let mut params: Vec<&str> = variables.keys().copied().collect();
    if op.needs_auth {
        params.push("auth");
    }
    let mut w = CodeWriter::new();
    w.open(&format!(
        "const {} = ({}) => sendGQL({{",
        op.name,
        params.join(", ")
    ));
    let more_entries = !variables.is_empty() || op.needs_auth;
    w.line(&format!(
        "query: {}{}",
        op.name.to_shouty_snake_case(),
        if more_entries { "," } else { "" }
    ));
    if !variables.is_empty() {
        w.open("variables: {");
        let last = variables.len() - 1;
        for (index, name) in variables.keys().enumerate() {
            let comma = if index < last { "," } else { "" };
            w.line(&format!("{}: {}{}", name, name, comma));
        }
        w.close(if op.needs_auth { "}," } else { "}" });
    }
    if op.needs_auth {
        w.line("auth: auth");
    }
    w.close("});");
    w.finish()
}

/// The selection set for one field, recursing through union members and
/// record fields. Scalars and enums are leaves. `path` holds the records
/// currently being expanded: a selection set over a cyclic record graph is
/// unrepresentable, so a re-entrant type is cut off as a bare field.
fn write_selection<'a>(
    schema: &Schema<'a>,
    w: &mut CodeWriter,
    label: &str,
    stripped: &'a str,
    path: &mut Vec<&'a str>,
) {
    if is_leaf(schema, stripped) || path.contains(&stripped) {
        w.line(label);
        return;
    }
    let union = schema.find_union(stripped);
    let record = schema.find_type(stripped);
    if union.is_none() && record.is_none() {
        // cannot happen after validation; keep the field bare
        w.line(label);
        return;
    }
    w.open(&format!("{} {{", label));
    path.push(stripped);
    if let Some(union) = union {
        for &member in &union.members {
            write_selection(schema, w, &format!("... on {}", member), member, path);
        }
    }
    if let Some(record) = record {
        for field in &record.fields {
            let label = format!("{}{}", field.name, forwarded_args(&field.params));
            write_selection(schema, w, &label, field.stripped_ret, path);
        }
    }
    path.pop();
    w.close("}");
}

fn is_leaf(schema: &Schema<'_>, name: &str) -> bool {
    is_scalar(name) || schema.find_enum(name).is_some()
}

/// `($a: T1, $b: T2)` over the hoisted variable map; empty when there are
/// no variables.
fn variable_params(variables: &IndexMap<&str, TypeRef<'_>>) -> String {
    if variables.is_empty() {
        return String::new();
    }
    let params: Vec<String> = variables
        .iter()
        .map(|(name, type_ref)| format!("${}: {}", name, type_ref.as_str()))
        .collect();
    format!("({})", params.join(", "))
}

/// `(a: $a, b: $b)` argument forwarding; empty when there are no arguments.
fn forwarded_args(args: &IndexMap<&str, TypeRef<'_>>) -> String {
    if args.is_empty() {
        return String::new();
    }
    let args: Vec<String> = args.keys().map(|name| format!("{}: ${}", name, name)).collect();
    format!("({})", args.join(", "))
}
