use indexmap::IndexMap;

use crate::TypeRef;

/// Discriminates the two operation declaration forms. Queries and mutations
/// carry exactly the same capabilities; the kind only matters to emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Query,
    Mutation,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Query => "query",
            OpKind::Mutation => "mutation",
        }
    }
}

/// A named definition: `name(args...): ReturnType`. The same grammar shape
/// serves as an operation signature and as a record field; the caller
/// decides where it lands, not the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef<'a> {
    pub name: &'a str,
    /// Parameters in declared order. Order is load-bearing: call sites are
    /// positional downstream.
    pub params: IndexMap<&'a str, TypeRef<'a>>,
    pub ret_type: TypeRef<'a>,
    pub stripped_ret: &'a str,
}

impl<'a> FieldDef<'a> {
    pub fn new(
        name: &'a str,
        params: IndexMap<&'a str, TypeRef<'a>>,
        ret_type: TypeRef<'a>,
    ) -> FieldDef<'a> {
        FieldDef {
            name,
            params,
            ret_type,
            stripped_ret: ret_type.name(),
        }
    }
}

/// A top-level `@query` or `@mutation` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation<'a> {
    pub kind: OpKind,
    pub name: &'a str,
    pub ret_type: TypeRef<'a>,
    pub stripped_ret: &'a str,
    /// Arguments in declared order.
    pub args: IndexMap<&'a str, TypeRef<'a>>,
    /// True iff the declaration carried the leading `+` auth marker.
    pub needs_auth: bool,
}

impl<'a> Operation<'a> {
    pub fn new(kind: OpKind, def: FieldDef<'a>, needs_auth: bool) -> Operation<'a> {
        Operation {
            kind,
            name: def.name,
            ret_type: def.ret_type,
            stripped_ret: def.stripped_ret,
            args: def.params,
            needs_auth,
        }
    }
}

/// Surface keyword a record was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Object,
    Input,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Object => "type",
            RecordKind::Input => "input",
        }
    }
}

/// A `type` or `input` declaration: a named, ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub name: &'a str,
    pub kind: RecordKind,
    pub fields: Vec<FieldDef<'a>>,
}

/// A `union` declaration. Members are bare type names in declared order; a
/// union never lists itself (rejected at build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union<'a> {
    pub name: &'a str,
    pub members: Vec<&'a str>,
}

/// An `enum` declaration: a named, ordered list of value names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum<'a> {
    pub name: &'a str,
    pub values: Vec<&'a str>,
}
