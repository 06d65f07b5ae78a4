//! Schema accumulation, validation, and the frozen query API.
//!
//! Declarations arrive from the parser in any order; [`SchemaBuilder::build`]
//! checks them against each other and freezes the result. A [`Schema`] is
//! built exactly once and never mutated, so it is safe to share and query
//! from anywhere afterwards.

use fnv::FnvHashSet;
use indexmap::IndexMap;
use thiserror::Error as ThisError;

use crate::{is_scalar, Enum, Operation, Record, TypeRef, Union};

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("name {name:?} is declared more than once across type, union, and enum declarations")]
    NameCollision { name: String },

    #[error("type reference {reference:?} (stripped: {stripped:?}) does not name a scalar or a declared type")]
    UnresolvedType { reference: String, stripped: String },

    #[error("union {name:?} lists itself as a member")]
    SelfReferentialUnion { name: String },
}

/// The frozen, fully validated schema graph: five name-indexed maps, each
/// preserving declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema<'a> {
    queries: IndexMap<&'a str, Operation<'a>>,
    mutations: IndexMap<&'a str, Operation<'a>>,
    types: IndexMap<&'a str, Record<'a>>,
    unions: IndexMap<&'a str, Union<'a>>,
    enums: IndexMap<&'a str, Enum<'a>>,
}

impl<'a> Schema<'a> {
    pub fn builder() -> SchemaBuilder<'a> {
        SchemaBuilder::default()
    }

    /// Every query, then every mutation, each in declaration order. The
    /// iterator borrows the schema; calling again restarts it.
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation<'a>> + '_ {
        self.queries.values().chain(self.mutations.values())
    }

    pub fn find_operation(&self, name: &str) -> Option<&Operation<'a>> {
        self.queries.get(name).or_else(|| self.mutations.get(name))
    }

    /// Exact lookup. Absence is an expected branch - a return type may name
    /// a union or an enum instead of a record.
    pub fn find_type(&self, name: &str) -> Option<&Record<'a>> {
        self.types.get(name)
    }

    pub fn find_union(&self, name: &str) -> Option<&Union<'a>> {
        self.unions.get(name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&Enum<'a>> {
        self.enums.get(name)
    }

    /// The transitive set of variables needed to invoke an operation: its
    /// own arguments, plus every parameter attached to any field reachable
    /// from its return type through record-field and union-member edges,
    /// depth-first, fields in declared order.
    ///
    /// A name reached more than once collapses to a single entry: first
    /// position, last visited value. Nothing here rejects a schema that
    /// reuses one parameter name with conflicting types in the same result
    /// graph - the last call site wins.
    ///
    /// An unknown operation name yields an empty map.
    pub fn all_variables_for_operation(&self, name: &str) -> IndexMap<&'a str, TypeRef<'a>> {
        let mut variables = IndexMap::new();
        let operation = match self.find_operation(name) {
            Some(operation) => operation,
            None => return variables,
        };
        for (arg, type_ref) in &operation.args {
            variables.insert(*arg, *type_ref);
        }
        let mut visited = FnvHashSet::default();
        self.type_variables(operation.stripped_ret, &mut variables, &mut visited);
        self.union_variables(operation.stripped_ret, &mut variables, &mut visited);
        variables
    }

    fn type_variables(
        &self,
        name: &str,
        variables: &mut IndexMap<&'a str, TypeRef<'a>>,
        visited: &mut FnvHashSet<&'a str>,
    ) {
        let record = match self.types.get(name) {
            Some(record) => record,
            None => return,
        };
        if !visited.insert(record.name) {
            // already collected; guards cyclic record graphs
            return;
        }
        for field in &record.fields {
            for (param, type_ref) in &field.params {
                variables.insert(*param, *type_ref);
            }
            self.type_variables(field.stripped_ret, variables, visited);
            self.union_variables(field.stripped_ret, variables, visited);
        }
    }

    fn union_variables(
        &self,
        name: &str,
        variables: &mut IndexMap<&'a str, TypeRef<'a>>,
        visited: &mut FnvHashSet<&'a str>,
    ) {
        let union = match self.unions.get(name) {
            Some(union) => union,
            None => return,
        };
        for &member in &union.members {
            self.type_variables(member, variables, visited);
        }
    }
}

/// Accumulates declarations of any kind, in any order, across repeated
/// calls; [`build`](SchemaBuilder::build) validates the whole set and
/// freezes it. Validation is a pure function of the accumulated
/// declarations - nothing is checked before `build`.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder<'a> {
    queries: Vec<Operation<'a>>,
    mutations: Vec<Operation<'a>>,
    types: Vec<Record<'a>>,
    unions: Vec<Union<'a>>,
    enums: Vec<Enum<'a>>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new() -> SchemaBuilder<'a> {
        SchemaBuilder::default()
    }

    pub fn append_query(&mut self, operation: Operation<'a>) -> &mut Self {
        self.queries.push(operation);
        self
    }

    pub fn append_mutation(&mut self, operation: Operation<'a>) -> &mut Self {
        self.mutations.push(operation);
        self
    }

    pub fn append_record(&mut self, record: Record<'a>) -> &mut Self {
        self.types.push(record);
        self
    }

    pub fn append_union(&mut self, union: Union<'a>) -> &mut Self {
        self.unions.push(union);
        self
    }

    pub fn append_enum(&mut self, decl: Enum<'a>) -> &mut Self {
        self.enums.push(decl);
        self
    }

    pub fn build(self) -> Result<Schema<'a>, SchemaError> {
        let mut declared = FnvHashSet::default();
        for name in self.declared_names() {
            if !declared.insert(name) {
                return Err(SchemaError::NameCollision {
                    name: name.to_owned(),
                });
            }
        }

        for reference in self.references() {
            let stripped = reference.name();
            if !is_scalar(stripped) && !declared.contains(stripped) {
                return Err(SchemaError::UnresolvedType {
                    reference: reference.as_str().to_owned(),
                    stripped: stripped.to_owned(),
                });
            }
        }

        for union in &self.unions {
            if union.members.contains(&union.name) {
                return Err(SchemaError::SelfReferentialUnion {
                    name: union.name.to_owned(),
                });
            }
        }

        Ok(Schema {
            queries: self.queries.into_iter().map(|q| (q.name, q)).collect(),
            mutations: self.mutations.into_iter().map(|m| (m.name, m)).collect(),
            types: self.types.into_iter().map(|t| (t.name, t)).collect(),
            unions: self.unions.into_iter().map(|u| (u.name, u)).collect(),
            enums: self.enums.into_iter().map(|e| (e.name, e)).collect(),
        })
    }

    /// Type, union, and enum names share one namespace.
    fn declared_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        let types = self.types.iter().map(|t| t.name);
        let unions = self.unions.iter().map(|u| u.name);
        let enums = self.enums.iter().map(|e| e.name);
        types.chain(unions).chain(enums)
    }

    /// Every type reference that must resolve: operation argument and
    /// return types, record field argument and return types, union member
    /// names.
    fn references(&self) -> impl Iterator<Item = TypeRef<'a>> + '_ {
        let operations = self.queries.iter().chain(self.mutations.iter());
        let operation_refs = operations.flat_map(|op| {
            op.args
                .values()
                .copied()
                .chain(std::iter::once(op.ret_type))
        });
        let field_refs = self.types.iter().flat_map(|record| {
            record.fields.iter().flat_map(|field| {
                field
                    .params
                    .values()
                    .copied()
                    .chain(std::iter::once(field.ret_type))
            })
        });
        let member_refs = self
            .unions
            .iter()
            .flat_map(|union| union.members.iter().copied().map(TypeRef));
        operation_refs.chain(field_refs).chain(member_refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_schema, Error, OpKind};

    fn schema(text: &str) -> Schema<'_> {
        parse_schema(text).unwrap()
    }

    fn schema_err(text: &str) -> SchemaError {
        match parse_schema(text) {
            Err(Error::Schema(e)) => e,
            other => panic!("expected a schema error, got: {:?}", other),
        }
    }

    const HOTS: &str = "\
@query hots: HotsResult!
union HotsResult = Error | Hots
type Hots { hots: [HotItem!]! }
type Error { message: String! }
type HotItem { id: ID! title: String! }
";

    #[test]
    fn name_collision_across_kinds() {
        let err = schema_err("type Foo { a: Int }\nenum Foo { a }");
        assert_eq!(
            err,
            SchemaError::NameCollision {
                name: "Foo".to_string()
            }
        );
    }

    #[test]
    fn name_collision_between_type_and_union() {
        let err = schema_err("type Foo { a: Int }\nunion Foo = Bar\ntype Bar { b: Int }");
        assert_eq!(
            err,
            SchemaError::NameCollision {
                name: "Foo".to_string()
            }
        );
    }

    #[test]
    fn duplicate_type_names_collide() {
        let err = schema_err("type Foo { a: Int }\ntype Foo { b: Int }");
        assert_eq!(
            err,
            SchemaError::NameCollision {
                name: "Foo".to_string()
            }
        );
    }

    #[test]
    fn unresolved_operation_return_type() {
        let err = schema_err("@query broken: Bar!");
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                reference: "Bar!".to_string(),
                stripped: "Bar".to_string(),
            }
        );
    }

    #[test]
    fn unresolved_operation_argument_type() {
        let err = schema_err("@query q(input: Missing!): String!");
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                reference: "Missing!".to_string(),
                stripped: "Missing".to_string(),
            }
        );
    }

    #[test]
    fn unresolved_record_field_type() {
        let err = schema_err("type Foo { a: Missing }");
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                reference: "Missing".to_string(),
                stripped: "Missing".to_string(),
            }
        );
    }

    #[test]
    fn unresolved_union_member() {
        let err = schema_err("union U = Ghost");
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                reference: "Ghost".to_string(),
                stripped: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn wrapped_scalar_references_resolve() {
        let s = schema("@query ids: [[ID!]!]!\ntype T { flags: [Boolean!] longs: Long! }");
        assert!(s.find_type("T").is_some());
    }

    #[test]
    fn self_referential_union_is_rejected() {
        let err = schema_err("union X = X | Y\ntype Y { a: Int }");
        assert_eq!(
            err,
            SchemaError::SelfReferentialUnion {
                name: "X".to_string()
            }
        );
    }

    #[test]
    fn end_to_end_hots_schema() {
        let s = schema(HOTS);

        let operations: Vec<&Operation<'_>> = s.all_operations().collect();
        assert_eq!(operations.len(), 1);
        let hots = operations[0];
        assert_eq!(hots.kind, OpKind::Query);
        assert_eq!(hots.name, "hots");
        assert_eq!(hots.ret_type, TypeRef("HotsResult!"));
        assert_eq!(hots.stripped_ret, "HotsResult");
        assert!(!hots.needs_auth);

        let union = s.find_union("HotsResult").unwrap();
        assert_eq!(union.members, vec!["Error", "Hots"]);

        assert_eq!(s.types.len(), 3);
        let type_names: Vec<&str> = s.types.keys().copied().collect();
        assert_eq!(type_names, vec!["Hots", "Error", "HotItem"]);

        assert!(s.all_variables_for_operation("hots").is_empty());
    }

    #[test]
    fn operations_iterate_queries_then_mutations() {
        let s = schema(
            "@mutation m1: Int\n@query q1: Int\n@mutation m2: Int\n@query q2: Int",
        );
        let names: Vec<&str> = s.all_operations().map(|op| op.name).collect();
        assert_eq!(names, vec!["q1", "q2", "m1", "m2"]);
    }

    #[test]
    fn iteration_order_is_deterministic_across_parses() {
        let first = schema(HOTS);
        let second = schema(HOTS);
        assert_eq!(first, second);
        let first_types: Vec<&str> = first.types.keys().copied().collect();
        let second_types: Vec<&str> = second.types.keys().copied().collect();
        assert_eq!(first_types, second_types);
        let first_ops: Vec<&str> = first.all_operations().map(|op| op.name).collect();
        let second_ops: Vec<&str> = second.all_operations().map(|op| op.name).collect();
        assert_eq!(first_ops, second_ops);
    }

    #[test]
    fn variables_are_operation_args_in_order() {
        let s = schema("+@mutation login(username: String!, password: String!): String!");
        let variables = s.all_variables_for_operation("login");
        let entries: Vec<(&str, TypeRef<'_>)> =
            variables.iter().map(|(n, t)| (*n, *t)).collect();
        assert_eq!(
            entries,
            vec![
                ("username", TypeRef("String!")),
                ("password", TypeRef("String!")),
            ]
        );
    }

    #[test]
    fn variables_include_reachable_field_params() {
        let s = schema(
            "@query search(q: String!): SearchResult!\n\
             type SearchResult { items(page: Int!, size: Int!): [Item!]! total: Int! }\n\
             type Item { id: ID! }",
        );
        let variables = s.all_variables_for_operation("search");
        let names: Vec<&str> = variables.keys().copied().collect();
        assert_eq!(names, vec!["q", "page", "size"]);
        assert_eq!(variables.get("page"), Some(&TypeRef("Int!")));
    }

    #[test]
    fn variables_traverse_union_members() {
        let s = schema(
            "@query feed: FeedResult!\n\
             union FeedResult = Error | Feed\n\
             type Error { message: String! }\n\
             type Feed { entries(limit: Int!): [Entry!]! }\n\
             type Entry { id: ID! }",
        );
        let variables = s.all_variables_for_operation("feed");
        let names: Vec<&str> = variables.keys().copied().collect();
        assert_eq!(names, vec!["limit"]);
    }

    #[test]
    fn reused_variable_name_collapses_last_value_first_position() {
        let s = schema(
            "@query q: Outer!\n\
             type Outer { a(page: Int!): Inner! b: Int }\n\
             type Inner { c(page: Long!): Int }",
        );
        let variables = s.all_variables_for_operation("q");
        let entries: Vec<(&str, TypeRef<'_>)> =
            variables.iter().map(|(n, t)| (*n, *t)).collect();
        // one entry, first position, last visited value
        assert_eq!(entries, vec![("page", TypeRef("Long!"))]);
    }

    #[test]
    fn variables_terminate_on_cyclic_records() {
        let s = schema(
            "@query q(start: ID!): A!\n\
             type A { b(x: Int!): B! }\n\
             type B { a(y: Int!): A! }",
        );
        let variables = s.all_variables_for_operation("q");
        let names: Vec<&str> = variables.keys().copied().collect();
        assert_eq!(names, vec!["start", "x", "y"]);
    }

    #[test]
    fn unknown_operation_yields_empty_map() {
        let s = schema(HOTS);
        assert!(s.all_variables_for_operation("nope").is_empty());
    }

    #[test]
    fn builder_accepts_declarations_in_any_order() {
        let mut builder = Schema::builder();
        builder
            .append_union(Union {
                name: "U",
                members: vec!["T"],
            })
            .append_enum(Enum {
                name: "E",
                values: vec!["a", "b"],
            });
        builder.append_record(Record {
            name: "T",
            kind: crate::RecordKind::Object,
            fields: vec![crate::FieldDef::new(
                "x",
                IndexMap::new(),
                TypeRef("Int"),
            )],
        });
        let s = builder.build().unwrap();
        assert!(s.find_union("U").is_some());
        assert!(s.find_enum("E").is_some());
        assert!(s.find_type("T").is_some());
    }

    #[test]
    fn enum_references_resolve() {
        let s = schema("@query alignment: Align!\nenum Align { start center end }");
        let op = s.find_operation("alignment").unwrap();
        assert_eq!(op.stripped_ret, "Align");
        assert!(s.find_enum("Align").is_some());
    }
}
