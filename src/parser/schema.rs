use std::cell::Cell;

use indexmap::IndexMap;

use crate::{
    Enum, Error, FieldDef, Lexer, OpKind, Operation, Record, RecordKind, Schema, SchemaBuilder,
    Token, TokenValue, TypeRef, Union,
};

use super::error::ParserError;

use TokenValue::*;

type Res<T> = std::result::Result<T, ParserError>;

macro_rules! required {
    ($p:expr, $val:pat, $message:expr) => {{
        match $p.next() {
            ok_tok @ Ok(crate::Token { val: $val, .. }) => ok_tok,
            Ok(tok) => Err(ParserError::syntax(tok, $message)),
            Err(e) => Err(e),
        }
    }};
}

macro_rules! optional {
    ($p:expr, $val:pat) => {{
        match $p.peek() {
            Ok(tok @ crate::Token { val: $val, .. }) => {
                _ = $p.next();
                Some(tok)
            }
            _ => None,
        }
    }};
}

// The context-holding structure for parsing schemas. Every production shares
// the same cursor through `&self`; end of input surfaces as a parser error
// carrying the last consumed token.
pub(crate) struct SchemaParser<'a> {
    lexer: Lexer<'a>,
    prev_token: Cell<Option<Token<'a>>>,
}

impl<'a> SchemaParser<'a> {
    fn new(lexer: Lexer<'a>) -> SchemaParser<'a> {
        SchemaParser {
            lexer,
            prev_token: Cell::new(None),
        }
    }

    fn has_next(&self) -> bool {
        self.lexer.has_next()
    }

    fn peek(&self) -> Res<Token<'a>> {
        self.lexer
            .peek()
            .map_err(|_| ParserError::unexpected_eof(self.prev_token.get()))
    }

    fn next(&self) -> Res<Token<'a>> {
        let token = self.peek()?;
        _ = self.lexer.next();
        self.prev_token.set(Some(token));
        Ok(token)
    }
}

/// Parses and validates a full schema source, yielding the frozen
/// [`Schema`] or the first fatal error. There is no partial success and no
/// recovery: any grammar mismatch, premature end of input, or unknown
/// leading keyword aborts the whole parse.
pub fn parse_schema(text: &str) -> Result<Schema<'_>, Error> {
    let parser = SchemaParser::new(Lexer::new(text));
    let mut builder = Schema::builder();
    parse_declarations(&parser, &mut builder)?;
    Ok(builder.build()?)
}

fn parse_declarations<'a>(p: &SchemaParser<'a>, builder: &mut SchemaBuilder<'a>) -> Res<()> {
    while p.has_next() {
        let leading = p.peek()?;
        let keyword = match leading.val {
            Word(w) => w.to_lowercase(),
            _ => return Err(ParserError::unknown_declaration(leading)),
        };
        match keyword.as_str() {
            "@query" => builder.append_query(parse_operation(p, OpKind::Query, false)?),
            "+@query" => builder.append_query(parse_operation(p, OpKind::Query, true)?),
            "@mutation" => builder.append_mutation(parse_operation(p, OpKind::Mutation, false)?),
            "+@mutation" => builder.append_mutation(parse_operation(p, OpKind::Mutation, true)?),
            "type" => builder.append_record(parse_record(p, RecordKind::Object)?),
            "input" => builder.append_record(parse_record(p, RecordKind::Input)?),
            "union" => builder.append_union(parse_union(p)?),
            "enum" => builder.append_enum(parse_enum(p)?),
            _ => return Err(ParserError::unknown_declaration(leading)),
        };
    }
    Ok(())
}

fn parse_operation<'a>(p: &SchemaParser<'a>, kind: OpKind, needs_auth: bool) -> Res<Operation<'a>> {
    _ = p.next()?; // the keyword, already dispatched on
    let def = parse_def(p)?;
    Ok(Operation::new(kind, def, needs_auth))
}

// Def := NAME ArgList? ":" TypeRef
//
// Shared by operation signatures and record fields.
fn parse_def<'a>(p: &SchemaParser<'a>) -> Res<FieldDef<'a>> {
    let name = required!(p, Word(_), "expected a definition name")?;
    let params = parse_arg_list(p)?;
    _ = required!(p, Colon, "expected ':' after definition name")?;
    let ret = required!(p, Word(_), "expected a return type")?;
    Ok(FieldDef::new(word(name), params, TypeRef(word(ret))))
}

// ArgList := "(" Arg ("," Arg)* ")"
//
// A single forward pass, so declared order lands in the map as written.
fn parse_arg_list<'a>(p: &SchemaParser<'a>) -> Res<IndexMap<&'a str, TypeRef<'a>>> {
    let mut args = IndexMap::new();
    if optional!(p, OpenParen).is_none() {
        return Ok(args);
    }
    loop {
        let (name, type_ref) = parse_arg(p)?;
        args.insert(name, type_ref);
        if optional!(p, Comma).is_none() {
            break;
        }
    }
    _ = required!(p, CloseParen, "expected ')' after argument list")?;
    Ok(args)
}

// Arg := NAME ":" TypeRef
fn parse_arg<'a>(p: &SchemaParser<'a>) -> Res<(&'a str, TypeRef<'a>)> {
    let name = required!(p, Word(_), "expected an argument name")?;
    _ = required!(p, Colon, "expected ':' after argument name")?;
    let value = required!(p, Word(_), "expected an argument type")?;
    Ok((word(name), TypeRef(word(value))))
}

fn parse_record<'a>(p: &SchemaParser<'a>, kind: RecordKind) -> Res<Record<'a>> {
    _ = p.next()?; // `type` / `input`
    let name = required!(p, Word(_), "expected a record name")?;
    _ = required!(p, OpenCurly, "expected '{' after record name")?;
    let mut fields = vec![parse_def(p)?];
    while !matches!(p.peek()?.val, CloseCurly) {
        fields.push(parse_def(p)?);
    }
    _ = p.next()?; // the '}'
    Ok(Record {
        name: word(name),
        kind,
        fields,
    })
}

fn parse_union<'a>(p: &SchemaParser<'a>) -> Res<Union<'a>> {
    _ = p.next()?; // `union`
    let name = required!(p, Word(_), "expected a union name")?;
    _ = required!(p, EqualSign, "expected '=' after union name")?;
    let first = required!(p, Word(_), "expected a union member")?;
    let mut members = vec![word(first)];
    while optional!(p, Pipe).is_some() {
        let member = required!(p, Word(_), "expected a union member after '|'")?;
        members.push(word(member));
    }
    Ok(Union {
        name: word(name),
        members,
    })
}

fn parse_enum<'a>(p: &SchemaParser<'a>) -> Res<Enum<'a>> {
    _ = p.next()?; // `enum`
    let name = required!(p, Word(_), "expected an enum name")?;
    _ = required!(p, OpenCurly, "expected '{' after enum name")?;
    let first = required!(p, Word(_), "expected at least one enum value")?;
    let mut values = vec![word(first)];
    while !matches!(p.peek()?.val, CloseCurly) {
        let value = required!(p, Word(_), "expected an enum value")?;
        values.push(word(value));
    }
    _ = p.next()?; // the '}'
    Ok(Enum {
        name: word(name),
        values,
    })
}

fn word<'a>(token: Token<'a>) -> &'a str {
    match token.val {
        Word(w) => w,
        _ => unreachable!(),
    }
}
