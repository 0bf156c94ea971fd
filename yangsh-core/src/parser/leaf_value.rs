//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use itertools::Itertools;

use crate::completion::Completion;
use crate::parser::context::{Context, Failure, PResult};
use crate::parser::input::Input;
use crate::schema::{Identity, LeafType};
use crate::value::{Decimal64, Value};

/// Parses a leaf value of the given (possibly leaf-ref) type. The value
/// must extend to a value boundary; on failure the context records a
/// type-mismatch error anchored at the value's first character.
pub(crate) fn leaf_value(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    leaf_type: &LeafType,
    top_module: Option<&str>,
) -> PResult<Value> {
    let start = input.pos();
    let save = *input;
    match parse_value(ctx, input, leaf_type, top_module) {
        Ok(value) if value_boundary(input) => Ok(value),
        Ok(_) | Err(Failure::Soft) => {
            *input = save;
            Err(ctx.fail(
                start,
                format!(
                    "leaf data type mismatch: Expected {} here:",
                    leaf_type.describe()
                ),
            ))
        }
        Err(Failure::Hard) => Err(Failure::Hard),
    }
}

/// Values end at whitespace, at a closing bracket, or at end of input.
pub(crate) fn value_boundary(input: &Input<'_>) -> bool {
    match input.peek() {
        None => true,
        Some(c) => c.is_whitespace() || c == ']',
    }
}

fn parse_value(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    leaf_type: &LeafType,
    top_module: Option<&str>,
) -> PResult<Value> {
    match leaf_type {
        LeafType::String => match input.quoted_string() {
            Some(s) => Ok(Value::String(s.to_owned())),
            None => Err(Failure::Soft),
        },
        LeafType::Bool => {
            if input.eat("true") {
                Ok(Value::Bool(true))
            } else if input.eat("false") {
                Ok(Value::Bool(false))
            } else {
                Err(Failure::Soft)
            }
        }
        LeafType::Empty => Ok(Value::Empty),
        LeafType::Binary => parse_binary(input),
        LeafType::InstanceIdentifier => match input.quoted_string() {
            Some(s) => Ok(Value::InstanceIdentifier(s.to_owned())),
            None => Err(Failure::Soft),
        },
        LeafType::Int8 => parse_int(input, Value::Int8),
        LeafType::Int16 => parse_int(input, Value::Int16),
        LeafType::Int32 => parse_int(input, Value::Int32),
        LeafType::Int64 => parse_int(input, Value::Int64),
        LeafType::Uint8 => parse_int(input, Value::Uint8),
        LeafType::Uint16 => parse_int(input, Value::Uint16),
        LeafType::Uint32 => parse_int(input, Value::Uint32),
        LeafType::Uint64 => parse_int(input, Value::Uint64),
        LeafType::Decimal64 { fraction_digits } => {
            parse_decimal(input, *fraction_digits)
        }
        LeafType::Enumeration(values) => parse_enum(ctx, input, values),
        LeafType::Bits(names) => parse_bits(ctx, input, names),
        LeafType::IdentityRef(allowed) => {
            parse_identity(ctx, input, allowed, top_module)
        }
        LeafType::LeafRef { target, .. } => {
            parse_value(ctx, input, target, top_module)
        }
        LeafType::Union(members) => {
            parse_union(ctx, input, members, top_module)
        }
    }
}

fn parse_int<T>(
    input: &mut Input<'_>,
    wrap: fn(T) -> Value,
) -> PResult<Value>
where
    T: std::str::FromStr,
{
    let Some(token) = lex_int(input) else {
        return Err(Failure::Soft);
    };
    token.parse::<T>().map(wrap).map_err(|_| Failure::Soft)
}

// `[+-]?[0-9]+`, consumed only on success.
fn lex_int<'a>(input: &mut Input<'a>) -> Option<&'a str> {
    let rest = input.rest();
    let bytes = rest.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    input.bump(i);
    Some(&rest[..i])
}

fn parse_decimal(
    input: &mut Input<'_>,
    fraction_digits: u8,
) -> PResult<Value> {
    let rest = input.rest();
    let bytes = rest.as_bytes();
    let mut i = 0;
    let negative = if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+')
    {
        i += 1;
        bytes[i - 1] == b'-'
    } else {
        false
    };

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_part = &rest[int_start..i];

    let mut frac_part = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        i = frac_start;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_part = &rest[frac_start..i];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Failure::Soft);
    }
    // The type's fraction-digits is a hard bound on the precision.
    if frac_part.len() > fraction_digits as usize {
        return Err(Failure::Soft);
    }

    let mut digits: i64 = 0;
    for c in int_part.bytes().chain(frac_part.bytes()) {
        digits = digits
            .checked_mul(10)
            .and_then(|d| d.checked_add((c - b'0') as i64))
            .ok_or(Failure::Soft)?;
    }
    for _ in frac_part.len()..fraction_digits as usize {
        digits = digits.checked_mul(10).ok_or(Failure::Soft)?;
    }
    if negative {
        digits = -digits;
    }

    input.bump(i);
    Ok(Value::Decimal(Decimal64::new(digits, fraction_digits)))
}

fn parse_binary(input: &mut Input<'_>) -> PResult<Value> {
    let rest = input.rest();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric()
            || bytes[i] == b'+'
            || bytes[i] == b'/')
    {
        i += 1;
    }
    while i < bytes.len() && bytes[i] == b'=' && rest[..i].matches('=').count() < 2
    {
        i += 1;
    }
    let token = &rest[..i];
    if token.is_empty() || BASE64.decode(token).is_err() {
        return Err(Failure::Soft);
    }
    input.bump(i);
    Ok(Value::Binary(token.to_owned()))
}

fn parse_enum(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    values: &BTreeSet<String>,
) -> PResult<Value> {
    let start = input.pos();
    ctx.publish(
        start,
        values.iter().map(|v| Completion::bare(v.as_str())).collect(),
    );

    let save = *input;
    let token = lex_value_token(input);
    if !token.is_empty() && values.contains(token) {
        return Ok(Value::Enum(token.to_owned()));
    }
    *input = save;
    Err(ctx.fail(
        start,
        format!(
            "leaf data type mismatch: Expected an enum here. Allowed values: {}",
            values.iter().join(" ")
        ),
    ))
}

fn parse_identity(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    allowed: &BTreeSet<Identity>,
    top_module: Option<&str>,
) -> PResult<Value> {
    let start = input.pos();
    ctx.publish(
        start,
        allowed
            .iter()
            .map(|(module, name)| {
                Completion::bare(format!("{}:{}", module, name))
            })
            .collect(),
    );

    let save = *input;
    let module = input.module_prefix().map(str::to_owned);
    let name = match input.identifier() {
        Some(name) => name.to_owned(),
        None => {
            *input = save;
            return Err(fail_identity(ctx, start, allowed));
        }
    };
    // An omitted prefix resolves against the top-level module of the leaf's
    // absolute path.
    let effective = module.as_deref().or(top_module);
    let valid = effective.is_some_and(|m| {
        allowed.contains(&(m.to_owned(), name.clone()))
    });
    if !valid {
        *input = save;
        return Err(fail_identity(ctx, start, allowed));
    }
    Ok(Value::IdentityRef { module, name })
}

fn fail_identity(
    ctx: &mut Context<'_>,
    start: usize,
    allowed: &BTreeSet<Identity>,
) -> Failure {
    ctx.fail(
        start,
        format!(
            "leaf data type mismatch: Expected an identity here. Allowed values: {}",
            allowed
                .iter()
                .map(|(module, name)| format!("{}:{}", module, name))
                .join(" ")
        ),
    )
}

fn parse_bits(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    names: &BTreeSet<String>,
) -> PResult<Value> {
    let mut bits: BTreeSet<String> = BTreeSet::new();
    loop {
        let save = *input;
        if !bits.is_empty() && !input.skip_whitespace() {
            break;
        }
        let bit_start = input.pos();
        ctx.publish(
            bit_start,
            names
                .iter()
                .filter(|name| !bits.contains(*name))
                .map(|name| Completion::bare(name.as_str()))
                .collect(),
        );
        let Some(bit) = input.identifier() else {
            *input = save;
            break;
        };
        if !names.contains(bit) {
            return Err(ctx.fail(
                bit_start,
                format!(
                    "leaf data type mismatch: Expected a bit field here. Allowed values: {}",
                    names.iter().join(" ")
                ),
            ));
        }
        if !bits.insert(bit.to_owned()) {
            return Err(ctx.fail(
                bit_start,
                format!("Bit \"{}\" was entered more than once.", bit),
            ));
        }
    }
    Ok(Value::Bits(bits))
}

fn parse_union(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    members: &[LeafType],
    top_module: Option<&str>,
) -> PResult<Value> {
    let start = input.pos();
    let mut all = BTreeSet::new();
    for member in members {
        let mut probe = *input;
        ctx.publish(start, BTreeSet::new());
        let had_error = ctx.error_handled();
        let result = parse_value(ctx, &mut probe, member, top_module);
        all.extend(ctx.suggestions.iter().cloned());
        match result {
            // The first member that consumes the whole token wins.
            Ok(value) if value_boundary(&probe) => {
                *input = probe;
                ctx.publish(start, all);
                return Ok(value);
            }
            _ => {
                if !had_error {
                    ctx.clear_error();
                }
            }
        }
    }
    ctx.publish(start, all);
    Err(Failure::Soft)
}

// A bare token: everything up to whitespace, `]` or end of input.
fn lex_value_token<'a>(input: &mut Input<'a>) -> &'a str {
    let rest = input.rest();
    let end = rest
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || *c == ']')
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    input.bump(end);
    &rest[..end]
}
