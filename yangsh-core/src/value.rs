//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::fmt;

use derive_new::new;
use enum_as_inner::EnumAsInner;

/// A decimal64 value kept as an unscaled integer plus the fraction-digits
/// bound of the leaf type it was parsed against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, new)]
pub struct Decimal64 {
    pub digits: i64,
    pub fraction_digits: u8,
}

/// Stand-in rendered in place of a value for structural nodes.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Special {
    Container,
    PresenceContainer,
    List,
    LeafList,
}

/// A typed leaf value, mirroring the leaf type taxonomy.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Decimal(Decimal64),
    String(String),
    Binary(String),
    Empty,
    Enum(String),
    Bits(BTreeSet<String>),
    IdentityRef {
        module: Option<String>,
        name: String,
    },
    InstanceIdentifier(String),
    Special(Special),
}

// ===== impl Decimal64 =====

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10i64.pow(self.fraction_digits as u32);
        let int = (self.digits / scale).unsigned_abs();
        let frac = (self.digits % scale).unsigned_abs();
        if self.digits < 0 {
            write!(f, "-")?;
        }
        let frac = format!("{:0width$}", frac, width = self.fraction_digits as usize);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{}.0", int)
        } else {
            write!(f, "{}.{}", int, frac)
        }
    }
}

// ===== impl Special =====

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Special::Container => write!(f, "(container)"),
            Special::PresenceContainer => write!(f, "(presence container)"),
            Special::List => write!(f, "(list)"),
            Special::LeafList => write!(f, "(leaf-list)"),
        }
    }
}

// ===== impl Value =====

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint8(v) => write!(f, "{}", v),
            Value::Uint16(v) => write!(f, "{}", v),
            Value::Uint32(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Binary(v) => write!(f, "{}", v),
            Value::Empty => Ok(()),
            Value::Enum(v) => write!(f, "{}", v),
            Value::Bits(bits) => {
                let mut first = true;
                for bit in bits {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "{}", bit)?;
                }
                Ok(())
            }
            Value::IdentityRef { module, name } => match module {
                Some(module) => write!(f, "{}:{}", module, name),
                None => write!(f, "{}", name),
            },
            Value::InstanceIdentifier(v) => write!(f, "{}", v),
            Value::Special(v) => write!(f, "{}", v),
        }
    }
}

// ===== global functions =====

/// Quotes a string for use inside a list-key or leaf-list selector. Single
/// quotes are preferred; double quotes are used when the value itself
/// contains a single quote.
pub fn escape_key_string(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{}\"", value)
    } else {
        format!("'{}'", value)
    }
}

/// Renders a key or leaf-list value the way it appears inside `[...]`:
/// string-like values are quoted, everything else is bare.
pub fn render_key_value(value: &Value) -> String {
    match value {
        Value::String(v) => escape_key_string(v),
        Value::InstanceIdentifier(v) => escape_key_string(v),
        _ => value.to_string(),
    }
}
