//! Entity descriptors.
//!
//! A [`Resource`] names a table, its identity columns, the columns a client
//! writes, the messages it answers with and any extra foreign-key lookups.
//! The generic handlers in [`crate::crud`] are driven entirely by it.
//!
//! Rows are mapped to JSON by column name, never by position.

use jiff::civil::Date;
use jiff::fmt::strtime;
use serde_json::{Map, Value as Json};

use crate::db::{Row, Value};
use crate::{Error, Result};

/// Storage and wire type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Text,
    /// ISO-8601 calendar date, stored as `TEXT`.
    Date,
    /// Stored as `REAL`, emitted as a JSON float.
    Decimal,
    /// Stored as `INTEGER` 0/1, emitted as a JSON boolean.
    Flag,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Text => "text",
            Kind::Date => "date (YYYY-MM-DD)",
            Kind::Decimal => "decimal",
            Kind::Flag => "boolean",
        }
    }

    /// Convert a present, non-null JSON value into a statement parameter.
    fn bind(self, value: &Json) -> Option<Value> {
        match (self, value) {
            (Kind::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
            (Kind::Text, Json::String(s)) => Some(Value::Text(s.clone())),
            (Kind::Date, Json::String(s)) => {
                parse_date(s.trim()).map(|d| Value::Text(d.to_string()))
            }
            (Kind::Decimal, Json::Number(n)) => n.as_f64().map(Value::Real),
            (Kind::Decimal, Json::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Real),
            (Kind::Flag, Json::Bool(b)) => Some(Value::Integer(i64::from(*b))),
            (Kind::Flag, Json::Number(n)) => match n.as_i64() {
                Some(0) => Some(Value::Integer(0)),
                Some(1) => Some(Value::Integer(1)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Convert a stored value into its JSON form.
    fn emit(self, value: Value) -> Json {
        match (self, value) {
            (_, Value::Null) => Json::Null,
            (Kind::Flag, Value::Integer(i)) => Json::Bool(i != 0),
            (Kind::Decimal, Value::Integer(i)) => Json::from(i as f64),
            (_, value) => raw(value),
        }
    }
}

/// Exactly `YYYY-MM-DD`; times, offsets and other calendar forms are refused.
fn parse_date(s: &str) -> Option<Date> {
    if s.len() != 10 {
        return None;
    }
    strtime::parse("%Y-%m-%d", s).ok()?.to_date().ok()
}

/// Type-agnostic conversion for columns without a declared kind.
fn raw(value: Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(i) => Json::from(i),
        Value::Real(f) => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s),
        Value::Blob(b) => Json::String(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// A column a client supplies in Create and Update bodies.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// How a row is identified in paths.
#[derive(Debug, Clone, Copy)]
pub enum Identity {
    /// Single auto-assigned integer column, addressed as `{id}`.
    Serial(&'static str),
    /// Several client-supplied columns, addressed as `{a}/{b}`.
    ///
    /// In Update bodies the new values are read from
    /// `<replacement_prefix><column>`.
    Composite {
        columns: &'static [&'static str],
        replacement_prefix: &'static str,
    },
}

/// Fixed texts returned by the handlers.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub not_found: &'static str,
}

/// Extra `GET` route listing rows filtered by one foreign key.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
    /// Path below the resource's base path, e.g. `/student/{id_aluno}`.
    pub path: &'static str,
    /// Filter column. The route parameter carries the same name.
    pub column: &'static str,
    /// Columns to return; `None` returns full rows.
    pub projection: Option<&'static [&'static str]>,
    /// Answer 404 with this text when nothing matches instead of `[]`.
    pub empty: Option<&'static str>,
}

/// Schema of one entity and the routes derived from it.
#[derive(Debug)]
pub struct Resource {
    /// Module name used in logs.
    pub name: &'static str,
    /// Base path, e.g. `/students`.
    pub path: &'static str,
    pub table: &'static str,
    pub identity: Identity,
    pub fields: &'static [Field],
    pub messages: Messages,
    pub lookups: &'static [Lookup],
}

impl Resource {
    /// Every column a read returns, identity first.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.fields.len() + 1);
        if let Identity::Serial(id) = self.identity {
            columns.push(id);
        }
        columns.extend(self.fields.iter().map(|f| f.name));
        columns
    }

    /// Columns matched by Get/Update/Delete.
    pub fn key_columns(&self) -> &[&'static str] {
        match &self.identity {
            Identity::Serial(id) => std::slice::from_ref(id),
            Identity::Composite { columns, .. } => columns,
        }
    }

    /// Path suffix addressing one row, e.g. `/{id}` or `/{id_atividade}/{id_aluno}`.
    pub fn item_path(&self) -> String {
        match self.identity {
            Identity::Serial(_) => format!("{}/{{id}}", self.path),
            Identity::Composite { columns, .. } => {
                let mut path = self.path.to_string();
                for column in columns {
                    path.push_str(&format!("/{{{column}}}"));
                }
                path
            }
        }
    }

    /// Route parameter names matching [`Self::key_columns`], in order.
    pub fn key_params(&self) -> Vec<&'static str> {
        match self.identity {
            Identity::Serial(_) => vec!["id"],
            Identity::Composite { columns, .. } => columns.to_vec(),
        }
    }

    fn kind_of(&self, column: &str) -> Option<Kind> {
        if let Identity::Serial(id) = self.identity
            && id == column
        {
            return Some(Kind::Integer);
        }
        self.fields.iter().find(|f| f.name == column).map(|f| f.kind)
    }

    /// Bind a Create body: one parameter per field, in field order.
    pub fn bind_create(&self, body: &Json) -> Result<Vec<Value>> {
        self.bind(body, "")
    }

    /// Bind an Update body. Composite identities read `<prefix><column>` keys.
    pub fn bind_update(&self, body: &Json) -> Result<Vec<Value>> {
        match self.identity {
            Identity::Serial(_) => self.bind(body, ""),
            Identity::Composite {
                replacement_prefix, ..
            } => self.bind(body, replacement_prefix),
        }
    }

    fn bind(&self, body: &Json, key_prefix: &str) -> Result<Vec<Value>> {
        let object = body.as_object().ok_or_else(|| {
            Error::Validation("Request body must be a JSON object".to_string())
        })?;

        self.fields
            .iter()
            .map(|field| {
                let key = format!("{key_prefix}{}", field.name);
                match object.get(&key) {
                    None | Some(Json::Null) if field.required => {
                        Err(Error::Validation(format!("Missing required field: {key}")))
                    }
                    None | Some(Json::Null) => Ok(Value::Null),
                    Some(value) => field.kind.bind(value).ok_or_else(|| {
                        Error::Validation(format!(
                            "Invalid value for field {key}: expected {}",
                            field.kind.label()
                        ))
                    }),
                }
            })
            .collect()
    }

    /// Map a row to a flat JSON object keyed by column name.
    pub fn to_json(&self, row: &Row) -> Result<Map<String, Json>> {
        let mut object = Map::new();
        for idx in 0..row.column_count() {
            let name = row
                .column_name(idx)
                .ok_or_else(|| Error::Internal(format!("Unnamed column {idx} in {}", self.table)))?
                .to_string();
            let value = row.get_value(idx)?;
            let json = match self.kind_of(&name) {
                Some(kind) => kind.emit(value),
                None => raw(value),
            };
            object.insert(name, json);
        }
        Ok(object)
    }
}
