//! Generic resource handlers.
//!
//! One statement per request: acquire a connection, run it, map the rows,
//! drop the connection. Writes run inside an immediate transaction that is
//! committed on success and rolled back when the database rejects the
//! statement.
//!
//! A rejected write answers 400 with the engine's text. A failing read answers
//! 500 with the generic message; its detail only reaches the log.

use hyper::StatusCode;
use libsql::{Connection, TransactionBehavior};
use libsql::params::Params;
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use crate::db::{self, Value};
use crate::module::Module;
use crate::resource::{Lookup, Resource};
use crate::response::{self, HttpResponse};
use crate::router::{Context, Router};
use crate::{Error, Result};

impl Module for Resource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn routes(&'static self, router: &mut Router) {
        router.get(self.path, move |ctx| list(self, ctx));
        router.post(self.path, move |ctx| create(self, ctx));

        let item = self.item_path();
        router.get(&item, move |ctx| fetch(self, ctx));
        router.put(&item, move |ctx| update(self, ctx));
        router.delete(&item, move |ctx| delete(self, ctx));

        for lookup in self.lookups {
            let path = format!("{}{}", self.path, lookup.path);
            router.get(&path, move |ctx| by_key(self, lookup, ctx));
        }
    }
}

/// `GET base`: every row, unfiltered.
pub async fn list(resource: &'static Resource, ctx: Context) -> Result<HttpResponse> {
    let conn = ctx.connect().await?;
    let sql = format!(
        "SELECT {} FROM {}",
        resource.columns().join(", "),
        resource.table
    );
    let items = query(resource, &conn, &sql, Params::None).await?;
    response::ok(&items)
}

/// `GET base/{id}`: one row or the resource's not-found message.
pub async fn fetch(resource: &'static Resource, ctx: Context) -> Result<HttpResponse> {
    let keys = key_values(resource, &ctx)?;
    let conn = ctx.connect().await?;
    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        resource.columns().join(", "),
        resource.table,
        predicate(resource.key_columns())
    );

    let mut rows = conn.query(&sql, Params::Positional(keys)).await?;
    match rows.next().await? {
        Some(row) => response::ok(&resource.to_json(&row)?),
        None => Err(Error::NotFound(resource.messages.not_found.to_string())),
    }
}

/// `POST base`: insert the body's fields.
pub async fn create(resource: &'static Resource, ctx: Context) -> Result<HttpResponse> {
    let conn = ctx.connect().await?;
    let body: Json = ctx.json()?;
    let params = resource.bind_create(&body)?;

    let columns: Vec<&str> = resource.fields.iter().map(|f| f.name).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        resource.table,
        columns.join(", ")
    );

    write(resource, &conn, &sql, params).await?;
    Ok(response::message(StatusCode::CREATED, resource.messages.created))
}

/// `PUT base/{id}`: overwrite every field. Absent ids are not an error.
pub async fn update(resource: &'static Resource, ctx: Context) -> Result<HttpResponse> {
    let keys = key_values(resource, &ctx)?;
    let conn = ctx.connect().await?;
    let body: Json = ctx.json()?;
    let mut params = resource.bind_update(&body)?;
    params.extend(keys);

    let assignments: Vec<String> = resource
        .fields
        .iter()
        .map(|f| format!("{} = ?", f.name))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        resource.table,
        assignments.join(", "),
        predicate(resource.key_columns())
    );

    write(resource, &conn, &sql, params).await?;
    Ok(response::message(StatusCode::OK, resource.messages.updated))
}

/// `DELETE base/{id}`: absent ids are not an error.
pub async fn delete(resource: &'static Resource, ctx: Context) -> Result<HttpResponse> {
    let keys = key_values(resource, &ctx)?;
    let conn = ctx.connect().await?;
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        resource.table,
        predicate(resource.key_columns())
    );

    write(resource, &conn, &sql, keys).await?;
    Ok(response::message(StatusCode::OK, resource.messages.deleted))
}

/// `GET base/<lookup>`: rows sharing one foreign key.
pub async fn by_key(
    resource: &'static Resource,
    lookup: &'static Lookup,
    ctx: Context,
) -> Result<HttpResponse> {
    let key = ctx.id(lookup.column)?;
    let conn = ctx.connect().await?;
    let columns = match lookup.projection {
        Some(projection) => projection.to_vec(),
        None => resource.columns(),
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        columns.join(", "),
        resource.table,
        lookup.column
    );

    let items = query(resource, &conn, &sql, Params::Positional(vec![Value::Integer(key)])).await?;
    if items.is_empty()
        && let Some(message) = lookup.empty
    {
        return Err(Error::NotFound(message.to_string()));
    }
    response::ok(&items)
}

/// Route parameters addressing one row, in key-column order.
fn key_values(resource: &Resource, ctx: &Context) -> Result<Vec<Value>> {
    resource
        .key_params()
        .into_iter()
        .map(|name| ctx.id(name).map(Value::Integer))
        .collect()
}

fn predicate(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

async fn query(
    resource: &Resource,
    conn: &Connection,
    sql: &str,
    params: Params,
) -> Result<Vec<Map<String, Json>>> {
    debug!(table = resource.table, "{sql}");
    let mut rows = conn.query(sql, params).await?;
    let mut items = Vec::new();
    while let Some(row) = rows.next().await? {
        items.push(resource.to_json(&row)?);
    }
    Ok(items)
}

async fn write(resource: &Resource, conn: &Connection, sql: &str, params: Vec<Value>) -> Result<u64> {
    debug!(table = resource.table, "{sql}");
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .await?;
    match tx.execute(sql, Params::Positional(params)).await {
        Ok(affected) => {
            tx.commit().await.map_err(db::rejected)?;
            debug!(table = resource.table, affected, "committed");
            Ok(affected)
        }
        Err(e) => {
            warn!(table = resource.table, "Write rejected: {e}");
            if let Err(rollback) = tx.rollback().await {
                warn!(table = resource.table, "Rollback failed: {rollback}");
            }
            Err(db::rejected(e))
        }
    }
}
