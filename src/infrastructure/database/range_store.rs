//! Relational range store using SeaORM
//!
//! Datasets are tables; rows come back as JSON objects keyed by column
//! name. The count and the page are two statements over the same condition.

use async_trait::async_trait;
use sea_orm::sea_query::{
    Alias, Asterisk, Condition, Expr, Func, LikeExpr, NullOrdering, Order, Query, SelectStatement,
    SimpleExpr,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, JsonValue};
use serde_json::Value;
use tracing::debug;

use crate::domain::{PagingResult, RangeRequest, RangeRows, RangeStore};

/// Database-backed range store
pub struct SeaOrmRangeStore {
    db: DatabaseConnection,
}

impl SeaOrmRangeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get database connection reference
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

// ── Query building ─────────────────────────────────────────────

fn json_to_sql(value: &Value) -> Option<sea_orm::Value> {
    match value {
        Value::String(s) => Some(s.clone().into()),
        Value::Bool(b) => Some((*b).into()),
        Value::Number(n) => n
            .as_i64()
            .map(Into::into)
            .or_else(|| n.as_f64().map(Into::into)),
        _ => None,
    }
}

/// `%`, `_` and the escape character itself match literally
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Uppercase letters of the Latin-1 supplement (`À`..`Þ` without `×`).
/// SQLite's `LOWER` folds ASCII only, so these are folded first.
const LATIN1_UPPER: std::ops::RangeInclusive<char> = '\u{C0}'..='\u{DE}';

/// `LOWER(col)` with accented Latin-1 capitals folded beforehand
fn folded_column(field: &str) -> SimpleExpr {
    let mut expr: SimpleExpr = Expr::col(Alias::new(field)).into();
    for upper in LATIN1_UPPER.filter(|c| *c != '\u{D7}') {
        let lower: String = upper.to_lowercase().collect();
        expr = Func::cust(Alias::new("REPLACE"))
            .arg(expr)
            .arg(upper.to_string())
            .arg(lower)
            .into();
    }
    Func::lower(expr).into()
}

fn build_condition(request: &RangeRequest) -> Condition {
    let mut condition = Condition::all();
    for (field, value) in &request.equals {
        if let Some(value) = json_to_sql(value) {
            condition = condition.add(Expr::col(Alias::new(field.as_str())).eq(value));
        }
    }
    if let Some(search) = &request.contains {
        let pattern = format!("%{}%", escape_like(&search.needle));
        condition = condition.add(
            Expr::expr(folded_column(&search.field)).like(LikeExpr::new(pattern).escape('\\')),
        );
    }
    condition
}

fn count_statement(request: &RangeRequest) -> SelectStatement {
    Query::select()
        .expr_as(Expr::cust("COUNT(*)"), Alias::new("total"))
        .from(Alias::new(request.dataset.as_str()))
        .cond_where(build_condition(request))
        .to_owned()
}

/// Page select, or `None` when the window starts past any row a SQL
/// `OFFSET` can address.
fn page_statement(request: &RangeRequest) -> Option<SelectStatement> {
    if request.range.from > i64::MAX as u64 {
        return None;
    }
    let limit = request.range.row_count().min(i64::MAX as u64);
    let order = if request.ascending {
        Order::Asc
    } else {
        Order::Desc
    };
    let statement = Query::select()
        .column(Asterisk)
        .from(Alias::new(request.dataset.as_str()))
        .cond_where(build_condition(request))
        .order_by_with_nulls(Alias::new(request.order_by.as_str()), order, NullOrdering::Last)
        .offset(request.range.from)
        .limit(limit)
        .to_owned();
    Some(statement)
}

// ── RangeStore implementation ──────────────────────────────────

#[async_trait]
impl RangeStore for SeaOrmRangeStore {
    async fn fetch_range(&self, request: &RangeRequest) -> PagingResult<RangeRows> {
        let backend = self.db.get_database_backend();

        let total: i64 = match self.db.query_one(backend.build(&count_statement(request))).await? {
            Some(row) => row.try_get("", "total")?,
            None => 0,
        };

        let rows = match page_statement(request) {
            Some(statement) => {
                JsonValue::find_by_statement(backend.build(&statement))
                    .all(&self.db)
                    .await?
            }
            None => Vec::new(),
        };

        debug!(
            table = %request.dataset,
            from = request.range.from,
            to = request.range.to,
            rows = rows.len(),
            total,
            "Range fetched"
        );

        Ok(RangeRows {
            rows,
            exact_count: u64::try_from(total).unwrap_or(0),
        })
    }
}
