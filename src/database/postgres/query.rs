use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::error::StoreError;
use crate::tenant::{ResourceKind, ScopeError, ScopeResult, TenantScope};

/// SELECT builder whose FROM clause always joins a resource back to its
/// organization and whose first predicate is always the scope's
/// organization id.
///
/// Aliases: `r0` is the queried resource, `r1..` are its ancestors in
/// [`ResourceKind::chain`] order.
pub struct ScopedQuery<'s, T> {
    kind: ResourceKind,
    scope: &'s TenantScope,
    select: String,
    conditions: Vec<(&'static str, i64)>,
    order_by: Option<&'static str>,
    _phantom: std::marker::PhantomData<T>,
}

impl<'s, T> ScopedQuery<'s, T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(kind: ResourceKind, scope: &'s TenantScope) -> Self {
        Self {
            kind,
            scope,
            select: "r0.*".to_string(),
            conditions: Vec::new(),
            order_by: None,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    /// Equality predicate on a column of `r0`
    pub fn filter(mut self, column: &'static str, value: i64) -> Self {
        self.conditions.push((column, value));
        self
    }

    pub fn with_id(self, id: i64) -> Self {
        self.filter("id", id)
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by = Some(clause);
        self
    }

    pub fn to_sql(&self) -> String {
        let (from, organization_column) = scoped_from(self.kind);
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.select, from, organization_column
        );
        for (i, (column, _)) in self.conditions.iter().enumerate() {
            sql.push_str(&format!(" AND r0.\"{}\" = ${}", column, i + 2));
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        sql
    }

    pub async fn fetch_all(self, pool: &PgPool) -> Result<Vec<T>, StoreError> {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql).bind(self.scope.organization_id());
        for (_, value) in &self.conditions {
            q = q.bind(*value);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn fetch_optional(self, pool: &PgPool) -> Result<Option<T>, StoreError> {
        let sql = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql).bind(self.scope.organization_id());
        for (_, value) in &self.conditions {
            q = q.bind(*value);
        }
        Ok(q.fetch_optional(pool).await?)
    }

    /// Fetch row `id`, reporting a miss as `ResourceNotFound` whether the id
    /// is unknown or owned by another organization.
    pub async fn fetch_404(self, pool: &PgPool, id: i64) -> ScopeResult<T> {
        let kind = self.kind;
        self.with_id(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ScopeError::not_found(kind, id))
    }
}

/// FROM clause joining `kind` up its ownership chain, plus the column
/// holding the owning organization id.
fn scoped_from(kind: ResourceKind) -> (String, String) {
    let chain = kind.chain();
    let mut from = format!("\"{}\" r0", kind.table());
    for (i, link) in chain.windows(2).enumerate() {
        let (child, parent) = (link[0], link[1]);
        from.push_str(&format!(
            " JOIN \"{}\" r{} ON r{}.\"id\" = r{}.\"{}\"",
            parent.table(),
            i + 1,
            i + 1,
            i,
            child.owner_column()
        ));
    }
    let organization_column = format!("r{}.\"organization_id\"", chain.len() - 1);
    (from, organization_column)
}
