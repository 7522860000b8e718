//! PostgreSQL-backed role unit of work.
//!
//! Each session owns one pooled connection for its whole lifetime and opens
//! a transaction on it immediately. If the session is dropped while the
//! transaction is still open, bb8 sees a broken transaction manager when the
//! connection is returned and discards it, so the server rolls back.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewRole, Role, RoleChanges};
use crate::repositories::{RoleSession, UnitOfWork};
use crate::schema::roles;

type OwnedConnection = PooledConnection<'static, AsyncPgConnection>;

/// Role repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct RoleRepository {
    pool: AsyncDbPool,
}

impl RoleRepository {
    /// Creates a new RoleRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> AppResult<OwnedConnection> {
        self.pool
            .get_owned()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })
    }
}

#[async_trait]
impl UnitOfWork for RoleRepository {
    async fn begin(&self) -> AppResult<Box<dyn RoleSession>> {
        let mut conn = self.connection().await?;
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::begin_transaction(
            &mut *conn,
        )
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "begin transaction"))?;

        Ok(Box::new(PgRoleSession { conn }))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping"))
    }
}

/// Escapes LIKE metacharacters so the key is matched literally.
fn like_pattern(search_key: &str) -> String {
    let mut pattern = String::with_capacity(search_key.len() + 2);
    pattern.push('%');
    for ch in search_key.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered(search_key: Option<&str>) -> roles::BoxedQuery<'static, Pg> {
    let mut query = roles::table.into_boxed();
    if let Some(key) = search_key {
        query = query.filter(roles::name.ilike(like_pattern(key)));
    }
    query
}

struct PgRoleSession {
    conn: OwnedConnection,
}

#[async_trait]
impl RoleSession for PgRoleSession {
    async fn find_by_id(&mut self, role_id: i32) -> AppResult<Option<Role>> {
        roles::table
            .filter(roles::id.eq(role_id))
            .select(Role::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find role"))
    }

    async fn name_taken(&mut self, role_name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let mut query = roles::table
            .filter(roles::name.eq(role_name.to_string()))
            .into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(roles::id.ne(excluded));
        }

        let holder = query
            .select(roles::id)
            .first::<i32>(&mut *self.conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "check role name"))?;
        Ok(holder.is_some())
    }

    async fn insert(&mut self, new_role: &NewRole) -> AppResult<Role> {
        diesel::insert_into(roles::table)
            .values(new_role)
            .returning(Role::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert role"))
    }

    async fn update(&mut self, role_id: i32, changes: &RoleChanges) -> AppResult<Role> {
        diesel::update(roles::table.filter(roles::id.eq(role_id)))
            .set(changes)
            .returning(Role::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update role"))
    }

    async fn delete(&mut self, role_id: i32) -> AppResult<usize> {
        diesel::delete(roles::table.filter(roles::id.eq(role_id)))
            .execute(&mut *self.conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete role"))
    }

    async fn search(
        &mut self,
        search_key: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Role>> {
        filtered(search_key)
            .select(Role::as_select())
            .order(roles::id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut *self.conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "search roles"))
    }

    async fn count(&mut self, search_key: Option<&str>) -> AppResult<i64> {
        filtered(search_key)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count roles"))
    }

    async fn commit(&mut self) -> AppResult<()> {
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::commit_transaction(
            &mut *self.conn,
        )
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "commit transaction"))
    }

    async fn rollback(&mut self) -> AppResult<()> {
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::rollback_transaction(
            &mut *self.conn,
        )
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "rollback transaction"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_key() {
        assert_eq!(like_pattern("adm"), "%adm%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_filtered_query_uses_ilike() {
        let sql = diesel::debug_query::<Pg, _>(&filtered(Some("ops")).select(roles::id)).to_string();
        assert!(sql.contains("ILIKE"), "unexpected SQL: {}", sql);

        let sql = diesel::debug_query::<Pg, _>(&filtered(None).select(roles::id)).to_string();
        assert!(!sql.contains("ILIKE"), "unexpected SQL: {}", sql);
    }
}
