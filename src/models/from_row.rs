use rusqlite::{Connection, OptionalExtension, Params, Row};

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    /// Every row `sql` yields, in query order.
    fn query_all<P: Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> rusqlite::Result<Vec<Self>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::from_row)?;
        rows.collect()
    }

    /// The first row, if any.
    fn query_opt<P: Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> rusqlite::Result<Option<Self>> {
        conn.query_row(sql, params, Self::from_row).optional()
    }
}
