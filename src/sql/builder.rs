//! Builds parameterized INSERT, SELECT, COUNT, UPDATE, DELETE from a static table description.

use super::params::BindValue;

const MAIN_ALIAS: &str = "main";

/// A to-one association whose display name is selected alongside the primary row.
#[derive(Clone, Copy, Debug)]
pub struct Preload {
    /// Output column name, e.g. `salesperson_name`.
    pub alias: &'static str,
    /// Our foreign-key column.
    pub our_key: &'static str,
    pub table: &'static str,
    pub their_key: &'static str,
    pub their_column: &'static str,
}

/// Static description of one resource table.
#[derive(Clone, Copy, Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [&'static str],
    /// Boolean column marking a row deleted. Rows with it set are invisible to every query.
    pub soft_delete: Option<&'static str>,
    pub preloads: &'static [Preload],
}

/// Equality predicate on one column.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: BindValue,
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<BindValue>) -> Self {
        Predicate {
            column,
            value: value.into(),
        }
    }
}

/// Quote identifier for PostgreSQL (identifiers only ever come from `TableSpec`).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn select_column_list(table: &TableSpec) -> String {
    let mut parts: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{}.{}", MAIN_ALIAS, quoted(c)))
        .collect();
    for p in table.preloads {
        parts.push(format!(
            "(SELECT sub.{} FROM {} sub WHERE sub.{} = {}.{}) AS {}",
            quoted(p.their_column),
            quoted(p.table),
            quoted(p.their_key),
            MAIN_ALIAS,
            quoted(p.our_key),
            quoted(p.alias)
        ));
    }
    parts.join(", ")
}

/// WHERE clause for the optional filter plus the soft-delete guard. Empty when unrestricted.
fn where_clause(q: &mut QueryBuf, table: &TableSpec, predicate: Option<&Predicate>, aliased: bool) -> String {
    let col = |c: &str| {
        if aliased {
            format!("{}.{}", MAIN_ALIAS, quoted(c))
        } else {
            quoted(c)
        }
    };
    let mut parts = Vec::new();
    if let Some(p) = predicate {
        let n = q.push_param(p.value.clone());
        parts.push(format!("{} = ${}", col(p.column), n));
    }
    if let Some(flag) = table.soft_delete {
        parts.push(format!("{} = FALSE", col(flag)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// INSERT one row with the given column values.
pub fn insert(table: &TableSpec, values: &[(&'static str, BindValue)]) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (name, v) in values {
        let n = q.push_param(v.clone());
        cols.push(quoted(name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// SELECT a page ordered by primary key.
pub fn select_page(table: &TableSpec, predicate: Option<&Predicate>, limit: u32, offset: u64) -> QueryBuf {
    let mut q = QueryBuf::default();
    let where_sql = where_clause(&mut q, table, predicate, true);
    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{} LIMIT {} OFFSET {}",
        select_column_list(table),
        quoted(table.name),
        MAIN_ALIAS,
        where_sql,
        MAIN_ALIAS,
        quoted(table.id_column),
        limit,
        offset
    );
    q
}

/// SELECT the first matching row.
pub fn select_one(table: &TableSpec, predicate: Option<&Predicate>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let where_sql = where_clause(&mut q, table, predicate, true);
    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{} LIMIT 1",
        select_column_list(table),
        quoted(table.name),
        MAIN_ALIAS,
        where_sql,
        MAIN_ALIAS,
        quoted(table.id_column)
    );
    q
}

pub fn count(table: &TableSpec, predicate: Option<&Predicate>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let where_sql = where_clause(&mut q, table, predicate, false);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(table.name), where_sql);
    q
}

/// UPDATE only the supplied assignments. Returns None when there is nothing to set.
pub fn update(
    table: &TableSpec,
    predicate: Option<&Predicate>,
    assignments: &[(&'static str, BindValue)],
) -> Option<QueryBuf> {
    if assignments.is_empty() {
        return None;
    }
    let mut q = QueryBuf::default();
    let sets: Vec<String> = assignments
        .iter()
        .map(|(name, v)| {
            let n = q.push_param(v.clone());
            format!("{} = ${}", quoted(name), n)
        })
        .collect();
    let where_sql = where_clause(&mut q, table, predicate, false);
    q.sql = format!("UPDATE {} SET {}{}", quoted(table.name), sets.join(", "), where_sql);
    Some(q)
}

/// DELETE matching rows. A soft-deleting table flags them instead, writing `stamp`
/// alongside the flag.
pub fn delete(
    table: &TableSpec,
    predicate: Option<&Predicate>,
    stamp: &[(&'static str, BindValue)],
) -> QueryBuf {
    let mut q = QueryBuf::default();
    let Some(flag) = table.soft_delete else {
        let where_sql = where_clause(&mut q, table, predicate, false);
        q.sql = format!("DELETE FROM {}{}", quoted(table.name), where_sql);
        return q;
    };
    let mut sets = vec![format!("{} = TRUE", quoted(flag))];
    for (name, v) in stamp {
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}", quoted(name), n));
    }
    let where_sql = where_clause(&mut q, table, predicate, false);
    q.sql = format!("UPDATE {} SET {}{}", quoted(table.name), sets.join(", "), where_sql);
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: TableSpec = TableSpec {
        name: "people",
        id_column: "id",
        columns: &["id", "name", "remark"],
        soft_delete: None,
        preloads: &[],
    };

    const USERS: TableSpec = TableSpec {
        name: "users",
        id_column: "id",
        columns: &["id", "name", "owner_id"],
        soft_delete: Some("is_deleted"),
        preloads: &[Preload {
            alias: "owner_name",
            our_key: "owner_id",
            table: "users",
            their_key: "id",
            their_column: "name",
        }],
    };

    #[test]
    fn insert_binds_every_value_in_order() {
        let q = insert(&PEOPLE, &[("id", "p1".into()), ("remark", BindValue::Null)]);
        assert_eq!(q.sql, r#"INSERT INTO "people" ("id", "remark") VALUES ($1, $2)"#);
        assert_eq!(q.params, vec![BindValue::Text("p1".into()), BindValue::Null]);
    }

    #[test]
    fn update_sets_only_supplied_columns() {
        let pred = Predicate::eq("id", "p1");
        let q = update(&PEOPLE, Some(&pred), &[("remark", "".into())]).unwrap();
        assert_eq!(q.sql, r#"UPDATE "people" SET "remark" = $1 WHERE "id" = $2"#);
        assert_eq!(q.params, vec![BindValue::Text(String::new()), BindValue::Text("p1".into())]);
        assert!(!q.sql.contains("\"name\""));
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update(&PEOPLE, None, &[]).is_none());
    }

    #[test]
    fn page_query_applies_limit_and_offset_after_filter() {
        let pred = Predicate::eq("name", "a");
        let q = select_page(&PEOPLE, Some(&pred), 10, 10);
        assert_eq!(
            q.sql,
            r#"SELECT main."id", main."name", main."remark" FROM "people" main WHERE main."name" = $1 ORDER BY main."id" LIMIT 10 OFFSET 10"#
        );
        let c = count(&PEOPLE, Some(&pred));
        assert_eq!(c.sql, r#"SELECT COUNT(*) FROM "people" WHERE "name" = $1"#);
        assert_eq!(c.params, q.params);
    }

    #[test]
    fn unfiltered_count_has_no_where() {
        assert_eq!(count(&PEOPLE, None).sql, r#"SELECT COUNT(*) FROM "people""#);
    }

    #[test]
    fn soft_delete_guards_reads_and_rewrites_delete() {
        let pred = Predicate::eq("id", "u1");
        let one = select_one(&USERS, Some(&pred));
        assert!(one.sql.contains(r#"WHERE main."id" = $1 AND main."is_deleted" = FALSE"#));
        assert!(one.sql.contains(
            r#"(SELECT sub."name" FROM "users" sub WHERE sub."id" = main."owner_id") AS "owner_name""#
        ));
        let d = delete(&USERS, Some(&pred), &[]);
        assert_eq!(
            d.sql,
            r#"UPDATE "users" SET "is_deleted" = TRUE WHERE "id" = $1 AND "is_deleted" = FALSE"#
        );
        let hard = delete(&PEOPLE, Some(&pred), &[("updated_by", "op".into())]);
        assert_eq!(hard.sql, r#"DELETE FROM "people" WHERE "id" = $1"#);
        assert_eq!(hard.params, vec![BindValue::Text("u1".into())]);
    }

    #[test]
    fn soft_delete_writes_the_stamp_before_the_filter() {
        let pred = Predicate::eq("id", "u1");
        let d = delete(&USERS, Some(&pred), &[("updated_by", "op".into()), ("updated_at", BindValue::Null)]);
        assert_eq!(
            d.sql,
            r#"UPDATE "users" SET "is_deleted" = TRUE, "updated_by" = $1, "updated_at" = $2 WHERE "id" = $3 AND "is_deleted" = FALSE"#
        );
        assert_eq!(
            d.params,
            vec![BindValue::Text("op".into()), BindValue::Null, BindValue::Text("u1".into())]
        );
    }
}
