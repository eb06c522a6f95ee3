use pimstore_sql::qb::{self, Condition, Statement, and, column, count, on};
use pimstore_sql::{Dialect, Value};

#[test]
fn select_with_column_alias() {
    let q = qb::select()
        .columns([column("col1"), column("col2").alias("alias")])
        .from("table");
    assert_eq!(q.serialize().unwrap(), "SELECT col1, col2 AS alias FROM table");
    assert!(q.bound_values().is_empty());
}

#[test]
fn select_count_all() {
    let q = qb::select().column(count().alias("cnt")).from("table");
    assert_eq!(q.serialize().unwrap(), "SELECT COUNT(*) AS cnt FROM table");
    assert!(q.bound_values().is_empty());
}

#[test]
fn select_with_anded_where() {
    let q = qb::select()
        .column("col1")
        .from("table")
        .filter(and([
            Condition::eq("col1", 42),
            Condition::eq("col2", "someValue"),
        ]));
    assert_eq!(
        q.serialize().unwrap(),
        "SELECT col1 FROM table WHERE ((col1 = ?) AND (col2 = ?))"
    );
    assert_eq!(q.bound_values(), vec![Value::Int(42), Value::from("someValue")]);
}

#[test]
fn select_inner_join_with_value_condition() {
    let q = qb::select()
        .column("t2.col1")
        .from("t1")
        .inner_join(
            "t2",
            and([on("t1.col1", "t2.col1"), Condition::eq("t1.col1", "bla")]),
        );
    assert_eq!(
        q.serialize().unwrap(),
        "SELECT t2.col1 FROM t1 INNER JOIN t2 ON ((t1.col1 = t2.col1) AND (t1.col1 = ?))"
    );
    assert_eq!(q.bound_values(), vec![Value::from("bla")]);
}

#[test]
fn insert_returning_depends_on_dialect() {
    let q = qb::insert_with_dialect(Dialect::PostgreSql)
        .into("table")
        .value("col2", 42)
        .returning("col1");
    assert_eq!(
        q.serialize().unwrap(),
        "INSERT INTO table (col2) VALUES (?) RETURNING col1"
    );
    assert_eq!(q.bound_values(), vec![Value::Int(42)]);

    let q = q.with_dialect(Dialect::Generic);
    assert_eq!(q.serialize().unwrap(), "INSERT INTO table (col2) VALUES (?)");
    assert_eq!(q.bound_values(), vec![Value::Int(42)]);
}

#[test]
fn delete_with_and_without_where() {
    let q = qb::delete().table("table").filter(Condition::eq("col1", 42));
    assert_eq!(q.serialize().unwrap(), "DELETE FROM table WHERE (col1 = ?)");
    assert_eq!(q.bound_values(), vec![Value::Int(42)]);

    let q = qb::delete().table("table");
    assert_eq!(q.serialize().unwrap(), "DELETE FROM table");
    assert!(q.bound_values().is_empty());
}

#[test]
fn display_matches_to_sql() {
    let q = qb::update().table("t").value("a", 1).filter(Condition::eq("b", 2));
    assert_eq!(q.to_string(), q.to_sql());
    assert_eq!(q.to_string(), "UPDATE t SET a = ? WHERE (b = ?)");
}

#[test]
fn builders_are_reusable_after_rendering() {
    let q = qb::select()
        .column("id")
        .from("pimitems")
        .filter(Condition::in_list("collection_id", [1i64, 2, 3]));
    let first = q.build().unwrap();
    let second = q.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.placeholder_count(), 3);
}
