use pimstore_sql::qb::{self, Condition};
use pimstore_sql::{
    BuiltQuery, Bound, Dialect, Driver, QbError, QbResult, ResultSet, SqlLogConfig, Value,
};
use std::sync::Mutex;

/// In-memory driver recording every statement it is asked to run.
struct MockDriver {
    dialect: Dialect,
    response: ResultSet,
    last_insert_id: Option<i64>,
    fail_with: Option<String>,
    calls: Mutex<Vec<BuiltQuery>>,
}

impl MockDriver {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            response: ResultSet::affected(1),
            last_insert_id: None,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn respond(mut self, response: ResultSet) -> Self {
        self.response = response;
        self
    }

    fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }

    fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    fn calls(&self) -> Vec<BuiltQuery> {
        self.calls.lock().unwrap().clone()
    }
}

impl Driver for MockDriver {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> QbResult<ResultSet> {
        self.calls
            .lock()
            .unwrap()
            .push(BuiltQuery::new(sql.to_string(), values.to_vec()));
        match &self.fail_with {
            Some(message) => Err(QbError::driver(message.clone())),
            None => Ok(self.response.clone()),
        }
    }

    fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pimstore_sql=trace")
        .with_test_writer()
        .try_init();
}

fn returning_row(column: &str, id: i64) -> ResultSet {
    ResultSet {
        columns: vec![column.to_string()],
        rows: vec![vec![Value::BigInt(id)]],
        rows_affected: 1,
    }
}

#[tokio::test]
async fn postgres_insert_id_comes_from_returning_column() {
    init_tracing();
    let driver = MockDriver::new(Dialect::PostgreSql)
        .respond(returning_row("id", 77))
        .with_last_insert_id(5);
    let insert = qb::insert().into("pimitems").value("rev", 0).returning("id");

    let mut bound = Bound::new(&driver, insert);
    assert_eq!(bound.insert_id(), None);
    bound.exec().await.unwrap();

    assert_eq!(bound.insert_id(), Some(77));
    assert_eq!(
        driver.calls(),
        vec![BuiltQuery::new(
            "INSERT INTO pimitems (rev) VALUES (?) RETURNING id".into(),
            vec![Value::Int(0)],
        )]
    );
}

#[tokio::test]
async fn postgres_insert_without_returning_column_has_no_id() {
    let driver = MockDriver::new(Dialect::PostgreSql).with_last_insert_id(5);
    let insert = qb::insert().into("flags").value("name", "\\Seen");

    let mut bound = Bound::new(&driver, insert);
    bound.exec().await.unwrap();
    assert_eq!(bound.insert_id(), None);
}

#[tokio::test]
async fn mysql_insert_id_comes_from_driver() {
    let driver = MockDriver::new(Dialect::MySql).with_last_insert_id(42);
    let insert = qb::insert().into("pimitems").value("rev", 0).returning("id");

    let mut bound = Bound::new(&driver, insert);
    bound.exec().await.unwrap();

    assert_eq!(bound.insert_id(), Some(42));
    // No RETURNING on MySQL even though a column was configured.
    assert_eq!(driver.calls()[0].sql, "INSERT INTO pimitems (rev) VALUES (?)");
}

#[tokio::test]
async fn statement_is_retargeted_to_driver_dialect() {
    let driver = MockDriver::new(Dialect::Sqlite);
    let select = qb::select_with_dialect(Dialect::MySql)
        .column("id")
        .from("pimitems")
        .filter(Condition::eq("id", 1i64))
        .for_update();

    let bound = Bound::new(&driver, select);
    assert_eq!(pimstore_sql::Statement::dialect(bound.statement()), Dialect::Sqlite);

    let mut bound = bound;
    bound.exec().await.unwrap();
    assert_eq!(driver.calls()[0].sql, "SELECT id FROM pimitems WHERE (id = ?)");
}

#[tokio::test]
async fn misuse_is_reported_before_execution() {
    let driver = MockDriver::new(Dialect::PostgreSql);
    let mut bound = Bound::new(&driver, qb::update().table("pimitems"));

    let err = bound.exec().await.unwrap_err();
    assert!(matches!(err, QbError::MissingValues("UPDATE")));
    assert!(err.is_misuse());
    assert!(driver.calls().is_empty());
    assert_eq!(bound.rows_affected(), None);
}

#[tokio::test]
async fn driver_errors_pass_through() {
    init_tracing();
    let driver = MockDriver::new(Dialect::MySql).failing("deadlock detected");
    let mut bound = Bound::new(&driver, qb::delete().from("parttable"))
        .with_log_config(SqlLogConfig::new().with_values().no_truncate());

    let err = bound.exec().await.unwrap_err();
    assert!(matches!(&err, QbError::Driver(m) if m == "deadlock detected"));
    assert!(!err.is_misuse());
    assert!(bound.result().is_none());
}

#[tokio::test]
async fn exec_twice_runs_twice() {
    let driver = MockDriver::new(Dialect::MySql).respond(ResultSet::affected(3));
    let update = qb::update()
        .table("pimitems")
        .value("dirty", true)
        .filter(Condition::eq("collection_id", 4));

    let mut bound = Bound::new(&driver, update);
    assert_eq!(bound.exec().await.unwrap().rows_affected, 3);
    bound.exec().await.unwrap();

    assert_eq!(bound.rows_affected(), Some(3));
    let calls = driver.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[0].values, vec![Value::Bool(true), Value::Int(4)]);
}

#[tokio::test]
async fn select_results_are_kept() {
    let driver = MockDriver::new(Dialect::PostgreSql).respond(ResultSet {
        columns: vec!["id".into(), "name".into()],
        rows: vec![vec![Value::BigInt(1), Value::from("inbox")]],
        rows_affected: 1,
    });
    let select = qb::select().columns(["id", "name"]).from("collections");

    let mut bound = Bound::new(&driver, select);
    bound.exec().await.unwrap();
    let result = bound.into_result().unwrap();
    assert_eq!(result.value(0, "name"), Some(&Value::from("inbox")));
}
