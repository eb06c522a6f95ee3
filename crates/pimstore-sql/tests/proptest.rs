use pimstore_sql::qb::{self, CompareOp, Condition, Statement};
use pimstore_sql::{Dialect, Value};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::BigInt),
        any::<bool>().prop_map(Value::Bool),
        "[a-z?' ]{0,8}".prop_map(Value::String),
    ]
}

fn arb_column() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(\\.[a-z]{1,6})?"
}

fn arb_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Equals),
        Just(CompareOp::NotEquals),
        Just(CompareOp::Is),
        Just(CompareOp::IsNot),
        Just(CompareOp::Less),
        Just(CompareOp::LessOrEqual),
        Just(CompareOp::Greater),
        Just(CompareOp::GreaterOrEqual),
        Just(CompareOp::Like),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::Empty),
        (arb_column(), arb_op(), arb_value())
            .prop_map(|(col, op, v)| Condition::compare(col, op, v)),
        (arb_column(), arb_column()).prop_map(|(l, r)| Condition::columns(l, r)),
        (arb_column(), proptest::collection::vec(arb_value(), 0..4))
            .prop_map(|(col, vs)| Condition::in_list(col, vs)),
    ]
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(|c| Condition::and(c)),
            proptest::collection::vec(inner, 0..4).prop_map(|c| Condition::or(c)),
        ]
    })
}

fn arb_dialect() -> impl Strategy<Value = Dialect> {
    prop_oneof![
        Just(Dialect::Generic),
        Just(Dialect::MySql),
        Just(Dialect::PostgreSql),
        Just(Dialect::Sqlite),
    ]
}

/// Generated column names never contain `?`.
fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

/// Number value-carrying leaves in tree order: leaf `k` gets column `V<k>`
/// and binds `k`. Generated columns are lowercase, so `V` never collides.
fn label_leaves(cond: Condition, next: &mut i32) -> Condition {
    match cond {
        Condition::ValueCompare { op, .. } => {
            let k = *next;
            *next += 1;
            Condition::compare(format!("V{k}"), op, k)
        }
        Condition::ValueList { values, negated, .. } => {
            let k = *next;
            *next += 1;
            Condition::ValueList {
                column: format!("V{k}"),
                values: vec![Value::Int(k); values.len()],
                negated,
            }
        }
        Condition::Group { children, logic } => Condition::Group {
            children: children.into_iter().map(|c| label_leaves(c, next)).collect(),
            logic,
        },
        other => other,
    }
}

/// For each `?` in the text, the label of the nearest `V<k>` before it,
/// plus every label in the order it appears.
fn placeholder_owners(sql: &str) -> (Vec<Option<i32>>, Vec<i32>) {
    let mut owners = Vec::new();
    let mut labels = Vec::new();
    let mut current = None;
    let mut chars = sql.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            'V' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                current = digits.parse().ok();
                labels.extend(current);
            }
            '?' => owners.push(current),
            _ => {}
        }
    }
    (owners, labels)
}

proptest! {
    #[test]
    fn condition_placeholders_match_values(cond in arb_condition()) {
        prop_assert_eq!(placeholders(&cond.to_sql()), cond.bound_values().len());
    }

    #[test]
    fn condition_rendering_is_deterministic(cond in arb_condition()) {
        prop_assert_eq!(cond.to_sql(), cond.to_sql());
        prop_assert_eq!(cond.bound_values(), cond.bound_values());
    }

    #[test]
    fn select_placeholders_match_values(
        where_cond in arb_condition(),
        having in arb_condition(),
        join_on in arb_condition(),
        dialect in arb_dialect(),
        limit in proptest::option::of(0u64..1000),
    ) {
        let mut q = qb::select_with_dialect(dialect)
            .column("id")
            .from("t")
            .inner_join("u", join_on)
            .filter(where_cond)
            .group_by("id")
            .having(having);
        if let Some(n) = limit {
            q = q.limit(n);
        }
        let built = q.build().unwrap();
        prop_assert_eq!(built.placeholder_count(), built.values.len());
    }

    #[test]
    fn mutation_placeholders_match_values(
        values in proptest::collection::vec(arb_value(), 1..6),
        cond in arb_condition(),
        dialect in arb_dialect(),
    ) {
        let mut insert = qb::insert_with_dialect(dialect).into("t").returning("id");
        let mut update = qb::update_with_dialect(dialect).table("t").filter(cond.clone());
        for (i, v) in values.iter().enumerate() {
            insert = insert.value(format!("c{i}"), v.clone());
            update = update.value(format!("c{i}"), v.clone());
        }
        let delete = qb::delete_with_dialect(dialect).from("t").filter(cond);

        for built in [insert.build().unwrap(), update.build().unwrap(), delete.build().unwrap()] {
            prop_assert_eq!(built.placeholder_count(), built.values.len());
        }
    }

    #[test]
    fn serialize_is_idempotent(cond in arb_condition(), dialect in arb_dialect()) {
        let q = qb::select_with_dialect(dialect).column("id").from("t").filter(cond);
        prop_assert_eq!(q.serialize().unwrap(), q.serialize().unwrap());
    }

    #[test]
    fn bound_values_follow_text_order(cond in arb_condition()) {
        let cond = label_leaves(cond, &mut 0);
        let (owners, labels) = placeholder_owners(&cond.to_sql());

        let bound: Vec<Option<i32>> = cond
            .bound_values()
            .into_iter()
            .map(|v| match v {
                Value::Int(k) => Some(k),
                _ => None,
            })
            .collect();
        prop_assert_eq!(owners, bound);
        prop_assert!(labels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn nested_or_is_never_flattened(
        a in (arb_column(), any::<i32>()),
        b in (arb_column(), any::<i32>()),
        c in (arb_column(), any::<i32>()),
    ) {
        let cond = Condition::and([
            Condition::eq(a.0.clone(), a.1),
            Condition::or([Condition::eq(b.0.clone(), b.1), Condition::eq(c.0.clone(), c.1)]),
        ]);
        let expected = format!("(({} = ?) AND (({} = ?) OR ({} = ?)))", a.0, b.0, c.0);
        prop_assert_eq!(cond.to_sql(), expected);
        prop_assert_eq!(
            cond.bound_values(),
            vec![Value::Int(a.1), Value::Int(b.1), Value::Int(c.1)]
        );
    }
}
