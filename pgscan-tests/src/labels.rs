use crate::run;
use pgscan::{AsValue, NamingPolicy, Preparer, Queryer, Scannable, StatementNamer, scan_all, scan_one};

pub async fn labels<C: Preparer + Queryer>(connection: &mut C) {
    #[derive(Default, Debug, PartialEq, Scannable)]
    struct Label {
        id: i32,
        name: String,
    }

    // Setup
    run(connection, "DROP TABLE IF EXISTS pgscan_labels").await;
    run(
        connection,
        "CREATE TABLE pgscan_labels (id INTEGER PRIMARY KEY, name TEXT NOT NULL, amount BIGINT NOT NULL)",
    )
    .await;
    run(
        connection,
        "INSERT INTO pgscan_labels (id, name, amount) VALUES (1, 'a', 50), (2, 'b', 20), (3, 'c', 5)",
    )
    .await;

    // Prepared once, queried by name
    let namer = StatementNamer::new(NamingPolicy::Sequential {
        prefix: "labels_".into(),
    });
    let by_amount = namer
        .must_prepare(
            connection,
            "SELECT id, name FROM pgscan_labels WHERE amount > $1 ORDER BY id",
        )
        .await;
    assert_eq!(by_amount, "labels_0");
    let mut labels = Vec::<Label>::new();
    scan_all(connection, &by_amount, &mut labels, vec![10i32.as_value()])
        .await
        .expect("Failed to scan the labels");
    assert_eq!(
        labels,
        [
            Label {
                id: 1,
                name: "a".into()
            },
            Label {
                id: 2,
                name: "b".into()
            },
        ]
    );

    // Same statement, no matching rows
    let mut labels = Vec::<Label>::new();
    scan_all(connection, &by_amount, &mut labels, vec![1000i64.as_value()])
        .await
        .expect("An empty result is not an error");
    assert!(labels.is_empty());

    // Raw SQL into tuples
    let mut amounts = Vec::<(i64, String)>::new();
    scan_all(
        connection,
        "SELECT amount, name FROM pgscan_labels ORDER BY amount DESC",
        &mut amounts,
        vec![],
    )
    .await
    .expect("Failed to scan the amounts");
    assert_eq!(
        amounts,
        [(50, "a".into()), (20, "b".into()), (5, "c".into())]
    );

    // First row only
    let mut label = Label::default();
    let found = scan_one(
        connection,
        "SELECT id, name FROM pgscan_labels WHERE name = $1",
        &mut label,
        vec!["c".into()],
    )
    .await
    .expect("Failed to scan one label");
    assert!(found);
    assert_eq!(
        label,
        Label {
            id: 3,
            name: "c".into()
        }
    );
    let found = scan_one(
        connection,
        "SELECT id, name FROM pgscan_labels WHERE name = $1",
        &mut label,
        vec!["z".into()],
    )
    .await
    .expect("An empty result is not an error");
    assert!(!found);
    assert_eq!(label.id, 3);

    run(connection, "DROP TABLE pgscan_labels").await;
}
