use crate::silent_logs;
use pgscan::{AsValue, NamingPolicy, Preparer, Queryer, StatementNamer, scan_all};

pub async fn prepared<C: Preparer + Queryer>(connection: &mut C) {
    let namer = StatementNamer::new(NamingPolicy::Sequential {
        prefix: "prepared_".into(),
    });

    let square = namer
        .must_prepare(connection, "SELECT $1::INT8 * $1::INT8")
        .await;
    assert_eq!(square, "prepared_0");

    // The counter advances on failures too
    silent_logs! {
        let error = namer
            .prepare(connection, "SELEC 'missing T'")
            .await
            .expect_err("The statement is not valid SQL");
        assert_eq!(error.name, "prepared_1");
        assert_eq!(error.sql, "SELEC 'missing T'");
        assert!(error.to_string().starts_with("pgscan: Prepare(SELEC 'missing T'): "));
    }
    let cube = namer
        .must_prepare(connection, "SELECT $1::INT8 * $1::INT8 * $1::INT8;")
        .await;
    assert_eq!(cube, "prepared_2");
    assert_eq!(namer.issued(), 3);

    // A second namer with the same prefix cannot take over a name
    silent_logs! {
        let clash = StatementNamer::new(NamingPolicy::Sequential {
            prefix: "prepared_".into(),
        });
        let error = clash
            .prepare(connection, "SELECT $1::INT8 + 1")
            .await
            .expect_err("The name is already taken");
        assert_eq!(error.name, "prepared_0");
    }

    let mut results = Vec::<(i64,)>::new();
    for value in 1..=3i64 {
        scan_all(connection, &square, &mut results, vec![value.as_value()])
            .await
            .expect("Failed to run the square statement");
        scan_all(connection, &cube, &mut results, vec![value.as_value()])
            .await
            .expect("Failed to run the cube statement");
    }
    assert_eq!(results, [(1,), (1,), (4,), (8,), (9,), (27,)]);

    // Identity naming: the text is the name, preparing twice is allowed
    let identity = StatementNamer::new(NamingPolicy::Identity);
    let sql = "SELECT 'identity' AS name";
    assert_eq!(identity.must_prepare(connection, sql).await, sql);
    assert_eq!(identity.must_prepare(connection, sql).await, sql);
    let mut names = Vec::<(String,)>::new();
    scan_all(connection, sql, &mut names, vec![])
        .await
        .expect("Failed to run the identity statement");
    assert_eq!(names, [("identity".to_string(),)]);
}
