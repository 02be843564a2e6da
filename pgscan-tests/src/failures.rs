use crate::{run, silent_logs};
use pgscan::{Preparer, Queryer, Scannable, scan_all};

pub async fn failures<C: Preparer + Queryer>(connection: &mut C) {
    #[derive(Default, Debug, PartialEq, Scannable)]
    struct Tag {
        id: i32,
        name: String,
        #[scan(skip)]
        seen: bool,
    }

    run(connection, "DROP TABLE IF EXISTS pgscan_tags").await;
    run(
        connection,
        "CREATE TABLE pgscan_tags (id INTEGER PRIMARY KEY, name TEXT)",
    )
    .await;
    run(
        connection,
        "INSERT INTO pgscan_tags (id, name) VALUES (1, 'one'), (2, NULL), (3, 'three')",
    )
    .await;

    // NULL into a String stops at the second row, which stays appended
    silent_logs! {
        let mut tags = Vec::<Tag>::new();
        let error = scan_all(
            connection,
            "SELECT id, name FROM pgscan_tags ORDER BY id",
            &mut tags,
            vec![],
        )
        .await
        .expect_err("NULL cannot be stored into a String");
        assert!(format!("{:#}", error).contains("Option<"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "one");
        assert_eq!(tags[1].id, 2);
        assert_eq!(tags[1].name, "");
    }

    // Nullable columns scan into options
    let mut tags = Vec::<(i32, Option<String>)>::new();
    scan_all(
        connection,
        "SELECT id, name FROM pgscan_tags ORDER BY id",
        &mut tags,
        vec![],
    )
    .await
    .expect("Failed to scan the nullable tags");
    assert_eq!(
        tags,
        [(1, Some("one".into())), (2, None), (3, Some("three".into()))]
    );

    // Query errors leave the destination alone
    silent_logs! {
        let mut tags = vec![Tag {
            id: 9,
            name: "kept".into(),
            seen: true,
        }];
        assert!(
            scan_all(connection, "SELECT id, name FROM pgscan_missing", &mut tags, vec![])
                .await
                .is_err()
        );
        assert_eq!(tags.len(), 1);
        assert!(tags[0].seen);
    }

    // Wrong number of columns
    silent_logs! {
        let mut ids = Vec::<(i32,)>::new();
        assert!(
            scan_all(connection, "SELECT id, name FROM pgscan_tags", &mut ids, vec![])
                .await
                .is_err()
        );
        assert_eq!(ids.len(), 1);
    }

    // Wrong number of arguments
    silent_logs! {
        let mut ids = Vec::<(i32,)>::new();
        assert!(
            scan_all(connection, "SELECT id FROM pgscan_tags WHERE id = $1", &mut ids, vec![])
                .await
                .is_err()
        );
        assert!(ids.is_empty());
    }

    run(connection, "DROP TABLE pgscan_tags").await;
}
