
#[cfg(test)]
mod tests {
    use super::init::init;
    use pgscan_core::{AsValue, Preparer, must_prepare, scan_all};
    use pgscan_postgres::PostgresConnection;
    use pgscan_tests::{execute_tests, init_logs, silent_logs};
    use std::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn postgres() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let (url, container) = init().await;
        let error_msg = format!("Could not connect to `{url}`");
        let connection = PostgresConnection::connect(&url)
            .await
            .expect(&error_msg);
        execute_tests(connection).await;
        drop(container);
    }

    #[tokio::test]
    async fn statement_table() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let (url, container) = init().await;
        let mut connection = PostgresConnection::connect(&url)
            .await
            .expect("Could not connect");
        let name = must_prepare(&mut connection, "SELECT $1::INT4").await;
        assert!(connection.statement(&name).is_some());
        assert_eq!(connection.statements().collect::<Vec<_>>(), [name.as_str()]);

        let statement = connection
            .prepare("again", "SELECT $1::INT4;")
            .await
            .expect("Failed to prepare");
        assert_eq!(statement.params().len(), 1);
        // Same text under the same name is accepted, a different one is not
        connection
            .prepare("again", "SELECT $1::INT4")
            .await
            .expect("Same statement under the same name");
        let error = connection
            .prepare("again", "SELECT $1::INT8")
            .await
            .expect_err("The name is already taken");
        assert!(format!("{:#}", error).contains("already taken"));
        assert_eq!(
            connection.statement("again").map(|v| v.params()[0].clone()),
            Some(tokio_postgres::types::Type::INT4)
        );

        assert!(connection.deallocate(&name));
        assert!(!connection.deallocate(&name));
        assert!(connection.statement(&name).is_none());
        silent_logs! {
            // The name is now plain (invalid) SQL
            let mut values = Vec::<(i32,)>::new();
            assert!(
                scan_all(&mut connection, &name, &mut values, vec![1i32.as_value()])
                    .await
                    .is_err()
            );
        }
        drop(container);
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                PostgresConnection::connect("mysql://some_url")
                    .await
                    .is_err()
            );
        }
    }
}
