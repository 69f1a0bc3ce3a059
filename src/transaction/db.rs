//! Database queries for transactions.

use rusqlite::{Connection, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionWithCategory},
};

const TRANSACTION_COLUMNS: &str = "id, name, amount, notes, transaction_type, transaction_date, \
     user_id, category_id, created_at";

/// Map a failed foreign key check on the category to [Error::NoCategoryFound].
fn map_category_constraint(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::NoCategoryFound,
        error => error.into(),
    }
}

/// Create a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NoCategoryFound] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (name, amount, notes, transaction_type, transaction_date, user_id, category_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.name,
                new_transaction.amount,
                new_transaction.notes,
                new_transaction.transaction_type,
                new_transaction.transaction_date,
                user_id.as_i64(),
                new_transaction.category_id,
                created_at,
            ),
            map_transaction_row,
        )
        .map_err(map_category_constraint)
}

/// Retrieve the transaction `transaction_id` owned by `user_id`.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if there is no such transaction under the user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Retrieve the user's transactions with their categories, latest transaction
/// date first.
///
/// With `since`, only transactions dated at or after `since` are returned.
pub fn get_transactions(
    user_id: UserID,
    since: Option<OffsetDateTime>,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.name, t.amount, t.notes, t.transaction_type, t.transaction_date,
                    t.user_id, t.category_id, t.created_at,
                    c.id, c.name, c.notes, c.icon, c.user_id, c.created_at
             FROM \"transaction\" t
             LEFT JOIN category c ON c.id = t.category_id
             WHERE t.user_id = :user_id AND (:since IS NULL OR t.transaction_date >= :since)
             ORDER BY t.transaction_date DESC, t.id DESC",
        )?
        .query_map(
            named_params! { ":user_id": user_id.as_i64(), ":since": since },
            map_transaction_with_category_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the editable fields of the user's transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if there is no such transaction under the user,
/// - [Error::NoCategoryFound] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET name = ?1, amount = ?2, notes = ?3, transaction_type = ?4,
                 transaction_date = ?5, category_id = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.name,
                transaction.amount,
                transaction.notes,
                transaction.transaction_type,
                transaction.transaction_date,
                transaction.category_id,
                transaction_id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => map_category_constraint(error),
        })
}

/// Delete the user's transaction.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if there is no such transaction under the user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount TEXT NOT NULL,
            notes TEXT,
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('INCOME', 'EXPENSE')),
            transaction_date TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, transaction_date);",
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        notes: row.get(3)?,
        transaction_type: row.get(4)?,
        transaction_date: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        category_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Map a row of the transaction-category join, the category columns start at index 9.
fn map_transaction_with_category_row(
    row: &Row,
) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;

    let category = match row.get::<_, Option<CategoryId>>(9)? {
        Some(id) => {
            let raw_name: String = row.get(10)?;

            Some(Category {
                id,
                name: CategoryName::new_unchecked(&raw_name),
                notes: row.get(11)?,
                icon: row.get(12)?,
                user_id: UserID::new(row.get(13)?),
                created_at: row.get(14)?,
            })
        }
        None => None,
    };

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Error, TransactionType,
        auth::UserID,
        category::Category,
        transaction::{
            NewTransaction,
            db::{
                delete_transaction, get_transaction, get_transactions, insert_transaction,
                update_transaction,
            },
        },
        test_utils::{
            create_second_test_user, create_test_category, create_test_user, get_test_connection,
        },
    };

    fn new_transaction(category: &Category, date: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            name: "Groceries".to_owned(),
            amount: "42.50".to_owned(),
            notes: None,
            transaction_type: TransactionType::Expense,
            transaction_date: date,
            category_id: category.id,
        }
    }

    fn setup() -> (Connection, UserID, Category) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let category = create_test_category(&connection, user.id, "Food");
        (connection, user.id, category)
    }

    #[test]
    fn insert_transaction_succeeds() {
        let (connection, user_id, category) = setup();
        let date = datetime!(2025-03-31 00:00:00 UTC);

        let transaction =
            insert_transaction(new_transaction(&category, date), user_id, &connection).unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, "42.50");
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.transaction_date, date);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.category_id, category.id);
    }

    #[test]
    fn insert_transaction_fails_on_invalid_category() {
        let (connection, user_id, category) = setup();
        let mut transaction = new_transaction(&category, datetime!(2025-03-31 00:00:00 UTC));
        transaction.category_id = category.id + 999;

        let result = insert_transaction(transaction, user_id, &connection);

        assert_eq!(result, Err(Error::NoCategoryFound));
    }

    #[test]
    fn get_transaction_is_scoped_to_user() {
        let (connection, user_id, category) = setup();
        let other_user = create_second_test_user(&connection);
        let transaction = insert_transaction(
            new_transaction(&category, datetime!(2025-03-31 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        assert_eq!(
            get_transaction(transaction.id, user_id, &connection),
            Ok(transaction.clone())
        );
        assert_eq!(
            get_transaction(transaction.id, other_user.id, &connection),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn get_transactions_orders_by_date_and_joins_category() {
        let (connection, user_id, category) = setup();
        let older = insert_transaction(
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();
        let newer = insert_transaction(
            new_transaction(&category, datetime!(2025-02-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        let transactions = get_transactions(user_id, None, &connection).unwrap();

        let ids: Vec<_> = transactions.iter().map(|t| t.transaction.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(transactions[0].category.as_ref(), Some(&category));
    }

    #[test]
    fn get_transactions_filters_by_since() {
        let (connection, user_id, category) = setup();
        insert_transaction(
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();
        let on_cutoff = insert_transaction(
            new_transaction(&category, datetime!(2025-02-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        let transactions = get_transactions(
            user_id,
            Some(datetime!(2025-02-01 00:00:00 UTC)),
            &connection,
        )
        .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction, on_cutoff);
    }

    #[test]
    fn get_transactions_excludes_other_users() {
        let (connection, user_id, category) = setup();
        let other_user = create_second_test_user(&connection);
        let other_category = create_test_category(&connection, other_user.id, "Theirs");
        insert_transaction(
            new_transaction(&other_category, datetime!(2025-01-01 00:00:00 UTC)),
            other_user.id,
            &connection,
        )
        .unwrap();
        insert_transaction(
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        let transactions = get_transactions(user_id, None, &connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction.user_id, user_id);
    }

    #[test]
    fn update_transaction_succeeds() {
        let (connection, user_id, category) = setup();
        let other_category = create_test_category(&connection, user_id, "Other");
        let transaction = insert_transaction(
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            user_id,
            NewTransaction {
                name: "Salary".to_owned(),
                amount: "1000".to_owned(),
                notes: Some("March".to_owned()),
                transaction_type: TransactionType::Income,
                transaction_date: datetime!(2025-03-01 00:00:00 UTC),
                category_id: other_category.id,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.name, "Salary");
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.category_id, other_category.id);
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let (connection, user_id, category) = setup();

        let result = update_transaction(
            42,
            user_id,
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            &connection,
        );

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_transaction_succeeds_once() {
        let (connection, user_id, category) = setup();
        let transaction = insert_transaction(
            new_transaction(&category, datetime!(2025-01-01 00:00:00 UTC)),
            user_id,
            &connection,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, user_id, &connection), Ok(()));
        assert_eq!(
            delete_transaction(transaction.id, user_id, &connection),
            Err(Error::TransactionNotFound)
        );
    }
}
