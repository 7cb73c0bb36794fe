//! Database operations for categories.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Argb, ChangeNotifier, DatabaseId, EntityName, Error, LiveQuery,
    category::Category,
    db::lock,
    screen::Repository,
};

/// A category row exactly as it is stored in the `categorias` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// The `id` column.
    pub id: Option<DatabaseId>,
    /// The `nome` column.
    pub name: String,
    /// The `tipo` column, either `EXPENSE` or `INCOME`.
    pub kind: String,
    /// The `icone` column.
    pub icon: Option<String>,
    /// The `cor` column, an ARGB value stored as a signed 32-bit integer.
    pub color: Option<i32>,
}

impl From<&Category> for CategoryRecord {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
            kind: category.kind.as_str().to_owned(),
            icon: category.icon.clone(),
            color: category.color.map(|color| color.0 as i32),
        }
    }
}

impl TryFrom<CategoryRecord> for Category {
    type Error = Error;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            name: EntityName::new_unchecked(&record.name),
            kind: record.kind.parse()?,
            icon: record.icon,
            color: record.color.map(|color| Argb(color as u32)),
        })
    }
}

/// Create the category table and its indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categorias (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            tipo TEXT NOT NULL,
            icone TEXT,
            cor INTEGER
        );

        CREATE UNIQUE INDEX IF NOT EXISTS index_categorias_nome ON categorias(nome);
        CREATE INDEX IF NOT EXISTS index_categorias_tipo ON categorias(tipo);",
    )?;

    Ok(())
}

/// Retrieve all categories in the order they were created.
///
/// # Errors
/// Returns [Error::InvalidCategoryKind] if a row has an unknown `tipo`.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, nome, tipo, icone, cor FROM categorias ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_record| Category::try_from(maybe_record?))
        .collect()
}

/// Insert `category`, or replace the row with the same ID, and return the row's ID.
fn save_category(category: &Category, connection: &Connection) -> Result<DatabaseId, Error> {
    let record = CategoryRecord::from(category);

    connection
        .execute(
            "INSERT INTO categorias (id, nome, tipo, icone, cor) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                nome = excluded.nome,
                tipo = excluded.tipo,
                icone = excluded.icone,
                cor = excluded.cor;",
            (
                record.id,
                &record.name,
                &record.kind,
                &record.icon,
                record.color,
            ),
        )
        .map_err(|error| Error::from_write(error, &record.name))?;

    Ok(record.id.unwrap_or_else(|| connection.last_insert_rowid()))
}

fn map_row(row: &Row) -> Result<CategoryRecord, rusqlite::Error> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
    })
}

/// Stores categories in SQLite and wakes live queries after every write.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryRepository {
    connection: Arc<Mutex<Connection>>,
    notifier: ChangeNotifier,
}

impl SQLiteCategoryRepository {
    /// Create a repository over an initialized database.
    ///
    /// Create one repository per connection and clone it, so that every copy shares the same
    /// change notifier.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            notifier: ChangeNotifier::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Mutex<Connection> {
        &self.connection
    }
}

impl Repository for SQLiteCategoryRepository {
    type Entity = Category;

    fn observe_all(&self) -> LiveQuery<Vec<Category>> {
        let connection = self.connection.clone();

        self.notifier
            .live_query(move || get_all_categories(&*lock(&connection)?))
    }

    fn save(&self, category: &Category) -> Result<DatabaseId, Error> {
        let id = save_category(category, &*lock(&self.connection)?)?;
        self.notifier.notify();

        Ok(id)
    }

    fn delete(&self, category: &Category) -> Result<(), Error> {
        let Some(id) = category.id else {
            return Ok(());
        };

        lock(&self.connection)?.execute("DELETE FROM categorias WHERE id = ?1", [id])?;
        self.notifier.notify();

        Ok(())
    }
}

#[cfg(test)]
mod category_repository_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Argb, Category, CategoryKind, EntityName, Error, MessageRef, Repository,
        SQLiteCategoryRepository, db::initialize,
    };

    use super::get_all_categories;

    fn get_test_repository() -> SQLiteCategoryRepository {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        SQLiteCategoryRepository::new(Arc::new(Mutex::new(connection)))
    }

    fn stored(repository: &SQLiteCategoryRepository) -> Vec<Category> {
        get_all_categories(&repository.connection().lock().unwrap())
            .expect("Could not get categories")
    }

    fn groceries() -> Category {
        Category {
            id: None,
            name: EntityName::new_unchecked("Groceries"),
            kind: CategoryKind::Expense,
            icon: Some("RECEIPT".to_owned()),
            color: Some(Argb(0xFFFF_0000)),
        }
    }

    #[test]
    fn save_new_category_assigns_id() {
        let repository = get_test_repository();

        let id = repository
            .save(&groceries())
            .expect("Could not save category");

        let want = Category {
            id: Some(id),
            ..groceries()
        };
        assert_eq!(stored(&repository), vec![want]);
    }

    #[test]
    fn save_with_id_replaces_row() {
        let repository = get_test_repository();
        let id = repository
            .save(&groceries())
            .expect("Could not save category");

        let salary = Category {
            id: Some(id),
            name: EntityName::new_unchecked("Salary"),
            kind: CategoryKind::Income,
            icon: None,
            color: Some(Argb(0xFF00_FF00)),
        };
        let got_id = repository.save(&salary).expect("Could not save category");

        assert_eq!(got_id, id);
        assert_eq!(stored(&repository), vec![salary]);
    }

    #[test]
    fn save_with_unknown_id_inserts_with_that_id() {
        let repository = get_test_repository();
        let category = Category {
            id: Some(42),
            ..groceries()
        };

        let id = repository.save(&category).expect("Could not save category");

        assert_eq!(id, 42);
        assert_eq!(stored(&repository), vec![category]);
    }

    #[test]
    fn save_duplicate_name_fails_and_changes_nothing() {
        let repository = get_test_repository();
        repository
            .save(&groceries())
            .expect("Could not save category");
        let want = stored(&repository);

        let result = repository.save(&Category {
            kind: CategoryKind::Income,
            ..groceries()
        });

        match result {
            Err(Error::ConstraintViolation { message, name, .. }) => {
                assert_eq!(message, MessageRef::SaveFailed);
                assert_eq!(name, "Groceries");
            }
            other => panic!("Expected a constraint violation, got {other:?}"),
        }
        assert_eq!(stored(&repository), want);
    }

    #[test]
    fn save_under_own_name_succeeds() {
        let repository = get_test_repository();
        let id = repository
            .save(&groceries())
            .expect("Could not save category");

        let recoloured = Category {
            id: Some(id),
            color: Some(Argb(0xFF00_00FF)),
            ..groceries()
        };

        assert_eq!(repository.save(&recoloured), Ok(id));
        assert_eq!(stored(&repository), vec![recoloured]);
    }

    #[test]
    fn delete_removes_only_target() {
        let repository = get_test_repository();
        let groceries_id = repository
            .save(&groceries())
            .expect("Could not save category");
        let rent = Category {
            name: EntityName::new_unchecked("Rent"),
            ..groceries()
        };
        let rent_id = repository.save(&rent).expect("Could not save category");

        repository
            .delete(&Category {
                id: Some(groceries_id),
                ..groceries()
            })
            .expect("Could not delete category");

        assert_eq!(
            stored(&repository),
            vec![Category {
                id: Some(rent_id),
                ..rent
            }]
        );
    }

    #[test]
    fn delete_missing_category_is_a_no_op() {
        let repository = get_test_repository();
        repository
            .save(&groceries())
            .expect("Could not save category");

        let missing = Category {
            id: Some(999),
            ..groceries()
        };

        assert_eq!(repository.delete(&missing), Ok(()));
        assert_eq!(repository.delete(&groceries()), Ok(()));
        assert_eq!(stored(&repository).len(), 1);
    }

    #[test]
    fn unknown_stored_kind_is_an_error() {
        let repository = get_test_repository();
        repository
            .connection()
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO categorias (nome, tipo) VALUES ('Odd', 'TRANSFER')",
                (),
            )
            .expect("Could not insert test row");

        let result = get_all_categories(&repository.connection().lock().unwrap());

        assert_eq!(
            result,
            Err(Error::InvalidCategoryKind("TRANSFER".to_owned()))
        );
    }

    #[test]
    fn opaque_colors_are_stored_as_negative_integers() {
        let repository = get_test_repository();
        let connection = repository.connection().lock().unwrap();
        connection
            .execute(
                "INSERT INTO categorias (nome, tipo, cor) VALUES ('Green', 'INCOME', ?1)",
                [0xFF00_FF00_u32 as i32],
            )
            .expect("Could not insert test row");

        let categories = get_all_categories(&connection).expect("Could not get categories");

        assert_eq!(categories[0].color, Some(Argb(0xFF00_FF00)));
    }

    #[test]
    fn colors_round_trip_through_the_signed_column() {
        let repository = get_test_repository();
        let id = repository
            .save(&groceries())
            .expect("Could not save category");

        let stored_color: i64 = repository
            .connection()
            .lock()
            .unwrap()
            .query_row("SELECT cor FROM categorias WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .expect("Could not read color");

        assert_eq!(stored_color, i64::from(0xFFFF_0000_u32 as i32));
        assert_eq!(stored(&repository)[0].color, Some(Argb(0xFFFF_0000)));
    }

    #[tokio::test]
    async fn observe_all_yields_again_after_each_write() {
        let repository = get_test_repository();
        let mut query = repository.observe_all();

        let first = query.next().await.expect("Query ended early");
        assert_eq!(first, Ok(vec![]));

        let id = repository
            .save(&groceries())
            .expect("Could not save category");

        let second = query.next().await.expect("Query ended early");
        assert_eq!(
            second,
            Ok(vec![Category {
                id: Some(id),
                ..groceries()
            }])
        );
    }
}
