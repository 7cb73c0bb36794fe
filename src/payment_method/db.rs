//! Database operations for payment methods.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    ChangeNotifier, DatabaseId, EntityName, Error, LiveQuery, db::lock,
    payment_method::PaymentMethod, screen::Repository,
};

/// A payment method row exactly as it is stored in the `formas_pagamento` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRecord {
    /// The `id` column.
    pub id: Option<DatabaseId>,
    /// The `nome` column.
    pub name: String,
    /// The `icone` column.
    pub icon: Option<String>,
}

impl From<&PaymentMethod> for PaymentMethodRecord {
    fn from(payment_method: &PaymentMethod) -> Self {
        Self {
            id: payment_method.id,
            name: payment_method.name.to_string(),
            icon: payment_method.icon.clone(),
        }
    }
}

impl From<PaymentMethodRecord> for PaymentMethod {
    fn from(record: PaymentMethodRecord) -> Self {
        Self {
            id: record.id,
            name: EntityName::new_unchecked(&record.name),
            icon: record.icon,
        }
    }
}

/// Create the payment method table and its indexes.
pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS formas_pagamento (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            icone TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS index_formas_pagamento_nome ON formas_pagamento(nome);",
    )?;

    Ok(())
}

/// Retrieve all payment methods in the order they were created.
pub fn get_all_payment_methods(connection: &Connection) -> Result<Vec<PaymentMethod>, Error> {
    connection
        .prepare("SELECT id, nome, icone FROM formas_pagamento ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_record| {
            maybe_record
                .map(PaymentMethod::from)
                .map_err(|error| error.into())
        })
        .collect()
}

fn save_payment_method(
    payment_method: &PaymentMethod,
    connection: &Connection,
) -> Result<DatabaseId, Error> {
    let record = PaymentMethodRecord::from(payment_method);

    connection
        .execute(
            "INSERT INTO formas_pagamento (id, nome, icone) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET nome = excluded.nome, icone = excluded.icone;",
            (record.id, &record.name, &record.icon),
        )
        .map_err(|error| Error::from_write(error, &record.name))?;

    Ok(record.id.unwrap_or_else(|| connection.last_insert_rowid()))
}

fn map_row(row: &Row) -> Result<PaymentMethodRecord, rusqlite::Error> {
    Ok(PaymentMethodRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
    })
}

/// Stores payment methods in SQLite and wakes live queries after every write.
#[derive(Debug, Clone)]
pub struct SQLitePaymentMethodRepository {
    connection: Arc<Mutex<Connection>>,
    notifier: ChangeNotifier,
}

impl SQLitePaymentMethodRepository {
    /// Create a repository over an initialized database.
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

impl Repository for SQLitePaymentMethodRepository {
    type Entity = PaymentMethod;

    fn observe_all(&self) -> LiveQuery<Vec<PaymentMethod>> {
        let connection = self.connection.clone();

        self.notifier
            .live_query(move || get_all_payment_methods(&*lock(&connection)?))
    }

    fn save(&self, payment_method: &PaymentMethod) -> Result<DatabaseId, Error> {
        let id = save_payment_method(payment_method, &*lock(&self.connection)?)?;
        self.notifier.notify();

        Ok(id)
    }

    fn delete(&self, payment_method: &PaymentMethod) -> Result<(), Error> {
        let Some(id) = payment_method.id else {
            return Ok(());
        };

        lock(&self.connection)?.execute("DELETE FROM formas_pagamento WHERE id = ?1", [id])?;
        self.notifier.notify();

        Ok(())
    }
}
