use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
    time::Duration,
};

use log::{debug, info, warn};
use rusqlite::{Connection, Transaction};

use crate::{
    config::{StoreConfig, StorePath},
    error::{EavError, Result},
    persistence::schema,
};

/// Anything the components can run their statements against.
///
/// Both a [`Store`] and a [`StoreTransaction`] are handles, so every table,
/// column, row and cell operation works the same way inside and outside an
/// explicit transaction.
pub trait StoreHandle {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>;
}

/// The owner of the backing SQLite connection and its physical schema.
///
/// One store is opened per process and handed to every component explicitly;
/// there is no ambient connection. Clones share the same connection. Access
/// is serialised by a mutex, which makes each primitive atomic with respect to
/// other callers but says nothing about sequences of primitives. Use
/// [`Store::transaction`] for those.
///
/// After [`Store::close`] every operation, on every clone, fails with
/// [`EavError::StoreClosed`].
#[derive(Debug, Clone)]
pub struct Store {
    conn: Arc<Mutex<Option<Connection>>>,
    /// Thread currently running [`Store::transaction`], if any.
    owner: Arc<Mutex<Option<ThreadId>>>,
}

/// A transaction opened by [`Store::transaction`].
pub struct StoreTransaction<'a> {
    tx: Transaction<'a>,
}

impl Store {
    pub fn open(config: &StoreConfig) -> Result<Store> {
        let conn = match &config.path {
            StorePath::File(path) => Connection::open(path)?,
            StorePath::Memory => Connection::open_in_memory()?,
        };

        info!("opened store at {:?}", config.path);
        Self::from_connection(conn, config.busy_timeout)
    }

    pub fn open_path(path: impl AsRef<Path>) -> Result<Store> {
        let config = StoreConfig::builder()
            .file(path.as_ref().to_path_buf())
            .build();
        Self::open(&config)
    }

    pub fn open_in_memory() -> Result<Store> {
        Self::open(&StoreConfig::in_memory())
    }

    fn from_connection(conn: Connection, busy_timeout: Duration) -> Result<Store> {
        conn.busy_timeout(busy_timeout)?;
        schema::init(&conn)?;

        Ok(Store {
            conn: Arc::new(Mutex::new(Some(conn))),
            owner: Arc::new(Mutex::new(None)),
        })
    }

    pub fn scoped<T, F>(config: &StoreConfig, f: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T>,
    {
        //! Open a store, hand it to `f` and close it again, whatever `f` returns.
        //!
        //! An error from `f` wins over an error from closing.

        let store = Store::open(config)?;
        let result = f(&store);
        let closed = store.close();

        let value = result?;
        closed?;
        Ok(value)
    }

    pub fn init_schema(&self) -> Result<()> {
        //! Create the four relations if they are missing. Runs on every open
        //! already; calling it again changes nothing.

        self.with_connection(|conn| Ok(schema::init(conn)?))
    }

    pub fn relation_count(&self) -> Result<usize> {
        self.with_connection(|conn| Ok(schema::relation_count(conn)?))
    }

    pub fn is_open(&self) -> bool {
        // a store held by a transaction is open by definition
        self.lock().map(|guard| guard.is_some()).unwrap_or(true)
    }

    pub fn close(&self) -> Result<()> {
        //! Release the connection. Closing an already closed store does nothing.

        let conn = self.lock()?.take();

        match conn {
            Some(conn) => {
                conn.close().map_err(|(_, error)| EavError::from(error))?;
                info!("store closed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreTransaction<'_>) -> Result<T>,
    {
        //! Run `f` inside one SQLite transaction.
        //!
        //! The transaction commits when `f` returns `Ok` and rolls back when it
        //! returns `Err`; the error is handed back unchanged. All work inside
        //! `f` must go through the [`StoreTransaction`] it receives. The store
        //! stays locked until `f` returns: using the store itself from within
        //! `f` fails with [`EavError::TransactionActive`] and, unless `f`
        //! swallows that error, rolls the transaction back.

        let mut guard = self.lock()?;
        let conn = guard.as_mut().ok_or(EavError::StoreClosed)?;
        let scoped = StoreTransaction {
            tx: conn.transaction()?,
        };
        let _owner = OwnerGuard::claim(&self.owner);
        debug!("transaction started");

        match f(&scoped) {
            Ok(value) => {
                scoped.tx.commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(error) => {
                warn!("rolling back transaction: {}", error);
                if let Err(rollback_error) = scoped.tx.rollback() {
                    warn!("rollback failed: {}", rollback_error);
                }
                Err(error)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        //! Other threads wait for the connection; the thread that holds it in
        //! a transaction is turned away instead of blocking on itself.

        let held_here = *relock(&self.owner) == Some(thread::current().id());
        if held_here {
            return Err(EavError::TransactionActive);
        }

        // A panic while holding the lock cannot leave SQLite half-written.
        Ok(relock(&self.conn))
    }
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the current thread as the transaction owner until dropped.
struct OwnerGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
}

impl<'a> OwnerGuard<'a> {
    fn claim(owner: &'a Mutex<Option<ThreadId>>) -> OwnerGuard<'a> {
        *relock(owner) = Some(thread::current().id());
        OwnerGuard { owner }
    }
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        *relock(self.owner) = None;
    }
}

impl StoreHandle for Store {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(EavError::StoreClosed)?;
        f(conn)
    }
}

impl StoreHandle for StoreTransaction<'_> {
    fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.tx)
    }
}
