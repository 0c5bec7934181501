//! Persistent key-value store backed by redb.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::{KVResult, KVStore, storage_err};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("lexigraph");

/// A persistent key-value store backed by redb.
///
/// Every write is its own committed transaction, so a value is durable once
/// `set` returns.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> KVResult<Self> {
        let db = Database::create(path).map_err(storage_err)?;

        let tx = db.begin_write().map_err(storage_err)?;
        {
            tx.open_table(TABLE).map_err(storage_err)?;
        }
        tx.commit().map_err(storage_err)?;

        Ok(Self { db })
    }

    fn write<F>(&self, f: F) -> KVResult<()>
    where
        F: FnOnce(&mut redb::Table<'_, &'static str, &'static [u8]>) -> KVResult<()>,
    {
        let tx = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = tx.open_table(TABLE).map_err(storage_err)?;
            f(&mut table)?;
        }
        tx.commit().map_err(storage_err)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>> {
        let tx = self.db.begin_read().map_err(storage_err)?;
        let table = tx.open_table(TABLE).map_err(storage_err)?;
        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> KVResult<()> {
        self.write(|table| {
            table.insert(key, value).map_err(storage_err)?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> KVResult<()> {
        self.write(|table| {
            table.remove(key).map_err(storage_err)?;
            Ok(())
        })
    }

    fn scan(&self, prefix: &str) -> KVResult<Vec<(String, Vec<u8>)>> {
        let tx = self.db.begin_read().map_err(storage_err)?;
        let table = tx.open_table(TABLE).map_err(storage_err)?;

        let mut results = Vec::new();
        for item in table.range(prefix..).map_err(storage_err)? {
            let (key, value) = item.map_err(storage_err)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }
        Ok(results)
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> KVResult<()> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value).map_err(storage_err)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexigraph.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("lx:vec:apple", b"vector").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("lx:vec:apple").unwrap(), Some(b"vector".to_vec()));

        store.delete("lx:vec:apple").unwrap();
        assert_eq!(store.get("lx:vec:apple").unwrap(), None);
    }

    #[test]
    fn scan_stops_at_prefix_end() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("scan.redb")).unwrap();

        store
            .batch_set(&[
                ("lx:edge:banana", b"2"),
                ("lx:edge:apple", b"1"),
                ("lx:vec:apple", b"3"),
            ])
            .unwrap();

        let results = store.scan("lx:edge:").unwrap();
        let keys: Vec<&str> = results.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["lx:edge:apple", "lx:edge:banana"]);
    }
}
