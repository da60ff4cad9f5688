/// Inserted rows indexed by seed key

use crate::error::{SeedError, SeedResult};
use std::collections::HashMap;

/// Rows of one batch, each paired with the key of the record that produced it
#[derive(Debug, Clone)]
pub struct Keyed<T> {
    entity: &'static str,
    rows: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Keyed<T> {
    /// Pairs `keys[i]` with `rows[i]`
    ///
    /// # Errors
    ///
    /// - `SeedError::BatchMismatch` if the lengths differ
    /// - `SeedError::DuplicateKey` if a key appears twice
    pub fn pair(entity: &'static str, keys: Vec<String>, rows: Vec<T>) -> SeedResult<Self> {
        if keys.len() != rows.len() {
            return Err(SeedError::BatchMismatch {
                entity,
                expected: keys.len(),
                returned: rows.len(),
            });
        }

        let mut index = HashMap::with_capacity(keys.len());
        for (position, key) in keys.iter().enumerate() {
            if index.insert(key.clone(), position).is_some() {
                return Err(SeedError::DuplicateKey {
                    entity,
                    key: key.clone(),
                });
            }
        }

        Ok(Self {
            entity,
            rows: keys.into_iter().zip(rows).collect(),
            index,
        })
    }

    /// Pairs rows with keys by a unique value each row carries back
    ///
    /// `inputs` holds `(key, identity)` for every record sent; each returned
    /// row is matched through `identity(row)`, so the order of `rows` does not
    /// matter.
    ///
    /// # Errors
    ///
    /// - `SeedError::BatchMismatch` if the lengths differ
    /// - `SeedError::DuplicateKey` if an identity or key appears twice
    /// - `SeedError::UnresolvedKey` if a row's identity was never sent
    pub fn pair_by<F>(
        entity: &'static str,
        inputs: Vec<(String, String)>,
        rows: Vec<T>,
        identity: F,
    ) -> SeedResult<Self>
    where
        F: Fn(&T) -> &str,
    {
        if inputs.len() != rows.len() {
            return Err(SeedError::BatchMismatch {
                entity,
                expected: inputs.len(),
                returned: rows.len(),
            });
        }

        let mut by_identity = HashMap::with_capacity(inputs.len());
        for (key, id) in inputs {
            if by_identity.contains_key(&id) {
                return Err(SeedError::DuplicateKey { entity, key: id });
            }
            by_identity.insert(id, key);
        }

        let keys = rows
            .iter()
            .map(|row| {
                let id = identity(row);
                by_identity
                    .remove(id)
                    .ok_or_else(|| SeedError::UnresolvedKey {
                        entity,
                        key: id.to_string(),
                    })
            })
            .collect::<SeedResult<Vec<String>>>()?;

        Self::pair(entity, keys, rows)
    }

    /// Row produced by the record with `key`
    ///
    /// # Errors
    ///
    /// Returns `SeedError::UnresolvedKey` if no record had that key
    pub fn get(&self, key: &str) -> SeedResult<&T> {
        self.index
            .get(key)
            .map(|&position| &self.rows[position].1)
            .ok_or_else(|| SeedError::UnresolvedKey {
                entity: self.entity,
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.rows.iter().map(|(key, row)| (key.as_str(), row))
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows.into_iter().map(|(_, row)| row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pair_and_get() {
        let keyed = Keyed::pair("report", keys(&["desempenho", "projetos"]), vec![10, 11]).unwrap();

        assert_eq!(*keyed.get("projetos").unwrap(), 11);
        assert_eq!(*keyed.get("desempenho").unwrap(), 10);
        assert_eq!(keyed.len(), 2);
        assert!(!keyed.is_empty());
    }

    #[test]
    fn test_get_unknown_key() {
        let keyed = Keyed::pair("user", keys(&["ana"]), vec![1]).unwrap();
        match keyed.get("bia") {
            Err(SeedError::UnresolvedKey { entity, key }) => {
                assert_eq!(entity, "user");
                assert_eq!(key, "bia");
            }
            other => panic!("expected unresolved key, got {:?}", other),
        }
    }

    #[test]
    fn test_pair_length_mismatch() {
        let result = Keyed::pair("user", keys(&["ana", "pedro"]), vec![1]);
        assert!(matches!(
            result,
            Err(SeedError::BatchMismatch {
                expected: 2,
                returned: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_pair_duplicate_key() {
        let result = Keyed::pair("user", keys(&["ana", "ana"]), vec![1, 2]);
        assert!(matches!(result, Err(SeedError::DuplicateKey { .. })));
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pair_by_ignores_row_order() {
        let rows = vec![(2, "pedro@example.com"), (1, "ana@example.com")];
        let keyed = Keyed::pair_by(
            "user",
            pairs(&[("ana", "ana@example.com"), ("pedro", "pedro@example.com")]),
            rows,
            |row| row.1,
        )
        .unwrap();

        assert_eq!(keyed.get("ana").unwrap().0, 1);
        assert_eq!(keyed.get("pedro").unwrap().0, 2);
    }

    #[test]
    fn test_pair_by_unknown_identity() {
        let result = Keyed::pair_by(
            "user",
            pairs(&[("ana", "ana@example.com")]),
            vec![(1, "someone@example.com")],
            |row| row.1,
        );
        match result {
            Err(SeedError::UnresolvedKey { entity, key }) => {
                assert_eq!(entity, "user");
                assert_eq!(key, "someone@example.com");
            }
            other => panic!("expected unresolved key, got {:?}", other),
        }
    }

    #[test]
    fn test_pair_by_duplicate_identity() {
        let result = Keyed::pair_by(
            "user",
            pairs(&[("ana", "x@example.com"), ("bia", "x@example.com")]),
            vec![(1, "x@example.com"), (2, "x@example.com")],
            |row| row.1,
        );
        assert!(matches!(result, Err(SeedError::DuplicateKey { .. })));
    }

    #[test]
    fn test_iter_preserves_order() {
        let keyed = Keyed::pair("user", keys(&["b", "a"]), vec!["B", "A"]).unwrap();
        let seen: Vec<(&str, &&str)> = keyed.iter().collect();
        assert_eq!(seen, vec![("b", &"B"), ("a", &"A")]);
        assert_eq!(keyed.into_rows(), vec!["B", "A"]);
    }
}
