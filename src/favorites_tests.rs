//! Tests for the favorites store

#[cfg(test)]
mod tests {
    use crate::favorites::*;
    use crate::models::Character;
    use std::fs;

    fn character(id: i64, name: &str) -> Character {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn ids(list: &[Character]) -> Vec<i64> {
        list.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_file_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFavorites::new(dir.path());
        assert!(store.list().is_empty());
        assert_eq!(store.path(), dir.path().join("favorites.json"));
    }

    #[test]
    fn test_file_store_add_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileFavorites::new(dir.path());
        store.add(&character(1, "Rick Sanchez"));
        store.add(&character(2, "Morty Smith"));

        // A fresh handle on the same directory sees the same data
        let reopened = FileFavorites::new(dir.path());
        let list = reopened.list();
        assert_eq!(ids(&list), vec![1, 2]);
        assert_eq!(list[1].name, "Morty Smith");
    }

    #[test]
    fn test_file_store_add_existing_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileFavorites::new(dir.path());
        store.add(&character(1, "Rick Sanchez"));
        store.add(&character(1, "Rick Sanchez"));
        assert_eq!(ids(&store.list()), vec![1]);
    }

    #[test]
    fn test_file_store_remove_then_list_has_no_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        // Legacy file with a duplicate entry
        fs::write(&path, r#"[{"id":3},{"id":4},{"id":3}]"#).unwrap();

        let mut store = FileFavorites::new(dir.path());
        store.remove(3);
        assert_eq!(ids(&store.list()), vec![4]);
    }

    #[test]
    fn test_add_then_remove_restores_previous_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileFavorites::new(dir.path());
        store.add(&character(1, "Rick Sanchez"));
        store.add(&character(2, "Morty Smith"));
        let before = store.list();

        store.add(&character(5, "Jerry Smith"));
        store.remove(5);
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_file_store_clear_deletes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileFavorites::new(dir.path());
        store.add(&character(1, "Rick Sanchez"));
        assert!(store.path().exists());

        store.clear();
        assert!(!store.path().exists());
        assert!(store.list().is_empty());

        // Clearing twice is harmless
        store.clear();
    }

    #[test]
    fn test_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("favorites.json"), "{ definitely not a list").unwrap();
        let store = FileFavorites::new(dir.path());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_wrong_record_shape_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("favorites.json"), r#"[{"name":"no id"}]"#).unwrap();
        let store = FileFavorites::new(dir.path());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut store = FileFavorites::new(&missing);

        store.add(&character(1, "Rick Sanchez"));
        assert!(store.list().is_empty());
        store.remove(1);
        store.clear();
    }

    #[test]
    fn test_custom_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFavorites::with_key(dir.path(), "starred");
        assert_eq!(store.path(), dir.path().join("starred.json"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryFavorites::new();
        store.add(&character(9, "Summer Smith"));
        store.add(&character(1, "Rick Sanchez"));
        store.add(&character(9, "Summer Smith"));
        assert_eq!(ids(&store.list()), vec![9, 1]);

        store.remove(9);
        assert_eq!(ids(&store.list()), vec![1]);

        store.clear();
        assert!(store.list().is_empty());
        assert!(MemoryFavorites::new().list().is_empty());
    }
}
