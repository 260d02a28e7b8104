//! Integration tests for session persistence
//!
//! Each test gets a fresh temp dir; the store lives in a subdirectory that
//! does not exist until the first save.

use std::path::PathBuf;

use diagnoai::session::{Session, TokenStore};
use tempfile::TempDir;

fn store_dir() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let dir = tmp.path().join("diagnoai");
    (tmp, dir)
}

mod store_tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let (_tmp, dir) = store_dir();
        let store = TokenStore::at(&dir);

        store.save("abc.def").expect("Failed to save token");
        assert_eq!(store.load(), Some("abc.def".to_string()));

        store.clear().expect("Failed to clear");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let (_tmp, dir) = store_dir();
        let store = TokenStore::at(&dir);
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_blank_file_reads_as_no_token() {
        let (_tmp, dir) = store_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("access-token"), "  \n").unwrap();
        assert_eq!(TokenStore::at(&dir).load(), None);
    }

    #[test]
    fn test_in_memory_store_keeps_nothing() {
        let store = TokenStore::in_memory();
        store.save("tok").unwrap();
        assert_eq!(store.load(), None);
    }
}

mod session_tests {
    use super::*;

    #[test]
    fn test_sign_in_survives_restart() {
        let (_tmp, dir) = store_dir();

        let first = Session::restore(None, TokenStore::at(&dir));
        assert!(!first.is_signed_in());
        first.sign_in("  tok-1  ").expect("Failed to sign in");

        let second = Session::restore(None, TokenStore::at(&dir));
        assert_eq!(second.token().as_deref(), Some("tok-1"));

        second.sign_out().expect("Failed to sign out");
        let third = Session::restore(None, TokenStore::at(&dir));
        assert!(!third.is_signed_in());
    }

    #[test]
    fn test_configured_token_wins_over_stored_one() {
        let (_tmp, dir) = store_dir();
        TokenStore::at(&dir).save("stored").unwrap();

        let session = Session::restore(Some("configured".into()), TokenStore::at(&dir));
        assert_eq!(session.token().as_deref(), Some("configured"));
    }
}
