//! File actions module.
//!
//! Selected duplicates are moved to the system trash, never unlinked.
//!
//! ```no_run
//! use mediadupe::actions::{delete_to_trash, validate_preserves_copy};
//! use std::path::PathBuf;
//!
//! let group = vec![PathBuf::from("/a/x.mov"), PathBuf::from("/b/x.mov")];
//! validate_preserves_copy(&group[1..], &group).unwrap();
//! let result = delete_to_trash(&group[1]);
//! ```

pub mod delete;

pub use delete::{
    delete_batch, delete_batch_with, delete_to_trash, validate_preserves_copy, BatchDeleteResult,
    DeleteError, DeleteProgressCallback, DeleteResult,
};
