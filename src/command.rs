//! Command definitions
//!
//! Requests from a front end (the CLI) and what they produce. Front ends
//! build a `Command` from already-validated input, hand it to
//! `FatSystem::execute` and render the `Outcome`.

use crate::error::Result;
use crate::fat::FatSystem;
use crate::record::FileSummary;
use crate::store::RecordStore;

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a file from text
    Create { name: String, data: String },

    /// Read a file's content
    Read { name: String },

    /// Replace a file's content
    Modify { name: String, data: String },

    /// Soft-delete a file
    Delete { name: String },

    /// Undo a soft-delete
    Recover { name: String },

    /// List live files
    List,

    /// List soft-deleted files
    ListDeleted,
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command changed state and returns nothing
    Done,

    /// File content from `Read`
    Content(String),

    /// Rows from `List` / `ListDeleted`
    Files(Vec<FileSummary>),
}

impl<S: RecordStore> FatSystem<S> {
    /// Execute a command
    ///
    /// Routes commands to the matching service operation. Listings are
    /// collected eagerly; the first entry that fails to load aborts the
    /// listing with its error.
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Create { name, data } => {
                self.create_file(&name, &data)?;
                Ok(Outcome::Done)
            }
            Command::Read { name } => self.read_file(&name).map(Outcome::Content),
            Command::Modify { name, data } => {
                self.modify_file(&name, &data)?;
                Ok(Outcome::Done)
            }
            Command::Delete { name } => {
                self.delete_file(&name)?;
                Ok(Outcome::Done)
            }
            Command::Recover { name } => {
                self.recover_file(&name)?;
                Ok(Outcome::Done)
            }
            Command::List => self
                .list_files()?
                .collect::<Result<Vec<_>>>()
                .map(Outcome::Files),
            Command::ListDeleted => self
                .list_deleted_files()?
                .collect::<Result<Vec<_>>>()
                .map(Outcome::Files),
        }
    }
}
