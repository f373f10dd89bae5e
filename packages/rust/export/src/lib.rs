//! Google Docs export: cached OAuth credentials and document creation.

mod auth;
mod docs;

pub use auth::{
    StoredToken, is_authenticated, load_credentials, load_credentials_from, load_stored_token,
    logout, save_stored_token, token_file_path,
};
pub use docs::{ExportedDocument, GoogleDocsClient};
