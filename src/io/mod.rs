pub mod config_io;
pub mod record_store;
pub mod recovery;
pub mod state;
