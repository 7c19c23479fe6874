pub mod chat;
pub mod facts;
pub mod migrate;
