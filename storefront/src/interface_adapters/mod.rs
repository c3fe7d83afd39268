pub mod clients;
pub mod protocol;
pub mod state;
pub mod storage;
