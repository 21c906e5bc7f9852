pub mod mongo;
pub mod session_store;
