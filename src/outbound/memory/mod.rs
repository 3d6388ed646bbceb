//! In-memory adapters backing the persistence ports.
//!
//! Schema design is out of scope here; these adapters exist so the domain
//! services run against real port implementations in a single process. The
//! item store applies each vote commit under one write lock, which is the
//! in-memory analogue of the transactional commit a database adapter must
//! provide.

mod item_store;
mod user_repository;

pub use item_store::InMemoryItemStore;
pub use user_repository::InMemoryUserRepository;
