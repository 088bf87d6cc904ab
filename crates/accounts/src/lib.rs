//! User stores backing Tollgate authentication
//!
//! Both stores implement [`tollgate_auth::UserStore`]. Passwords are kept as
//! salted hashes produced by [`tollgate_common::hash_secret`].

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;
