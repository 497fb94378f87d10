//! Feature modules. `auth` owns the session lifecycle; `matches` and `odds` are
//! thin typed clients over the domain API and inherit the bearer-token policy
//! from `ApiClient`.

pub mod auth;
pub mod matches;
pub mod odds;
