//! `mz-agent` — Structure-of-Arrays storage for agent groups.
//!
//! An agent group is anything that moves as one unit and contends for
//! exclusive regions: a train, a convoy, a single vehicle.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`store`]   | `GroupStore` (SoA arrays + name index)                    |
//! | [`lookup`]  | `GroupLookup` trait, the read-only view the lock layer uses |
//! | [`builder`] | `GroupStoreBuilder` (fluent construction)                 |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.       |

pub mod builder;
pub mod error;
pub mod lookup;
pub mod store;


pub use builder::GroupStoreBuilder;
pub use error::{AgentError, AgentResult};
pub use lookup::GroupLookup;
pub use store::GroupStore;
