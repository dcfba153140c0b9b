//! Connection configuration and bulk insert for MongoDB.
//!
//! ```no_run
//! use mongocfg::{auth, config, port};
//!
//! # async fn run() -> mongocfg::Result<()> {
//! let mut conf = config(
//!     "localhost",
//!     vec![port(27018), auth("importer", "secret", "SCRAM-SHA-256")],
//! );
//! conf.connect().await?;
//! conf.select_db("inventory");
//! conf.insert(&[mongodb::bson::doc! { "sku": "a-1" }], "items").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mongo;
pub mod settings;

pub use error::{Error, Result};
pub use mongo::{
    auth, config, port, server_selection_timeout, service, DbOption, MongoConfig, DEFAULT_PORT,
};
pub use settings::Settings;
