// src/mongo.rs
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{AuthMechanism, ClientOptions, Credential};
use mongodb::results::InsertManyResult;
use mongodb::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 27017;

/// A configuration step applied by [`config`] before the URI is rendered.
pub type DbOption = Box<dyn FnOnce(&mut MongoConfig) + Send>;

/// Connection target for a single MongoDB deployment.
///
/// The URI is rendered once by [`config`]; afterwards only the selected
/// database can change.
pub struct MongoConfig {
    host: String,
    port: u16,
    user: String,
    password: String,
    auth_mechanism: String,
    service: bool,
    server_selection_timeout: Option<Duration>,
    uri: String,
    client: Option<Client>,
    selected_db: String,
}

/// Configure MongoDB with `host` and the default port 27017.
///
/// Options run in the order given. Nothing is validated here: a bad host or
/// credential shows up as an error from [`MongoConfig::connect`].
pub fn config<I>(host: impl Into<String>, options: I) -> MongoConfig
where
    I: IntoIterator<Item = DbOption>,
{
    let mut conf = MongoConfig {
        host: host.into(),
        port: DEFAULT_PORT,
        user: String::new(),
        password: String::new(),
        auth_mechanism: String::new(),
        service: false,
        server_selection_timeout: None,
        uri: String::new(),
        client: None,
        selected_db: String::new(),
    };

    for option in options {
        option(&mut conf);
    }

    conf.uri = conf.render_uri();

    if !conf.has_credential() && (!conf.user.is_empty() || !conf.password.is_empty()) {
        debug!(host = %conf.host, "incomplete credentials, connecting without authentication");
    }

    conf
}

pub fn port(port: u16) -> DbOption {
    Box::new(move |conf: &mut MongoConfig| conf.port = port)
}

/// Authenticate as `user`. An empty `mechanism` lets the driver negotiate one.
pub fn auth(
    user: impl Into<String>,
    password: impl Into<String>,
    mechanism: impl Into<String>,
) -> DbOption {
    let (user, password, mechanism) = (user.into(), password.into(), mechanism.into());
    Box::new(move |conf: &mut MongoConfig| {
        conf.user = user;
        conf.password = password;
        conf.auth_mechanism = mechanism;
    })
}

/// Use the `mongodb+srv` scheme when `enabled`.
pub fn service(enabled: bool) -> DbOption {
    Box::new(move |conf: &mut MongoConfig| conf.service = enabled)
}

/// Override the driver's server selection timeout, which also bounds the ping.
pub fn server_selection_timeout(timeout: Duration) -> DbOption {
    Box::new(move |conf: &mut MongoConfig| conf.server_selection_timeout = Some(timeout))
}

impl MongoConfig {
    fn render_uri(&self) -> String {
        let user_segment = if self.has_credential() {
            format!("{}:{}@", self.user, self.password)
        } else {
            String::new()
        };
        let scheme = if self.service { "mongodb+srv" } else { "mongodb" };
        format!("{}://{}{}:{}", scheme, user_segment, self.host, self.port)
    }

    /// Credential for the client options, present only when both user and
    /// password are set.
    fn credential(&self) -> Result<Option<Credential>> {
        if !self.has_credential() {
            return Ok(None);
        }

        let mechanism = if self.auth_mechanism.is_empty() {
            None
        } else {
            Some(AuthMechanism::from_str(&self.auth_mechanism).map_err(Error::Connection)?)
        };

        Ok(Some(
            Credential::builder()
                .username(self.user.clone())
                .password(self.password.clone())
                .mechanism(mechanism)
                .build(),
        ))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn auth_mechanism(&self) -> &str {
        &self.auth_mechanism
    }

    pub fn is_service(&self) -> bool {
        self.service
    }

    pub fn server_selection_timeout(&self) -> Option<Duration> {
        self.server_selection_timeout
    }

    /// Connection string, including the password when credentials are set.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn has_credential(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn selected_db(&self) -> &str {
        &self.selected_db
    }

    pub fn select_db(&mut self, db: impl Into<String>) {
        self.selected_db = db.into();
    }

    /// Open a client and ping the server.
    ///
    /// Calling this again replaces the previous client.
    pub async fn connect(&mut self) -> Result<()> {
        let credential = self.credential()?;

        let mut options = ClientOptions::parse(self.uri.as_str())
            .await
            .map_err(Error::Connection)?;
        if credential.is_some() {
            options.credential = credential;
        }
        if self.server_selection_timeout.is_some() {
            options.server_selection_timeout = self.server_selection_timeout;
        }

        let client = Client::with_options(options).map_err(Error::Connection)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(Error::Unreachable)?;

        info!(host = %self.host, port = self.port, service = self.service, "connected to MongoDB");

        self.client = Some(client);
        Ok(())
    }

    /// Insert `records` into `collection_name` of the selected database.
    ///
    /// An empty batch is a no-op and returns `None` without checking the
    /// connection.
    pub async fn insert<T>(
        &self,
        records: &[T],
        collection_name: &str,
    ) -> Result<Option<InsertManyResult>>
    where
        T: Serialize + Send + Sync,
    {
        if records.is_empty() {
            return Ok(None);
        }

        let client = self.client.as_ref().ok_or(Error::NotConnected)?;
        let collection = client
            .database(&self.selected_db)
            .collection::<T>(collection_name);

        let result = collection.insert_many(records).await.map_err(Error::Write)?;

        debug!(
            db = %self.selected_db,
            collection = collection_name,
            inserted = result.inserted_ids.len(),
            "bulk insert finished"
        );

        Ok(Some(result))
    }

    /// Shut the client down and wait for its background tasks to finish.
    pub async fn close(mut self) {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            info!(host = %self.host, port = self.port, "closed MongoDB connection");
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("auth_mechanism", &self.auth_mechanism)
            .field("service", &self.service)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .field("connected", &self.client.is_some())
            .field("selected_db", &self.selected_db)
            .finish()
    }
}
