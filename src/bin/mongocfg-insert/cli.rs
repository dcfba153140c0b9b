use clap::Parser;
use mongocfg::Settings;

/// Insert JSON or CSV records into a MongoDB collection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file with connection settings; flags below take precedence
    #[arg(long)]
    pub settings: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// e.g. SCRAM-SHA-256; negotiated by the driver when omitted
    #[arg(long)]
    pub auth_mechanism: Option<String>,

    /// Use the mongodb+srv scheme; `--srv false` overrides the settings file
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub srv: Option<bool>,

    #[arg(long)]
    pub db: Option<String>,

    #[arg(long)]
    pub collection: String,

    /// JSON array, JSON lines or (with --csv) CSV file
    #[arg(long)]
    pub input: String,

    #[arg(long)]
    pub csv: bool,

    #[arg(long)]
    pub no_header: bool,

    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Overlay the connection flags on `settings`.
    pub fn merge_into(&self, mut settings: Settings) -> Settings {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if self.port.is_some() {
            settings.port = self.port;
        }
        if self.user.is_some() {
            settings.username = self.user.clone();
        }
        if self.password.is_some() {
            settings.password = self.password.clone();
        }
        if self.auth_mechanism.is_some() {
            settings.auth_mechanism = self.auth_mechanism.clone();
        }
        if let Some(srv) = self.srv {
            settings.service = srv;
        }
        if self.db.is_some() {
            settings.database = self.db.clone();
        }
        settings
    }
}
