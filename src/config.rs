use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;

use crate::infra::sqlite::repo::RefreshMode;
use crate::usecase::services::batch_loader::DEFAULT_CHUNK_SIZE;
use crate::usecase::services::import_service::DEFAULT_SHEET;

#[derive(Parser, Debug)]
#[command(name = "salesdesk", version, about = "Import and browse sales records")]
pub struct Cli {
    /// SQLite database file (defaults to the per-user data directory)
    #[arg(long, env = "SALESDESK_DB", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace all records with the contents of a spreadsheet
    Import(ImportArgs),
    /// Serve the read-only data API
    Serve(ServeArgs),
    /// Print counts, samples and totals of the imported data
    Verify,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workbook (.xlsx, .xls, .ods) or .csv export
    #[arg(long, env = "SALESDESK_SOURCE", default_value = "data-mb.xlsx")]
    pub source: PathBuf,

    /// Worksheet holding the sales lines
    #[arg(long, env = "SALESDESK_SHEET", default_value = DEFAULT_SHEET)]
    pub sheet: String,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Clear and load the live table directly instead of swapping in a staged copy
    #[arg(long)]
    pub in_place: bool,
}

impl ImportArgs {
    pub fn refresh_mode(&self) -> RefreshMode {
        if self.in_place {
            RefreshMode::InPlace
        } else {
            RefreshMode::Staged
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "SALESDESK_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "salesdesk", "salesdesk")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("sales.sqlite"))
}

impl Cli {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}
