use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use super::host_path::to_host_path;

/// Name the extension passes to `runtime.connectNative`.
pub const HOST_NAME: &str = "com.tabtally.host";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Browser {
    Chromium,
    Firefox,
}

#[derive(Debug, Parser)]
pub struct ManifestCommand {
    #[arg(long = "extension-id", help = "Id of the extension allowed to talk to the host")]
    extension_id: String,
    #[arg(long, value_enum, default_value_t = Browser::Chromium)]
    browser: Browser,
    #[arg(long, help = "Path of the host binary. Defaults to tabtally-host next to this executable")]
    host: Option<PathBuf>,
}

/// Native messaging host manifest. Chromium and Firefox differ only in how the allowed extension
/// is spelled.
#[derive(Debug, Serialize, PartialEq)]
pub struct HostManifest {
    pub name: &'static str,
    pub description: &'static str,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
}

pub fn host_manifest(path: PathBuf, browser: Browser, extension_id: &str) -> HostManifest {
    let (allowed_origins, allowed_extensions) = match browser {
        Browser::Chromium => (
            Some(vec![format!("chrome-extension://{extension_id}/")]),
            None,
        ),
        Browser::Firefox => (None, Some(vec![extension_id.to_owned()])),
    };
    HostManifest {
        name: HOST_NAME,
        description: env!("CARGO_PKG_DESCRIPTION"),
        path,
        kind: "stdio",
        allowed_origins,
        allowed_extensions,
    }
}

pub fn process_manifest_command(
    ManifestCommand {
        extension_id,
        browser,
        host,
    }: ManifestCommand,
) -> Result<()> {
    let path = match host {
        Some(path) => path,
        None => to_host_path(env::current_exe().context("Can't locate the cli executable")?),
    };
    let manifest = host_manifest(path, browser, &extension_id);
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
