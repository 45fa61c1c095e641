//! # SiteKit HTTP Server Utilities
//!
//! File: cli/src/commands/srv/utils.rs
//!
//! ## Overview
//!
//! Helpers used at server startup:
//! - Listing the HTML pages of the site with their detected kind (guide/tracker)
//! - Local IP address detection for the network URL
//!
use crate::site::controller::PageFeatures;
use std::path::Path;
use tracing::{info, warn};

/// One HTML page at the top level of the site directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePage {
    pub file_name: String,
    pub features: PageFeatures,
}

/// Reads the top-level `.html` files of `dir` and detects their page features.
///
/// Unreadable entries are skipped with a warning.
pub fn scan_site_pages(dir: &Path) -> Vec<SitePage> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Could not read directory contents for '{}': {}",
                dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut pages: Vec<SitePage> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .filter_map(|path| match std::fs::read_to_string(&path) {
            Ok(html) => Some(SitePage {
                file_name: path.file_name()?.to_string_lossy().into_owned(),
                features: PageFeatures::detect(&html),
            }),
            Err(e) => {
                warn!("Could not read page {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    pages.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    pages
}

/// Logs the site's pages and what kind each one is.
pub fn log_site_pages(dir: &Path) {
    let pages = scan_site_pages(dir);
    if pages.is_empty() {
        info!("No HTML pages found at the top level of {}", dir.display());
        return;
    }
    info!("Site pages in {}:", dir.display());
    for page in &pages {
        let kind = match (page.features.guide, page.features.tracker) {
            (true, true) => "guide+tracker",
            (true, false) => "guide",
            (false, true) => "tracker",
            (false, false) => "plain",
        };
        info!("  - {:<14} {}", kind, page.file_name);
    }
}

/// # Get Local IP Address (`get_local_ip`)
///
/// Tries common platform commands (`ipconfig`, `ip addr`, `ifconfig`) and
/// returns the first non-loopback address they print, or `"localhost"`.
pub fn get_local_ip() -> String {
    info!("Attempting to detect local network IP address");

    let commands = [
        "ipconfig getifaddr en0",
        "ipconfig getifaddr en1",
        "ip addr show | grep 'inet ' | grep -v '127.0.0.1' | head -n 1 | awk '{print $2}' | cut -d/ -f1",
        "ifconfig | grep 'inet ' | grep -v '127.0.0.1' | head -n 1 | awk '{print $2}'",
    ];

    for cmd_str in commands {
        match std::process::Command::new("sh").arg("-c").arg(cmd_str).output() {
            Ok(output) if output.status.success() => {
                let ip = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !ip.is_empty() && ip != "localhost" {
                    info!("Found local IP: {}", ip);
                    return ip;
                }
            }
            Ok(output) => {
                warn!(
                    "Command '{}' failed or returned empty: status={:?}, stderr={}",
                    cmd_str,
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                );
            }
            Err(e) => {
                warn!("Error executing command '{}': {}", cmd_str, e);
            }
        }
    }

    warn!("Could not detect local network IP, falling back to 'localhost'");
    "localhost".to_string()
}
