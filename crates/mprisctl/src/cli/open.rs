use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use anyhow::Result;
use mprisctl_core::Player;

use crate::gateway::DbusGateway;

pub async fn run(player: &Player<'_, DbusGateway>, arg: &str) -> Result<()> {
    let uri = resolve_uri(arg);
    println!("opening {uri}");
    player.open_uri(&uri).await?;
    Ok(())
}

/// An existing local path becomes an absolute `file://` URI; anything else
/// (including URIs and paths that do not exist) passes through verbatim, so
/// the player decides what it can handle.
fn resolve_uri(arg: &str) -> String {
    match std::env::current_dir() {
        Ok(cwd) => resolve_uri_from(arg, &cwd),
        Err(_) => arg.to_string(),
    }
}

/// Relative paths are resolved against `base`; joining an absolute path
/// leaves it untouched.
fn resolve_uri_from(arg: &str, base: &Path) -> String {
    if arg.contains("://") {
        return arg.to_string();
    }
    match base.join(arg).canonicalize() {
        Ok(path) => format!("file://{}", encode_path(&path)),
        Err(_) => arg.to_string(),
    }
}

/// Percent-encode a filesystem path for a `file://` URI. Separators stay
/// literal; every byte outside the URI unreserved set is escaped, since
/// players reject or truncate URIs containing raw spaces, `#` or `?`.
fn encode_path(path: &Path) -> String {
    let mut out = String::new();
    for &byte in path.as_os_str().as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
