//! Discovery of MPRIS2 services and selector resolution.

use tracing::debug;

use crate::bus::BusGateway;
use crate::error::Error;
use crate::player::Player;
use crate::MPRIS_BASE;

/// Enumerate the MPRIS2 services currently registered on the bus.
///
/// The gateway's enumeration order is preserved: index-based selection
/// depends on it, so the list must not be sorted or deduplicated.
///
/// # Errors
///
/// Propagates any transport fault from the name enumeration.
pub async fn discover<G: BusGateway>(gateway: &G) -> Result<Vec<String>, Error> {
    let services: Vec<String> = gateway
        .list_names()
        .await?
        .into_iter()
        .filter(|name| name.starts_with(MPRIS_BASE))
        .collect();
    debug!(count = services.len(), "discovered MPRIS services");
    Ok(services)
}

/// Resolve a user-supplied selector against a discovery snapshot and open
/// the matching player.
///
/// A selector that parses as a non-negative integer is treated as an index
/// into `directory` and nothing else: out of range fails rather than falling
/// through to name matching. Any other selector is matched as a literal name
/// suffix, scanning in order with the last match winning.
///
/// # Errors
///
/// `SelectorNotFound` (carrying the selector text) on a bad index or a
/// missed suffix match; otherwise whatever [`Player::open`] returns.
pub async fn resolve<'a, G: BusGateway>(
    gateway: &'a G,
    directory: &[String],
    selector: &str,
) -> Result<Player<'a, G>, Error> {
    if let Ok(index) = selector.parse::<usize>() {
        let name = directory
            .get(index)
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))?;
        return Player::open(gateway, name).await;
    }

    let mut found = None;
    for name in directory {
        if name.ends_with(selector) {
            // last match wins, matching the reference scan behavior
            found = Some(name);
        }
    }
    match found {
        Some(name) => Player::open(gateway, name).await,
        None => Err(Error::SelectorNotFound(selector.to_string())),
    }
}
