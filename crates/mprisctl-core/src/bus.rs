use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Property map as returned by `GetAll` or carried by the `Metadata` property.
pub type PropMap = HashMap<String, PropValue>;

/// Categorical tag on a transport-level failure.
///
/// Distinguishes the expected-unsupported conditions (optional interface
/// missing, method or property not implemented) from genuine errors, so that
/// callers can absorb the former and propagate the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The destination bus name has no live owner.
    UnknownName,
    /// The endpoint does not implement the requested interface.
    UnknownInterface,
    /// The interface exists but the property does not.
    UnknownProperty,
    /// The interface exists but the method does not.
    UnknownMethod,
    /// The endpoint explicitly reports the operation as unsupported.
    NotSupported,
    /// Anything else: connection loss, malformed reply, unexpected error name.
    Transport,
}

impl FaultKind {
    /// True for the fault shapes an optional-interface probe may absorb.
    #[must_use]
    pub fn means_unsupported(self) -> bool {
        matches!(
            self,
            FaultKind::UnknownInterface | FaultKind::UnknownProperty | FaultKind::NotSupported
        )
    }
}

/// A failed bus operation, tagged with the kind of failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Fault {
            kind,
            message: message.into(),
        }
    }

    /// Generic transport fault, for failures without a D-Bus error name.
    pub fn transport(message: impl Into<String>) -> Self {
        Fault::new(FaultKind::Transport, message)
    }
}

/// A D-Bus property value in one of the shapes this tool reads.
///
/// The wire representation stays stringly-typed at the gateway boundary;
/// everything above it goes through the typed accessors here.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    Map(PropMap),
    /// Anything the tool has no use for, kept printable for verbose dumps.
    Other(String),
}

impl PropValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed microsecond counts; unsigned values that fit are accepted too,
    /// since players disagree on the signedness of `mpris:length`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            PropValue::Uint(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            PropValue::StrList(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&PropMap> {
        match self {
            PropValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Int(n) => write!(f, "{n}"),
            PropValue::Uint(n) => write!(f, "{n}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Str(s) => write!(f, "{s}"),
            PropValue::StrList(items) => write!(f, "{}", items.join(", ")),
            PropValue::Map(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let parts: Vec<String> = keys
                    .into_iter()
                    .map(|k| format!("{k}={}", map[k]))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            PropValue::Other(s) => write!(f, "{s}"),
        }
    }
}

/// The four primitive bus operations the core needs.
///
/// All calls block (in the async sense) until the transport responds or
/// faults; retry and timeout policy belongs to the implementation.
#[async_trait]
pub trait BusGateway {
    /// Enumerate every name currently registered on the bus.
    async fn list_names(&self) -> Result<Vec<String>, Fault>;

    /// Read one property of one interface on one endpoint.
    async fn get_property(
        &self,
        endpoint: &str,
        interface: &str,
        name: &str,
    ) -> Result<PropValue, Fault>;

    /// Read every property of one interface on one endpoint.
    async fn get_all_properties(&self, endpoint: &str, interface: &str)
        -> Result<PropMap, Fault>;

    /// Invoke a method on one interface of one endpoint. MPRIS control
    /// methods take at most one string argument (`OpenUri`).
    async fn call(
        &self,
        endpoint: &str,
        interface: &str,
        method: &str,
        arg: Option<&str>,
    ) -> Result<(), Fault>;
}
