use std::collections::HashMap;

use async_trait::async_trait;
use mprisctl_core::{BusGateway, Fault, FaultKind, PropMap, PropValue, OBJECT_PATH};
use tracing::debug;
use zbus::zvariant::OwnedValue;

const DBUS_SERVICE: &str = "org.freedesktop.DBus";
const DBUS_PATH: &str = "/org/freedesktop/DBus";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// `BusGateway` over the D-Bus session bus.
///
/// Uses raw method calls rather than generated proxies: the endpoint name is
/// only known at runtime, and the core already owns the typed surface.
pub struct DbusGateway {
    conn: zbus::Connection,
}

impl DbusGateway {
    /// Connect to the session bus.
    ///
    /// # Errors
    ///
    /// Returns a transport fault if the bus is not reachable.
    pub async fn session() -> Result<Self, Fault> {
        let conn = zbus::Connection::session()
            .await
            .map_err(|e| Fault::transport(format!("failed to connect to session bus: {e}")))?;
        Ok(DbusGateway { conn })
    }
}

#[async_trait]
impl BusGateway for DbusGateway {
    async fn list_names(&self) -> Result<Vec<String>, Fault> {
        let reply = self
            .conn
            .call_method(
                Some(DBUS_SERVICE),
                DBUS_PATH,
                Some(DBUS_SERVICE),
                "ListNames",
                &(),
            )
            .await
            .map_err(classify)?;
        reply
            .body()
            .deserialize()
            .map_err(|e| Fault::transport(format!("malformed ListNames reply: {e}")))
    }

    async fn get_property(
        &self,
        endpoint: &str,
        interface: &str,
        name: &str,
    ) -> Result<PropValue, Fault> {
        debug!(endpoint, interface, name, "Properties.Get");
        let reply = self
            .conn
            .call_method(
                Some(endpoint),
                OBJECT_PATH,
                Some(PROPERTIES_INTERFACE),
                "Get",
                &(interface, name),
            )
            .await
            .map_err(classify)?;
        // The reply is a Variant wrapping the property value
        let value: OwnedValue = reply
            .body()
            .deserialize()
            .map_err(|e| Fault::transport(format!("malformed Get reply for {name}: {e}")))?;
        Ok(prop_value(&value))
    }

    async fn get_all_properties(
        &self,
        endpoint: &str,
        interface: &str,
    ) -> Result<PropMap, Fault> {
        debug!(endpoint, interface, "Properties.GetAll");
        let reply = self
            .conn
            .call_method(
                Some(endpoint),
                OBJECT_PATH,
                Some(PROPERTIES_INTERFACE),
                "GetAll",
                &(interface,),
            )
            .await
            .map_err(classify)?;
        let map: HashMap<String, OwnedValue> = reply
            .body()
            .deserialize()
            .map_err(|e| Fault::transport(format!("malformed GetAll reply: {e}")))?;
        Ok(map
            .iter()
            .map(|(name, value)| (name.clone(), prop_value(value)))
            .collect())
    }

    async fn call(
        &self,
        endpoint: &str,
        interface: &str,
        method: &str,
        arg: Option<&str>,
    ) -> Result<(), Fault> {
        debug!(endpoint, interface, method, "method call");
        let result = match arg {
            None => {
                self.conn
                    .call_method(Some(endpoint), OBJECT_PATH, Some(interface), method, &())
                    .await
            }
            Some(arg) => {
                self.conn
                    .call_method(Some(endpoint), OBJECT_PATH, Some(interface), method, &(arg,))
                    .await
            }
        };
        result.map(|_| ()).map_err(classify)
    }
}

/// Tag a zbus error with the fault kind its D-Bus error name implies.
fn classify(err: zbus::Error) -> Fault {
    let kind = match &err {
        zbus::Error::MethodError(name, _, _) => kind_from_error_name(name.as_str()),
        zbus::Error::FDO(fdo_err) => match fdo_err.as_ref() {
            zbus::fdo::Error::UnknownMethod(_) => FaultKind::UnknownMethod,
            zbus::fdo::Error::UnknownProperty(_) => FaultKind::UnknownProperty,
            zbus::fdo::Error::UnknownInterface(_) => FaultKind::UnknownInterface,
            zbus::fdo::Error::NotSupported(_) => FaultKind::NotSupported,
            zbus::fdo::Error::ServiceUnknown(_) | zbus::fdo::Error::NameHasNoOwner(_) => {
                FaultKind::UnknownName
            }
            _ => FaultKind::Transport,
        },
        _ => FaultKind::Transport,
    };
    Fault::new(kind, err.to_string())
}

fn kind_from_error_name(name: &str) -> FaultKind {
    if name.ends_with(".UnknownMethod") {
        FaultKind::UnknownMethod
    } else if name.ends_with(".UnknownProperty")
        // some players report a missing property as an argument error
        || name.ends_with(".InvalidArgs")
    {
        FaultKind::UnknownProperty
    } else if name.ends_with(".UnknownInterface") {
        FaultKind::UnknownInterface
    } else if name.ends_with(".NotSupported") {
        FaultKind::NotSupported
    } else if name.ends_with(".ServiceUnknown") || name.ends_with(".NameHasNoOwner") {
        FaultKind::UnknownName
    } else {
        FaultKind::Transport
    }
}

/// Convert a zvariant value into the shapes the core understands.
fn prop_value(value: &OwnedValue) -> PropValue {
    use zbus::zvariant::{Array, ObjectPath};

    if let Ok(b) = value.downcast_ref::<bool>() {
        return PropValue::Bool(b);
    }
    if let Ok(n) = value.downcast_ref::<i64>() {
        return PropValue::Int(n);
    }
    if let Ok(n) = value.downcast_ref::<i32>() {
        return PropValue::Int(n.into());
    }
    if let Ok(n) = value.downcast_ref::<i16>() {
        return PropValue::Int(n.into());
    }
    if let Ok(n) = value.downcast_ref::<u64>() {
        return PropValue::Uint(n);
    }
    if let Ok(n) = value.downcast_ref::<u32>() {
        return PropValue::Uint(n.into());
    }
    if let Ok(n) = value.downcast_ref::<u16>() {
        return PropValue::Uint(n.into());
    }
    if let Ok(n) = value.downcast_ref::<u8>() {
        return PropValue::Uint(n.into());
    }
    if let Ok(x) = value.downcast_ref::<f64>() {
        return PropValue::Float(x);
    }
    if let Ok(s) = value.downcast_ref::<String>() {
        return PropValue::Str(s.clone());
    }
    if let Ok(path) = value.downcast_ref::<ObjectPath<'_>>() {
        return PropValue::Str(path.to_string());
    }
    if let Ok(array) = <&Array>::try_from(&**value) {
        let items: Vec<String> = array
            .iter()
            .filter_map(|item| {
                if let Ok(s) = item.downcast_ref::<String>() {
                    Some(s.clone())
                } else if let Ok(s) = item.downcast_ref::<&str>() {
                    Some(s.to_string())
                } else {
                    None
                }
            })
            .collect();
        if !items.is_empty() || array.is_empty() {
            return PropValue::StrList(items);
        }
        return PropValue::Other(format!("{value:?}"));
    }
    if let Ok(map) = <HashMap<String, OwnedValue>>::try_from(value.clone()) {
        return PropValue::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), prop_value(v)))
                .collect(),
        );
    }
    PropValue::Other(format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::Value;

    #[test]
    fn error_name_classification() {
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.UnknownMethod"),
            FaultKind::UnknownMethod
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.UnknownProperty"),
            FaultKind::UnknownProperty
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.InvalidArgs"),
            FaultKind::UnknownProperty
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.UnknownInterface"),
            FaultKind::UnknownInterface
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.NotSupported"),
            FaultKind::NotSupported
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.ServiceUnknown"),
            FaultKind::UnknownName
        );
        assert_eq!(
            kind_from_error_name("org.freedesktop.DBus.Error.NoReply"),
            FaultKind::Transport
        );
        assert_eq!(
            kind_from_error_name("org.mpris.MediaPlayer2.Error.Whatever"),
            FaultKind::Transport
        );
    }

    #[test]
    fn converts_booleans_and_integers() {
        let v = OwnedValue::from(true);
        assert_eq!(prop_value(&v), PropValue::Bool(true));

        let v = OwnedValue::from(60_000_000i64);
        assert_eq!(prop_value(&v), PropValue::Int(60_000_000));

        let v = OwnedValue::from(125_000_000u64);
        assert_eq!(prop_value(&v), PropValue::Uint(125_000_000));
    }

    #[test]
    fn converts_strings() {
        let v = OwnedValue::try_from(Value::from("Playing")).unwrap();
        assert_eq!(prop_value(&v), PropValue::Str("Playing".into()));
    }

    #[test]
    fn converts_string_arrays() {
        let v = OwnedValue::try_from(Value::from(vec!["X".to_string(), "Y".to_string()]))
            .unwrap();
        assert_eq!(
            prop_value(&v),
            PropValue::StrList(vec!["X".into(), "Y".into()])
        );
    }

    #[test]
    fn converts_nested_metadata_maps() {
        let mut map: HashMap<String, Value<'_>> = HashMap::new();
        map.insert("xesam:title".into(), Value::from("Song"));
        map.insert("mpris:length".into(), Value::from(125_000_000i64));
        let v = OwnedValue::try_from(Value::from(map)).unwrap();

        let converted = prop_value(&v);
        let map = match converted {
            PropValue::Map(map) => map,
            other => panic!("expected a map, got {other:?}"),
        };
        assert_eq!(
            map.get("xesam:title"),
            Some(&PropValue::Str("Song".into()))
        );
        assert_eq!(map.get("mpris:length"), Some(&PropValue::Int(125_000_000)));
    }
}
