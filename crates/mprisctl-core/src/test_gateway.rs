//! Scripted in-memory bus for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bus::{BusGateway, Fault, FaultKind, PropMap, PropValue};

type PropKey = (String, String, String);

/// Fake bus gateway: properties and faults are scripted per endpoint, and
/// every operation is recorded in call order so tests can assert on gate
/// ordering and call counts.
pub struct FakeGateway {
    names: Vec<String>,
    props: HashMap<PropKey, Result<PropValue, FaultKind>>,
    method_faults: HashMap<(String, String), FaultKind>,
    log: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(names: &[&str]) -> Self {
        FakeGateway {
            names: names.iter().map(|n| n.to_string()).collect(),
            props: HashMap::new(),
            method_faults: HashMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn set_property(&mut self, endpoint: &str, interface: &str, name: &str, value: PropValue) {
        self.props.insert(
            (endpoint.into(), interface.into(), name.into()),
            Ok(value),
        );
    }

    pub fn fail_property(&mut self, endpoint: &str, interface: &str, name: &str, kind: FaultKind) {
        self.props.insert(
            (endpoint.into(), interface.into(), name.into()),
            Err(kind),
        );
    }

    pub fn fail_method(&mut self, endpoint: &str, method: &str, kind: FaultKind) {
        self.method_faults
            .insert((endpoint.into(), method.into()), kind);
    }

    /// Snapshot of the call log, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl BusGateway for FakeGateway {
    async fn list_names(&self) -> Result<Vec<String>, Fault> {
        self.record("ListNames".to_string());
        Ok(self.names.clone())
    }

    async fn get_property(
        &self,
        endpoint: &str,
        interface: &str,
        name: &str,
    ) -> Result<PropValue, Fault> {
        self.record(format!("Get {endpoint} {interface} {name}"));
        let key = (endpoint.to_string(), interface.to_string(), name.to_string());
        match self.props.get(&key) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(kind)) => Err(Fault::new(*kind, format!("scripted fault for {name}"))),
            // unscripted properties behave like a player that lacks them
            None => Err(Fault::new(
                FaultKind::UnknownProperty,
                format!("no such property {interface}.{name}"),
            )),
        }
    }

    async fn get_all_properties(
        &self,
        endpoint: &str,
        interface: &str,
    ) -> Result<PropMap, Fault> {
        self.record(format!("GetAll {endpoint} {interface}"));
        let mut map = PropMap::new();
        for ((ep, iface, name), value) in &self.props {
            if ep == endpoint && iface == interface {
                if let Ok(value) = value {
                    map.insert(name.clone(), value.clone());
                }
            }
        }
        Ok(map)
    }

    async fn call(
        &self,
        endpoint: &str,
        _interface: &str,
        method: &str,
        arg: Option<&str>,
    ) -> Result<(), Fault> {
        self.record(format!("Call {endpoint} {method} {}", arg.unwrap_or("")));
        match self
            .method_faults
            .get(&(endpoint.to_string(), method.to_string()))
        {
            Some(kind) => Err(Fault::new(*kind, format!("scripted fault for {method}"))),
            None => Ok(()),
        }
    }
}
