//! Native session-bus binding built on zbus's blocking API.
//!
//! Replies come back already typed, so nothing here goes through the text parser. Arguments
//! are packed into a dynamic structure whose fields become the call's arguments.

use super::transport::{BindingProbe, Capabilities, Transport};
use super::value::{int32, Arg, Record, RemoteValue};
use super::BusSettings;
use crate::error::BusError;
use zbus::blocking::fdo::DBusProxy;
use zbus::blocking::Connection;
use zbus::zvariant::{Structure, StructureBuilder, Value};

/// Probe for the zbus binding. It always offers blocking method calls; whether it is usable
/// is decided by connecting to the session bus.
pub struct ZbusProbe;

impl BindingProbe for ZbusProbe {
    fn name(&self) -> &str {
        "zbus"
    }

    fn capabilities(&self) -> Option<Capabilities> {
        Some(Capabilities {
            blocking_calls: true,
            method_calls: true,
        })
    }

    fn connect(&self, settings: &BusSettings) -> Result<Box<dyn Transport>, BusError> {
        let connection = Connection::session().map_err(|err| remote_error("Hello", err))?;
        Ok(Box::new(ZbusTransport {
            connection,
            path: settings.object_path.clone(),
            interface: settings.interface.clone(),
        }))
    }
}

pub struct ZbusTransport {
    connection: Connection,
    path: String,
    interface: String,
}

impl Transport for ZbusTransport {
    fn call(&self, service: &str, method: &str, args: &[Arg]) -> Result<RemoteValue, BusError> {
        let reply = if args.is_empty() {
            self.connection.call_method(
                Some(service),
                self.path.as_str(),
                Some(self.interface.as_str()),
                method,
                &(),
            )
        } else {
            let body = args
                .iter()
                .try_fold(StructureBuilder::new(), |builder, arg| {
                    Ok::<_, BusError>(builder.append_field(to_value(arg)?))
                })?
                .build();
            self.connection.call_method(
                Some(service),
                self.path.as_str(),
                Some(self.interface.as_str()),
                method,
                &body,
            )
        }
        .map_err(|err| remote_error(method, err))?;

        let body = reply.body();
        if body.signature().map_or(true, |sig| sig.as_str().is_empty()) {
            return Ok(RemoteValue::Void);
        }

        let fields: Structure<'_> = body
            .deserialize()
            .map_err(|err| BusError::Decode(format!("{method}: {err}")))?;
        let mut values: Vec<RemoteValue> = fields.fields().iter().map(from_value).collect();
        Ok(match values.len() {
            0 => RemoteValue::Void,
            1 => values.remove(0),
            _ => RemoteValue::List(values),
        })
    }

    fn list_names(&self) -> Result<Vec<String>, BusError> {
        let proxy =
            DBusProxy::new(&self.connection).map_err(|err| remote_error("ListNames", err))?;
        let names = proxy
            .list_names()
            .map_err(|err| remote_error("ListNames", err))?;
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }
}

fn remote_error(method: &str, err: impl std::fmt::Display) -> BusError {
    BusError::Remote {
        method: method.to_string(),
        message: err.to_string(),
    }
}

fn to_value(arg: &Arg) -> Result<Value<'static>, BusError> {
    Ok(match arg {
        Arg::Bool(b) => Value::Bool(*b),
        Arg::Int(n) => Value::I32(int32(*n)?),
        Arg::Float(x) => Value::F64(*x),
        Arg::Str(s) => Value::from(s.clone()),
        Arg::List(items) if !items.is_empty() && items.iter().all(Arg::is_plain_int) => {
            let ints = items
                .iter()
                .filter_map(|item| match item {
                    Arg::Int(n) => Some(int32(*n)),
                    _ => None,
                })
                .collect::<Result<Vec<i32>, BusError>>()?;
            Value::from(ints)
        }
        Arg::List(items) => {
            let strings: Vec<String> = items.iter().map(ToString::to_string).collect();
            Value::from(strings)
        }
    })
}

fn from_value(value: &Value<'_>) -> RemoteValue {
    match value {
        Value::Bool(b) => RemoteValue::Bool(*b),
        Value::U8(n) => RemoteValue::Int(i64::from(*n)),
        Value::I16(n) => RemoteValue::Int(i64::from(*n)),
        Value::U16(n) => RemoteValue::Int(i64::from(*n)),
        Value::I32(n) => RemoteValue::Int(i64::from(*n)),
        Value::U32(n) => RemoteValue::Int(i64::from(*n)),
        Value::I64(n) => RemoteValue::Int(*n),
        Value::U64(n) => i64::try_from(*n)
            .map(RemoteValue::Int)
            .unwrap_or_else(|_| RemoteValue::Str(n.to_string())),
        Value::F64(x) => RemoteValue::Float(*x),
        Value::Str(s) => RemoteValue::Str(s.to_string()),
        Value::ObjectPath(path) => RemoteValue::Str(path.to_string()),
        Value::Signature(sig) => RemoteValue::Str(sig.to_string()),
        Value::Value(inner) => from_value(inner),
        Value::Array(array) => RemoteValue::List(array.iter().map(from_value).collect()),
        Value::Dict(dict) => {
            let map: Record = dict
                .iter()
                .map(|(key, value)| (from_value(key).to_text(), from_value(value)))
                .collect();
            RemoteValue::Map(map)
        }
        Value::Structure(fields) => {
            RemoteValue::List(fields.fields().iter().map(from_value).collect())
        }
        #[allow(unreachable_patterns)]
        _ => RemoteValue::Void,
    }
}
