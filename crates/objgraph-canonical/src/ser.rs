//! serde adapter producing [`Node`] trees.
//!
//! The mapping mirrors how `serde_json` lays out data: structs become
//! records, maps become maps, sequences and tuples become sequences and enums
//! are externally tagged. Two points differ: map keys must be text, and
//! timestamps (the reserved timestamp newtype and `std::time::SystemTime`)
//! become opaque scalars.

use serde::ser::{self, Impossible, Serialize};

use crate::errors::GraphError;
use crate::node::{Field, Node, Record, Visibility};
use crate::timestamp::{Timestamp, TIMESTAMP_TOKEN};
use crate::value::Scalar;

/// Adapts any serializable value into a [`Node`].
///
/// # Errors
///
/// [`GraphError::UnsupportedMapKey`] for maps keyed by anything but text,
/// [`GraphError::Adapter`] when the value's `Serialize` impl fails.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node, GraphError> {
    value.serialize(NodeSerializer)
}

fn scalar(value: Scalar) -> Result<Node, GraphError> {
    Ok(Node::Scalar(value))
}

struct NodeSerializer;

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = GraphError;
    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Node, GraphError> {
        scalar(Scalar::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, GraphError> {
        scalar(Scalar::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, GraphError> {
        scalar(Scalar::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, GraphError> {
        scalar(Scalar::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, GraphError> {
        scalar(Scalar::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node, GraphError> {
        i64::try_from(v)
            .map(Scalar::Int)
            .map_err(|_| GraphError::Adapter(format!("integer {v} does not fit in 64 bits")))
            .and_then(scalar)
    }

    fn serialize_u8(self, v: u8) -> Result<Node, GraphError> {
        scalar(Scalar::UInt(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, GraphError> {
        scalar(Scalar::UInt(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, GraphError> {
        scalar(Scalar::UInt(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, GraphError> {
        scalar(Scalar::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Node, GraphError> {
        u64::try_from(v)
            .map(Scalar::UInt)
            .map_err(|_| GraphError::Adapter(format!("integer {v} does not fit in 64 bits")))
            .and_then(scalar)
    }

    fn serialize_f32(self, v: f32) -> Result<Node, GraphError> {
        // Widen via the shortest decimal so 0.1f32 stays 0.1.
        let widened = v.to_string().parse().unwrap_or_else(|_| f64::from(v));
        scalar(Scalar::Float(widened))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, GraphError> {
        scalar(Scalar::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, GraphError> {
        scalar(Scalar::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, GraphError> {
        scalar(Scalar::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, GraphError> {
        Ok(Node::Sequence(
            v.iter()
                .map(|b| Node::Scalar(Scalar::UInt((*b).into())))
                .collect(),
        ))
    }

    fn serialize_none(self) -> Result<Node, GraphError> {
        scalar(Scalar::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node, GraphError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node, GraphError> {
        scalar(Scalar::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, GraphError> {
        scalar(Scalar::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, GraphError> {
        scalar(Scalar::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, GraphError> {
        if name != TIMESTAMP_TOKEN {
            return value.serialize(self);
        }
        match value.serialize(self)? {
            Node::Scalar(Scalar::Str(text)) => Timestamp::parse(&text)
                .map(|ts| Node::Scalar(Scalar::Timestamp(ts)))
                .map_err(|source| GraphError::Adapter(source.to_string())),
            _ => Err(GraphError::Adapter(
                "timestamp token must wrap a string".to_string(),
            )),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, GraphError> {
        Ok(Node::Map(vec![(variant.to_string(), to_node(value)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, GraphError> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, GraphError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, GraphError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, GraphError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, GraphError> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeRecord, GraphError> {
        Ok(SerializeRecord {
            record: Record::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, GraphError> {
        Ok(SerializeStructVariant {
            variant,
            record: Record::new(variant),
        })
    }
}

struct SerializeVec {
    items: Vec<Node>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), GraphError> {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, GraphError> {
        Ok(Node::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), GraphError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, GraphError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), GraphError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, GraphError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Node>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), GraphError> {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, GraphError> {
        Ok(Node::Map(vec![(
            self.variant.to_string(),
            Node::Sequence(self.items),
        )]))
    }
}

struct SerializeMap {
    entries: Vec<(String, Node)>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), GraphError> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), GraphError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| GraphError::Adapter("map value without a key".to_string()))?;
        self.entries.push((key, to_node(value)?));
        Ok(())
    }

    fn end(self) -> Result<Node, GraphError> {
        Ok(Node::Map(self.entries))
    }
}

struct SerializeRecord {
    record: Record,
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), GraphError> {
        self.record.fields.push(Field {
            name: key.to_string(),
            rename: None,
            visibility: Visibility::Public,
            value: to_node(value)?,
        });
        Ok(())
    }

    fn end(self) -> Result<Node, GraphError> {
        if self.record.type_name == SYSTEM_TIME {
            if let Some(ts) = system_time(&self.record) {
                return scalar(Scalar::Timestamp(ts));
            }
        }
        Ok(Node::Record(self.record))
    }
}

/// Struct name serde gives `std::time::SystemTime`.
const SYSTEM_TIME: &str = "SystemTime";

/// Reads serde's `SystemTime { secs_since_epoch, nanos_since_epoch }` layout.
fn system_time(record: &Record) -> Option<Timestamp> {
    let [secs, nanos] = record.fields.as_slice() else {
        return None;
    };
    match (secs.name.as_str(), &secs.value, nanos.name.as_str(), &nanos.value) {
        (
            "secs_since_epoch",
            Node::Scalar(Scalar::UInt(secs)),
            "nanos_since_epoch",
            Node::Scalar(Scalar::UInt(nanos)),
        ) => Timestamp::from_unix_parts(
            i64::try_from(*secs).ok()?,
            u32::try_from(*nanos).ok()?,
        ),
        _ => None,
    }
}

struct SerializeStructVariant {
    variant: &'static str,
    record: Record,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Node;
    type Error = GraphError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), GraphError> {
        self.record.fields.push(Field {
            name: key.to_string(),
            rename: None,
            visibility: Visibility::Public,
            value: to_node(value)?,
        });
        Ok(())
    }

    fn end(self) -> Result<Node, GraphError> {
        Ok(Node::Map(vec![(
            self.variant.to_string(),
            Node::Record(self.record),
        )]))
    }
}

/// Accepts text-like keys only.
struct MapKeySerializer;

fn unsupported_key(found: &'static str) -> GraphError {
    GraphError::UnsupportedMapKey { found }
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = GraphError;
    type SerializeSeq = Impossible<String, GraphError>;
    type SerializeTuple = Impossible<String, GraphError>;
    type SerializeTupleStruct = Impossible<String, GraphError>;
    type SerializeTupleVariant = Impossible<String, GraphError>;
    type SerializeMap = Impossible<String, GraphError>;
    type SerializeStruct = Impossible<String, GraphError>;
    type SerializeStructVariant = Impossible<String, GraphError>;

    fn serialize_str(self, v: &str) -> Result<String, GraphError> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String, GraphError> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, GraphError> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, GraphError> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, GraphError> {
        Err(unsupported_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, GraphError> {
        Err(unsupported_key("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, GraphError> {
        Err(unsupported_key("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, GraphError> {
        Err(unsupported_key("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, GraphError> {
        Err(unsupported_key("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, GraphError> {
        Err(unsupported_key("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, GraphError> {
        Err(unsupported_key("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, GraphError> {
        Err(unsupported_key("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, GraphError> {
        Err(unsupported_key("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, GraphError> {
        Err(unsupported_key("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, GraphError> {
        Err(unsupported_key("f64"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, GraphError> {
        Err(unsupported_key("bytes"))
    }

    fn serialize_none(self) -> Result<String, GraphError> {
        Err(unsupported_key("option"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String, GraphError> {
        Err(unsupported_key("option"))
    }

    fn serialize_unit(self) -> Result<String, GraphError> {
        Err(unsupported_key("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, GraphError> {
        Err(unsupported_key("unit struct"))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, GraphError> {
        Err(unsupported_key("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, GraphError> {
        Err(unsupported_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, GraphError> {
        Err(unsupported_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, GraphError> {
        Err(unsupported_key("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, GraphError> {
        Err(unsupported_key("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, GraphError> {
        Err(unsupported_key("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, GraphError> {
        Err(unsupported_key("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, GraphError> {
        Err(unsupported_key("enum"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::{Duration, UNIX_EPOCH};

    use serde::Serialize;
    use serde_json::json;

    use super::*;
    use crate::errors::ErrorKind;

    #[derive(Serialize)]
    struct Renamed {
        #[serde(rename = "y")]
        why: u8,
        x: Option<&'static str>,
    }

    #[test]
    fn structs_become_records_with_serde_names() {
        let node = to_node(&Renamed { why: 1, x: None }).unwrap();
        let expected = Record::new("Renamed").field("y", 1u64).field("x", Node::null());
        assert_eq!(node, Node::Record(expected));
    }

    #[test]
    fn json_objects_become_maps() {
        let node = to_node(&json!({"b": [true], "a": 1.5})).unwrap();
        match node {
            Node::Map(entries) => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys.len(), 2);
                assert!(keys.contains(&"a") && keys.contains(&"b"));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn non_text_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert(7u32, "seven");
        let err = to_node(&map).unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedMapKey { found: "u32" }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn timestamps_stay_opaque() {
        let ts = Timestamp::from_unix_millis(444).unwrap();
        assert_eq!(to_node(&ts).unwrap(), Node::Scalar(Scalar::Timestamp(ts)));
    }

    #[test]
    fn system_time_is_a_timestamp() {
        let at = UNIX_EPOCH + Duration::from_millis(444);
        let expected = Timestamp::from_unix_millis(444).unwrap();
        assert_eq!(to_node(&at).unwrap(), Node::Scalar(Scalar::Timestamp(expected)));
    }

    #[test]
    fn lookalike_struct_with_extra_fields_stays_a_record() {
        #[derive(Serialize)]
        struct SystemTime {
            secs_since_epoch: u64,
            nanos_since_epoch: u32,
            zone: &'static str,
        }
        let node = to_node(&SystemTime {
            secs_since_epoch: 0,
            nanos_since_epoch: 0,
            zone: "utc",
        })
        .unwrap();
        assert!(matches!(node, Node::Record(_)));
    }

    #[test]
    fn f32_widens_through_shortest_decimal() {
        assert_eq!(to_node(&0.1f32).unwrap(), Node::Scalar(Scalar::Float(0.1)));
        assert_eq!(to_node(&1.5f32).unwrap(), Node::Scalar(Scalar::Float(1.5)));
        match to_node(&f32::NAN).unwrap() {
            Node::Scalar(Scalar::Float(v)) => assert!(v.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[derive(Serialize)]
    enum Shape {
        Dot,
        Line(u8, u8),
        Box { w: u8 },
    }

    #[test]
    fn enums_are_externally_tagged() {
        assert_eq!(to_node(&Shape::Dot).unwrap(), Node::from("Dot"));
        assert_eq!(
            to_node(&Shape::Line(1, 2)).unwrap(),
            Node::map([("Line", Node::from(vec![1u64, 2]))])
        );
        assert_eq!(
            to_node(&Shape::Box { w: 3 }).unwrap(),
            Node::map([("Box", Node::from(Record::new("Box").field("w", 3u64)))])
        );
    }
}
