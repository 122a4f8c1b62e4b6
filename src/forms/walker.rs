//! Lock-step traversal of a mapping tree and a data document.
//!
//! The mapping decides the shape: only paths present in the mapping are ever read, and
//! array mappings are iterated over their own length. Absent and `null` data both mean
//! "nothing to write" for the whole subtree.

use serde_json::Value;

use super::acroform::FieldAccess;
use super::mapping::{FieldType, MappingNode};
use super::report::FillReport;
use super::writer::{to_text, write_field};

/// Fill `form` from `data` as directed by `node`, recording every write in `report`.
pub fn fill<F: FieldAccess + ?Sized>(
    form: &mut F,
    node: &MappingNode,
    data: Option<&Value>,
    report: &mut FillReport,
) {
    let data = data.filter(|value| !value.is_null());

    match node {
        MappingNode::Empty => {}
        MappingNode::Leaf(field) => {
            if let Some(value) = data {
                write(form, field, FieldType::Text, value, None, report);
            }
        }
        MappingNode::Descriptor {
            field,
            kind,
            option,
        } => {
            if let Some(value) = data {
                write(form, field, *kind, value, option.as_deref(), report);
            }
        }
        MappingNode::Sequence(children) => {
            let Some(Value::Array(items)) = data else {
                return;
            };
            for (index, child) in children.iter().enumerate() {
                fill(form, child, items.get(index), report);
            }
        }
        MappingNode::Group(children) => {
            let Some(Value::Object(map)) = data else {
                return;
            };
            for (key, child) in children {
                fill(form, child, map.get(key), report);
            }
        }
    }
}

fn write<F: FieldAccess + ?Sized>(
    form: &mut F,
    field: &str,
    kind: FieldType,
    value: &Value,
    option: Option<&str>,
    report: &mut FillReport,
) {
    let outcome = write_field(form, field, kind, value, option);
    report.record(field, &to_text(value), outcome);
}
