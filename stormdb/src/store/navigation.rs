//! Path based reads and writes over a `serde_json::Value` tree.

use crate::errors::{ErrorKind, StormError, StormResult};
use serde_json::{Map, Value};

/// Returns the value at `path`, or `None` if any segment is missing.
pub(crate) fn lookup<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(arr) => segment.parse::<usize>().ok().and_then(|index| arr.get(index)),
        _ => None,
    })
}

pub(crate) fn lookup_mut<'a>(root: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    path.iter().try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(arr) => segment
            .parse::<usize>()
            .ok()
            .and_then(move |index| arr.get_mut(index)),
        _ => None,
    })
}

/// Writes `value` at `path`, creating objects for missing or scalar
/// intermediates. An array index equal to the length appends.
pub(crate) fn write_at(root: &mut Value, path: &[String], value: Value) -> StormResult<()> {
    let (first, rest) = match path.split_first() {
        None => {
            *root = value;
            return Ok(());
        }
        Some(split) => split,
    };

    if !root.is_object() && !root.is_array() {
        *root = Value::Object(Map::new());
    }

    match root {
        Value::Object(map) => {
            if rest.is_empty() {
                map.insert(first.clone(), value);
                Ok(())
            } else {
                let child = map.entry(first.clone()).or_insert(Value::Null);
                write_at(child, rest, value)
            }
        }
        Value::Array(arr) => {
            let index = parse_index(first, arr.len())?;
            if index == arr.len() {
                arr.push(Value::Null);
            }
            write_at(&mut arr[index], rest, value)
        }
        _ => unreachable!("root was replaced by an object above"),
    }
}

/// Removes the value at `path` and returns it. Missing targets are a no-op.
pub(crate) fn remove_at(root: &mut Value, path: &[String]) -> Option<Value> {
    let (last, parent) = path.split_last()?;
    match lookup_mut(root, parent)? {
        Value::Object(map) => map.shift_remove(last),
        Value::Array(arr) => {
            let index = last.parse::<usize>().ok()?;
            if index < arr.len() {
                Some(arr.remove(index))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Appends `value` to the array at `path`. A missing or null target
/// becomes a one element array.
pub(crate) fn push_at(root: &mut Value, path: &[String], value: Value) -> StormResult<()> {
    match lookup_mut(root, path) {
        Some(Value::Array(arr)) => {
            arr.push(value);
            Ok(())
        }
        None | Some(Value::Null) => write_at(root, path, Value::Array(vec![value])),
        Some(other) => {
            log::error!("Cannot push into a value of type {}", type_name(other));
            Err(StormError::new(
                &format!("Cannot push into a value of type {}", type_name(other)),
                ErrorKind::InvalidDataType,
            ))
        }
    }
}

/// Number of elements of an array, entries of an object or characters of
/// a string.
pub(crate) fn length_of(value: Option<&Value>) -> StormResult<usize> {
    match value {
        Some(Value::Array(arr)) => Ok(arr.len()),
        Some(Value::Object(map)) => Ok(map.len()),
        Some(Value::String(text)) => Ok(text.chars().count()),
        Some(other) => {
            log::error!("A value of type {} has no length", type_name(other));
            Err(StormError::new(
                &format!("A value of type {} has no length", type_name(other)),
                ErrorKind::InvalidDataType,
            ))
        }
        None => {
            log::error!("Cannot take the length of a missing value");
            Err(StormError::new(
                "Cannot take the length of a missing value",
                ErrorKind::InvalidDataType,
            ))
        }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_index(segment: &str, len: usize) -> StormResult<usize> {
    let index = segment.parse::<usize>().map_err(|_| {
        log::error!("Invalid array index {} to access array inside a document", segment);
        StormError::new(
            &format!("Invalid array index {} to access array inside a document", segment),
            ErrorKind::ValidationError,
        )
    })?;

    if index > len {
        log::error!("Array index {} out of bound", index);
        return Err(StormError::new(
            &format!("Array index {} out of bound", index),
            ErrorKind::ValidationError,
        ));
    }
    Ok(index)
}
