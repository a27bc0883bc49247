//! Story args: initial values from declared arg types and partial updates.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::parameters::{ARG_TYPES_KEY, Parameters};

/// Named input values of one story.
pub type Args = Map<String, Value>;

/// Declared arg types, in declaration order.
pub type ArgTypes = IndexMap<String, ArgType>;

/// Declaration of one argument.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgType {
	/// Initial value. An explicit `null` is kept as a default of `null`.
	#[serde(default, deserialize_with = "present")]
	pub default_value: Option<Value>,
	/// Remaining declaration fields (control hints, descriptions, ...).
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
	Value::deserialize(deserializer).map(Some)
}

/// Reads `argTypes` out of merged parameters.
///
/// A missing key yields no declarations.
pub fn arg_types(parameters: &Parameters) -> Result<ArgTypes, serde_json::Error> {
	match parameters.get(ARG_TYPES_KEY) {
		None | Some(Value::Null) => Ok(ArgTypes::new()),
		Some(declared) => ArgTypes::deserialize(declared),
	}
}

/// Builds initial args from declared defaults.
///
/// Arguments without a declared default get no entry.
pub fn materialize(arg_types: &ArgTypes) -> Args {
	arg_types
		.iter()
		.filter_map(|(name, ty)| Some((name.clone(), ty.default_value.clone()?)))
		.collect()
}

/// Merges `partial` into `args` key by key.
pub fn merge(args: &mut Args, partial: &Args) {
	for (key, value) in partial {
		args.insert(key.clone(), value.clone());
	}
}

/// Restores `keys` (all keys when `None`) to their initial values.
///
/// Keys without an initial value are removed.
pub fn reset(args: &mut Args, initial: &Args, keys: Option<&[&str]>) {
	match keys {
		None => *args = initial.clone(),
		Some(keys) => {
			for &key in keys {
				match initial.get(key) {
					Some(value) => {
						args.insert(key.to_string(), value.clone());
					}
					None => {
						args.remove(key);
					}
				}
			}
		}
	}
}
