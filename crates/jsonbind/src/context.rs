//! Per-operation configuration threaded through every codec call.
//!
//! A context is built once, before a top-level call starts, and is only ever
//! handed out by shared reference afterwards. Codecs read it; nothing writes
//! to it.
//!
//! ```rust
//! use jsonbind::SerializationContext;
//!
//! let ctx = SerializationContext::builder()
//!     .indent("  ")
//!     .serialize_nulls(false)
//!     .build();
//! assert!(!ctx.serialize_nulls());
//! assert_eq!(ctx.indent(), "  ");
//! ```
#![allow(clippy::struct_excessive_bools)]

use alloc::string::String;

/// Options for one serialization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationContext {
    indent: String,
    lenient: bool,
    serialize_nulls: bool,
    write_null_map_values: bool,
    write_empty_json_arrays: bool,
    write_single_elem_arrays_unwrapped: bool,
    order_map_entries_by_keys: bool,
    whole_floats_with_fraction: bool,
    wrap_root_value: bool,
}

impl Default for SerializationContext {
    fn default() -> Self {
        SerializationContextBuilder::default().build()
    }
}

impl SerializationContext {
    /// Starts a builder holding the default options.
    #[must_use]
    pub fn builder() -> SerializationContextBuilder {
        SerializationContextBuilder::default()
    }

    /// Indentation repeated once per nesting level; empty means compact output.
    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Whether top-level scalars and non-finite numbers may be written.
    #[must_use]
    pub fn lenient(&self) -> bool {
        self.lenient
    }

    /// Whether `null` object members are written (`true`) or omitted.
    #[must_use]
    pub fn serialize_nulls(&self) -> bool {
        self.serialize_nulls
    }

    /// Whether map entries with a `null` value are written even when
    /// [`serialize_nulls`](Self::serialize_nulls) is off.
    #[must_use]
    pub fn write_null_map_values(&self) -> bool {
        self.write_null_map_values
    }

    /// Whether empty collections held by an object member are written as `[]`.
    #[must_use]
    pub fn write_empty_json_arrays(&self) -> bool {
        self.write_empty_json_arrays
    }

    /// Whether one-element collections are written as the bare element.
    #[must_use]
    pub fn write_single_elem_arrays_unwrapped(&self) -> bool {
        self.write_single_elem_arrays_unwrapped
    }

    /// Whether map entries are sorted.
    ///
    /// Map codecs sort by encoded member name unless built with
    /// `order_by_key()`, so integer keys `2` and `10` are written as `"10"`
    /// then `"2"` by default.
    #[must_use]
    pub fn order_map_entries_by_keys(&self) -> bool {
        self.order_map_entries_by_keys
    }

    /// Whether whole floating point values keep a fraction (`1.0` rather than `1`).
    #[must_use]
    pub fn whole_floats_with_fraction(&self) -> bool {
        self.whole_floats_with_fraction
    }

    /// Whether the mapper wraps the root value in a single-member object.
    #[must_use]
    pub fn wrap_root_value(&self) -> bool {
        self.wrap_root_value
    }
}

/// Builder for [`SerializationContext`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SerializationContextBuilder {
    indent: String,
    lenient: bool,
    serialize_nulls: bool,
    write_null_map_values: bool,
    write_empty_json_arrays: bool,
    write_single_elem_arrays_unwrapped: bool,
    order_map_entries_by_keys: bool,
    whole_floats_with_fraction: bool,
    wrap_root_value: bool,
}

impl Default for SerializationContextBuilder {
    fn default() -> Self {
        Self {
            indent: String::new(),
            lenient: false,
            serialize_nulls: true,
            write_null_map_values: true,
            write_empty_json_arrays: true,
            write_single_elem_arrays_unwrapped: false,
            order_map_entries_by_keys: false,
            whole_floats_with_fraction: true,
            wrap_root_value: false,
        }
    }
}

impl SerializationContextBuilder {
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn serialize_nulls(mut self, serialize_nulls: bool) -> Self {
        self.serialize_nulls = serialize_nulls;
        self
    }

    pub fn write_null_map_values(mut self, write: bool) -> Self {
        self.write_null_map_values = write;
        self
    }

    pub fn write_empty_json_arrays(mut self, write: bool) -> Self {
        self.write_empty_json_arrays = write;
        self
    }

    pub fn write_single_elem_arrays_unwrapped(mut self, unwrap: bool) -> Self {
        self.write_single_elem_arrays_unwrapped = unwrap;
        self
    }

    pub fn order_map_entries_by_keys(mut self, order: bool) -> Self {
        self.order_map_entries_by_keys = order;
        self
    }

    pub fn whole_floats_with_fraction(mut self, keep: bool) -> Self {
        self.whole_floats_with_fraction = keep;
        self
    }

    pub fn wrap_root_value(mut self, wrap: bool) -> Self {
        self.wrap_root_value = wrap;
        self
    }

    #[must_use]
    pub fn build(self) -> SerializationContext {
        SerializationContext {
            indent: self.indent,
            lenient: self.lenient,
            serialize_nulls: self.serialize_nulls,
            write_null_map_values: self.write_null_map_values,
            write_empty_json_arrays: self.write_empty_json_arrays,
            write_single_elem_arrays_unwrapped: self.write_single_elem_arrays_unwrapped,
            order_map_entries_by_keys: self.order_map_entries_by_keys,
            whole_floats_with_fraction: self.whole_floats_with_fraction,
            wrap_root_value: self.wrap_root_value,
        }
    }
}

/// Options for one deserialization call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeserializationContext {
    lenient: bool,
    accept_single_value_as_array: bool,
    wrap_root_value: bool,
}

impl DeserializationContext {
    /// Starts a builder holding the default options (all `false`).
    #[must_use]
    pub fn builder() -> DeserializationContextBuilder {
        DeserializationContextBuilder::default()
    }

    /// Whether top-level scalars and `NaN`/`Infinity` literals are accepted.
    #[must_use]
    pub fn lenient(&self) -> bool {
        self.lenient
    }

    /// Whether a collection codec accepts a bare value as a one-element array.
    #[must_use]
    pub fn accept_single_value_as_array(&self) -> bool {
        self.accept_single_value_as_array
    }

    /// Whether the mapper expects the root value wrapped in a single-member object.
    #[must_use]
    pub fn wrap_root_value(&self) -> bool {
        self.wrap_root_value
    }
}

/// Builder for [`DeserializationContext`].
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct DeserializationContextBuilder {
    lenient: bool,
    accept_single_value_as_array: bool,
    wrap_root_value: bool,
}

impl DeserializationContextBuilder {
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn accept_single_value_as_array(mut self, accept: bool) -> Self {
        self.accept_single_value_as_array = accept;
        self
    }

    pub fn wrap_root_value(mut self, wrap: bool) -> Self {
        self.wrap_root_value = wrap;
        self
    }

    #[must_use]
    pub fn build(self) -> DeserializationContext {
        DeserializationContext {
            lenient: self.lenient,
            accept_single_value_as_array: self.accept_single_value_as_array,
            wrap_root_value: self.wrap_root_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_defaults() {
        let ctx = SerializationContext::default();
        assert_eq!(ctx.indent(), "");
        assert!(!ctx.lenient());
        assert!(ctx.serialize_nulls());
        assert!(ctx.write_null_map_values());
        assert!(ctx.write_empty_json_arrays());
        assert!(!ctx.write_single_elem_arrays_unwrapped());
        assert!(!ctx.order_map_entries_by_keys());
        assert!(ctx.whole_floats_with_fraction());
        assert!(!ctx.wrap_root_value());
    }

    #[test]
    fn builder_overrides_each_option() {
        let ctx = SerializationContext::builder()
            .indent("\t")
            .lenient(true)
            .serialize_nulls(false)
            .write_null_map_values(false)
            .write_empty_json_arrays(false)
            .write_single_elem_arrays_unwrapped(true)
            .order_map_entries_by_keys(true)
            .whole_floats_with_fraction(false)
            .wrap_root_value(true)
            .build();
        assert_eq!(ctx.indent(), "\t");
        assert!(ctx.lenient());
        assert!(!ctx.serialize_nulls());
        assert!(!ctx.write_null_map_values());
        assert!(!ctx.write_empty_json_arrays());
        assert!(ctx.write_single_elem_arrays_unwrapped());
        assert!(ctx.order_map_entries_by_keys());
        assert!(!ctx.whole_floats_with_fraction());
        assert!(ctx.wrap_root_value());

        let de = DeserializationContext::builder()
            .lenient(true)
            .accept_single_value_as_array(true)
            .build();
        assert!(de.lenient());
        assert!(de.accept_single_value_as_array());
        assert!(!de.wrap_root_value());
    }
}
