//! Presence-aware field for sparse updates.
//!
//! A key missing from the request body deserializes to [`Field::Absent`] (via
//! `#[serde(default)]` on the containing struct); any value that is present, including an
//! empty string, becomes [`Field::Present`]. Nullable columns use `Field<Option<T>>` so an
//! explicit `null` clears the column.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Present(v) => Field::Present(f(v)),
            Field::Absent => Field::Absent,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(v: T) -> Self {
        Field::Present(v)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Field::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Present(v) => v.serialize(serializer),
            Field::Absent => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Default)]
    struct Patch {
        #[serde(default)]
        remark: Field<String>,
        #[serde(default)]
        supervisor_id: Field<Option<String>>,
    }

    #[test]
    fn missing_key_is_absent() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert!(p.remark.is_absent());
        assert!(p.supervisor_id.is_absent());
    }

    #[test]
    fn empty_string_is_present() {
        let p: Patch = serde_json::from_str(r#"{"remark": ""}"#).unwrap();
        assert_eq!(p.remark, Field::Present(String::new()));
    }

    #[test]
    fn null_clears_nullable_field() {
        let p: Patch = serde_json::from_str(r#"{"supervisor_id": null}"#).unwrap();
        assert_eq!(p.supervisor_id, Field::Present(None));
    }

    #[test]
    fn null_is_rejected_for_required_column() {
        assert!(serde_json::from_str::<Patch>(r#"{"remark": null}"#).is_err());
    }
}
