//! Definition-Driven Setter
//!
//! Maps `(key, value)` pairs produced by the parser onto fields of a
//! caller-owned record, the way a struct full of per-field offsets and a
//! value-kind tag once did in C: here each [`SettingDef`] instead closes
//! over a setter function, so application is just a closure call rather
//! than pointer arithmetic into the record.

use crate::coerce::{parse_bool, parse_uint};
use crate::error::ErrorKind;

/// The kind of value a [`SettingDef`] expects, kept mainly for
/// introspection (e.g. a consumer printing `--help`-style usage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Str,
    Int,
    Bool,
}

/// One named setting on a record of type `T`.
pub struct SettingDef<T> {
    pub name: &'static str,
    pub kind: SettingKind,
    apply: Box<dyn Fn(&mut T, &str) -> Result<(), ErrorKind>>,
}

impl<T> SettingDef<T> {
    /// A setting whose value is stored as-is.
    pub fn str(name: &'static str, set: impl Fn(&mut T, String) + 'static) -> Self {
        Self {
            name,
            kind: SettingKind::Str,
            apply: Box::new(move |record, value| {
                set(record, value.to_string());
                Ok(())
            }),
        }
    }

    /// A setting coerced through [`parse_uint`] before being stored.
    pub fn int(name: &'static str, set: impl Fn(&mut T, u64) + 'static) -> Self {
        Self {
            name,
            kind: SettingKind::Int,
            apply: Box::new(move |record, value| {
                set(record, parse_uint(value)?);
                Ok(())
            }),
        }
    }

    /// A setting coerced through [`parse_bool`] before being stored.
    pub fn bool(name: &'static str, set: impl Fn(&mut T, bool) + 'static) -> Self {
        Self {
            name,
            kind: SettingKind::Bool,
            apply: Box::new(move |record, value| {
                set(record, parse_bool(value)?);
                Ok(())
            }),
        }
    }
}

/// Apply `(key, value)` to `record` by a linear scan through `defs`, the
/// same lookup strategy as a short, human-curated settings table.
pub fn apply_setting<T>(defs: &[SettingDef<T>], record: &mut T, key: &str, value: &str) -> Result<(), ErrorKind> {
    match defs.iter().find(|def| def.name == key) {
        Some(def) => (def.apply)(record, value),
        None => Err(ErrorKind::UnknownSetting(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct ServiceSettings {
        name: String,
        process_limit: u64,
        enabled: bool,
    }

    fn defs() -> Vec<SettingDef<ServiceSettings>> {
        vec![
            SettingDef::str("name", |r, v| r.name = v),
            SettingDef::int("process_limit", |r, v| r.process_limit = v),
            SettingDef::bool("enabled", |r, v| r.enabled = v),
        ]
    }

    #[test]
    fn applies_each_kind_of_setting() {
        let defs = defs();
        let mut record = ServiceSettings::default();
        apply_setting(&defs, &mut record, "name", "imap").unwrap();
        apply_setting(&defs, &mut record, "process_limit", "010").unwrap();
        apply_setting(&defs, &mut record, "enabled", "yes").unwrap();
        assert_eq!(
            record,
            ServiceSettings { name: "imap".to_string(), process_limit: 8, enabled: true }
        );
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let defs = defs();
        let mut record = ServiceSettings::default();
        let err = apply_setting(&defs, &mut record, "bogus", "1").unwrap_err();
        assert!(matches!(err, ErrorKind::UnknownSetting(_)));
    }

    #[test]
    fn invalid_value_for_kind_is_an_error() {
        let defs = defs();
        let mut record = ServiceSettings::default();
        let err = apply_setting(&defs, &mut record, "enabled", "yeah").unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidBoolean(_)));
    }
}
