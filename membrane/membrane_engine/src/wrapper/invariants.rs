//! Consistency checks between a wrapper's answers and its target.
//!
//! Each check runs after a successful forwarded operation and fails with
//! [`Error::InvariantViolation`] if the target's real shape contradicts what
//! the operation reported.

use membrane_core::{Error, ObjectRef, PropertyDescriptor, PropertyKey, Result};

/// A successful `prevent_extensions` must leave the target non-extensible.
pub(crate) fn check_prevent_extensions(target: &ObjectRef) -> Result<()> {
    if target.is_extensible()? {
        return Err(Error::invariant(
            "prevent_extensions reported success but the target is still extensible",
        ));
    }
    Ok(())
}

/// A successful definition of a non-configurable (or non-writable)
/// property must be observable on the target.
pub(crate) fn check_define(
    target: &ObjectRef,
    key: &PropertyKey,
    requested: &PropertyDescriptor,
) -> Result<()> {
    if requested.configurable != Some(false) {
        return Ok(());
    }

    let Some(actual) = target.get_own_property(key)? else {
        return Err(Error::invariant(format!(
            "define_own_property reported a non-configurable '{}' that the target lacks",
            key
        )));
    };
    if actual.is_configurable() {
        return Err(Error::invariant(format!(
            "define_own_property reported '{}' as non-configurable but the target disagrees",
            key
        )));
    }
    if requested.writable == Some(false) && actual.is_data() && actual.is_writable() {
        return Err(Error::invariant(format!(
            "define_own_property reported '{}' as read-only but the target disagrees",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use membrane_core::Realm;

    #[test]
    fn test_check_prevent_extensions() {
        let realm = Realm::new();
        let target = realm.object();
        assert!(check_prevent_extensions(&target).is_err());
        target.prevent_extensions().unwrap();
        assert!(check_prevent_extensions(&target).is_ok());
    }

    #[test]
    fn test_check_define() {
        let realm = Realm::new();
        let target = realm.object();
        let key = PropertyKey::from("fixed");
        let fixed = PropertyDescriptor::data(1, false, true, false);

        let err = check_define(&target, &key, &fixed).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));

        target.define_own_property(&key, fixed.clone()).unwrap();
        assert!(check_define(&target, &key, &fixed).is_ok());

        // Configurable definitions are not checked.
        let loose = PropertyKey::from("loose");
        assert!(check_define(&target, &loose, &PropertyDescriptor::plain(1)).is_ok());
    }
}
