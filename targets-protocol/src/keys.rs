/*
broker key  : {namespace}/{name}
target key  : {namespace}/{broker}/{target}

Both formats are wire-visible: serialized tables and external watchers rely on them.
*/
use crate::errors::KeyError;

pub const KEY_SEPARATOR: char = '/';

pub fn broker_key(namespace: &str, name: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{name}")
}

pub fn target_key(namespace: &str, broker: &str, name: &str) -> String {
    format!("{namespace}{KEY_SEPARATOR}{broker}{KEY_SEPARATOR}{name}")
}

/// Splits a broker key into `(namespace, name)`.
///
/// Anything other than exactly two segments is rejected.
pub fn split_broker_key(key: &str) -> Result<(&str, &str), KeyError> {
    let mut parts = key.split(KEY_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(name), None) => Ok((namespace, name)),
        _ => Err(malformed(key, 2)),
    }
}

/// Splits a target key into `(namespace, broker, name)`.
///
/// Anything other than exactly three segments is rejected. Empty segments are
/// accepted since `target_key` can produce them.
pub fn split_target_key(key: &str) -> Result<(&str, &str, &str), KeyError> {
    let mut parts = key.split(KEY_SEPARATOR);
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(broker), Some(name), None) => Ok((namespace, broker, name)),
        _ => Err(malformed(key, 3)),
    }
}

fn malformed(key: &str, expected: usize) -> KeyError {
    KeyError::Malformed {
        key: key.to_string(),
        expected,
        found: key.split(KEY_SEPARATOR).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_keys() {
        assert_eq!(broker_key("ns", "b"), "ns/b");
        assert_eq!(target_key("ns", "b", "t"), "ns/b/t");
    }

    #[test]
    fn splits_well_formed_keys() {
        assert_eq!(split_target_key("ns/b/t"), Ok(("ns", "b", "t")));
        assert_eq!(split_broker_key("ns/b"), Ok(("ns", "b")));
        assert_eq!(split_target_key("//"), Ok(("", "", "")));
    }

    #[test]
    fn split_inverts_derive() {
        let key = target_key("default", "broker-a", "trigger-1");
        assert_eq!(
            split_target_key(&key),
            Ok(("default", "broker-a", "trigger-1"))
        );
    }

    #[test]
    fn rejects_short_target_keys() {
        for key in ["", "ns", "ns/b"] {
            let err = split_target_key(key).unwrap_err();
            assert!(
                matches!(err, KeyError::Malformed { expected: 3, .. }),
                "key {key:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_long_target_keys() {
        assert_eq!(
            split_target_key("ns/b/t/extra"),
            Err(KeyError::Malformed {
                key: "ns/b/t/extra".to_string(),
                expected: 3,
                found: 4,
            })
        );
    }

    #[test]
    fn rejects_malformed_broker_keys() {
        assert!(split_broker_key("ns").is_err());
        assert!(split_broker_key("ns/b/t").is_err());
    }
}
