//! Order references and request keys.

use rand::Rng;
use uuid::Uuid;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A fresh order reference: `order_<unix-millis>_<9 base36 chars>`.
pub fn external_reference() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("order_{}_{}", millis, suffix)
}

/// A random UUIDv4 key for `X-Idempotency-Key`.
pub fn idempotency_key() -> String {
    Uuid::new_v4().to_string()
}

/// Payment ids go into a URL path; only `[A-Za-z0-9_-]` is accepted.
pub fn is_valid_payment_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_reference_format() {
        let reference = external_reference();
        let parts: Vec<&str> = reference.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "order");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_external_reference_unique() {
        assert_ne!(external_reference(), external_reference());
    }

    #[test]
    fn test_idempotency_key_is_uuid_v4() {
        let key = idempotency_key();
        assert_eq!(key.len(), 36);
        let groups: Vec<&str> = key.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('4'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
        assert_eq!(Uuid::parse_str(&key).unwrap().get_version_num(), 4);
        assert_ne!(key, idempotency_key());
    }

    #[test]
    fn test_payment_id_validation() {
        assert!(is_valid_payment_id("1234567890"));
        assert!(is_valid_payment_id("abc_DEF-1"));
        assert!(!is_valid_payment_id(""));
        assert!(!is_valid_payment_id("123/../refunds"));
        assert!(!is_valid_payment_id("123?x=1"));
    }
}
