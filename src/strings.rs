// ABOUTME: Random test data generation
// ABOUTME: Alphanumeric strings, digit strings and v4 UUIDs

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

pub const DEFAULT_RANDOM_LENGTH: usize = 10;

/// Random string of ASCII letters and digits
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Random string of decimal digits. May start with `0`.
pub fn generate_random_integer(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(generate_random_string(0), "");
    }

    #[test]
    fn test_random_integer() {
        let s = generate_random_integer(DEFAULT_RANDOM_LENGTH);
        assert_eq!(s.len(), 10);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_uuid() {
        let id = generate_uuid();
        assert_eq!(id.len(), 36);
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(generate_uuid(), id);
    }
}
