use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

const DEVICE_ID_LENGTH: usize = 32;

/// Random identifier used when the host application does not supply a device id.
pub fn generate_device_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(DEVICE_ID_LENGTH)
        .collect()
}

pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_ids_are_alphanumeric() {
        let id = generate_device_id();
        assert_eq!(id.len(), DEVICE_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, generate_device_id());
    }

    #[test]
    fn session_ids_are_uuids() {
        let id = generate_session_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, generate_session_id());
    }
}
