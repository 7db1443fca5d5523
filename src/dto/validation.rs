//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 32;

/// Validates a player name as typed on the home screen.
///
/// Blank names are accepted here: the player may still be typing. Matchmaking
/// is what refuses them.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("StarPlayer") // Ok
/// validate_player_name("")           // Ok
/// validate_player_name("tab\there")  // Err - control character
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length > MAX_PLAYER_NAME_CHARS {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_CHARS} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    if name.chars().any(char::is_control) {
        let mut err = ValidationError::new("player_name_format");
        err.message = Some("Player name must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("StarPlayer").is_ok());
        assert!(validate_player_name("").is_ok());
        assert!(validate_player_name("Zoé 42").is_ok());
        assert!(validate_player_name(&"a".repeat(MAX_PLAYER_NAME_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_player_name_too_long() {
        assert!(validate_player_name(&"a".repeat(MAX_PLAYER_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_player_name_control_characters() {
        assert!(validate_player_name("tab\there").is_err());
        assert!(validate_player_name("new\nline").is_err());
    }
}
