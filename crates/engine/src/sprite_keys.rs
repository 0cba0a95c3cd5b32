use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite type key must not be empty")]
    Empty,
    #[error("sprite type key must not start with '/'")]
    LeadingSlash,
    #[error("sprite type key must not end with '/'")]
    TrailingSlash,
    #[error("sprite type key must not contain '\\\\'")]
    Backslash,
    #[error("sprite type key must not contain '..'")]
    ParentTraversal,
    #[error("sprite type key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Sprite type keys name a visual class, e.g. `bots/health_small`.
pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::LeadingSlash);
    }
    if key.ends_with('/') {
        return Err(SpriteKeyError::TrailingSlash);
    }
    if key.contains('\\') {
        return Err(SpriteKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    match key.chars().find(|ch| !is_key_char(*ch)) {
        Some(character) => Err(SpriteKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-')
}
