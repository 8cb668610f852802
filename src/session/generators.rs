use rand::RngCore;

/// Smallest accepted token size, in random bytes (128 bits)
pub const MIN_TOKEN_BYTES: usize = 16;

/// Trait for generating session tokens
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Cryptographically random token encoded as lower-case hex
pub struct RandomHexTokenGenerator {
    byte_len: usize,
}

impl RandomHexTokenGenerator {
    /// `byte_len` below `MIN_TOKEN_BYTES` is raised to it.
    pub fn new(byte_len: usize) -> Self {
        Self {
            byte_len: byte_len.max(MIN_TOKEN_BYTES),
        }
    }
}

impl Default for RandomHexTokenGenerator {
    fn default() -> Self {
        Self::new(32)
    }
}

impl TokenGenerator for RandomHexTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.byte_len];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
