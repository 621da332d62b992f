use rand::Rng;
use rand::distributions::Alphanumeric;

pub const SESSION_TOKEN_LEN: usize = 48;

/// Random alphanumeric string, used for admin bearer tokens.
pub fn generate_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
