use rand::Rng;

pub const ID_PREFIX: &str = "ORD";

/// `ORD` + last six base-36 digits of the timestamp + a three digit random
/// suffix. Collisions are unlikely, not impossible.
pub fn generate_order_id(now_ms: i64) -> String {
    generate_order_id_with(now_ms, &mut rand::thread_rng())
}

pub fn generate_order_id_with<R: Rng + ?Sized>(now_ms: i64, rng: &mut R) -> String {
    let stamp = to_base36(now_ms.max(0) as u64);
    let suffix: u16 = rng.gen_range(0..1000);
    format!("{ID_PREFIX}{}{suffix:03}", last_chars(&stamp, 6))
}

/// Id given to a stored record that lost its own.
pub fn fallback_order_id(now_ms: i64) -> String {
    let digits = now_ms.to_string();
    format!("{ID_PREFIX}{}", last_chars(&digits, 6))
}

fn last_chars(s: &str, n: usize) -> &str {
    // ASCII only: base-36 and decimal digits.
    &s[s.len().saturating_sub(n)..]
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
