//! Pkt-line encoding, used to build advertisement fixtures.

/// Encodes one data line: 4-digit hex length prefix plus the payload.
pub fn encode_data_line(line: &str) -> Vec<u8> {
    let mut buf = format!("{:04x}", line.len() + 4).into_bytes();
    buf.extend_from_slice(line.as_bytes());
    buf
}

/// Encodes a flush packet.
pub fn encode_flush() -> Vec<u8> {
    b"0000".to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_data_line() {
        assert_eq!(encode_data_line("hello\n"), b"000ahello\n");
    }

    #[test]
    fn test_encode_flush() {
        assert_eq!(encode_flush(), b"0000");
    }
}
