//! Utility functions for the pq-bench harness

/// Convert bytes to hexadecimal string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Format a throughput figure the way Go benchmarks print it
pub fn format_rate(ops_per_sec: f64) -> String {
    if ops_per_sec.is_infinite() {
        "+Inf".to_string()
    } else {
        format!("{:.1}", ops_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        let bytes = vec![0x01, 0x02, 0x03, 0x04];
        assert_eq!(bytes_to_hex(&bytes), "01020304");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(f64::INFINITY), "+Inf");
        assert_eq!(format_rate(1234.56), "1234.6");
    }
}
