//! フレーム変更検出用チェックサム
//!
//! CRC-16/ISO-3309 (X.25) を計算します。反転多項式 0x8408、初期値 0xFFFF、
//! 最終XOR 0xFFFF。

const POLY: u16 = 0x8408;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// バイト列の16ビットチェックサムを計算
pub fn checksum16(data: &[u8]) -> u16 {
    let crc = data.iter().fold(0xFFFFu16, |crc, &byte| {
        (crc >> 8) ^ TABLE[((crc ^ byte as u16) & 0xFF) as usize]
    });
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(checksum16(b"123456789"), 0x906E);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum16(&[]), 0x0000);
    }

    #[test]
    fn test_padding_byte_changes_checksum() {
        let a = [10u8, 20, 30, 99, 10, 20, 30, 99];
        let mut b = a;
        b[3] = 0;
        assert_ne!(checksum16(&a), checksum16(&b));
    }
}
