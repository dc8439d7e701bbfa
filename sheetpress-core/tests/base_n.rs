use sheetpress_core::base_n::{encode, Alphabet, AlphabetError};

fn binary() -> Vec<char> {
    vec!['0', '1']
}

fn decimal() -> Vec<char> {
    ('0'..='9').collect()
}

fn hex() -> Vec<char> {
    "0123456789ABCDEF".chars().collect()
}

#[test]
fn zero_encodes_as_first_symbol() {
    for alphabet in [binary(), decimal(), hex(), ('A'..='Z').collect()] {
        assert_eq!(encode(0, &alphabet, 0), alphabet[0].to_string());
    }
}

#[test]
fn encodes_positional_values() {
    assert_eq!(encode(5, &binary(), 0), "101");
    assert_eq!(encode(255, &hex(), 0), "FF");
    assert_eq!(encode(256, &hex(), 0), "100");
    assert_eq!(encode(1234, &decimal(), 0), "1234");
    assert_eq!(encode(u64::MAX, &hex(), 0), "FFFFFFFFFFFFFFFF");
}

#[test]
fn pads_to_min_digits_with_zero_symbol() {
    assert_eq!(encode(3, &binary(), 8), "00000011");
    assert_eq!(encode(7, &decimal(), 3), "007");
    assert_eq!(encode(0, &decimal(), 4), "0000");
}

#[test]
fn min_digits_never_truncates() {
    assert_eq!(encode(1234, &decimal(), 2), "1234");
}

#[test]
fn order_is_preserved_under_fixed_width() {
    let letters: Vec<char> = ('A'..='Z').collect();
    let width = 3;
    let mut previous = encode(0, &letters, width);
    for v in 1..26u64.pow(3) {
        let current = encode(v, &letters, width);
        assert_eq!(current.len(), width);
        assert!(previous < current, "{previous} should sort before {current}");
        previous = current;
    }

    let mut previous = encode(0, &binary(), 12);
    for v in 1..4096 {
        let current = encode(v, &binary(), 12);
        assert!(previous < current);
        previous = current;
    }
}

#[test]
fn empty_alphabet_yields_empty_string() {
    assert_eq!(encode(0, &[], 0), "");
    assert_eq!(encode(42, &[], 5), "");
}

#[test]
fn single_symbol_alphabet_is_total() {
    assert_eq!(encode(0, &['x'], 0), "x");
    assert_eq!(encode(9, &['x'], 3), "xxx");
}

#[test]
fn alphabet_validates_symbols() {
    assert_eq!(Alphabet::new(Vec::new()), Err(AlphabetError::Empty));
    assert_eq!(
        Alphabet::new("ABCA".chars()),
        Err(AlphabetError::Duplicate('A'))
    );

    let octal = Alphabet::new('0'..='7').expect("valid alphabet");
    assert_eq!(octal.radix(), 8);
    assert_eq!(octal.encode(64, 0), "100");
    assert_eq!(Alphabet::latin_upper().encode(27, 2), "BB");
}
