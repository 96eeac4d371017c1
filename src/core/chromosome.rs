const MAX_AUTOSOME: u8 = 22;

/// True for human autosomes 1-22 and X/Y, with or without a `chr` prefix (any case).
pub fn is_standard_chromosome(name: &str) -> bool {
    let bare = match name.get(..3) {
        Some(prefix) if name.len() > 3 && prefix.eq_ignore_ascii_case("chr") => &name[3..],
        _ => name,
    };

    if bare.eq_ignore_ascii_case("X") || bare.eq_ignore_ascii_case("Y") {
        return true;
    }
    if bare.starts_with('0') || !bare.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    bare.parse::<u8>()
        .is_ok_and(|number| (1..=MAX_AUTOSOME).contains(&number))
}
